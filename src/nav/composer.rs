//! Route composer.
//!
//! One pure pass over the menu tree and the outside areas produces the route
//! table for a given session gate. Every route resolves to exactly one of
//! five outcomes:
//!
//! - `Render`         authorized, screen shipped
//! - `NotImplemented` authorized, screen missing (under construction)
//! - `Unauthorized`   authenticated, insufficient permission
//! - `RedirectLogin`  no session
//! - `Loading`        session still validating; no final decision yet
//!
//! The outcomes are mutually exclusive and exhaustive; composition of the
//! same inputs always yields the same table.

use serde::Serialize;

use crate::authz::evaluator::{self, GateArea};
use crate::authz::Principal;

use super::components::ComponentRegistry;
use super::menu::{AreaKind, MenuChild, MenuItem, OutsideArea};

/// The session's authorization posture at composition time.
#[derive(Debug, Clone, Copy)]
pub enum Gate<'a> {
    Validating,
    Unauthenticated,
    Authenticated(&'a Principal),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RouteOutcome {
    Render { component: String },
    NotImplemented,
    Unauthorized,
    RedirectLogin,
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub path: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(flatten)]
    pub outcome: RouteOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RouteTable {
    pub routes: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn find(&self, path: &str) -> Option<&RouteEntry> {
        self.routes.iter().find(|r| r.path == path)
    }
}

/// Build the route table for one (menu, areas, session) triple.
pub fn compose(
    menu: &[MenuItem],
    areas: &[OutsideArea],
    registry: &ComponentRegistry,
    gate: Gate<'_>,
) -> RouteTable {
    let mut routes = Vec::new();

    for item in menu {
        if let Some(path) = item.path {
            routes.push(RouteEntry {
                path: path.to_string(),
                label: item.label.to_string(),
                layout: None,
                outcome: resolve(gate, registry, item.component, |principal| {
                    item_authorized(principal, item)
                }),
            });
        }

        // Grouping nodes emit nothing themselves but children are always walked.
        for child in item.children {
            routes.push(RouteEntry {
                path: child.path.to_string(),
                label: child.label.to_string(),
                layout: None,
                outcome: resolve(gate, registry, child.component, |principal| {
                    child_authorized(principal, child, item.skip_roles)
                }),
            });
        }
    }

    for area in areas {
        for route in area.routes {
            routes.push(RouteEntry {
                path: route.path.to_string(),
                label: area.layout.to_string(),
                layout: Some(area.layout.to_string()),
                outcome: resolve(gate, registry, route.component, |principal| {
                    area_authorized(principal, area.kind, route.access_key)
                }),
            });
        }
    }

    RouteTable { routes }
}

fn resolve(
    gate: Gate<'_>,
    registry: &ComponentRegistry,
    component: Option<&'static str>,
    authorized: impl Fn(&Principal) -> bool,
) -> RouteOutcome {
    match gate {
        Gate::Validating => RouteOutcome::Loading,
        Gate::Unauthenticated => RouteOutcome::RedirectLogin,
        Gate::Authenticated(principal) => {
            if !authorized(principal) {
                return RouteOutcome::Unauthorized;
            }
            match component.and_then(|id| registry.resolve(id)) {
                Some(resolved) => RouteOutcome::Render {
                    component: resolved.id.to_string(),
                },
                None => RouteOutcome::NotImplemented,
            }
        }
    }
}

/// Top-level rule: bypass role, skip list, or category intersection.
/// An item with no category is visible to bypass/skip roles only.
fn item_authorized(principal: &Principal, item: &MenuItem) -> bool {
    if evaluator::role_bypasses(principal.role, GateArea::Admin)
        || item.skip_roles.contains(&principal.role)
    {
        return true;
    }
    item.access_category
        .map(|category| evaluator::has_category_permission(Some(&principal.permissions), category))
        .unwrap_or(false)
}

/// Child rule: same bypasses as the parent, then a key-level check.
fn child_authorized(
    principal: &Principal,
    child: &MenuChild,
    skip_roles: &[crate::authz::Role],
) -> bool {
    if evaluator::role_bypasses(principal.role, GateArea::Admin)
        || skip_roles.contains(&principal.role)
    {
        return true;
    }
    child
        .access_key
        .map(|key| evaluator::has_permission(Some(&principal.permissions), key))
        .unwrap_or(false)
}

/// Outside areas gate on a single key; the affiliate sub-application grants
/// its elevated roles implicitly.
fn area_authorized(principal: &Principal, kind: AreaKind, key: &str) -> bool {
    match kind {
        AreaKind::Affiliate => evaluator::affiliate_grant(principal, key),
        AreaKind::GameProvider | AreaKind::SportProvider => {
            evaluator::admin_grant(principal, key)
        }
    }
}
