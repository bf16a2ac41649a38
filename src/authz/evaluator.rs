//! Rule evaluator for route and menu gating.
//!
//! Evaluation order for a gated key:
//! 1. role bypass for the gate area -> allow
//! 2. key membership in the user's permission set -> allow
//! 3. deny
//!
//! Every function here is total, synchronous, and deterministic for identical
//! inputs. A missing permission set and an unknown category both evaluate to
//! "no permission", never to an error.

use std::collections::HashSet;

use super::principal::Principal;
use super::registry;
use super::Role;

/// Which bypass table applies to a gate.
///
/// The admin console and the affiliate sub-application grant implicit access
/// to different elevated roles; both tables live here so no call site
/// compares role names on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateArea {
    Admin,
    Affiliate,
}

/// Roles granted unconditional access for a gate area, checked before any
/// permission lookup.
pub fn bypass_roles(area: GateArea) -> &'static [Role] {
    match area {
        GateArea::Admin => &[Role::SuperAdmin],
        GateArea::Affiliate => &[Role::SuperAdmin, Role::SuperAffiliate],
    }
}

pub fn role_bypasses(role: Role, area: GateArea) -> bool {
    bypass_roles(area).contains(&role)
}

/// True iff `key` is a member of the permission set. `None` is an empty set.
pub fn has_permission(perms: Option<&HashSet<String>>, key: &str) -> bool {
    perms.map(|p| p.contains(key)).unwrap_or(false)
}

/// Logical OR over `keys`, short-circuiting on the first match.
pub fn has_any_permission(perms: Option<&HashSet<String>>, keys: &[&str]) -> bool {
    keys.iter().any(|key| has_permission(perms, key))
}

/// Logical AND over `keys`.
pub fn has_all_permissions(perms: Option<&HashSet<String>>, keys: &[&str]) -> bool {
    keys.iter().all(|key| has_permission(perms, key))
}

/// True iff the set holds at least one key from the category's list.
/// Unknown categories have an empty list and therefore never match.
pub fn has_category_permission(perms: Option<&HashSet<String>>, category: &str) -> bool {
    has_any_permission(perms, registry::permissions_by_category(category))
}

/// Key-level grant against the admin gate.
pub fn admin_grant(principal: &Principal, key: &str) -> bool {
    grant(principal, key, GateArea::Admin)
}

/// Key-level grant against the affiliate gate (superAffiliate bypasses).
pub fn affiliate_grant(principal: &Principal, key: &str) -> bool {
    grant(principal, key, GateArea::Affiliate)
}

/// Category-level grant against the admin gate. A routable item with no
/// category is visible to bypass roles only.
pub fn admin_category_grant(principal: &Principal, category: Option<&str>) -> bool {
    if role_bypasses(principal.role, GateArea::Admin) {
        tracing::debug!(
            user_id = %principal.user_id,
            role = %principal.role,
            "role bypass"
        );
        return true;
    }

    match category {
        Some(category) => has_category_permission(Some(&principal.permissions), category),
        None => false,
    }
}

fn grant(principal: &Principal, key: &str, area: GateArea) -> bool {
    if role_bypasses(principal.role, area) {
        tracing::debug!(
            user_id = %principal.user_id,
            role = %principal.role,
            permission = %key,
            "role bypass"
        );
        return true;
    }

    if principal.has_permission(key) {
        tracing::debug!(
            user_id = %principal.user_id,
            permission = %key,
            "direct permission match"
        );
        return true;
    }

    tracing::debug!(
        user_id = %principal.user_id,
        permission = %key,
        "permission denied"
    );
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn perms(keys: &[&str]) -> HashSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn membership_matches_set_contents() {
        let p = perms(&["kyc_approve_kyc"]);
        assert!(has_permission(Some(&p), "kyc_approve_kyc"));
        assert!(!has_permission(Some(&p), "kyc_reject_kyc"));
    }

    #[test]
    fn missing_set_is_empty() {
        assert!(!has_permission(None, "kyc_approve_kyc"));
        assert!(!has_any_permission(None, &["kyc_approve_kyc", "kyc_view_kyc"]));
        assert!(has_all_permissions(None, &[]));
        assert!(!has_all_permissions(None, &["kyc_view_kyc"]));
    }

    #[test]
    fn any_and_all_combinators() {
        let p = perms(&["payment_view_deposits", "payment_view_withdrawals"]);
        assert!(has_any_permission(Some(&p), &["bonus_view_bonuses", "payment_view_deposits"]));
        assert!(has_all_permissions(
            Some(&p),
            &["payment_view_deposits", "payment_view_withdrawals"]
        ));
        assert!(!has_all_permissions(
            Some(&p),
            &["payment_view_deposits", "payment_approve_deposits"]
        ));
    }

    #[test]
    fn category_check_is_set_intersection() {
        let p = perms(&["affiliate_view_affiliate_commissions"]);
        assert!(has_category_permission(Some(&p), "affiliates"));
        assert!(!has_category_permission(Some(&p), "payments"));
        assert!(!has_category_permission(Some(&p), "no_such_category"));
    }

    #[test]
    fn super_admin_bypasses_every_gate() {
        let principal = Principal::new(Uuid::new_v4(), Role::SuperAdmin);
        assert!(admin_grant(&principal, "anything_at_all"));
        assert!(affiliate_grant(&principal, "anything_at_all"));
        assert!(admin_category_grant(&principal, None));
        assert!(admin_category_grant(&principal, Some("no_such_category")));
    }

    #[test]
    fn super_affiliate_bypasses_the_affiliate_gate_only() {
        let principal = Principal::new(Uuid::new_v4(), Role::SuperAffiliate);
        assert!(affiliate_grant(&principal, "affiliate_view_affiliate_withdrawals"));
        assert!(!admin_grant(&principal, "affiliate_view_affiliate_withdrawals"));
        assert!(!admin_category_grant(&principal, Some("affiliates")));
    }

    #[test]
    fn plain_role_falls_back_to_permission_lookup() {
        let principal = Principal::new(Uuid::new_v4(), Role::Affiliate)
            .with_permissions(vec!["affiliate_view_affiliate_commissions".to_string()]);
        assert!(affiliate_grant(&principal, "affiliate_view_affiliate_commissions"));
        assert!(!affiliate_grant(&principal, "affiliate_view_affiliate_withdrawals"));
    }

    #[test]
    fn missing_category_denies_non_bypass_roles() {
        let principal = Principal::new(Uuid::new_v4(), Role::Admin)
            .with_permissions(vec!["kyc_view_kyc".to_string()]);
        assert!(!admin_category_grant(&principal, None));
        assert!(admin_category_grant(&principal, Some("kyc")));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let principal = Principal::new(Uuid::new_v4(), Role::Agent)
            .with_permissions(vec!["player_view_players".to_string()]);
        let first = admin_grant(&principal, "player_view_players");
        let second = admin_grant(&principal, "player_view_players");
        assert_eq!(first, second);
        assert!(first);
    }
}
