use axum::extract::State;
use axum::Json;

use crate::app::AppState;
use crate::authz::registry::{self, PermissionCategory};
use crate::errors::{AppError, AppResult};
use crate::jwt::MaybeAuthUser;
use crate::nav::{compose, Gate, RouteTable, MAIN_MENU, OUTSIDE_AREAS};

/// The composed route table for the caller.
///
/// Anonymous callers (and callers whose token no longer maps to a user) get
/// the redirect-to-login table; the console shell renders whatever comes back
/// without re-deriving any rule.
#[utoipa::path(
    get,
    path = "/navigation",
    tag = "Navigation",
    responses((status = 200, description = "Route table for the current session")),
    security((), ("bearerAuth" = []))
)]
pub async fn navigation(
    State(state): State<AppState>,
    maybe: MaybeAuthUser,
) -> AppResult<Json<RouteTable>> {
    let table = match maybe.0 {
        None => compose(MAIN_MENU, OUTSIDE_AREAS, &state.components, Gate::Unauthenticated),
        Some(auth) => match state.auth_backend().profile(auth.user_id).await {
            Ok(profile) => {
                let principal = profile.principal();
                compose(
                    MAIN_MENU,
                    OUTSIDE_AREAS,
                    &state.components,
                    Gate::Authenticated(&principal),
                )
            }
            // A token for a deleted account is an anonymous caller.
            Err(AppError::NotFound(_)) => {
                compose(MAIN_MENU, OUTSIDE_AREAS, &state.components, Gate::Unauthenticated)
            }
            Err(err) => return Err(err),
        },
    };

    Ok(Json(table))
}

/// The static permission registry, as the designation editor consumes it.
#[utoipa::path(
    get,
    path = "/authz/categories",
    tag = "Navigation",
    responses((status = 200, description = "Permission categories"))
)]
pub async fn categories() -> Json<&'static [PermissionCategory]> {
    Json(registry::CATEGORIES)
}
