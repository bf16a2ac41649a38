//! Designation admin API.
//!
//! Role profiles (named permission lists) and their assignment to users.
//! Writes are superAdmin-only and validate every permission key against the
//! static registry. All mutations land in the audit log with Critical
//! severity.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::evaluator::{self, GateArea};
use crate::errors::{AppError, AppResult};
use crate::events::{log_activity_with_context, RequestContext};
use crate::jwt::AuthUser;
use crate::models::designation::{
    AssignDesignationRequest, DbDesignation, Designation, DesignationAssignment,
    DesignationCreateRequest, DesignationUpdateRequest,
};
use crate::session::backend::fetch_user_by_id;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_designations).post(create_designation))
        .route(
            "/:designation_id",
            get(get_designation)
                .put(update_designation)
                .delete(delete_designation),
        )
}

/// Designation changes reshape what other users can see; only the platform
/// owner role may make them.
async fn require_super_admin(state: &AppState, auth: &AuthUser) -> AppResult<()> {
    let profile = state.auth_backend().profile(auth.user_id).await?;
    let principal = profile.principal();
    if !evaluator::role_bypasses(principal.role, GateArea::Admin) {
        return Err(AppError::forbidden("superAdmin required"));
    }
    Ok(())
}

fn validate_permissions(keys: &[String]) -> AppResult<()> {
    for key in keys {
        if !crate::authz::registry::is_known_permission(key) {
            return Err(AppError::bad_request(format!("unknown permission key: {key}")));
        }
    }
    Ok(())
}

/// List all designations
#[utoipa::path(
    get,
    path = "/designations",
    tag = "Designations",
    responses((status = 200, description = "List of designations", body = Vec<Designation>)),
    security(("bearerAuth" = []))
)]
async fn list_designations(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<Designation>>> {
    let rows = sqlx::query_as::<_, DbDesignation>(
        "SELECT id, name, description, permissions, created_at, updated_at FROM designations ORDER BY name",
    )
    .fetch_all(&state.pool)
    .await?;

    let designations = rows
        .into_iter()
        .map(Designation::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(designations))
}

/// Create a new designation
#[utoipa::path(
    post,
    path = "/designations",
    tag = "Designations",
    request_body = DesignationCreateRequest,
    responses(
        (status = 201, description = "Designation created", body = Designation),
        (status = 400, description = "Unknown permission key"),
        (status = 409, description = "Designation name already exists"),
    ),
    security(("bearerAuth" = []))
)]
async fn create_designation(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(req): Json<DesignationCreateRequest>,
) -> AppResult<(StatusCode, Json<Designation>)> {
    require_super_admin(&state, &auth).await?;
    validate_permissions(&req.permissions)?;
    ensure_name_available(&state, &req.name).await?;

    let id = Uuid::new_v4();
    let now = Utc::now();
    let permissions_json = serde_json::to_string(&req.permissions)
        .map_err(|err| AppError::bad_request(format!("invalid permissions payload: {err}")))?;

    sqlx::query(
        "INSERT INTO designations (id, name, description, permissions, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id.to_string())
    .bind(&req.name)
    .bind(&req.description)
    .bind(&permissions_json)
    .bind(now)
    .bind(now)
    .execute(&state.pool)
    .await?;

    let designation = Designation {
        id,
        name: req.name,
        description: req.description,
        permissions: req.permissions,
        created_at: now,
        updated_at: now,
    };

    log_activity_with_context(
        &state.event_bus,
        "created",
        Some(auth.user_id),
        &designation,
        None,
        Some(RequestContext::from_headers(&headers)),
    );

    Ok((StatusCode::CREATED, Json(designation)))
}

/// Get a designation by ID
#[utoipa::path(
    get,
    path = "/designations/{designation_id}",
    tag = "Designations",
    params(("designation_id" = Uuid, Path, description = "Designation ID")),
    responses(
        (status = 200, description = "Designation details", body = Designation),
        (status = 404, description = "Designation not found"),
    ),
    security(("bearerAuth" = []))
)]
async fn get_designation(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(designation_id): Path<Uuid>,
) -> AppResult<Json<Designation>> {
    let designation = fetch_designation(&state, designation_id).await?;
    Ok(Json(designation))
}

/// Update a designation
#[utoipa::path(
    put,
    path = "/designations/{designation_id}",
    tag = "Designations",
    params(("designation_id" = Uuid, Path, description = "Designation ID")),
    request_body = DesignationUpdateRequest,
    responses(
        (status = 200, description = "Designation updated", body = Designation),
        (status = 400, description = "Unknown permission key"),
        (status = 404, description = "Designation not found"),
    ),
    security(("bearerAuth" = []))
)]
async fn update_designation(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Path(designation_id): Path<Uuid>,
    Json(req): Json<DesignationUpdateRequest>,
) -> AppResult<Json<Designation>> {
    require_super_admin(&state, &auth).await?;
    if let Some(permissions) = &req.permissions {
        validate_permissions(permissions)?;
    }

    let existing = fetch_designation(&state, designation_id).await?;
    let now = Utc::now();

    let updated = Designation {
        id: existing.id,
        name: req.name.clone().unwrap_or_else(|| existing.name.clone()),
        description: req.description.clone().or_else(|| existing.description.clone()),
        permissions: req
            .permissions
            .clone()
            .unwrap_or_else(|| existing.permissions.clone()),
        created_at: existing.created_at,
        updated_at: now,
    };

    let permissions_json = serde_json::to_string(&updated.permissions)
        .map_err(|err| AppError::bad_request(format!("invalid permissions payload: {err}")))?;

    sqlx::query(
        "UPDATE designations SET name = ?, description = ?, permissions = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&updated.name)
    .bind(&updated.description)
    .bind(&permissions_json)
    .bind(now)
    .bind(designation_id.to_string())
    .execute(&state.pool)
    .await?;

    log_activity_with_context(
        &state.event_bus,
        "updated",
        Some(auth.user_id),
        &updated,
        Some(&existing),
        Some(RequestContext::from_headers(&headers)),
    );

    Ok(Json(updated))
}

/// Delete a designation
#[utoipa::path(
    delete,
    path = "/designations/{designation_id}",
    tag = "Designations",
    params(("designation_id" = Uuid, Path, description = "Designation ID")),
    responses(
        (status = 204, description = "Designation deleted"),
        (status = 404, description = "Designation not found"),
    ),
    security(("bearerAuth" = []))
)]
async fn delete_designation(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Path(designation_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_super_admin(&state, &auth).await?;

    let designation = fetch_designation(&state, designation_id).await?;

    sqlx::query("DELETE FROM designations WHERE id = ?")
        .bind(designation_id.to_string())
        .execute(&state.pool)
        .await?;

    log_activity_with_context(
        &state.event_bus,
        "deleted",
        Some(auth.user_id),
        &designation,
        None,
        Some(RequestContext::from_headers(&headers)),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Assign or clear a user's designation
#[utoipa::path(
    put,
    path = "/users/{user_id}/designation",
    tag = "Designations",
    params(("user_id" = Uuid, Path, description = "User ID")),
    request_body = AssignDesignationRequest,
    responses(
        (status = 200, description = "Designation assignment updated"),
        (status = 404, description = "User or designation not found"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn assign_designation(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
    Json(req): Json<AssignDesignationRequest>,
) -> AppResult<Json<DesignationAssignment>> {
    require_super_admin(&state, &auth).await?;

    fetch_user_by_id(&state.pool, user_id).await?;
    if let Some(designation_id) = req.designation_id {
        fetch_designation(&state, designation_id).await?;
    }

    let now = Utc::now();
    sqlx::query("UPDATE users SET designation_id = ?, updated_at = ? WHERE id = ?")
        .bind(req.designation_id.map(|id| id.to_string()))
        .bind(now)
        .bind(user_id.to_string())
        .execute(&state.pool)
        .await?;

    let assignment = DesignationAssignment {
        user_id,
        designation_id: req.designation_id,
        assigned_at: now,
    };

    let action = if req.designation_id.is_some() { "assigned" } else { "revoked" };
    log_activity_with_context(
        &state.event_bus,
        action,
        Some(auth.user_id),
        &assignment,
        None,
        Some(RequestContext::from_headers(&headers)),
    );

    Ok(Json(assignment))
}

async fn fetch_designation(state: &AppState, designation_id: Uuid) -> AppResult<Designation> {
    let row = sqlx::query_as::<_, DbDesignation>(
        "SELECT id, name, description, permissions, created_at, updated_at FROM designations WHERE id = ?",
    )
    .bind(designation_id.to_string())
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::not_found("designation not found"))?;

    Designation::try_from(row)
}

async fn ensure_name_available(state: &AppState, name: &str) -> AppResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM designations WHERE name = ?")
        .bind(name)
        .fetch_one(&state.pool)
        .await?;

    if count > 0 {
        return Err(AppError::conflict("designation name already in use"));
    }

    Ok(())
}
