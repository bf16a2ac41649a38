use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::events::{log_activity_with_context, RequestContext};
use crate::jwt::AuthUser;
use crate::models::user::{AuthResponse, LoginRequest, Profile};
use crate::session::{AuthBackend, Credentials};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    message: String,
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account pending verification")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let credentials = Credentials {
        email: payload.email,
        password: payload.password,
    };

    let success = state
        .auth_backend()
        .login(&credentials)
        .await
        .map_err(AppError::from)?;

    log_activity_with_context(
        &state.event_bus,
        "login",
        Some(success.profile.id),
        &success.profile,
        None,
        Some(RequestContext::from_headers(&headers)),
    );

    Ok(Json(AuthResponse {
        token: success.token,
        profile: success.profile,
    }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    responses((status = 200, description = "Current profile", body = Profile)),
    security(("bearerAuth" = []))
)]
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Profile>> {
    let profile = state.auth_backend().profile(auth.user_id).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Logout acknowledged")),
    security(("bearerAuth" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
) -> AppResult<Json<MessageResponse>> {
    // Best-effort audit entry; logout acknowledges regardless.
    if let Ok(profile) = state.auth_backend().profile(auth.user_id).await {
        log_activity_with_context(
            &state.event_bus,
            "logout",
            Some(auth.user_id),
            &profile,
            None,
            Some(RequestContext::from_headers(&headers)),
        );
    }

    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}
