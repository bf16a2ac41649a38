use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use tempfile::{tempdir, TempDir};
use tower::util::ServiceExt;
use uuid::Uuid;

use pitboss::create_app;
use pitboss::utils::hash_password;

async fn setup(db_name: &str) -> Result<(TempDir, SqlitePool, Router)> {
    let dir = tempdir().context("failed to create tempdir")?;
    let db_path = dir.path().join(db_name);
    let opts = SqliteConnectOptions::new()
        .filename(db_path.as_path())
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;

    let migrator = sqlx::migrate::Migrator::new(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations"),
    )
    .await?;
    migrator.run(&pool).await?;

    std::env::set_var("JWT_SECRET", "test-secret");
    let app = create_app(pool.clone()).await?;

    Ok((dir, pool, app))
}

async fn seed_user(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    role: &str,
    verified: bool,
) -> Result<Uuid> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role, designation_id, verified, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, NULL, ?, ?, ?)",
    )
    .bind(id.to_string())
    .bind("Test User")
    .bind(email)
    .bind(&password_hash)
    .bind(role)
    .bind(if verified { 1 } else { 0 })
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(id)
}

async fn body_json(resp: Response) -> Result<Value> {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn login_request(email: &str, password: &str) -> Result<Request<Body>> {
    let body = json!({ "email": email, "password": password });
    Ok(Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))?)
}

#[tokio::test]
async fn login_returns_token_and_profile() -> Result<()> {
    let (_dir, pool, app) = setup("login_ok.db").await?;
    seed_user(&pool, "boss@casino.example", "password123", "admin", true).await?;

    let resp = app
        .clone()
        .oneshot(login_request("boss@casino.example", "password123")?)
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await?;
    assert!(body["token"].as_str().map(|t| !t.is_empty()).unwrap_or(false));
    assert_eq!(body["profile"]["email"], "boss@casino.example");
    assert_eq!(body["profile"]["role"], "admin");

    Ok(())
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() -> Result<()> {
    let (_dir, pool, app) = setup("login_wrong.db").await?;
    seed_user(&pool, "boss@casino.example", "password123", "admin", true).await?;

    let resp = app
        .clone()
        .oneshot(login_request("boss@casino.example", "wrongpassword")?)
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(resp).await?;
    assert_eq!(body["error"], "unauthorized");

    Ok(())
}

#[tokio::test]
async fn login_with_unknown_email_is_unauthorized() -> Result<()> {
    let (_dir, _pool, app) = setup("login_nobody.db").await?;

    let resp = app
        .clone()
        .oneshot(login_request("nobody@casino.example", "password123")?)
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn unverified_account_gets_the_verification_branch() -> Result<()> {
    let (_dir, pool, app) = setup("login_unverified.db").await?;
    seed_user(&pool, "new@casino.example", "password123", "agent", false).await?;

    let resp = app
        .clone()
        .oneshot(login_request("new@casino.example", "password123")?)
        .await?;

    // Correct credentials, unverified account: a distinct, recoverable
    // failure, not invalid_credentials.
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_json(resp).await?;
    assert_eq!(body["error"], "verification_required");

    Ok(())
}

#[tokio::test]
async fn me_restores_the_profile_from_a_token() -> Result<()> {
    let (_dir, pool, app) = setup("me_ok.db").await?;
    seed_user(&pool, "boss@casino.example", "password123", "superAdmin", true).await?;

    let resp = app
        .clone()
        .oneshot(login_request("boss@casino.example", "password123")?)
        .await?;
    let body = body_json(resp).await?;
    let token = body["token"].as_str().context("token missing")?.to_string();

    let req = Request::builder()
        .method("GET")
        .uri("/auth/me")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let me = body_json(resp).await?;
    assert_eq!(me["email"], "boss@casino.example");
    assert_eq!(me["role"], "superAdmin");

    Ok(())
}

#[tokio::test]
async fn me_without_token_is_unauthorized() -> Result<()> {
    let (_dir, _pool, app) = setup("me_missing.db").await?;

    let req = Request::builder()
        .method("GET")
        .uri("/auth/me")
        .body(Body::empty())?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .method("GET")
        .uri("/auth/me")
        .header("authorization", "Bearer not-a-jwt")
        .body(Body::empty())?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn logout_always_acknowledges() -> Result<()> {
    let (_dir, pool, app) = setup("logout.db").await?;
    seed_user(&pool, "boss@casino.example", "password123", "admin", true).await?;

    let resp = app
        .clone()
        .oneshot(login_request("boss@casino.example", "password123")?)
        .await?;
    let body = body_json(resp).await?;
    let token = body["token"].as_str().context("token missing")?.to_string();

    let req = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}
