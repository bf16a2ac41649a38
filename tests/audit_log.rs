use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Row, SqlitePool};
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

async fn seed_super_admin(pool: &SqlitePool, email: &str) -> Result<Uuid> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let password_hash = hash_password("password123").map_err(|e| anyhow::anyhow!(e.to_string()))?;

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role, designation_id, verified, created_at, updated_at) \
         VALUES (?, ?, ?, ?, 'superAdmin', NULL, 1, ?, ?)",
    )
    .bind(id.to_string())
    .bind("Owner")
    .bind(email)
    .bind(&password_hash)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(id)
}

async fn login(app: &Router, email: &str) -> Result<String> {
    let body = json!({ "email": email, "password": "password123" });
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    Ok(body["token"].as_str().context("token missing")?.to_string())
}

/// The listener runs on a background task; give it a moment to drain.
async fn wait_for_events(pool: &SqlitePool, table: &str, minimum: i64) -> Result<()> {
    let query = format!("SELECT COUNT(1) FROM {table}");
    for _ in 0..50 {
        let count: i64 = sqlx::query_scalar(&query).fetch_one(pool).await?;
        if count >= minimum {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    anyhow::bail!("{table} never reached {minimum} entries");
}

#[tokio::test]
async fn login_and_designation_changes_are_audited() -> Result<()> {
    let (_dir, pool, app) = setup("audit.db").await?;
    let owner_id = seed_super_admin(&pool, "owner@casino.example").await?;
    let token = login(&app, "owner@casino.example").await?;

    let create = json!({ "name": "Floor", "permissions": ["player_view_players"] });
    let req = Request::builder()
        .method("POST")
        .uri("/designations")
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .header("user-agent", "audit-test")
        .body(Body::from(create.to_string()))?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    wait_for_events(&pool, "activity_log", 2).await?;

    let login_row = sqlx::query(
        "SELECT actor_id, severity FROM activity_log WHERE event_name = 'user.login'",
    )
    .fetch_one(&pool)
    .await?;
    assert_eq!(login_row.get::<String, _>("actor_id"), owner_id.to_string());

    let created_row = sqlx::query(
        "SELECT severity, properties FROM activity_log WHERE event_name = 'designation.created'",
    )
    .fetch_one(&pool)
    .await?;
    // Designation changes are critical; the request context rides along.
    assert_eq!(created_row.get::<String, _>("severity"), "critical");
    let properties: Value = serde_json::from_str(&created_row.get::<String, _>("properties"))?;
    assert_eq!(properties["payload"]["context"]["user_agent"], "audit-test");

    Ok(())
}

#[tokio::test]
async fn event_store_forms_a_hash_chain() -> Result<()> {
    let (_dir, pool, app) = setup("audit_chain.db").await?;
    seed_super_admin(&pool, "owner@casino.example").await?;

    // Two logins -> two chained events.
    login(&app, "owner@casino.example").await?;
    login(&app, "owner@casino.example").await?;

    wait_for_events(&pool, "event_store", 2).await?;

    let rows = sqlx::query("SELECT prev_hash, hash FROM event_store")
        .fetch_all(&pool)
        .await?;
    assert_eq!(rows.len(), 2);

    let genesis = rows
        .iter()
        .find(|r| r.get::<Option<String>, _>("prev_hash").is_none())
        .context("no genesis event")?;
    let genesis_hash: String = genesis.get("hash");

    let linked = rows
        .iter()
        .any(|r| r.get::<Option<String>, _>("prev_hash").as_deref() == Some(genesis_hash.as_str()));
    assert!(linked, "second event must link to the first event's hash");

    Ok(())
}
