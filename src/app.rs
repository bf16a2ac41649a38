use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post, put};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::events::{self, EventBus};
use crate::jwt::JwtConfig;
use crate::nav::ComponentRegistry;
use crate::routes::{auth, designations, health, nav};
use crate::session::SqlBackend;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt: Arc<JwtConfig>,
    pub event_bus: EventBus,
    pub components: Arc<ComponentRegistry>,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt: JwtConfig, event_bus: EventBus) -> Self {
        Self {
            pool,
            jwt: Arc::new(jwt),
            event_bus,
            components: Arc::new(ComponentRegistry::with_defaults()),
        }
    }

    pub fn auth_backend(&self) -> SqlBackend {
        SqlBackend::new(self.pool.clone(), self.jwt.clone())
    }
}

pub async fn create_app(pool: SqlitePool) -> Result<Router, AppError> {
    let jwt_config = JwtConfig::from_env()?;

    let (event_bus, rx) = events::init_event_bus();
    tokio::spawn(events::start_activity_listener(rx, pool.clone()));

    let state = AppState::new(pool, jwt_config, event_bus);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout));

    let router = Router::new()
        .route("/health", get(health::health))
        .nest("/auth", auth_routes)
        .route("/navigation", get(nav::navigation))
        .route("/authz/categories", get(nav::categories))
        .nest("/designations", designations::routes())
        .route("/users/:user_id/designation", put(designations::assign_designation))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}
