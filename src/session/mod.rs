//! Session lifecycle - the console's auth context.
//!
//! A session is in exactly one of three states: unauthenticated, validating
//! (a restore is in flight), or authenticated. The state is replaced by
//! whole-object swap; readers always see a fully consistent snapshot, never a
//! half-updated user.
//!
//! The backend is injected through [`AuthBackend`] so the machine is
//! unit-testable without a network or database.

use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::authz::Principal;
use crate::errors::AppError;
use crate::models::user::Profile;
use crate::nav::composer::Gate;

pub mod backend;
pub use backend::SqlBackend;

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Correct credentials, account not yet verified. Recoverable: callers
    /// branch into the verification flow, the session is left untouched.
    #[error("account requires verification")]
    VerificationRequired,
    #[error("network error: {0}")]
    Network(String),
}

impl From<AuthError> for AppError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::InvalidCredentials => AppError::unauthorized("invalid credentials"),
            AuthError::VerificationRequired => {
                AppError::verification_required("account pending verification")
            }
            AuthError::Network(msg) => AppError::internal(msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub token: String,
    pub profile: Profile,
}

#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginSuccess, AuthError>;
    async fn fetch_profile(&self, token: &str) -> Result<Profile, AuthError>;
    async fn logout(&self, token: &str) -> Result<(), AuthError>;
}

/// An authenticated user plus its precomputed authorization projection.
#[derive(Debug, Clone)]
pub struct ActiveUser {
    pub profile: Profile,
    pub principal: Principal,
}

impl From<Profile> for ActiveUser {
    fn from(profile: Profile) -> Self {
        let principal = profile.principal();
        Self { profile, principal }
    }
}

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Validating,
    Authenticated(ActiveUser),
}

impl SessionState {
    pub fn gate(&self) -> Gate<'_> {
        match self {
            SessionState::Unauthenticated => Gate::Unauthenticated,
            SessionState::Validating => Gate::Validating,
            SessionState::Authenticated(user) => Gate::Authenticated(&user.principal),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn is_validating(&self) -> bool {
        matches!(self, SessionState::Validating)
    }
}

/// UI-scoped cache of "the entity currently being viewed". Deliberately not
/// part of [`Principal`]: the evaluator cannot read it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityContext {
    pub affiliate_id: Option<Uuid>,
    pub game_provider_id: Option<Uuid>,
    pub sport_provider_id: Option<Uuid>,
}

#[derive(Debug, Default)]
struct Inner {
    token: Option<String>,
    state: SessionState,
    context: EntityContext,
}

pub struct Session<B> {
    backend: B,
    inner: RwLock<Inner>,
}

impl<B: AuthBackend> Session<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            inner: RwLock::new(Inner::default()),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.read().state.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn context(&self) -> EntityContext {
        self.read().context.clone()
    }

    pub fn set_viewed_affiliate(&self, id: Option<Uuid>) {
        self.write().context.affiliate_id = id;
    }

    pub fn set_viewed_game_provider(&self, id: Option<Uuid>) {
        self.write().context.game_provider_id = id;
    }

    pub fn set_viewed_sport_provider(&self, id: Option<Uuid>) {
        self.write().context.sport_provider_id = id;
    }

    /// Authenticate. On failure the pre-failure state is left intact.
    pub async fn login(&self, credentials: &Credentials) -> Result<Profile, AuthError> {
        let LoginSuccess { token, profile } = self.backend.login(credentials).await?;
        let active = ActiveUser::from(profile.clone());
        let mut inner = self.write();
        inner.token = Some(token);
        inner.state = SessionState::Authenticated(active);
        Ok(profile)
    }

    /// End the session. The backend call is best-effort: the local state
    /// always ends up unauthenticated, a stale-authenticated UI after a
    /// requested logout is never acceptable.
    pub async fn logout(&self) {
        let token = self.write().token.take();
        if let Some(token) = token {
            if let Err(err) = self.backend.logout(&token).await {
                tracing::warn!(error = %err, "logout call failed, clearing local session anyway");
            }
        }
        let mut inner = self.write();
        inner.state = SessionState::Unauthenticated;
        inner.context = EntityContext::default();
    }

    /// Resume a persisted token. The session reads as `Validating` until the
    /// profile fetch settles, so route decisions defer instead of defaulting
    /// to unauthorized.
    pub async fn restore(&self, token: String) {
        self.write().state = SessionState::Validating;

        match self.backend.fetch_profile(&token).await {
            Ok(profile) => {
                let mut inner = self.write();
                inner.token = Some(token);
                inner.state = SessionState::Authenticated(ActiveUser::from(profile));
            }
            Err(err) => {
                tracing::debug!(error = %err, "session restore failed");
                let mut inner = self.write();
                inner.token = None;
                inner.state = SessionState::Unauthenticated;
            }
        }
    }
}
