//! Credential backend over the user store.
//!
//! One implementation serves both consumers: the HTTP handlers and the
//! session state machine go through the same path for credential checks,
//! token issuance, and profile loading.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jwt::JwtConfig;
use crate::models::designation::DbDesignation;
use crate::models::user::{DbUser, DesignationSummary, Profile, User};
use crate::utils::verify_password;

use super::{AuthBackend, AuthError, Credentials, LoginSuccess};

#[derive(Clone)]
pub struct SqlBackend {
    pool: SqlitePool,
    jwt: Arc<JwtConfig>,
}

impl SqlBackend {
    pub fn new(pool: SqlitePool, jwt: Arc<JwtConfig>) -> Self {
        Self { pool, jwt }
    }

    /// Load the console profile for a known user id.
    pub async fn profile(&self, user_id: Uuid) -> Result<Profile, AppError> {
        let db_user = fetch_user_by_id(&self.pool, user_id).await?;
        profile_for(&self.pool, db_user).await
    }
}

#[async_trait]
impl AuthBackend for SqlBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginSuccess, AuthError> {
        let db_user = fetch_user_by_email(&self.pool, &credentials.email)
            .await
            .map_err(network)?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_ok =
            verify_password(&credentials.password, &db_user.password_hash).map_err(network)?;
        if !password_ok {
            return Err(AuthError::InvalidCredentials);
        }

        // Correct credentials on an unverified account: recoverable, the
        // caller branches into the verification flow.
        if db_user.verified == 0 {
            return Err(AuthError::VerificationRequired);
        }

        let profile = profile_for(&self.pool, db_user).await.map_err(network)?;
        let token = self.jwt.encode(profile.id).map_err(network)?;

        Ok(LoginSuccess { token, profile })
    }

    async fn fetch_profile(&self, token: &str) -> Result<Profile, AuthError> {
        let claims = self
            .jwt
            .decode(token)
            .map_err(|_| AuthError::InvalidCredentials)?;

        self.profile(claims.sub).await.map_err(|err| match err {
            AppError::NotFound(_) => AuthError::InvalidCredentials,
            other => AuthError::Network(other.to_string()),
        })
    }

    async fn logout(&self, _token: &str) -> Result<(), AuthError> {
        // Tokens are stateless; the route layer records the audit event.
        Ok(())
    }
}

fn network(err: AppError) -> AuthError {
    AuthError::Network(err.to_string())
}

async fn fetch_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<DbUser>, AppError> {
    let user = sqlx::query_as::<_, DbUser>(
        "SELECT id, name, email, password_hash, role, designation_id, verified, created_at, updated_at, deleted_at \
         FROM users WHERE email = ? AND deleted_at IS NULL",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub(crate) async fn fetch_user_by_id(pool: &SqlitePool, user_id: Uuid) -> Result<DbUser, AppError> {
    sqlx::query_as::<_, DbUser>(
        "SELECT id, name, email, password_hash, role, designation_id, verified, created_at, updated_at, deleted_at \
         FROM users WHERE id = ? AND deleted_at IS NULL",
    )
    .bind(user_id.to_string())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found("user not found"))
}

async fn profile_for(pool: &SqlitePool, db_user: DbUser) -> Result<Profile, AppError> {
    let user: User = db_user.try_into()?;

    let designation = match user.designation_id {
        Some(designation_id) => {
            let row = sqlx::query_as::<_, DbDesignation>(
                "SELECT id, name, description, permissions, created_at, updated_at \
                 FROM designations WHERE id = ?",
            )
            .bind(designation_id.to_string())
            .fetch_optional(pool)
            .await?;

            match row {
                Some(row) => {
                    let designation = crate::models::designation::Designation::try_from(row)?;
                    Some(DesignationSummary {
                        name: designation.name,
                        permissions: designation.permissions,
                    })
                }
                // A dangling designation id is a data problem, not an auth
                // failure: the user signs in with no permissions.
                None => None,
            }
        }
        None => None,
    };

    Ok(Profile {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        designation,
    })
}
