use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::authz::{Principal, Role};
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub designation_id: Option<Uuid>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl crate::events::Loggable for User {
    fn entity_type() -> &'static str { "user" }
    fn subject_id(&self) -> Uuid { self.id }
}

/// Raw row shape. Ids are stored as TEXT; the conversion owns the parsing.
#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub designation_id: Option<String>,
    pub verified: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<DbUser> for User {
    type Error = AppError;

    fn try_from(value: DbUser) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&value.id)
            .map_err(|err| AppError::internal(format!("invalid user id: {err}")))?;
        let role = Role::parse(&value.role)
            .ok_or_else(|| AppError::internal(format!("unknown role: {}", value.role)))?;
        let designation_id = value
            .designation_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|err| AppError::internal(format!("invalid designation id: {err}")))?;

        Ok(User {
            id,
            name: value.name,
            email: value.email,
            role,
            designation_id,
            verified: value.verified != 0,
            created_at: value.created_at,
            updated_at: value.updated_at,
            deleted_at: value.deleted_at,
        })
    }
}

/// The designation slice the console needs at session time: the profile name
/// and the flat permission-key list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DesignationSummary {
    pub name: String,
    pub permissions: Vec<String>,
}

/// What `/auth/me` returns and what the session caches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<DesignationSummary>,
}

impl crate::events::Loggable for Profile {
    fn entity_type() -> &'static str { "user" }
    fn subject_id(&self) -> Uuid { self.id }
}

impl Profile {
    /// Project the profile down to its authorization inputs.
    pub fn principal(&self) -> Principal {
        let permissions = self
            .designation
            .as_ref()
            .map(|d| d.permissions.iter().cloned())
            .into_iter()
            .flatten();
        Principal::new(self.id, self.role).with_permissions(permissions)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ops@casino.example")]
    pub email: String,
    #[schema(example = "S3cureP@ssw0rd")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub profile: Profile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_carries_designation_permissions() {
        let profile = Profile {
            id: Uuid::new_v4(),
            name: "Cage Manager".to_string(),
            email: "cage@casino.example".to_string(),
            role: Role::Admin,
            designation: Some(DesignationSummary {
                name: "Cage".to_string(),
                permissions: vec!["payment_view_withdrawals".to_string()],
            }),
        };
        let principal = profile.principal();
        assert!(principal.has_permission("payment_view_withdrawals"));
        assert!(!principal.is_super_admin());
    }

    #[test]
    fn principal_without_designation_has_no_permissions() {
        let profile = Profile {
            id: Uuid::new_v4(),
            name: "Floor".to_string(),
            email: "floor@casino.example".to_string(),
            role: Role::Agent,
            designation: None,
        };
        assert!(profile.principal().permissions.is_empty());
    }
}
