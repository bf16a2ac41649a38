use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;
use crate::events::{Loggable, Severity};

/// A backend-defined role profile: a named permission list that gets attached
/// to users.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Designation {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loggable for Designation {
    fn entity_type() -> &'static str { "designation" }
    fn subject_id(&self) -> Uuid { self.id }
    fn severity(&self) -> Severity { Severity::Critical }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbDesignation {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// JSON array of permission keys.
    pub permissions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbDesignation> for Designation {
    type Error = AppError;

    fn try_from(value: DbDesignation) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&value.id)
            .map_err(|err| AppError::internal(format!("invalid designation id: {err}")))?;
        let permissions: Vec<String> = serde_json::from_str(&value.permissions)
            .map_err(|err| AppError::internal(format!("invalid permissions payload: {err}")))?;

        Ok(Designation {
            id,
            name: value.name,
            description: value.description,
            permissions,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DesignationCreateRequest {
    #[schema(example = "KYC Officer")]
    pub name: String,
    #[schema(example = "Reviews and approves identity documents")]
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DesignationUpdateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
}

/// Attach (or clear) a designation on a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignDesignationRequest {
    pub designation_id: Option<Uuid>,
}

/// Logged whenever a user's designation changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignationAssignment {
    pub user_id: Uuid,
    pub designation_id: Option<Uuid>,
    pub assigned_at: DateTime<Utc>,
}

impl Loggable for DesignationAssignment {
    fn entity_type() -> &'static str { "designation_assignment" }
    fn subject_id(&self) -> Uuid { self.user_id }
    fn severity(&self) -> Severity { Severity::Critical }
}
