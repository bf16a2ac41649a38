use std::collections::HashSet;

use uuid::Uuid;

use super::Role;

/// The authorization projection of an authenticated user.
///
/// Only the role and the flat permission set ever reach the evaluator. UI
/// side-channel state (current affiliate, current provider) lives on the
/// session and is deliberately absent here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
    pub permissions: HashSet<String>,
}

impl Principal {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self {
            user_id,
            role,
            permissions: HashSet::new(),
        }
    }

    pub fn with_permissions(mut self, perms: impl IntoIterator<Item = String>) -> Self {
        self.permissions = perms.into_iter().collect();
        self
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }
}
