//! Authorization - permission registry and rule evaluation
//!
//! This module implements the console's gating rules:
//! - Static permission categories (menu-level gating)
//! - Pure evaluator functions (key-level and category-level checks)
//! - Role bypass as a first-class rule, centralized per gate area

pub mod evaluator;
pub mod principal;
pub mod registry;

pub use evaluator::GateArea;
pub use principal::Principal;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Back-office roles, as the platform backend spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    SuperAdmin,
    Admin,
    SuperAgent,
    Agent,
    SuperAffiliate,
    Affiliate,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "superAdmin",
            Role::Admin => "admin",
            Role::SuperAgent => "superAgent",
            Role::Agent => "agent",
            Role::SuperAffiliate => "superAffiliate",
            Role::Affiliate => "affiliate",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "superAdmin" => Some(Role::SuperAdmin),
            "admin" => Some(Role::Admin),
            "superAgent" => Some(Role::SuperAgent),
            "agent" => Some(Role::Agent),
            "superAffiliate" => Some(Role::SuperAffiliate),
            "affiliate" => Some(Role::Affiliate),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_backend_spelling() {
        for role in [
            Role::SuperAdmin,
            Role::Admin,
            Role::SuperAgent,
            Role::Agent,
            Role::SuperAffiliate,
            Role::Affiliate,
        ] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superadmin"), None);
    }
}
