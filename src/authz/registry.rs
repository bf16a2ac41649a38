//! Static permission registry.
//!
//! Categories group related permission keys for coarse, menu-level gating.
//! The tables are fixed at build time; lookups never fail, unknown keys
//! degrade to empty results.

use serde::Serialize;

/// A named group of permission keys plus the metadata the menu renders it with.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionCategory {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub permissions: &'static [&'static str],
}

pub const CATEGORIES: &[PermissionCategory] = &[
    PermissionCategory {
        key: "affiliates",
        label: "Affiliates",
        icon: "handshake",
        permissions: &[
            "affiliate_view_affiliates",
            "affiliate_create_affiliate",
            "affiliate_update_affiliate",
            "affiliate_view_affiliate_commissions",
            "affiliate_settle_affiliate_commissions",
            "affiliate_view_affiliate_withdrawals",
            "affiliate_approve_affiliate_withdrawals",
        ],
    },
    PermissionCategory {
        key: "agents",
        label: "Agents",
        icon: "network",
        permissions: &[
            "agent_view_agents",
            "agent_create_agent",
            "agent_update_agent",
            "agent_view_agent_transfers",
        ],
    },
    PermissionCategory {
        key: "players",
        label: "Players",
        icon: "users",
        permissions: &[
            "player_view_players",
            "player_update_player",
            "player_lock_player",
            "player_view_player_bets",
        ],
    },
    PermissionCategory {
        key: "kyc",
        label: "KYC",
        icon: "shield-check",
        permissions: &["kyc_view_kyc", "kyc_approve_kyc", "kyc_reject_kyc"],
    },
    PermissionCategory {
        key: "payments",
        label: "Payments",
        icon: "credit-card",
        permissions: &[
            "payment_view_deposits",
            "payment_approve_deposits",
            "payment_view_withdrawals",
            "payment_approve_withdrawals",
            "payment_view_manual_adjustments",
            "payment_create_manual_adjustments",
        ],
    },
    PermissionCategory {
        key: "bonuses",
        label: "Bonuses",
        icon: "gift",
        permissions: &[
            "bonus_view_bonuses",
            "bonus_create_bonus",
            "bonus_update_bonus",
            "bonus_cancel_bonus",
        ],
    },
    PermissionCategory {
        key: "game_providers",
        label: "Game Providers",
        icon: "dices",
        permissions: &[
            "game_provider_view_providers",
            "game_provider_update_provider",
            "game_provider_view_ggr",
        ],
    },
    PermissionCategory {
        key: "sport_providers",
        label: "Sports Providers",
        icon: "trophy",
        permissions: &[
            "sport_provider_view_providers",
            "sport_provider_update_provider",
            "sport_provider_view_margins",
        ],
    },
    PermissionCategory {
        key: "reports",
        label: "Reports",
        icon: "bar-chart-3",
        permissions: &[
            "report_view_ggr_report",
            "report_view_player_report",
            "report_view_financial_report",
        ],
    },
    PermissionCategory {
        key: "cms",
        label: "CMS",
        icon: "layout",
        permissions: &[
            "cms_view_pages",
            "cms_update_pages",
            "cms_view_banners",
            "cms_update_banners",
        ],
    },
    PermissionCategory {
        key: "support",
        label: "Support",
        icon: "life-buoy",
        permissions: &["support_view_tickets", "support_reply_tickets"],
    },
];

/// Look up a category by key.
pub fn category(key: &str) -> Option<&'static PermissionCategory> {
    CATEGORIES.iter().find(|c| c.key == key)
}

/// The flat permission-key list for a category; empty for unknown categories.
pub fn permissions_by_category(key: &str) -> &'static [&'static str] {
    category(key).map(|c| c.permissions).unwrap_or(&[])
}

/// Every permission key across all categories.
pub fn all_permissions() -> Vec<&'static str> {
    CATEGORIES
        .iter()
        .flat_map(|c| c.permissions.iter().copied())
        .collect()
}

/// Whether a key exists in any category. Designation writes validate with this.
pub fn is_known_permission(key: &str) -> bool {
    CATEGORIES
        .iter()
        .any(|c| c.permissions.contains(&key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn unknown_category_degrades_to_empty() {
        assert!(permissions_by_category("does_not_exist").is_empty());
        assert!(category("does_not_exist").is_none());
    }

    #[test]
    fn category_lookup_returns_its_keys() {
        let kyc = permissions_by_category("kyc");
        assert!(kyc.contains(&"kyc_approve_kyc"));
        assert_eq!(kyc.len(), 3);
    }

    #[test]
    fn all_permissions_flattens_without_duplicates() {
        let all = all_permissions();
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(all.len(), unique.len(), "permission keys must be globally unique");
        assert!(all.contains(&"affiliate_view_affiliate_commissions"));
    }

    #[test]
    fn is_known_permission_matches_registry() {
        assert!(is_known_permission("payment_approve_withdrawals"));
        assert!(!is_known_permission("payment_mint_money"));
    }
}
