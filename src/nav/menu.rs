//! The console's declarative menu tree and the outside-route areas.
//!
//! Items without a `path` are grouping nodes: they emit no route of their own
//! but their children are still walked. Top-level items gate on a permission
//! category; children gate on a single key. `skip_roles` lists roles that see
//! the item without any permission check.

use serde::Serialize;

use crate::authz::Role;

#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: Option<&'static str>,
    pub icon: Option<&'static str>,
    pub component: Option<&'static str>,
    pub access_category: Option<&'static str>,
    pub skip_roles: &'static [Role],
    pub children: &'static [MenuChild],
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuChild {
    pub label: &'static str,
    pub path: &'static str,
    pub component: Option<&'static str>,
    pub access_key: Option<&'static str>,
}

/// Routes rendered outside the main layout shell, grouped per sub-application.
#[derive(Debug, Clone, Serialize)]
pub struct OutsideRoute {
    pub path: &'static str,
    pub component: Option<&'static str>,
    pub access_key: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaKind {
    Affiliate,
    GameProvider,
    SportProvider,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutsideArea {
    pub kind: AreaKind,
    pub layout: &'static str,
    pub routes: &'static [OutsideRoute],
}

const EVERY_ROLE: &[Role] = &[
    Role::SuperAdmin,
    Role::Admin,
    Role::SuperAgent,
    Role::Agent,
    Role::SuperAffiliate,
    Role::Affiliate,
];

pub const MAIN_MENU: &[MenuItem] = &[
    MenuItem {
        label: "Dashboard",
        path: Some("/"),
        icon: Some("gauge"),
        component: Some("DashboardHome"),
        access_category: None,
        // The landing page carries no category; every signed-in role sees it.
        skip_roles: EVERY_ROLE,
        children: &[],
    },
    MenuItem {
        label: "Affiliates",
        path: Some("/affiliates"),
        icon: Some("handshake"),
        component: Some("AffiliateList"),
        access_category: Some("affiliates"),
        skip_roles: &[],
        children: &[
            MenuChild {
                label: "Commissions",
                path: "/affiliates/commissions",
                component: Some("AffiliateCommissions"),
                access_key: Some("affiliate_view_affiliate_commissions"),
            },
            MenuChild {
                label: "Withdrawals",
                path: "/affiliates/withdrawals",
                component: Some("AffiliateWithdrawals"),
                access_key: Some("affiliate_view_affiliate_withdrawals"),
            },
        ],
    },
    MenuItem {
        label: "Agents",
        path: Some("/agents"),
        icon: Some("network"),
        component: Some("AgentList"),
        access_category: Some("agents"),
        skip_roles: &[],
        children: &[MenuChild {
            label: "Transfers",
            path: "/agents/transfers",
            component: Some("AgentTransfers"),
            access_key: Some("agent_view_agent_transfers"),
        }],
    },
    MenuItem {
        label: "Players",
        path: Some("/players"),
        icon: Some("users"),
        component: Some("PlayerList"),
        access_category: Some("players"),
        skip_roles: &[],
        children: &[MenuChild {
            label: "Bets",
            path: "/players/bets",
            component: Some("PlayerBets"),
            access_key: Some("player_view_player_bets"),
        }],
    },
    MenuItem {
        label: "KYC",
        path: Some("/kyc"),
        icon: Some("shield-check"),
        component: Some("KycQueue"),
        access_category: Some("kyc"),
        skip_roles: &[],
        children: &[],
    },
    MenuItem {
        label: "Payments",
        path: None,
        icon: Some("credit-card"),
        component: None,
        access_category: Some("payments"),
        skip_roles: &[],
        children: &[
            MenuChild {
                label: "Deposits",
                path: "/payments/deposits",
                component: Some("DepositList"),
                access_key: Some("payment_view_deposits"),
            },
            MenuChild {
                label: "Withdrawals",
                path: "/payments/withdrawals",
                component: Some("WithdrawalList"),
                access_key: Some("payment_view_withdrawals"),
            },
            MenuChild {
                label: "Manual Adjustments",
                path: "/payments/adjustments",
                // Screen not shipped yet; resolves to the under-construction
                // placeholder for authorized users.
                component: Some("ManualAdjustments"),
                access_key: Some("payment_view_manual_adjustments"),
            },
        ],
    },
    MenuItem {
        label: "Bonuses",
        path: Some("/bonuses"),
        icon: Some("gift"),
        component: Some("BonusList"),
        access_category: Some("bonuses"),
        skip_roles: &[],
        children: &[],
    },
    MenuItem {
        label: "Game Providers",
        path: Some("/game-providers"),
        icon: Some("dices"),
        component: Some("GameProviderList"),
        access_category: Some("game_providers"),
        skip_roles: &[],
        children: &[MenuChild {
            label: "GGR",
            path: "/game-providers/ggr",
            component: Some("GameProviderGgr"),
            access_key: Some("game_provider_view_ggr"),
        }],
    },
    MenuItem {
        label: "Sports Providers",
        path: Some("/sport-providers"),
        icon: Some("trophy"),
        component: Some("SportProviderList"),
        access_category: Some("sport_providers"),
        skip_roles: &[],
        children: &[],
    },
    MenuItem {
        label: "Reports",
        path: None,
        icon: Some("bar-chart-3"),
        component: None,
        access_category: Some("reports"),
        skip_roles: &[],
        children: &[
            MenuChild {
                label: "GGR Report",
                path: "/reports/ggr",
                component: Some("GgrReport"),
                access_key: Some("report_view_ggr_report"),
            },
            MenuChild {
                label: "Player Report",
                path: "/reports/players",
                component: Some("PlayerReport"),
                access_key: Some("report_view_player_report"),
            },
            MenuChild {
                label: "Financial Report",
                path: "/reports/financial",
                component: Some("FinancialReport"),
                access_key: Some("report_view_financial_report"),
            },
        ],
    },
    MenuItem {
        label: "CMS",
        path: Some("/cms"),
        icon: Some("layout"),
        component: None,
        access_category: Some("cms"),
        skip_roles: &[],
        children: &[],
    },
    MenuItem {
        label: "Support",
        path: Some("/support"),
        icon: Some("life-buoy"),
        component: Some("SupportTickets"),
        access_category: Some("support"),
        skip_roles: &[],
        children: &[],
    },
];

pub const OUTSIDE_AREAS: &[OutsideArea] = &[
    OutsideArea {
        kind: AreaKind::Affiliate,
        layout: "AffiliateLayout",
        routes: &[
            OutsideRoute {
                path: "/affiliate/commission-history",
                component: Some("CommissionHistory"),
                access_key: "affiliate_view_affiliate_commissions",
            },
            OutsideRoute {
                path: "/affiliate/withdraw-history",
                component: Some("WithdrawHistory"),
                access_key: "affiliate_view_affiliate_withdrawals",
            },
        ],
    },
    OutsideArea {
        kind: AreaKind::GameProvider,
        layout: "GameProviderLayout",
        routes: &[
            OutsideRoute {
                path: "/game-provider/games",
                component: Some("ProviderGames"),
                access_key: "game_provider_view_providers",
            },
            OutsideRoute {
                path: "/game-provider/ggr",
                component: Some("ProviderGgr"),
                access_key: "game_provider_view_ggr",
            },
        ],
    },
    OutsideArea {
        kind: AreaKind::SportProvider,
        layout: "SportProviderLayout",
        routes: &[OutsideRoute {
            path: "/sport-provider/margins",
            component: Some("ProviderMargins"),
            access_key: "sport_provider_view_margins",
        }],
    },
];
