use std::collections::HashMap;

use serde::Serialize;

/// A console screen the SPA ships. Route descriptors reference screens by id
/// only; the registry decides at composition time whether an id resolves.
#[derive(Debug, Clone, Serialize)]
pub struct Component {
    pub id: &'static str,
    pub title: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: HashMap<&'static str, Component>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with every screen the current console build ships.
    /// Menu entries referencing anything else resolve to "not implemented".
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (id, title) in [
            ("DashboardHome", "Dashboard"),
            ("AffiliateList", "Affiliates"),
            ("AffiliateCommissions", "Affiliate Commissions"),
            ("AffiliateWithdrawals", "Affiliate Withdrawals"),
            ("AgentList", "Agents"),
            ("AgentTransfers", "Agent Transfers"),
            ("PlayerList", "Players"),
            ("PlayerBets", "Player Bets"),
            ("KycQueue", "KYC Queue"),
            ("DepositList", "Deposits"),
            ("WithdrawalList", "Withdrawals"),
            ("BonusList", "Bonuses"),
            ("GameProviderList", "Game Providers"),
            ("GameProviderGgr", "Game Provider GGR"),
            ("SportProviderList", "Sports Providers"),
            ("GgrReport", "GGR Report"),
            ("PlayerReport", "Player Report"),
            ("FinancialReport", "Financial Report"),
            ("SupportTickets", "Support Tickets"),
            ("CommissionHistory", "Commission History"),
            ("WithdrawHistory", "Withdraw History"),
            ("ProviderGames", "Provider Games"),
            ("ProviderGgr", "Provider GGR"),
            ("ProviderMargins", "Provider Margins"),
        ] {
            registry.register(Component { id, title });
        }
        registry
    }

    pub fn register(&mut self, component: Component) {
        self.components.insert(component.id, component);
    }

    pub fn resolve(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }
}
