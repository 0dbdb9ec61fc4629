//! The in-process dev node
//!
//! Stands in for a chain connection during development. It owns the ledger
//! and the market, applies genesis (endow the dev owner, register the five
//! catalog agents), and hands out faucet grants so any wallet can pay for
//! queries. The configured node URL and contract address identify the
//! deployment; no connection is made.

use chrono::{Duration, Utc};
use polka_ledger::{EntryReason, Ledger};
use polka_types::{catalog, AccountId, Balance, MarketResult, DEFAULT_CONTRACT_ADDRESS};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::market::AgentMarket;

/// Genesis endowment for the dev owner account (1000 DOT)
pub const OWNER_ENDOWMENT: Balance = Balance::from_dot(1000);

/// Faucet grant for wallets the ledger has never seen (100 DOT)
pub const FAUCET_GRANT: Balance = Balance::from_dot(100);

/// Default platform fee percentage for dev deployments
pub const DEFAULT_PLATFORM_FEE_PCT: u8 = 2;

/// Settings for the node backing the market
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub node_url: String,
    pub contract_address: String,
    pub platform_fee_percentage: u8,
    /// Apply dev genesis (endowments + catalog agents) on start
    pub seed: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_url: "http://localhost:9944".to_string(),
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            platform_fee_percentage: DEFAULT_PLATFORM_FEE_PCT,
            seed: true,
        }
    }
}

/// An in-process stand-in for the chain: ledger + market + genesis
#[derive(Clone)]
pub struct DevNode {
    ledger: Ledger,
    market: AgentMarket,
    config: NodeConfig,
}

impl DevNode {
    /// Build the node and apply genesis when configured to seed
    pub async fn start(config: NodeConfig) -> MarketResult<Self> {
        let ledger = Ledger::new();
        let platform = AccountId::dev_owner();
        let contract = AccountId::parse(config.contract_address.clone())?;
        let market = AgentMarket::new(
            ledger.clone(),
            platform,
            contract,
            config.platform_fee_percentage,
        )?;

        let node = Self {
            ledger,
            market,
            config,
        };
        if node.config.seed {
            node.seed_genesis().await?;
        }
        info!(
            node_url = %node.config.node_url,
            contract = %node.config.contract_address,
            fee_pct = node.config.platform_fee_percentage,
            "dev node ready"
        );
        Ok(node)
    }

    /// Endow the dev owner and register the catalog agents, backdated a day
    async fn seed_genesis(&self) -> MarketResult<()> {
        let owner = AccountId::dev_owner();
        self.ledger
            .credit(&owner, OWNER_ENDOWMENT, EntryReason::Endowment)
            .await?;

        let created_at = Utc::now() - Duration::days(1);
        for entry in catalog::CATALOG.iter() {
            let agent_id = self
                .market
                .register_at(
                    &owner,
                    entry.metadata(),
                    catalog::DEFAULT_PRICE_PER_QUERY,
                    catalog::DEFAULT_STAKE,
                    created_at,
                )
                .await?;
            info!(%agent_id, kind = %entry.kind, name = entry.name, "seeded catalog agent");
        }
        Ok(())
    }

    /// Grant a faucet endowment to wallets the ledger has never seen
    pub async fn ensure_funded(&self, account: &AccountId) -> MarketResult<()> {
        if !self.ledger.contains(account).await {
            let (balance, _) = self
                .ledger
                .credit(account, FAUCET_GRANT, EntryReason::Endowment)
                .await?;
            info!(account = %account, balance = %balance, "faucet grant issued");
        }
        Ok(())
    }

    pub fn market(&self) -> &AgentMarket {
        &self.market
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }
}
