//! The agent marketplace state machine
//!
//! Mirrors the on-chain registry: sequential agent and interaction counters
//! starting at 1, per-user and per-agent interaction indices, and a
//! percentage platform fee taken out of every query payment. All money moves
//! through the ledger; locked stakes sit in the contract account, fee shares
//! go to the agent owner and the platform operator.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use polka_ledger::{EntryReason, Ledger};
use polka_types::{
    AccountId, AgentId, AgentMetadata, AgentRecord, Balance, Interaction, InteractionId,
    InteractionStatus, MarketError, MarketResult,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

/// Minimum stake required to register an agent, in plancks
pub const MIN_STAKE: Balance = Balance::from_plancks(10);

/// How many events the market keeps in memory
const EVENT_LOG_CAPACITY: usize = 256;

/// Events emitted by the market
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MarketEvent {
    AgentRegistered {
        agent_id: AgentId,
        owner: AccountId,
        price_per_query: Balance,
        stake_amount: Balance,
    },
    AgentUpdated {
        agent_id: AgentId,
        owner: AccountId,
    },
    QuerySubmitted {
        interaction_id: InteractionId,
        agent_id: AgentId,
        user: AccountId,
        fee_paid: Balance,
    },
    ResponseSubmitted {
        interaction_id: InteractionId,
        agent_id: AgentId,
        user: AccountId,
    },
    InteractionFailed {
        interaction_id: InteractionId,
        agent_id: AgentId,
        user: AccountId,
    },
    StakeWithdrawn {
        agent_id: AgentId,
        owner: AccountId,
    },
}

/// A market event with the time it was recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedEvent {
    #[serde(flatten)]
    pub event: MarketEvent,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub at: DateTime<Utc>,
}

/// Aggregate counters for the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketStats {
    pub agents: usize,
    pub active_agents: usize,
    pub interactions: usize,
    pub pending: usize,
    pub completed: usize,
    pub failed: usize,
    pub platform_fee_percentage: u8,
}

struct MarketInner {
    agent_counter: AgentId,
    interaction_counter: InteractionId,
    agents: BTreeMap<AgentId, AgentRecord>,
    interactions: HashMap<InteractionId, Interaction>,
    user_interactions: HashMap<AccountId, Vec<InteractionId>>,
    agent_interactions: HashMap<AgentId, Vec<InteractionId>>,
    platform_fee_percentage: u8,
    events: VecDeque<RecordedEvent>,
}

impl MarketInner {
    fn new(platform_fee_percentage: u8) -> Self {
        Self {
            agent_counter: AgentId::FIRST,
            interaction_counter: InteractionId::FIRST,
            agents: BTreeMap::new(),
            interactions: HashMap::new(),
            user_interactions: HashMap::new(),
            agent_interactions: HashMap::new(),
            platform_fee_percentage,
            events: VecDeque::with_capacity(EVENT_LOG_CAPACITY),
        }
    }

    fn emit(&mut self, event: MarketEvent) {
        if self.events.len() == EVENT_LOG_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(RecordedEvent {
            event,
            at: Utc::now(),
        });
    }
}

/// The PolkaAgents marketplace
///
/// Thread-safe; cloning shares the underlying state.
#[derive(Clone)]
pub struct AgentMarket {
    inner: Arc<RwLock<MarketInner>>,
    ledger: Ledger,
    /// Platform operator: receives the fee share, administers the fee
    platform: AccountId,
    /// The contract's own account, holding locked stakes
    contract: AccountId,
}

impl AgentMarket {
    /// Create a market with the given platform operator and fee percentage
    pub fn new(
        ledger: Ledger,
        platform: AccountId,
        contract: AccountId,
        platform_fee_percentage: u8,
    ) -> MarketResult<Self> {
        if platform_fee_percentage > 100 {
            return Err(MarketError::InvalidFeePercentage {
                pct: platform_fee_percentage,
            });
        }
        Ok(Self {
            inner: Arc::new(RwLock::new(MarketInner::new(platform_fee_percentage))),
            ledger,
            platform,
            contract,
        })
    }

    /// Register a new agent, locking the stake into the contract account
    pub async fn register_agent(
        &self,
        caller: &AccountId,
        metadata: AgentMetadata,
        price_per_query: Balance,
        stake: Balance,
    ) -> MarketResult<AgentId> {
        self.register_at(caller, metadata, price_per_query, stake, Utc::now())
            .await
    }

    pub(crate) async fn register_at(
        &self,
        caller: &AccountId,
        metadata: AgentMetadata,
        price_per_query: Balance,
        stake: Balance,
        created_at: DateTime<Utc>,
    ) -> MarketResult<AgentId> {
        if stake < MIN_STAKE {
            return Err(MarketError::InsufficientStake {
                offered: stake,
                minimum: MIN_STAKE,
            });
        }

        let mut inner = self.inner.write().await;
        let agent_id = inner.agent_counter;

        // Lock the stake before committing the registration; a failed
        // transfer leaves the counter untouched
        self.ledger
            .transfer(caller, &self.contract, stake, EntryReason::StakeLock { agent_id })
            .await?;

        inner.agent_counter = agent_id.next();
        inner.agents.insert(
            agent_id,
            AgentRecord {
                id: agent_id,
                owner: caller.clone(),
                metadata,
                price_per_query,
                stake_amount: stake,
                active: true,
                created_at,
            },
        );
        inner.emit(MarketEvent::AgentRegistered {
            agent_id,
            owner: caller.clone(),
            price_per_query,
            stake_amount: stake,
        });
        info!(%agent_id, owner = %caller, stake = %stake, "agent registered");
        Ok(agent_id)
    }

    /// Update agent fields; owner only. Absent fields are left unchanged.
    pub async fn update_agent(
        &self,
        caller: &AccountId,
        agent_id: AgentId,
        metadata: Option<AgentMetadata>,
        price_per_query: Option<Balance>,
        active: Option<bool>,
    ) -> MarketResult<AgentRecord> {
        let mut inner = self.inner.write().await;
        let updated = {
            let agent = inner
                .agents
                .get_mut(&agent_id)
                .ok_or(MarketError::AgentNotFound { agent_id })?;
            if &agent.owner != caller {
                return Err(MarketError::UnauthorizedOwner {
                    account: caller.clone(),
                    agent_id,
                });
            }
            if let Some(new_metadata) = metadata {
                agent.metadata = new_metadata;
            }
            if let Some(new_price) = price_per_query {
                agent.price_per_query = new_price;
            }
            if let Some(new_active) = active {
                agent.active = new_active;
            }
            agent.clone()
        };
        inner.emit(MarketEvent::AgentUpdated {
            agent_id,
            owner: caller.clone(),
        });
        Ok(updated)
    }

    /// Get agent information
    pub async fn get_agent(&self, agent_id: AgentId) -> Option<AgentRecord> {
        self.inner.read().await.agents.get(&agent_id).cloned()
    }

    /// All registered agents, ordered by id
    pub async fn list_agents(&self) -> Vec<AgentRecord> {
        self.inner.read().await.agents.values().cloned().collect()
    }

    /// Pay for a query against an active agent
    ///
    /// The payment is debited from the caller in full; the platform takes
    /// its percentage and the agent owner receives the remainder. The
    /// recorded interaction starts out `Pending`.
    pub async fn query_agent(
        &self,
        caller: &AccountId,
        agent_id: AgentId,
        query: String,
        payment: Balance,
    ) -> MarketResult<InteractionId> {
        let mut inner = self.inner.write().await;

        let (owner, price) = {
            let agent = inner
                .agents
                .get(&agent_id)
                .ok_or(MarketError::AgentNotFound { agent_id })?;
            if !agent.active {
                return Err(MarketError::AgentNotActive { agent_id });
            }
            (agent.owner.clone(), agent.price_per_query)
        };
        if payment < price {
            return Err(MarketError::InsufficientPayment {
                agent_id,
                offered: payment,
                price,
            });
        }

        let interaction_id = inner.interaction_counter;
        let platform_fee = payment.percentage(inner.platform_fee_percentage)?;
        let owner_share = payment.checked_sub(platform_fee)?;

        // Debit first: the caller must cover the full payment before any
        // share is handed out
        self.ledger
            .debit(caller, payment, EntryReason::QueryFee { interaction_id })
            .await?;
        if !owner_share.is_zero() {
            self.ledger
                .credit(&owner, owner_share, EntryReason::OwnerPayout { interaction_id })
                .await?;
        }
        if !platform_fee.is_zero() {
            self.ledger
                .credit(
                    &self.platform,
                    platform_fee,
                    EntryReason::PlatformFee { interaction_id },
                )
                .await?;
        }

        inner.interaction_counter = interaction_id.next();
        inner.interactions.insert(
            interaction_id,
            Interaction {
                id: interaction_id,
                agent_id,
                user: caller.clone(),
                query,
                response: None,
                status: InteractionStatus::Pending,
                created_at: Utc::now(),
                fee_paid: payment,
            },
        );
        inner
            .user_interactions
            .entry(caller.clone())
            .or_default()
            .push(interaction_id);
        inner
            .agent_interactions
            .entry(agent_id)
            .or_default()
            .push(interaction_id);
        inner.emit(MarketEvent::QuerySubmitted {
            interaction_id,
            agent_id,
            user: caller.clone(),
            fee_paid: payment,
        });
        info!(%interaction_id, %agent_id, user = %caller, fee = %payment, "query submitted");
        Ok(interaction_id)
    }

    /// Record the agent's response; agent owner only
    pub async fn submit_response(
        &self,
        caller: &AccountId,
        interaction_id: InteractionId,
        response: String,
    ) -> MarketResult<()> {
        let mut inner = self.inner.write().await;
        let agent_id = inner
            .interactions
            .get(&interaction_id)
            .ok_or(MarketError::InteractionNotFound { interaction_id })?
            .agent_id;
        let agent = inner
            .agents
            .get(&agent_id)
            .ok_or(MarketError::AgentNotFound { agent_id })?;
        if &agent.owner != caller {
            return Err(MarketError::UnauthorizedOwner {
                account: caller.clone(),
                agent_id,
            });
        }

        let user = {
            let interaction = inner
                .interactions
                .get_mut(&interaction_id)
                .ok_or(MarketError::InteractionNotFound { interaction_id })?;
            interaction.response = Some(response);
            interaction.status = InteractionStatus::Completed;
            interaction.user.clone()
        };
        inner.emit(MarketEvent::ResponseSubmitted {
            interaction_id,
            agent_id,
            user,
        });
        info!(%interaction_id, %agent_id, "response submitted");
        Ok(())
    }

    /// Mark a pending interaction as failed; agent owner only
    ///
    /// Completed interactions are left untouched.
    pub async fn fail_interaction(
        &self,
        caller: &AccountId,
        interaction_id: InteractionId,
    ) -> MarketResult<()> {
        let mut inner = self.inner.write().await;
        let agent_id = inner
            .interactions
            .get(&interaction_id)
            .ok_or(MarketError::InteractionNotFound { interaction_id })?
            .agent_id;
        let agent = inner
            .agents
            .get(&agent_id)
            .ok_or(MarketError::AgentNotFound { agent_id })?;
        if &agent.owner != caller {
            return Err(MarketError::UnauthorizedOwner {
                account: caller.clone(),
                agent_id,
            });
        }

        let user = {
            let interaction = inner
                .interactions
                .get_mut(&interaction_id)
                .ok_or(MarketError::InteractionNotFound { interaction_id })?;
            if !interaction.status.is_pending() {
                return Ok(());
            }
            interaction.status = InteractionStatus::Failed;
            interaction.user.clone()
        };
        inner.emit(MarketEvent::InteractionFailed {
            interaction_id,
            agent_id,
            user,
        });
        info!(%interaction_id, %agent_id, "interaction failed");
        Ok(())
    }

    /// Get an interaction
    pub async fn get_interaction(&self, interaction_id: InteractionId) -> Option<Interaction> {
        self.inner.read().await.interactions.get(&interaction_id).cloned()
    }

    /// All interactions submitted by a user, in submission order
    pub async fn user_interactions(&self, user: &AccountId) -> Vec<Interaction> {
        let inner = self.inner.read().await;
        inner
            .user_interactions
            .get(user)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| inner.interactions.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All interactions handled by an agent, in submission order
    pub async fn agent_interactions(&self, agent_id: AgentId) -> Vec<Interaction> {
        let inner = self.inner.read().await;
        inner
            .agent_interactions
            .get(&agent_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| inner.interactions.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Update the platform fee percentage; platform operator only
    pub async fn update_platform_fee(&self, caller: &AccountId, pct: u8) -> MarketResult<()> {
        if caller != &self.platform {
            return Err(MarketError::UnauthorizedPlatform {
                account: caller.clone(),
            });
        }
        if pct > 100 {
            return Err(MarketError::InvalidFeePercentage { pct });
        }
        self.inner.write().await.platform_fee_percentage = pct;
        info!(pct, "platform fee updated");
        Ok(())
    }

    /// Current platform fee percentage
    pub async fn platform_fee_percentage(&self) -> u8 {
        self.inner.read().await.platform_fee_percentage
    }

    /// Deactivate an agent and refund its stake; owner only.
    ///
    /// Returns the refunded amount. Calling again on a withdrawn agent
    /// refunds nothing.
    pub async fn withdraw_stake(
        &self,
        caller: &AccountId,
        agent_id: AgentId,
    ) -> MarketResult<Balance> {
        let mut inner = self.inner.write().await;
        let stake = {
            let agent = inner
                .agents
                .get(&agent_id)
                .ok_or(MarketError::AgentNotFound { agent_id })?;
            if &agent.owner != caller {
                return Err(MarketError::UnauthorizedOwner {
                    account: caller.clone(),
                    agent_id,
                });
            }
            agent.stake_amount
        };

        if !stake.is_zero() {
            self.ledger
                .transfer(&self.contract, caller, stake, EntryReason::StakeRefund { agent_id })
                .await?;
        }

        let agent = inner
            .agents
            .get_mut(&agent_id)
            .ok_or(MarketError::AgentNotFound { agent_id })?;
        agent.active = false;
        agent.stake_amount = Balance::ZERO;
        inner.emit(MarketEvent::StakeWithdrawn {
            agent_id,
            owner: caller.clone(),
        });
        info!(%agent_id, owner = %caller, refunded = %stake, "stake withdrawn");
        Ok(stake)
    }

    /// Aggregate counters across the registry and interaction log
    pub async fn stats(&self) -> MarketStats {
        let inner = self.inner.read().await;
        let mut pending = 0;
        let mut completed = 0;
        let mut failed = 0;
        for interaction in inner.interactions.values() {
            match interaction.status {
                InteractionStatus::Pending => pending += 1,
                InteractionStatus::Completed => completed += 1,
                InteractionStatus::Failed => failed += 1,
            }
        }
        MarketStats {
            agents: inner.agents.len(),
            active_agents: inner.agents.values().filter(|a| a.active).count(),
            interactions: inner.interactions.len(),
            pending,
            completed,
            failed,
            platform_fee_percentage: inner.platform_fee_percentage,
        }
    }

    /// Recent market events, newest first
    pub async fn recent_events(&self, limit: usize) -> Vec<RecordedEvent> {
        let inner = self.inner.read().await;
        inner.events.iter().rev().take(limit).cloned().collect()
    }

    /// The platform operator account
    pub fn platform_account(&self) -> &AccountId {
        &self.platform
    }

    /// The contract account holding locked stakes
    pub fn contract_account(&self) -> &AccountId {
        &self.contract
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polka_types::AgentKind;

    fn account(name: &str) -> AccountId {
        AccountId::parse(name).unwrap()
    }

    fn chatbot_metadata() -> AgentMetadata {
        AgentMetadata::new("ChatBot AI", "answers questions", AgentKind::Chatbot, "GPT-2")
    }

    /// Market with a funded owner and user, platform fee 2%
    async fn test_market() -> (AgentMarket, Ledger, AccountId, AccountId) {
        let ledger = Ledger::new();
        let owner = account("owner");
        let user = account("user");
        for acct in [&owner, &user] {
            ledger
                .credit(acct, Balance::from_dot(100), EntryReason::Endowment)
                .await
                .unwrap();
        }
        let market = AgentMarket::new(
            ledger.clone(),
            account("platform"),
            account("contract"),
            2,
        )
        .unwrap();
        (market, ledger, owner, user)
    }

    #[tokio::test]
    async fn test_register_agent_locks_stake() {
        let (market, ledger, owner, _) = test_market().await;

        let agent_id = market
            .register_agent(&owner, chatbot_metadata(), Balance::from_dot(1), Balance::from_dot(10))
            .await
            .unwrap();

        assert_eq!(agent_id, AgentId::new(1));
        let agent = market.get_agent(agent_id).await.unwrap();
        assert!(agent.active);
        assert_eq!(agent.stake_amount, Balance::from_dot(10));
        assert_eq!(ledger.balance(&owner).await, Balance::from_dot(90));
        assert_eq!(ledger.balance(&account("contract")).await, Balance::from_dot(10));
    }

    #[tokio::test]
    async fn test_register_rejects_dust_stake() {
        let (market, _, owner, _) = test_market().await;
        let result = market
            .register_agent(
                &owner,
                chatbot_metadata(),
                Balance::from_dot(1),
                Balance::from_plancks(9),
            )
            .await;
        assert!(matches!(result, Err(MarketError::InsufficientStake { .. })));
        assert!(market.list_agents().await.is_empty());
    }

    #[tokio::test]
    async fn test_register_without_funds_burns_no_id() {
        let (market, _, owner, _) = test_market().await;
        let broke = account("broke");

        let result = market
            .register_agent(&broke, chatbot_metadata(), Balance::from_dot(1), Balance::from_dot(10))
            .await;
        assert!(result.is_err());

        // Counter did not advance: the next registration still gets id 1
        let agent_id = market
            .register_agent(&owner, chatbot_metadata(), Balance::from_dot(1), Balance::from_dot(10))
            .await
            .unwrap();
        assert_eq!(agent_id, AgentId::new(1));
    }

    #[tokio::test]
    async fn test_query_splits_fee() {
        let (market, ledger, owner, user) = test_market().await;
        let agent_id = market
            .register_agent(&owner, chatbot_metadata(), Balance::from_plancks(1_000_000_000), Balance::from_dot(10))
            .await
            .unwrap();

        let payment = Balance::from_plancks(1_000_000_000);
        let interaction_id = market
            .query_agent(&user, agent_id, "What is Polkadot?".to_string(), payment)
            .await
            .unwrap();

        assert_eq!(interaction_id, InteractionId::new(1));
        // 2% platform fee
        assert_eq!(
            ledger.balance(&account("platform")).await,
            Balance::from_plancks(20_000_000)
        );
        // Owner paid stake (10 DOT) out of 100, then earned the remainder
        assert_eq!(
            ledger.balance(&owner).await,
            Balance::from_dot(90).checked_add(Balance::from_plancks(980_000_000)).unwrap()
        );
        assert_eq!(
            ledger.balance(&user).await,
            Balance::from_dot(100).checked_sub(payment).unwrap()
        );

        let interaction = market.get_interaction(interaction_id).await.unwrap();
        assert_eq!(interaction.status, InteractionStatus::Pending);
        assert_eq!(interaction.fee_paid, payment);
        assert!(interaction.response.is_none());

        assert_eq!(market.user_interactions(&user).await.len(), 1);
        assert_eq!(market.agent_interactions(agent_id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_query_inactive_agent_fails() {
        let (market, _, owner, user) = test_market().await;
        let agent_id = market
            .register_agent(&owner, chatbot_metadata(), Balance::from_dot(1), Balance::from_dot(10))
            .await
            .unwrap();
        market
            .update_agent(&owner, agent_id, None, None, Some(false))
            .await
            .unwrap();

        let result = market
            .query_agent(&user, agent_id, "hi".to_string(), Balance::from_dot(1))
            .await;
        assert!(matches!(result, Err(MarketError::AgentNotActive { .. })));
    }

    #[tokio::test]
    async fn test_query_insufficient_payment() {
        let (market, _, owner, user) = test_market().await;
        let agent_id = market
            .register_agent(&owner, chatbot_metadata(), Balance::from_dot(2), Balance::from_dot(10))
            .await
            .unwrap();

        let result = market
            .query_agent(&user, agent_id, "hi".to_string(), Balance::from_dot(1))
            .await;
        assert!(matches!(
            result,
            Err(MarketError::InsufficientPayment { .. })
        ));
    }

    #[tokio::test]
    async fn test_query_unknown_agent() {
        let (market, _, _, user) = test_market().await;
        let result = market
            .query_agent(&user, AgentId::new(9), "hi".to_string(), Balance::from_dot(1))
            .await;
        assert!(matches!(result, Err(MarketError::AgentNotFound { .. })));
    }

    #[tokio::test]
    async fn test_submit_response_completes() {
        let (market, _, owner, user) = test_market().await;
        let agent_id = market
            .register_agent(&owner, chatbot_metadata(), Balance::from_dot(1), Balance::from_dot(10))
            .await
            .unwrap();
        let interaction_id = market
            .query_agent(&user, agent_id, "hi".to_string(), Balance::from_dot(1))
            .await
            .unwrap();

        // Only the agent owner may respond
        let result = market
            .submit_response(&user, interaction_id, "hello".to_string())
            .await;
        assert!(matches!(result, Err(MarketError::UnauthorizedOwner { .. })));

        market
            .submit_response(&owner, interaction_id, "hello".to_string())
            .await
            .unwrap();
        let interaction = market.get_interaction(interaction_id).await.unwrap();
        assert_eq!(interaction.status, InteractionStatus::Completed);
        assert_eq!(interaction.response.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_fail_interaction() {
        let (market, _, owner, user) = test_market().await;
        let agent_id = market
            .register_agent(&owner, chatbot_metadata(), Balance::from_dot(1), Balance::from_dot(10))
            .await
            .unwrap();
        let interaction_id = market
            .query_agent(&user, agent_id, "hi".to_string(), Balance::from_dot(1))
            .await
            .unwrap();

        market.fail_interaction(&owner, interaction_id).await.unwrap();
        let interaction = market.get_interaction(interaction_id).await.unwrap();
        assert_eq!(interaction.status, InteractionStatus::Failed);
    }

    #[tokio::test]
    async fn test_fail_leaves_completed_untouched() {
        let (market, _, owner, user) = test_market().await;
        let agent_id = market
            .register_agent(&owner, chatbot_metadata(), Balance::from_dot(1), Balance::from_dot(10))
            .await
            .unwrap();
        let interaction_id = market
            .query_agent(&user, agent_id, "hi".to_string(), Balance::from_dot(1))
            .await
            .unwrap();
        market
            .submit_response(&owner, interaction_id, "hello".to_string())
            .await
            .unwrap();

        market.fail_interaction(&owner, interaction_id).await.unwrap();
        let interaction = market.get_interaction(interaction_id).await.unwrap();
        assert_eq!(interaction.status, InteractionStatus::Completed);
        assert_eq!(interaction.response.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_update_agent_owner_gate() {
        let (market, _, owner, user) = test_market().await;
        let agent_id = market
            .register_agent(&owner, chatbot_metadata(), Balance::from_dot(1), Balance::from_dot(10))
            .await
            .unwrap();

        let result = market
            .update_agent(&user, agent_id, None, Some(Balance::from_dot(5)), None)
            .await;
        assert!(matches!(result, Err(MarketError::UnauthorizedOwner { .. })));

        let updated = market
            .update_agent(&owner, agent_id, None, Some(Balance::from_dot(5)), None)
            .await
            .unwrap();
        assert_eq!(updated.price_per_query, Balance::from_dot(5));
        assert!(updated.active);
    }

    #[tokio::test]
    async fn test_withdraw_stake_refunds_once() {
        let (market, ledger, owner, _) = test_market().await;
        let agent_id = market
            .register_agent(&owner, chatbot_metadata(), Balance::from_dot(1), Balance::from_dot(10))
            .await
            .unwrap();
        assert_eq!(ledger.balance(&owner).await, Balance::from_dot(90));

        let refunded = market.withdraw_stake(&owner, agent_id).await.unwrap();
        assert_eq!(refunded, Balance::from_dot(10));
        assert_eq!(ledger.balance(&owner).await, Balance::from_dot(100));

        let agent = market.get_agent(agent_id).await.unwrap();
        assert!(!agent.active);
        assert_eq!(agent.stake_amount, Balance::ZERO);

        // Withdrawing again refunds nothing
        let refunded = market.withdraw_stake(&owner, agent_id).await.unwrap();
        assert_eq!(refunded, Balance::ZERO);
        assert_eq!(ledger.balance(&owner).await, Balance::from_dot(100));
    }

    #[tokio::test]
    async fn test_platform_fee_admin() {
        let (market, _, owner, _) = test_market().await;

        let result = market.update_platform_fee(&owner, 5).await;
        assert!(matches!(
            result,
            Err(MarketError::UnauthorizedPlatform { .. })
        ));

        let platform = account("platform");
        let result = market.update_platform_fee(&platform, 101).await;
        assert!(matches!(
            result,
            Err(MarketError::InvalidFeePercentage { .. })
        ));

        market.update_platform_fee(&platform, 5).await.unwrap();
        assert_eq!(market.platform_fee_percentage().await, 5);
    }

    #[tokio::test]
    async fn test_zero_fee_routes_all_to_owner() {
        let ledger = Ledger::new();
        let owner = account("owner");
        let user = account("user");
        for acct in [&owner, &user] {
            ledger
                .credit(acct, Balance::from_dot(100), EntryReason::Endowment)
                .await
                .unwrap();
        }
        let market =
            AgentMarket::new(ledger.clone(), account("platform"), account("contract"), 0).unwrap();
        let agent_id = market
            .register_agent(&owner, chatbot_metadata(), Balance::from_dot(1), Balance::from_dot(10))
            .await
            .unwrap();

        let entries_before = ledger.entry_count().await;
        market
            .query_agent(&user, agent_id, "hi".to_string(), Balance::from_dot(1))
            .await
            .unwrap();

        assert_eq!(ledger.balance(&account("platform")).await, Balance::ZERO);
        assert_eq!(ledger.balance(&owner).await, Balance::from_dot(91));
        // One debit and one credit, no zero-amount platform entry
        assert_eq!(ledger.entry_count().await, entries_before + 2);
    }

    #[tokio::test]
    async fn test_hundred_percent_fee_routes_all_to_platform() {
        let ledger = Ledger::new();
        let owner = account("owner");
        let user = account("user");
        for acct in [&owner, &user] {
            ledger
                .credit(acct, Balance::from_dot(100), EntryReason::Endowment)
                .await
                .unwrap();
        }
        let market =
            AgentMarket::new(ledger.clone(), account("platform"), account("contract"), 100).unwrap();
        let agent_id = market
            .register_agent(&owner, chatbot_metadata(), Balance::from_dot(1), Balance::from_dot(10))
            .await
            .unwrap();

        market
            .query_agent(&user, agent_id, "hi".to_string(), Balance::from_dot(1))
            .await
            .unwrap();
        assert_eq!(ledger.balance(&account("platform")).await, Balance::from_dot(1));
        assert_eq!(ledger.balance(&owner).await, Balance::from_dot(90));
    }

    #[tokio::test]
    async fn test_counters_are_sequential() {
        let (market, _, owner, user) = test_market().await;
        let first = market
            .register_agent(&owner, chatbot_metadata(), Balance::from_dot(1), Balance::from_dot(10))
            .await
            .unwrap();
        let second = market
            .register_agent(&owner, chatbot_metadata(), Balance::from_dot(1), Balance::from_dot(10))
            .await
            .unwrap();
        assert_eq!((first, second), (AgentId::new(1), AgentId::new(2)));

        for expected in 1..=3u64 {
            let id = market
                .query_agent(&user, first, "hi".to_string(), Balance::from_dot(1))
                .await
                .unwrap();
            assert_eq!(id, InteractionId::new(expected));
        }
    }

    #[tokio::test]
    async fn test_events_are_recorded() {
        let (market, _, owner, user) = test_market().await;
        let agent_id = market
            .register_agent(&owner, chatbot_metadata(), Balance::from_dot(1), Balance::from_dot(10))
            .await
            .unwrap();
        market
            .query_agent(&user, agent_id, "hi".to_string(), Balance::from_dot(1))
            .await
            .unwrap();

        let events = market.recent_events(10).await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0].event, MarketEvent::QuerySubmitted { .. }));
        assert!(matches!(events[1].event, MarketEvent::AgentRegistered { .. }));

        let json = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(json["event"], "query_submitted");
        assert!(json["at"].is_i64());
    }

    #[tokio::test]
    async fn test_stats() {
        let (market, _, owner, user) = test_market().await;
        let agent_id = market
            .register_agent(&owner, chatbot_metadata(), Balance::from_dot(1), Balance::from_dot(10))
            .await
            .unwrap();
        let first = market
            .query_agent(&user, agent_id, "a".to_string(), Balance::from_dot(1))
            .await
            .unwrap();
        market
            .query_agent(&user, agent_id, "b".to_string(), Balance::from_dot(1))
            .await
            .unwrap();
        market
            .submit_response(&owner, first, "done".to_string())
            .await
            .unwrap();

        let stats = market.stats().await;
        assert_eq!(stats.agents, 1);
        assert_eq!(stats.active_agents, 1);
        assert_eq!(stats.interactions, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.platform_fee_percentage, 2);
    }
}
