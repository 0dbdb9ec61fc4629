//! PolkaAgents Ledger - DOT balance ledger for the agent marketplace
//!
//! The ledger is:
//! - Planck-denominated (DOT with 10 decimals)
//! - Account-keyed by SS58 address
//! - Immutable (entries are append-only)
//! - Reason-tagged (every movement names the marketplace event behind it)
//!
//! # Invariants
//!
//! 1. No negative balances
//! 2. Every entry has a reason and records the balance after it
//! 3. Transfers are atomic: a failed transfer leaves no trace

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use polka_types::{AccountId, AgentId, Balance, InteractionId, MarketError, MarketResult};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Unique identifier for a ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn new() -> Self {
        Self(format!("entry_{}", Uuid::new_v4()))
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

/// Type of ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryType {
    /// Credit (increase) to an account
    Credit,
    /// Debit (decrease) from an account
    Debit,
}

/// Reason for a ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum EntryReason {
    /// Dev-node genesis endowment
    Endowment,
    /// Stake locked into market escrow at registration
    StakeLock { agent_id: AgentId },
    /// Stake refunded from market escrow at withdrawal
    StakeRefund { agent_id: AgentId },
    /// Query fee leaving the caller
    QueryFee { interaction_id: InteractionId },
    /// Agent owner's share of a query fee
    OwnerPayout { interaction_id: InteractionId },
    /// Platform's share of a query fee
    PlatformFee { interaction_id: InteractionId },
}

/// A single ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub entry_id: EntryId,
    pub account: AccountId,
    pub entry_type: EntryType,
    pub amount: Balance,
    pub balance_after: Balance,
    pub reason: EntryReason,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
struct LedgerInner {
    balances: HashMap<AccountId, Balance>,
    entries: Vec<LedgerEntry>,
}

impl LedgerInner {
    fn balance(&self, account: &AccountId) -> Balance {
        self.balances.get(account).copied().unwrap_or(Balance::ZERO)
    }

    fn post_credit(
        &mut self,
        account: &AccountId,
        amount: Balance,
        reason: EntryReason,
    ) -> MarketResult<(Balance, EntryId)> {
        let new_balance = self.balance(account).checked_add(amount)?;
        Ok(self.record(account, EntryType::Credit, amount, new_balance, reason))
    }

    fn post_debit(
        &mut self,
        account: &AccountId,
        amount: Balance,
        reason: EntryReason,
    ) -> MarketResult<(Balance, EntryId)> {
        if !self.balances.contains_key(account) {
            return Err(MarketError::AccountNotFound {
                account: account.clone(),
            });
        }
        let available = self.balance(account);
        let new_balance =
            available
                .checked_sub(amount)
                .map_err(|_| MarketError::InsufficientBalance {
                    account: account.clone(),
                    requested: amount,
                    available,
                })?;
        Ok(self.record(account, EntryType::Debit, amount, new_balance, reason))
    }

    fn record(
        &mut self,
        account: &AccountId,
        entry_type: EntryType,
        amount: Balance,
        new_balance: Balance,
        reason: EntryReason,
    ) -> (Balance, EntryId) {
        let entry = LedgerEntry {
            entry_id: EntryId::new(),
            account: account.clone(),
            entry_type,
            amount,
            balance_after: new_balance,
            reason,
            created_at: Utc::now(),
        };
        let entry_id = entry.entry_id.clone();
        self.balances.insert(account.clone(), new_balance);
        self.entries.push(entry);
        (new_balance, entry_id)
    }
}

/// The PolkaAgents ledger
///
/// Tracks every planck the marketplace moves: genesis endowments, stake
/// locks, and the per-query fee split. Thread-safe and designed for
/// concurrent access.
#[derive(Clone)]
pub struct Ledger {
    inner: Arc<RwLock<LedgerInner>>,
}

impl Ledger {
    /// Create a new in-memory ledger
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(LedgerInner::default())),
        }
    }

    /// Get the balance of an account (zero for unknown accounts)
    pub async fn balance(&self, account: &AccountId) -> Balance {
        self.inner.read().await.balance(account)
    }

    /// Credit an account (increase balance)
    ///
    /// Returns the new balance and the entry ID.
    pub async fn credit(
        &self,
        account: &AccountId,
        amount: Balance,
        reason: EntryReason,
    ) -> MarketResult<(Balance, EntryId)> {
        if amount.is_zero() {
            return Err(MarketError::ZeroAmount);
        }
        self.inner.write().await.post_credit(account, amount, reason)
    }

    /// Debit an account (decrease balance)
    ///
    /// Returns the new balance and the entry ID.
    /// Fails if the balance would go negative.
    pub async fn debit(
        &self,
        account: &AccountId,
        amount: Balance,
        reason: EntryReason,
    ) -> MarketResult<(Balance, EntryId)> {
        if amount.is_zero() {
            return Err(MarketError::ZeroAmount);
        }
        self.inner.write().await.post_debit(account, amount, reason)
    }

    /// Execute a transfer between two accounts
    ///
    /// Both sides post under a single lock acquisition; the debit is only
    /// applied once the credit is known to succeed, so a failed transfer
    /// leaves no trace.
    pub async fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Balance,
        reason: EntryReason,
    ) -> MarketResult<(EntryId, EntryId)> {
        if amount.is_zero() {
            return Err(MarketError::ZeroAmount);
        }
        let mut inner = self.inner.write().await;
        inner.balance(to).checked_add(amount)?;
        let (_, debit_entry) = inner.post_debit(from, amount, reason.clone())?;
        let (_, credit_entry) = inner.post_credit(to, amount, reason)?;
        Ok((debit_entry, credit_entry))
    }

    /// Get all entries for an account, oldest first
    pub async fn account_entries(&self, account: &AccountId) -> Vec<LedgerEntry> {
        let inner = self.inner.read().await;
        inner
            .entries
            .iter()
            .filter(|e| &e.account == account)
            .cloned()
            .collect()
    }

    /// Get recent entries (newest first)
    pub async fn recent_entries(&self, limit: usize) -> Vec<LedgerEntry> {
        let inner = self.inner.read().await;
        inner.entries.iter().rev().take(limit).cloned().collect()
    }

    /// Get the total number of entries
    pub async fn entry_count(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// Whether the ledger has ever recorded the account
    pub async fn contains(&self, account: &AccountId) -> bool {
        self.inner.read().await.balances.contains_key(account)
    }

    /// Get all known account IDs
    pub async fn all_accounts(&self) -> Vec<AccountId> {
        self.inner.read().await.balances.keys().cloned().collect()
    }

    /// Sum of every account balance
    pub async fn total_balance(&self) -> Balance {
        let inner = self.inner.read().await;
        inner
            .balances
            .values()
            .fold(Balance::ZERO, |acc, b| acc.saturating_add(*b))
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
