//! Gateway HTTP client for CLI → gateway communication
//!
//! Thin typed wrapper over the gateway's JSON API. Field names mirror the
//! gateway DTOs (`agent_type`, `wallet_address`, epoch-second timestamps).

use anyhow::{Context, Result};
use colored::*;
use serde::Deserialize;

use polka_types::{AgentId, AgentKind, AgentRecord, Balance, InteractionId, InteractionStatus};

/// HTTP client that talks to the PolkaAgents gateway
pub struct GatewayClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
pub struct StatusView {
    pub name: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub node_url: String,
    pub contract_address: String,
    pub market: MarketView,
    pub ledger: LedgerView,
    pub workers: Vec<WorkerView>,
}

#[derive(Debug, Deserialize)]
pub struct MarketView {
    pub agents: usize,
    pub active_agents: usize,
    pub interactions: usize,
    pub pending: usize,
    pub completed: usize,
    pub failed: usize,
    pub platform_fee_percentage: u8,
}

#[derive(Debug, Deserialize)]
pub struct LedgerView {
    pub accounts: usize,
    pub entries: usize,
    pub total_balance_display: String,
}

#[derive(Debug, Deserialize)]
pub struct WorkerView {
    #[serde(rename = "agent_type")]
    pub kind: AgentKind,
    pub url: String,
    pub reachable: bool,
}

/// Acknowledgement returned by `POST /query`
#[derive(Debug, Deserialize)]
pub struct QueryAck {
    pub interaction_id: InteractionId,
    pub status: InteractionStatus,
    pub estimated_time: u64,
}

/// One interaction as the gateway renders it
#[derive(Debug, Deserialize)]
pub struct InteractionView {
    pub interaction_id: InteractionId,
    pub agent_id: AgentId,
    pub wallet_address: String,
    pub query: String,
    pub response: Option<String>,
    pub status: InteractionStatus,
    pub timestamp: i64,
    pub fee_paid: Balance,
}

#[derive(Debug, Deserialize)]
pub struct BalanceView {
    pub address: String,
    pub balance: Balance,
    pub balance_display: String,
}

#[derive(Debug, Deserialize)]
struct AgentList {
    agents: Vec<AgentRecord>,
}

impl GatewayClient {
    /// Create a new client pointing to a gateway URL
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Check if the gateway is reachable
    pub async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/health", self.base_url))
            .timeout(std::time::Duration::from_secs(2))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Get the full gateway status snapshot
    pub async fn status(&self) -> Result<StatusView> {
        let resp = self
            .client
            .get(format!("{}/status", self.base_url))
            .send()
            .await
            .context("Failed to connect to gateway")?;

        resp.json().await.context("Failed to parse status response")
    }

    /// List all registered agents
    pub async fn agents(&self) -> Result<Vec<AgentRecord>> {
        let resp = self
            .client
            .get(format!("{}/agents", self.base_url))
            .send()
            .await
            .context("Failed to connect to gateway")?;

        let list: AgentList = resp.json().await.context("Failed to parse agent list")?;
        Ok(list.agents)
    }

    /// Get a single agent
    pub async fn agent(&self, id: AgentId) -> Result<AgentRecord> {
        let resp = self
            .client
            .get(format!("{}/agents/{}", self.base_url, id))
            .send()
            .await
            .context("Failed to connect to gateway")?;

        if !resp.status().is_success() {
            let err: serde_json::Value = resp.json().await.unwrap_or_default();
            anyhow::bail!(
                "{}",
                err.get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("Agent not found")
            );
        }

        resp.json().await.context("Failed to parse agent")
    }

    /// Pay an agent's fee and submit a query
    pub async fn query(&self, agent_id: AgentId, wallet: &str, query: &str) -> Result<QueryAck> {
        let resp = self
            .client
            .post(format!("{}/query", self.base_url))
            .json(&serde_json::json!({
                "agent_id": agent_id,
                "query": query,
                "wallet_address": wallet,
            }))
            .send()
            .await
            .context("Failed to connect to gateway")?;

        if !resp.status().is_success() {
            let err: serde_json::Value = resp.json().await.unwrap_or_default();
            anyhow::bail!(
                "{}",
                err.get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("Query rejected")
            );
        }

        resp.json().await.context("Failed to parse query ack")
    }

    /// Get a single interaction
    pub async fn interaction(&self, id: InteractionId) -> Result<InteractionView> {
        let resp = self
            .client
            .get(format!("{}/interactions/{}", self.base_url, id))
            .send()
            .await
            .context("Failed to connect to gateway")?;

        if !resp.status().is_success() {
            let err: serde_json::Value = resp.json().await.unwrap_or_default();
            anyhow::bail!(
                "{}",
                err.get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("Interaction not found")
            );
        }

        resp.json().await.context("Failed to parse interaction")
    }

    /// Get a wallet's interaction history, newest last
    pub async fn history(&self, wallet: &str) -> Result<Vec<InteractionView>> {
        let resp = self
            .client
            .get(format!("{}/accounts/{}/interactions", self.base_url, wallet))
            .send()
            .await
            .context("Failed to connect to gateway")?;

        if !resp.status().is_success() {
            let err: serde_json::Value = resp.json().await.unwrap_or_default();
            anyhow::bail!(
                "{}",
                err.get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("Invalid wallet address")
            );
        }

        resp.json().await.context("Failed to parse history")
    }

    /// Get a wallet's free balance
    pub async fn balance(&self, wallet: &str) -> Result<BalanceView> {
        let resp = self
            .client
            .get(format!("{}/accounts/{}/balance", self.base_url, wallet))
            .send()
            .await
            .context("Failed to connect to gateway")?;

        if !resp.status().is_success() {
            let err: serde_json::Value = resp.json().await.unwrap_or_default();
            anyhow::bail!(
                "{}",
                err.get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("Invalid wallet address")
            );
        }

        resp.json().await.context("Failed to parse balance")
    }
}

/// Display full status from the gateway
pub async fn display_status(client: &GatewayClient) -> Result<()> {
    let status = client.status().await?;

    println!("{}", status.name.bright_white().bold());
    println!("{}", "─".repeat(60));

    println!(
        "  {} {}",
        "Gateway:".bright_white(),
        format!("v{}", status.version).bright_green()
    );
    println!(
        "  {} {}",
        "Uptime:".bright_white(),
        format!("{}s", status.uptime_seconds)
    );
    println!("  {} {}", "Node:".bright_white(), status.node_url.bright_cyan());
    println!(
        "  {} {}",
        "Contract:".bright_white(),
        status.contract_address.bright_cyan()
    );

    // Market
    println!();
    println!("{}", "Market:".bright_white().bold());
    println!(
        "  Agents: {} ({} active)  Platform fee: {}%",
        format!("{}", status.market.agents).bright_cyan(),
        status.market.active_agents,
        status.market.platform_fee_percentage,
    );
    println!(
        "  Interactions: {} ({} pending, {} completed, {} failed)",
        format!("{}", status.market.interactions).bright_cyan(),
        status.market.pending,
        status.market.completed,
        status.market.failed,
    );

    // Ledger
    println!();
    println!("{}", "Ledger:".bright_white().bold());
    println!(
        "  Accounts: {}  Entries: {}  Total: {}",
        status.ledger.accounts,
        status.ledger.entries,
        status.ledger.total_balance_display.bright_green(),
    );

    // Workers
    println!();
    println!("{}", "Workers:".bright_white().bold());
    for w in &status.workers {
        let dot = if w.reachable {
            "●".bright_green()
        } else {
            "○".bright_red()
        };
        println!("  {} {:16} {}", dot, w.kind.to_string().bright_white(), w.url.bright_black());
    }

    Ok(())
}

/// Display the agent list from the gateway
pub async fn display_agents(client: &GatewayClient) -> Result<()> {
    let agents = client.agents().await?;

    if agents.is_empty() {
        println!("{}", "No agents registered".yellow());
        println!(
            "  Seed the catalog by restarting the gateway without {}",
            "--no-seed".bright_cyan()
        );
        return Ok(());
    }

    println!("{}", "Registered Agents:".bright_white().bold());
    for a in &agents {
        let dot = if a.active {
            "●".bright_green()
        } else {
            "○".bright_black()
        };
        println!(
            "  {} #{:<3} {:22} {:16} {:>14}  stake {}",
            dot,
            a.id,
            a.metadata.name.bright_white(),
            a.metadata.kind.to_string().bright_cyan(),
            a.price_per_query.format_dot().bright_green(),
            a.stake_amount.format_dot(),
        );
    }
    println!();
    println!(
        "  Query one: {}",
        "polka query --agent 1 \"What is Polkadot?\"".bright_cyan()
    );

    Ok(())
}
