//! PolkaAgents CLI - command-line client for the gateway
//!
//! Covers the gateway's HTTP surface: browse the agent catalog, pay for a
//! query, poll for the response, inspect balances and history.
//!
//! # Quick Start
//!
//! ```bash
//! # Start the gateway first (in one terminal)
//! cargo run -p polka-gatewayd
//!
//! # Then use the CLI
//! polka agents
//! polka query --agent 1 "What is Polkadot?"
//! polka query --agent 2 --wait "Translate from English to Spanish: hello"
//! polka balance 5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY
//! polka status
//! ```

use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

mod client;
mod display;

use client::GatewayClient;
use polka_types::{truncate, AgentId, AgentRecord, InteractionId, InteractionStatus};

const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Poll cadence and bound for `--wait`
const WAIT_POLL_MS: u64 = 1000;
const WAIT_MAX_ATTEMPTS: u32 = 30;

/// PolkaAgents CLI - query AI agents through the payment gateway
#[derive(Parser)]
#[command(name = "polka")]
#[command(author = "PolkaAgents Contributors")]
#[command(version)]
#[command(about = "AI agents for hire, paid per query in DOT", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Gateway base URL
    #[arg(long, global = true, env = "API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show gateway, market and worker status
    Status,

    /// List registered agents
    Agents,

    /// Show one agent in detail
    Agent {
        /// Agent id
        id: u32,
    },

    /// Pay an agent's fee and submit a query
    Query {
        /// Agent id to query
        #[arg(short, long)]
        agent: u32,

        /// Paying wallet address
        #[arg(short, long, default_value = polka_types::DEV_OWNER)]
        wallet: String,

        /// Poll until the response arrives
        #[arg(long)]
        wait: bool,

        /// Query text
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Show one interaction
    Interaction {
        /// Interaction id
        id: u64,
    },

    /// Show a wallet's interaction history
    History {
        /// Wallet address
        wallet: String,
    },

    /// Show a wallet's free balance
    Balance {
        /// Wallet address
        wallet: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    print_banner();

    let client = GatewayClient::new(&cli.api_url);
    if client.is_available().await {
        println!(
            "  {} Connected to gateway at {}",
            "●".bright_green(),
            cli.api_url.bright_cyan()
        );
        println!();
    } else {
        display::warning(&format!("Gateway not reachable at {}", cli.api_url));
        display::info("Start it with: cargo run -p polka-gatewayd");
        println!();
    }

    match cli.command {
        Commands::Status => {
            client::display_status(&client).await?;
        }
        Commands::Agents => {
            client::display_agents(&client).await?;
        }
        Commands::Agent { id } => {
            let agent = client.agent(AgentId::new(id)).await?;
            render_agent(&agent);
        }
        Commands::Query {
            agent,
            wallet,
            wait,
            text,
        } => {
            let query = text.join(" ");
            run_query(&client, AgentId::new(agent), &wallet, &query, wait).await?;
        }
        Commands::Interaction { id } => {
            let view = client.interaction(InteractionId::new(id)).await?;
            render_interaction(&view);
        }
        Commands::History { wallet } => {
            let history = client.history(&wallet).await?;
            render_history(&wallet, &history);
        }
        Commands::Balance { wallet } => {
            let view = client.balance(&wallet).await?;
            display::labeled("Wallet", &view.address);
            display::labeled("Balance", &view.balance_display);
        }
    }

    Ok(())
}

// =============================================================================
// Query flow
// =============================================================================

async fn run_query(
    client: &GatewayClient,
    agent_id: AgentId,
    wallet: &str,
    query: &str,
    wait: bool,
) -> anyhow::Result<()> {
    let agent = client.agent(agent_id).await?;
    display::info(&format!(
        "Querying {} ({}) for {}",
        agent.metadata.name.bright_white(),
        agent.metadata.kind,
        agent.price_per_query.format_dot().bright_green(),
    ));

    let ack = client.query(agent_id, wallet, query).await?;
    display::success(&format!(
        "Interaction #{} accepted ({})",
        ack.interaction_id, ack.status
    ));

    if !wait {
        display::info(&format!(
            "Fetch the response with: polka interaction {}",
            ack.interaction_id
        ));
        return Ok(());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!(
        "Waiting for the agent's response (~{}s)...",
        ack.estimated_time
    ));
    pb.enable_steady_tick(Duration::from_millis(100));

    for _ in 0..WAIT_MAX_ATTEMPTS {
        tokio::time::sleep(Duration::from_millis(WAIT_POLL_MS)).await;
        let view = client.interaction(ack.interaction_id).await?;
        if !view.status.is_pending() {
            pb.finish_and_clear();
            render_interaction(&view);
            return Ok(());
        }
    }

    pb.finish_and_clear();
    display::warning("Still pending; the worker may be slow or down");
    display::info(&format!(
        "Check later with: polka interaction {}",
        ack.interaction_id
    ));
    Ok(())
}

// =============================================================================
// Rendering
// =============================================================================

fn render_agent(agent: &AgentRecord) {
    display::section(&format!("Agent #{} - {}", agent.id, agent.metadata.name));
    display::labeled("Kind", &agent.metadata.kind.to_string());
    display::labeled("Description", &agent.metadata.description);
    display::labeled("Model", &agent.metadata.model_info);
    display::labeled("Version", &agent.metadata.version);
    display::labeled("Owner", agent.owner.as_str());
    display::labeled("Price per query", &agent.price_per_query.format_dot());
    display::labeled("Stake", &agent.stake_amount.format_dot());
    display::labeled("Active", if agent.active { "yes" } else { "no" });
    display::labeled(
        "Registered",
        &agent.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
}

fn render_interaction(view: &client::InteractionView) {
    display::section(&format!("Interaction #{}", view.interaction_id));
    display::labeled("Agent", &format!("#{}", view.agent_id));
    display::labeled("Wallet", &view.wallet_address);
    println!(
        "  {}: {}",
        "Status".bright_white(),
        status_colored(view.status)
    );
    display::labeled("Fee paid", &view.fee_paid.format_dot());
    display::labeled("Submitted", &format_timestamp(view.timestamp));
    println!();
    println!("  {}", "Query:".bright_white());
    println!("    {}", view.query);
    match &view.response {
        Some(response) => {
            println!();
            println!("  {}", "Response:".bright_white());
            println!("    {}", response.bright_green());
        }
        None => {
            println!();
            display::info("No response yet");
        }
    }
}

fn render_history(wallet: &str, history: &[client::InteractionView]) {
    if history.is_empty() {
        display::info(&format!("No interactions for {}", wallet));
        return;
    }

    println!(
        "{}",
        format!("History for {} ({} interactions):", wallet, history.len())
            .bright_white()
            .bold()
    );
    for view in history {
        println!(
            "  {} #{:<4} agent #{:<3} {:>14}  {}  {}",
            status_colored(view.status),
            view.interaction_id,
            view.agent_id,
            view.fee_paid.format_dot().bright_green(),
            format_timestamp(view.timestamp).bright_black(),
            truncate(&view.query, 40),
        );
    }
}

fn status_colored(status: InteractionStatus) -> ColoredString {
    match status {
        InteractionStatus::Pending => "pending".yellow(),
        InteractionStatus::Completed => "completed".bright_green(),
        InteractionStatus::Failed => "failed".bright_red(),
    }
}

fn format_timestamp(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn print_banner() {
    println!();
    println!(
        "{}",
        "╔══════════════════════════════════════════════════════════════════╗".bright_cyan()
    );
    println!(
        "{}",
        "║                                                                  ║".bright_cyan()
    );
    println!(
        "{}{}{}",
        "║  ".bright_cyan(),
        "PolkaAgents".bright_white().bold(),
        " - Five AI Agents, One Payment Ledger                ║".bright_cyan()
    );
    println!(
        "{}",
        "║  Pay per query in DOT through the marketplace gateway            ║".bright_cyan()
    );
    println!(
        "{}",
        "║                                                                  ║".bright_cyan()
    );
    println!(
        "{}",
        "╚══════════════════════════════════════════════════════════════════╝".bright_cyan()
    );
    println!();
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_query() {
        let cli = Cli::parse_from([
            "polka", "query", "--agent", "2", "--wait", "Translate", "this",
        ]);
        match cli.command {
            Commands::Query {
                agent,
                wallet,
                wait,
                text,
            } => {
                assert_eq!(agent, 2);
                assert_eq!(wallet, polka_types::DEV_OWNER);
                assert!(wait);
                assert_eq!(text.join(" "), "Translate this");
            }
            _ => panic!("expected query command"),
        }
    }

    #[test]
    fn test_cli_parsing_simple_commands() {
        let cli = Cli::parse_from(["polka", "interaction", "7"]);
        assert!(matches!(
            cli.command,
            Commands::Interaction { id } if id == 7
        ));

        let cli = Cli::parse_from(["polka", "agents", "--api-url", "http://localhost:9000"]);
        assert_eq!(cli.api_url, "http://localhost:9000");
    }

    #[test]
    fn test_query_requires_text() {
        let result = Cli::try_parse_from(["polka", "query", "--agent", "1"]);
        assert!(result.is_err());
    }
}
