//! PolkaAgents Gateway Daemon
//!
//! Serves the marketplace REST API: agent registry, paid queries, ledger
//! views, and dispatch to the per-kind agent workers.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (seeded dev genesis, port 8000)
//! polka-gatewayd
//!
//! # Start with custom config
//! polka-gatewayd --config /path/to/config.toml
//!
//! # Start with environment overrides
//! POLKA__SERVER__PORT=8080 polka-gatewayd
//!
//! # Point the chatbot route at a remote worker
//! POLKA__AGENTS__CHATBOT_URL=http://10.0.0.5:8001 polka-gatewayd
//! ```

mod config;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use polka_contract::{DevNode, NodeConfig};
use polka_gateway::{create_router, ApiConfig, AppState, Dispatcher, WorkerRoutes};

use crate::config::GatewayConfig;

// =============================================================================
// CLI Arguments
// =============================================================================

/// PolkaAgents Gateway - agent marketplace API
#[derive(Parser, Debug)]
#[command(name = "polka-gatewayd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, env = "POLKA_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "POLKA_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "POLKA_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "POLKA_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log format (json, pretty)
    #[arg(long, env = "POLKA_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// Node URL the deployment is pinned to
    #[arg(long, env = "BLOCKCHAIN_NODE_URL")]
    node_url: Option<String>,

    /// Marketplace contract address
    #[arg(long, env = "CONTRACT_ADDRESS")]
    contract_address: Option<String>,

    /// Platform fee percentage taken from every query payment
    #[arg(long, env = "POLKA_PLATFORM_FEE")]
    platform_fee: Option<u8>,

    /// Skip dev genesis (no endowments, no catalog agents)
    #[arg(long, env = "POLKA_NO_SEED")]
    no_seed: bool,
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut gateway_config = GatewayConfig::load(args.config.as_deref())?;

    // Override with CLI arguments
    if let Some(host) = args.host {
        gateway_config.server.host = host;
    }
    if let Some(port) = args.port {
        gateway_config.server.port = port;
    }
    if let Some(node_url) = args.node_url {
        gateway_config.node.node_url = node_url;
    }
    if let Some(contract_address) = args.contract_address {
        gateway_config.node.contract_address = contract_address;
    }
    if let Some(platform_fee) = args.platform_fee {
        gateway_config.node.platform_fee_percentage = platform_fee;
    }
    if args.no_seed {
        gateway_config.node.seed = false;
    }
    gateway_config.logging.level = args.log_level;
    gateway_config.logging.format = args.log_format;

    // Initialize logging
    init_logging(&gateway_config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting PolkaAgents Gateway"
    );

    // Start the dev node (applies genesis unless seeding is disabled)
    let node = start_node(&gateway_config).await?;

    // Build the worker routing table
    let routes = build_routes(&gateway_config);

    // Create application state
    let state = Arc::new(AppState::new(node, Dispatcher::new(routes)));

    // Create API configuration
    let api_config = ApiConfig {
        enable_cors: gateway_config.api.enable_cors,
        enable_tracing: gateway_config.api.enable_tracing,
    };

    // Create router
    let app = create_router(state, api_config);

    // Get bind address
    let addr = gateway_config.server.socket_addr();

    tracing::info!(
        host = %gateway_config.server.host,
        port = %gateway_config.server.port,
        "Gateway listening"
    );

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(gateway_config.server.shutdown_timeout()))
        .await?;

    tracing::info!("Gateway shutdown complete");

    Ok(())
}

// =============================================================================
// Initialization Functions
// =============================================================================

/// Initialize tracing/logging
fn init_logging(config: &config::LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber
                .with(fmt::layer().json().with_target(true))
                .init();
        }
        _ => {
            subscriber
                .with(fmt::layer().pretty().with_target(true))
                .init();
        }
    }

    Ok(())
}

/// Start the in-process dev node backing the market
async fn start_node(config: &GatewayConfig) -> anyhow::Result<DevNode> {
    let node_config = NodeConfig {
        node_url: config.node.node_url.clone(),
        contract_address: config.node.contract_address.clone(),
        platform_fee_percentage: config.node.platform_fee_percentage,
        seed: config.node.seed,
    };

    let node = DevNode::start(node_config).await?;

    tracing::info!(
        node_url = %config.node.node_url,
        contract = %config.node.contract_address,
        seeded = config.node.seed,
        "Node started"
    );

    Ok(node)
}

/// Build the worker routing table, applying configured overrides
fn build_routes(config: &GatewayConfig) -> WorkerRoutes {
    let mut routes = WorkerRoutes::with_defaults();
    for (kind, url) in config.agents.overrides() {
        tracing::info!(agent = %kind, url = %url, "Worker route override");
        routes.override_url(kind, url);
    }
    routes
}

// =============================================================================
// Graceful Shutdown
// =============================================================================

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    // Allow time for in-flight requests to complete
    tracing::info!(
        timeout_secs = timeout.as_secs(),
        "Waiting for in-flight requests to complete..."
    );

    tokio::time::sleep(timeout).await;
}

// =============================================================================
// Tests
// =============================================================================
