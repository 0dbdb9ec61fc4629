//! PolkaAgents Agent Worker Daemon
//!
//! One process per agent kind: pairs an inference engine with the shared
//! worker HTTP app. The catalog assigns each kind its default port
//! (8001-8005); the gateway dispatches paid queries here.
//!
//! # Usage
//!
//! ```bash
//! # Serve the chatbot on its catalog port (8001)
//! polka-agentd --kind chatbot
//!
//! # Serve sentiment analysis on a custom port
//! polka-agentd --kind sentiment --port 9103
//!
//! # Forward inference to a model server instead of the builtin engine
//! polka-agentd --kind translation --engine remote \
//!     --model-server-url http://localhost:8080
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use polka_agent::WorkerState;
use polka_engines::engine_from_env;
use polka_types::{catalog_entry, AgentKind};

// =============================================================================
// CLI Arguments
// =============================================================================

/// PolkaAgents agent worker - serves one agent kind over HTTP
#[derive(Parser, Debug)]
#[command(name = "polka-agentd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Agent kind to serve (chatbot, translation, sentiment,
    /// summarization, job_application)
    #[arg(short, long, env = "AGENT_KIND")]
    kind: String,

    /// Host to bind to
    #[arg(long, env = "AGENT_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on (defaults to the kind's catalog port)
    #[arg(short, long, env = "AGENT_PORT")]
    port: Option<u16>,

    /// Engine selection (builtin, remote)
    #[arg(long, env = "POLKA_ENGINE")]
    engine: Option<String>,

    /// Remote model server base URL (with --engine remote)
    #[arg(long, env = "POLKA_MODEL_SERVER_URL")]
    model_server_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "AGENT_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log format (json, pretty)
    #[arg(long, env = "AGENT_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// Shutdown timeout in seconds
    #[arg(long, env = "AGENT_SHUTDOWN_TIMEOUT", default_value_t = 5)]
    shutdown_timeout: u64,
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap resolves env fallbacks
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level, &args.log_format);

    let kind: AgentKind = args.kind.parse().map_err(|_| {
        anyhow::anyhow!(
            "Unknown agent kind '{}': expected one of chatbot, translation, \
             sentiment, summarization, job_application",
            args.kind
        )
    })?;

    // Engine selection flags feed the environment the engine router reads
    if let Some(engine) = &args.engine {
        std::env::set_var("POLKA_ENGINE", engine);
    }
    if let Some(url) = &args.model_server_url {
        std::env::set_var("POLKA_MODEL_SERVER_URL", url);
    }
    let engine = engine_from_env(kind);

    let entry = catalog_entry(kind);
    let port = args.port.unwrap_or(entry.port);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        agent = %kind,
        name = entry.name,
        model = engine.model_info(),
        "Starting agent worker"
    );

    // Create the worker app
    let state = Arc::new(WorkerState::new(engine));
    let app = polka_agent::create_router(state);

    // Get bind address
    let addr: SocketAddr = format!("{}:{}", args.host, port).parse()?;

    tracing::info!(host = %args.host, port = port, "Worker listening");

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(Duration::from_secs(args.shutdown_timeout)))
        .await?;

    tracing::info!("Worker shutdown complete");

    Ok(())
}

// =============================================================================
// Initialization Functions
// =============================================================================

/// Initialize tracing/logging
fn init_logging(level: &str, format: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match format {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["polka-agentd", "--kind", "sentiment", "--port", "9103"]);
        assert_eq!(args.kind, "sentiment");
        assert_eq!(args.port, Some(9103));
        assert_eq!(args.host, "0.0.0.0");
    }

    #[test]
    fn test_catalog_port_fallback() {
        let args = Args::parse_from(["polka-agentd", "--kind", "chatbot"]);
        let kind: AgentKind = args.kind.parse().unwrap();
        assert_eq!(args.port.unwrap_or(catalog_entry(kind).port), 8001);
    }
}
