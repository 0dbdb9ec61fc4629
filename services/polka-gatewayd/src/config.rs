//! Gateway Daemon Configuration
//!
//! Configuration management for the PolkaAgents gateway.
//! Supports environment variables, config files, and CLI arguments.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use polka_types::{AgentKind, DEFAULT_CONTRACT_ADDRESS, GATEWAY_PORT};

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Server binding configuration
    #[serde(default)]
    pub server: ServerSettings,

    /// Backing node configuration
    #[serde(default)]
    pub node: NodeSettings,

    /// Per-kind worker URL overrides
    #[serde(default)]
    pub agents: AgentUrls,

    /// API configuration
    #[serde(default)]
    pub api: ApiSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server binding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl ServerSettings {
    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Get the shutdown timeout duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Backing node settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSettings {
    /// Node URL the deployment is pinned to
    #[serde(default = "default_node_url")]
    pub node_url: String,

    /// Marketplace contract address
    #[serde(default = "default_contract_address")]
    pub contract_address: String,

    /// Platform fee percentage taken from every query payment
    #[serde(default = "default_platform_fee")]
    pub platform_fee_percentage: u8,

    /// Apply dev genesis (endowments + catalog agents) on start
    #[serde(default = "default_true")]
    pub seed: bool,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            node_url: default_node_url(),
            contract_address: default_contract_address(),
            platform_fee_percentage: default_platform_fee(),
            seed: true,
        }
    }
}

/// Per-kind worker URL overrides
///
/// Unset kinds fall back to `http://localhost:<catalog port>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentUrls {
    pub chatbot_url: Option<String>,
    pub translation_url: Option<String>,
    pub sentiment_url: Option<String>,
    pub summarization_url: Option<String>,
    pub job_application_url: Option<String>,
}

impl AgentUrls {
    /// The overrides that are actually set, as (kind, url) pairs
    pub fn overrides(&self) -> Vec<(AgentKind, String)> {
        let pairs = [
            (AgentKind::Chatbot, &self.chatbot_url),
            (AgentKind::Translation, &self.translation_url),
            (AgentKind::Sentiment, &self.sentiment_url),
            (AgentKind::Summarization, &self.summarization_url),
            (AgentKind::JobApplication, &self.job_application_url),
        ];
        pairs
            .into_iter()
            .filter_map(|(kind, url)| url.clone().map(|url| (kind, url)))
            .collect()
    }
}

/// API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Enable request tracing
    #[serde(default = "default_true")]
    pub enable_tracing: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            enable_cors: true,
            enable_tracing: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// =============================================================================
// Default Functions
// =============================================================================

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    GATEWAY_PORT
}

fn default_shutdown_timeout() -> u64 {
    5
}

fn default_node_url() -> String {
    "http://localhost:9944".to_string()
}

fn default_contract_address() -> String {
    DEFAULT_CONTRACT_ADDRESS.to_string()
}

fn default_platform_fee() -> u8 {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Configuration Loading
// =============================================================================

impl GatewayConfig {
    /// Load configuration from environment and optional config file
    pub fn load(config_path: Option<&str>) -> anyhow::Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder();

        // Add config file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Add default config locations
        builder = builder
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        // Add environment variables with POLKA_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("POLKA")
                .separator("__")
                .try_parsing(true),
        );

        // Build and deserialize
        let config = builder.build()?;

        // Try to deserialize, falling back to defaults where needed
        let gateway_config: GatewayConfig = config.try_deserialize().unwrap_or_else(|_| {
            tracing::warn!("Using default configuration - some settings may need adjustment");
            GatewayConfig::default()
        });

        Ok(gateway_config)
    }

    /// Create a configuration for development/testing
    pub fn development() -> Self {
        Self {
            server: ServerSettings::default(),
            node: NodeSettings::default(),
            agents: AgentUrls::default(),
            api: ApiSettings::default(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::development()
    }
}
