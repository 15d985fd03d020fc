use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

use crate::registry::Network;
use crate::spam::SpamConfig;
use crate::types::token::TokenInfo;

/// Indexer configuration, loadable from indexer.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    pub network: Network,
    pub rpc: RpcConfig,
    pub metadata: MetadataConfig,
    pub spam: SpamConfig,
    /// Caller-supplied token entries merged over the built-in registry
    #[serde(default)]
    pub token_overrides: Vec<TokenInfo>,
}

/// RPC endpoint and request-layer behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    pub url: String,
    pub ws_url: Option<String>,
    pub commitment: String,
    pub timeout_seconds: u64,
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_seconds: u64,
    pub concurrent_requests: usize,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "https://api.mainnet-beta.solana.com".to_string(),
            ws_url: None,
            commitment: "confirmed".to_string(),
            timeout_seconds: 30,
            max_retries: 5,
            initial_backoff_ms: 200,
            backoff_multiplier: 2.0,
            max_backoff_seconds: 10,
            concurrent_requests: 8,
        }
    }
}

/// Token-metadata fetcher behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Remote metadata endpoint; `{endpoint}/{mint}` must return token JSON
    pub endpoint: String,
    pub ttl_seconds: u64,
    pub cooldown_seconds: u64,
    pub fetch_timeout_seconds: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://tokens.jup.ag/token".to_string(),
            ttl_seconds: 300,
            cooldown_seconds: 30,
            fetch_timeout_seconds: 10,
        }
    }
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            rpc: RpcConfig::default(),
            metadata: MetadataConfig::default(),
            spam: SpamConfig::default(),
            token_overrides: Vec::new(),
        }
    }
}

impl IndexerConfig {
    /// Minimal construction: an RPC URL and the defaults for everything else
    pub fn with_rpc_url(url: &str) -> Self {
        Self {
            rpc: RpcConfig {
                url: url.to_string(),
                ..RpcConfig::default()
            },
            ..Self::default()
        }
    }

    /// Load configuration from indexer.toml and environment variables.
    /// Environment variables (prefix `INDEXER_`) take precedence over file
    /// configuration.
    pub fn load() -> Result<Self, ConfigError> {
        let rpc_defaults = RpcConfig::default();
        let metadata_defaults = MetadataConfig::default();
        let spam_defaults = SpamConfig::default();

        let config = Config::builder()
            .set_default("network", "mainnet")?
            // RPC defaults
            .set_default("rpc.url", rpc_defaults.url)?
            .set_default("rpc.commitment", rpc_defaults.commitment)?
            .set_default("rpc.timeout_seconds", rpc_defaults.timeout_seconds)?
            .set_default("rpc.max_retries", rpc_defaults.max_retries as i64)?
            .set_default("rpc.initial_backoff_ms", rpc_defaults.initial_backoff_ms)?
            .set_default("rpc.backoff_multiplier", rpc_defaults.backoff_multiplier)?
            .set_default("rpc.max_backoff_seconds", rpc_defaults.max_backoff_seconds)?
            .set_default(
                "rpc.concurrent_requests",
                rpc_defaults.concurrent_requests as i64,
            )?
            // Metadata fetcher defaults
            .set_default("metadata.endpoint", metadata_defaults.endpoint)?
            .set_default("metadata.ttl_seconds", metadata_defaults.ttl_seconds)?
            .set_default(
                "metadata.cooldown_seconds",
                metadata_defaults.cooldown_seconds,
            )?
            .set_default(
                "metadata.fetch_timeout_seconds",
                metadata_defaults.fetch_timeout_seconds,
            )?
            // Spam filter defaults
            .set_default("spam.native_dust_floor", spam_defaults.native_dust_floor)?
            .set_default("spam.stable_dust_floor", spam_defaults.stable_dust_floor)?
            .set_default("spam.confidence_floor", spam_defaults.confidence_floor)?
            .set_default("spam.allow_failed", spam_defaults.allow_failed)?
            // Load from indexer.toml if it exists
            .add_source(File::with_name("indexer").required(false))
            // INDEXER_* env variables override everything
            .add_source(config::Environment::with_prefix("INDEXER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
