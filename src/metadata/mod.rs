//! Token metadata resolution
//!
//! Fallback chain per mint: merged static registry (caller overrides win),
//! then the remote cache, then a remote fetch, then the deterministic
//! placeholder. Remote fetches happen only on the mainnet configuration;
//! devnet never touches the network.
//!
//! The fetcher is defensive about the remote side: entries live for a TTL,
//! a failed mint sits in a cooldown window before any retry, at most one
//! refresh per mint is in flight at a time, and every fetch runs under a
//! hard deadline. None of this surfaces to the caller - resolution is total
//! and falls back to the placeholder.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::MetadataConfig;
use crate::registry::{Network, TokenRegistry};
use crate::rpc::execute_with_deadline;
use crate::types::token::TokenInfo;

struct CacheEntry {
    info: TokenInfo,
    fetched_at: Instant,
}

#[derive(Default)]
struct FetchState {
    cache: HashMap<String, CacheEntry>,
    failures: HashMap<String, Instant>,
    in_flight: HashSet<String>,
}

/// Total token-metadata resolver
pub struct TokenMetadataFetcher {
    registry: TokenRegistry,
    config: MetadataConfig,
    http: reqwest::Client,
    state: Mutex<FetchState>,
}

impl TokenMetadataFetcher {
    pub fn new(registry: TokenRegistry, config: MetadataConfig) -> Self {
        Self {
            registry,
            config,
            http: reqwest::Client::new(),
            state: Mutex::new(FetchState::default()),
        }
    }

    /// Resolve one mint. Never fails; the worst case is the placeholder.
    ///
    /// `decimals_hint` is the chain-observed decimals, carried into the
    /// placeholder when nothing better is known.
    pub async fn resolve(&self, mint: &str, decimals_hint: u8) -> TokenInfo {
        // 1. Static registry (overrides already merged in)
        if let Some(info) = self.registry.get(mint) {
            return info.clone();
        }

        // Devnet never hits the network
        if self.registry.network() == Network::Devnet {
            return TokenInfo::placeholder(mint, decimals_hint);
        }

        let ttl = Duration::from_secs(self.config.ttl_seconds);
        let cooldown = Duration::from_secs(self.config.cooldown_seconds);

        {
            let mut state = self.state.lock().await;

            // 2. Remote cache within TTL; stale entries are evicted
            if let Some(entry) = state.cache.get(mint) {
                if entry.fetched_at.elapsed() < ttl {
                    return entry.info.clone();
                }
            }
            state.cache.remove(mint);

            // Cooling down after a failure, or another refresh already in
            // flight: fall back rather than piling on
            if let Some(failed_at) = state.failures.get(mint) {
                if failed_at.elapsed() < cooldown {
                    return TokenInfo::placeholder(mint, decimals_hint);
                }
            }
            state.failures.remove(mint);
            if !state.in_flight.insert(mint.to_string()) {
                return TokenInfo::placeholder(mint, decimals_hint);
            }
        }

        // 3. Remote fetch under a hard deadline; timeouts count as failures
        let fetched = self.fetch_remote(mint).await;

        let mut state = self.state.lock().await;
        state.in_flight.remove(mint);
        match fetched {
            Some(info) => {
                state.cache.insert(
                    mint.to_string(),
                    CacheEntry {
                        info: info.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                info
            }
            None => {
                // 4. Placeholder, with a cooldown against retry storms
                state.failures.insert(mint.to_string(), Instant::now());
                TokenInfo::placeholder(mint, decimals_hint)
            }
        }
    }

    /// Resolve a set of (mint, decimals) pairs into a lookup map
    pub async fn resolve_many(&self, mints: &[(String, u8)]) -> HashMap<String, TokenInfo> {
        let mut resolved = HashMap::with_capacity(mints.len());
        for (mint, decimals) in mints {
            if resolved.contains_key(mint) {
                continue;
            }
            let info = self.resolve(mint, *decimals).await;
            resolved.insert(mint.clone(), info);
        }
        resolved
    }

    async fn fetch_remote(&self, mint: &str) -> Option<TokenInfo> {
        let url = format!("{}/{}", self.config.endpoint, mint);
        debug!("Fetching token metadata for {}", mint);

        let request = async {
            let response = self.http.get(&url).send().await.ok()?;
            if !response.status().is_success() {
                return None;
            }
            response.json::<Value>().await.ok()
        };

        let body = match execute_with_deadline(self.config.fetch_timeout_seconds, request).await {
            Ok(Some(body)) => body,
            Ok(None) => {
                warn!("Metadata fetch failed for {}", mint);
                return None;
            }
            Err(_) => {
                warn!(
                    "Metadata fetch for {} exceeded {}s deadline",
                    mint, self.config.fetch_timeout_seconds
                );
                return None;
            }
        };

        let symbol = body.get("symbol").and_then(Value::as_str)?;
        let name = body.get("name").and_then(Value::as_str).unwrap_or(symbol);
        let decimals = body.get("decimals").and_then(Value::as_u64)? as u8;

        Some(TokenInfo {
            mint: mint.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            decimals,
            logo_uri: body
                .get("logoURI")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}
