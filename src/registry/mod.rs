//! Static token registries
//!
//! Well-known token tables per network, read-only after initialisation.
//! Caller-supplied overrides are merged into an owned copy at construction
//! time; overrides win over the built-in entries.

mod devnet;
mod mainnet;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::token::TokenInfo;

/// Which cluster the indexer targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Devnet,
}

impl Default for Network {
    fn default() -> Self {
        Network::Mainnet
    }
}

/// Merged lookup table: built-in entries for the network plus caller overrides
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    network: Network,
    tokens: HashMap<String, TokenInfo>,
}

impl TokenRegistry {
    /// Registry with only the built-in entries for the network
    pub fn new(network: Network) -> Self {
        Self::with_overrides(network, Vec::new())
    }

    /// Registry with caller overrides merged in (overrides win)
    pub fn with_overrides(network: Network, overrides: Vec<TokenInfo>) -> Self {
        let mut tokens: HashMap<String, TokenInfo> = match network {
            Network::Mainnet => mainnet::builtin_tokens(),
            Network::Devnet => devnet::builtin_tokens(),
        };

        for token in overrides {
            tokens.insert(token.mint.clone(), token);
        }

        Self { network, tokens }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Look up a mint. Unknown mints yield `None`; use
    /// [`get_or_placeholder`](Self::get_or_placeholder) for a total lookup.
    pub fn get(&self, mint: &str) -> Option<&TokenInfo> {
        self.tokens.get(mint)
    }

    /// Total lookup: unknown mints become the deterministic placeholder
    /// carrying the supplied decimals
    pub fn get_or_placeholder(&self, mint: &str, decimals: u8) -> TokenInfo {
        self.tokens
            .get(mint)
            .cloned()
            .unwrap_or_else(|| TokenInfo::placeholder(mint, decimals))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
