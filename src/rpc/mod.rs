//! RPC layer: collaborator interfaces and the JSON-RPC client
//!
//! The engine consumes two narrow collaborator interfaces - a signature
//! source and a transaction source - plus an account source for balance
//! queries. [`client::SolanaRpcClient`] implements all three over HTTP
//! JSON-RPC; tests supply mocks.

pub mod cache;
pub mod client;
pub mod retry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::RpcResult;
use crate::types::transaction::{RawTransaction, SignatureInfo};

pub use cache::{CacheStats, TransactionCache};
pub use client::SolanaRpcClient;
pub use retry::{calculate_next_backoff, execute_with_deadline};

/// Lists transaction signatures for an address, newest first
#[async_trait]
pub trait SignatureSource: Send + Sync {
    async fn fetch_signatures(
        &self,
        address: &str,
        limit: usize,
        before: Option<&str>,
        until: Option<&str>,
    ) -> RpcResult<Vec<SignatureInfo>>;
}

/// Fetches full transactions for a batch of signatures.
///
/// Results come back in input order; signatures the chain cannot resolve
/// are `None` in-place.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn fetch_transactions(
        &self,
        signatures: &[String],
    ) -> RpcResult<Vec<Option<RawTransaction>>>;
}

/// One token-account balance owned by a wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenAccountBalance {
    pub mint: String,
    pub decimals: u8,
    pub raw_amount: u128,
}

/// Reads current balances for an address
#[async_trait]
pub trait AccountSource: Send + Sync {
    async fn fetch_native_balance(&self, address: &str) -> RpcResult<u64>;

    async fn fetch_token_balances(&self, address: &str) -> RpcResult<Vec<TokenAccountBalance>>;
}

/// Everything the indexer needs from a chain connection
pub trait ChainSource: SignatureSource + TransactionSource + AccountSource {}

impl<T: SignatureSource + TransactionSource + AccountSource> ChainSource for T {}
