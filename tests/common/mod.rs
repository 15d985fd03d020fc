//! Common test utilities
//!
//! Shared fixture builders and a scripted mock chain source so pipeline and
//! accumulation tests run without a network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tx_indexer::config::{IndexerConfig, MetadataConfig};
use tx_indexer::detect;
use tx_indexer::errors::{RpcError, RpcResult};
use tx_indexer::fetch::Pipeline;
use tx_indexer::metadata::TokenMetadataFetcher;
use tx_indexer::registry::{Network, TokenRegistry};
use tx_indexer::rpc::{AccountSource, SignatureSource, TokenAccountBalance, TransactionSource};
use tx_indexer::types::transaction::{RawTransaction, SignatureInfo, TokenBalance};

// Valid base58 32-byte addresses for facade calls that validate input
pub const WALLET_ALPHA: &str = "2AdteDhtwfHSRHtRvibNgqPDNH9XhAWsxb7ZU6pByWVm";
pub const WALLET_BETA: &str = "CsX1CNjoMdA2AXQ4D8W7q5JoBgbxoQ7XDdhsJfH45R76";
pub const WALLET_GAMMA: &str = "EUTnEGt9GKZdFTGRiXX2UC26B6rDeeDfEUGw3UwwprkU";
pub const RELAYER: &str = "36FVq4f34HycqqNNxByhaPQTKxGCyY7HZMY6sUuJZbJi";
pub const FEE_RECIPIENT: &str = "9Bszv6N4e5kffTLodTJ72yM99Ak2nvVqgKkAYgj2Hdt9";
pub const TREASURY: &str = "7vzEoA6qPLqGXe5rxmMK7iha63znnLfwGppBrUfELajg";

// Valid base58 64-byte signatures for cursor parameters
pub const SIG_CURSOR_A: &str =
    "3NMYouPNGPe5TJUnzBKNRTvBs8fGTjZkYhJeLfBjNjTFdebjaLqqePDWSdoMntp3vivsm8Q5NV9zxhkzW21zpS7n";
pub const SIG_CURSOR_B: &str =
    "2goMcAZ8rH3C7JBdLD49NuMEh5i7v2pGTzjSa2biYqRY1Ppiz2UpoXupdQTw6SrbA7D4o6EBvZVKxGKRnwtu9Tpr";

pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

/// Initialise test logging once; `RUST_LOG` controls verbosity
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Metadata configuration pointing at a port nothing listens on, so unknown
/// mints fail fast into placeholders instead of touching the network
pub fn offline_metadata_config() -> MetadataConfig {
    MetadataConfig {
        endpoint: "http://127.0.0.1:1/token".to_string(),
        ..MetadataConfig::default()
    }
}

/// Indexer configuration suitable for tests: mainnet tables, offline metadata
pub fn test_config() -> IndexerConfig {
    IndexerConfig {
        metadata: offline_metadata_config(),
        ..IndexerConfig::default()
    }
}

/// A pipeline over the mainnet registry with offline metadata
pub fn test_pipeline() -> Pipeline {
    init_test_logging();
    let registry = TokenRegistry::new(Network::Mainnet);
    let metadata = Arc::new(TokenMetadataFetcher::new(
        registry.clone(),
        offline_metadata_config(),
    ));
    Pipeline::new(registry, metadata)
}

/// Base transaction: one fee-paying key, no movement
pub fn base_tx(signature: &str, fee_payer: &str) -> RawTransaction {
    RawTransaction {
        signature: signature.to_string(),
        slot: 100,
        block_time: Some(1_700_000_000),
        err: None,
        program_ids: vec![detect::SYSTEM_PROGRAM.to_string()],
        protocol: None,
        account_keys: vec![fee_payer.to_string()],
        memo: None,
        fee: 5_000,
        pre_balances: vec![5_000],
        post_balances: vec![0],
        pre_token_balances: vec![],
        post_token_balances: vec![],
    }
}

/// Scenario: plain native transfer of 1.5 SOL from alpha to beta
pub fn plain_transfer_tx(signature: &str) -> RawTransaction {
    let mut tx = base_tx(signature, WALLET_ALPHA);
    tx.account_keys = vec![WALLET_ALPHA.to_string(), WALLET_BETA.to_string()];
    tx.pre_balances = vec![2_000_005_000, 0];
    tx.post_balances = vec![500_000_000, 1_500_000_000];
    tx
}

/// Scenario: Jupiter swap of 1.0 SOL into 150 USDC
pub fn jupiter_swap_tx(signature: &str) -> RawTransaction {
    let mut tx = base_tx(signature, WALLET_ALPHA);
    tx.program_ids = vec![detect::JUPITER_V6_PROGRAM.to_string()];
    tx.account_keys = vec![
        WALLET_ALPHA.to_string(),
        detect::JUPITER_V6_PROGRAM.to_string(),
    ];
    tx.pre_balances = vec![2_000_005_000, 0];
    tx.post_balances = vec![1_000_000_000, 1_000_000_000];
    tx.post_token_balances = vec![TokenBalance {
        account_index: 2,
        mint: USDC_MINT.to_string(),
        owner: WALLET_ALPHA.to_string(),
        decimals: 6,
        raw_amount: 150_000_000,
    }];
    tx
}

/// Scenario: candy-machine mint of three NFTs for 3.0 SOL
pub fn candy_mint_tx(signature: &str) -> RawTransaction {
    let mut tx = base_tx(signature, WALLET_ALPHA);
    tx.program_ids = vec![detect::CANDY_MACHINE_V3_PROGRAM.to_string()];
    tx.account_keys = vec![WALLET_ALPHA.to_string(), TREASURY.to_string()];
    tx.pre_balances = vec![3_300_005_000, 0];
    tx.post_balances = vec![300_000_000, 3_000_000_000];
    tx.post_token_balances = (0..3)
        .map(|index| TokenBalance {
            account_index: 2 + index,
            mint: format!("NftPiece{}111111111111111111111111111111111", index + 1),
            owner: WALLET_ALPHA.to_string(),
            decimals: 0,
            raw_amount: 1,
        })
        .collect();
    tx
}

/// Scenario: Privacy-Cash shield of 100 USDC
pub fn privacy_shield_tx(signature: &str) -> RawTransaction {
    let mut tx = base_tx(signature, WALLET_ALPHA);
    tx.program_ids = vec![detect::PRIVACY_CASH_PROGRAM.to_string()];
    tx.pre_token_balances = vec![TokenBalance {
        account_index: 1,
        mint: USDC_MINT.to_string(),
        owner: WALLET_ALPHA.to_string(),
        decimals: 6,
        raw_amount: 250_000_000,
    }];
    tx.post_token_balances = vec![TokenBalance {
        account_index: 1,
        mint: USDC_MINT.to_string(),
        owner: WALLET_ALPHA.to_string(),
        decimals: 6,
        raw_amount: 150_000_000,
    }];
    tx
}

/// Scenario: relayer-submitted privacy unshield with no protocol match.
/// The pool pays out 2.5 USDC: 1.728446 to the user, 0.771554 to the
/// relayer's fee recipient.
pub fn relayer_unshield_tx(signature: &str) -> RawTransaction {
    let pool = detect::PRIVACY_CASH_POOL_ACCOUNTS[0];
    let mut tx = base_tx(signature, RELAYER);
    tx.program_ids = vec![detect::SPL_TOKEN_PROGRAM.to_string()];
    tx.account_keys = vec![RELAYER.to_string(), pool.to_string()];
    tx.pre_token_balances = vec![TokenBalance {
        account_index: 1,
        mint: USDC_MINT.to_string(),
        owner: pool.to_string(),
        decimals: 6,
        raw_amount: 10_000_000,
    }];
    tx.post_token_balances = vec![
        TokenBalance {
            account_index: 1,
            mint: USDC_MINT.to_string(),
            owner: pool.to_string(),
            decimals: 6,
            raw_amount: 7_500_000,
        },
        TokenBalance {
            account_index: 2,
            mint: USDC_MINT.to_string(),
            owner: WALLET_GAMMA.to_string(),
            decimals: 6,
            raw_amount: 1_728_446,
        },
        TokenBalance {
            account_index: 3,
            mint: USDC_MINT.to_string(),
            owner: FEE_RECIPIENT.to_string(),
            decimals: 6,
            raw_amount: 771_554,
        },
    ];
    tx
}

/// Scenario: stake reward payout of 0.05 SOL
pub fn stake_reward_tx(signature: &str) -> RawTransaction {
    let mut tx = base_tx(signature, WALLET_ALPHA);
    tx.program_ids = vec![detect::STAKE_PROGRAM.to_string()];
    tx.pre_balances = vec![1_000_005_000];
    tx.post_balances = vec![1_050_000_000];
    tx
}

/// Native dust: a 0.0001 SOL transfer, under the default spam floor
pub fn dust_transfer_tx(signature: &str) -> RawTransaction {
    let mut tx = base_tx(signature, WALLET_ALPHA);
    tx.account_keys = vec![WALLET_ALPHA.to_string(), WALLET_BETA.to_string()];
    tx.pre_balances = vec![100_105_000, 0];
    tx.post_balances = vec![100_000_000, 100_000];
    tx
}

/// A scripted chain source: a newest-first history of transactions plus
/// balances, honouring limit/before/until like the real endpoint
pub struct MockChainSource {
    /// Newest first
    history: Vec<RawTransaction>,
    native_balance: u64,
    token_balances: Vec<TokenAccountBalance>,
    pub signature_calls: AtomicUsize,
    pub transaction_calls: AtomicUsize,
    /// When set, fetch_transactions fails with this error message
    pub fail_transactions: Mutex<Option<String>>,
}

impl MockChainSource {
    pub fn new(history: Vec<RawTransaction>) -> Self {
        Self {
            history,
            native_balance: 0,
            token_balances: Vec::new(),
            signature_calls: AtomicUsize::new(0),
            transaction_calls: AtomicUsize::new(0),
            fail_transactions: Mutex::new(None),
        }
    }

    pub fn with_balances(
        mut self,
        native_balance: u64,
        token_balances: Vec<TokenAccountBalance>,
    ) -> Self {
        self.native_balance = native_balance;
        self.token_balances = token_balances;
        self
    }

    fn by_signature(&self) -> HashMap<&str, &RawTransaction> {
        self.history
            .iter()
            .map(|tx| (tx.signature.as_str(), tx))
            .collect()
    }
}

#[async_trait]
impl SignatureSource for MockChainSource {
    async fn fetch_signatures(
        &self,
        _address: &str,
        limit: usize,
        before: Option<&str>,
        until: Option<&str>,
    ) -> RpcResult<Vec<SignatureInfo>> {
        self.signature_calls.fetch_add(1, Ordering::SeqCst);

        let start = match before {
            Some(cursor) => match self
                .history
                .iter()
                .position(|tx| tx.signature == cursor)
            {
                Some(position) => position + 1,
                None => return Ok(Vec::new()),
            },
            None => 0,
        };

        let mut page = Vec::new();
        for tx in self.history.iter().skip(start) {
            if Some(tx.signature.as_str()) == until {
                break;
            }
            page.push(SignatureInfo {
                signature: tx.signature.clone(),
                slot: tx.slot,
                block_time: tx.block_time,
                err: tx.err.clone(),
                memo: tx.memo.clone(),
            });
            if page.len() >= limit {
                break;
            }
        }
        Ok(page)
    }
}

#[async_trait]
impl TransactionSource for MockChainSource {
    async fn fetch_transactions(
        &self,
        signatures: &[String],
    ) -> RpcResult<Vec<Option<RawTransaction>>> {
        self.transaction_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.fail_transactions.lock().unwrap().clone() {
            return Err(RpcError::Network(message));
        }

        let lookup = self.by_signature();
        Ok(signatures
            .iter()
            .map(|signature| lookup.get(signature.as_str()).map(|tx| (*tx).clone()))
            .collect())
    }
}

#[async_trait]
impl AccountSource for MockChainSource {
    async fn fetch_native_balance(&self, _address: &str) -> RpcResult<u64> {
        Ok(self.native_balance)
    }

    async fn fetch_token_balances(&self, _address: &str) -> RpcResult<Vec<TokenAccountBalance>> {
        Ok(self.token_balances.clone())
    }
}

/// Give each transaction in a history distinct, strictly decreasing
/// timestamps and slots so ordering assertions are meaningful
pub fn stamp_history(history: &mut [RawTransaction]) {
    let newest = 1_700_100_000i64;
    for (index, tx) in history.iter_mut().enumerate() {
        tx.block_time = Some(newest - index as i64 * 60);
        tx.slot = 1_000_000 - index as u64 * 10;
    }
}
