//! The indexer facade
//!
//! Top-level entry point tying the layers together: a chain source (owned
//! RPC client or caller-supplied), the token registry and metadata fetcher,
//! the leg builder and classifier registry, and the spam filter defaults.
//! All caller input is validated here; the layers below assume well-formed
//! addresses and signatures.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::IndexerConfig;
use crate::errors::{IndexerError, IndexerResult};
use crate::fetch::{self, FetchOptions, Pipeline};
use crate::metadata::TokenMetadataFetcher;
use crate::registry::TokenRegistry;
use crate::rpc::{ChainSource, SolanaRpcClient};
use crate::spam::SpamConfig;
use crate::types::classification::ClassifiedTransaction;
use crate::types::token::{ui_amount, TokenInfo, NATIVE_DECIMALS};
use crate::types::transaction::RawTransaction;
use crate::utils::amount::format_lamports_as_sol;

/// An amount in both raw and ui form, as returned by balance queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceAmount {
    pub raw_units: String,
    pub ui_units: f64,
}

impl BalanceAmount {
    fn from_raw(raw: u128, decimals: u8) -> Self {
        Self {
            raw_units: raw.to_string(),
            ui_units: ui_amount(raw, decimals),
        }
    }
}

/// One token position in a wallet balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTokenBalance {
    pub mint: String,
    pub symbol: String,
    pub decimals: u8,
    pub amount: BalanceAmount,
}

/// A wallet's native and token balances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub native: BalanceAmount,
    pub tokens: Vec<WalletTokenBalance>,
}

/// The chain indexer: fetches, normalises and classifies wallet activity
pub struct Indexer {
    source: Arc<dyn ChainSource>,
    pipeline: Pipeline,
    metadata: Arc<TokenMetadataFetcher>,
    spam_defaults: SpamConfig,
}

impl Indexer {
    /// Construct with an owned RPC client built from the configuration
    pub fn new(config: IndexerConfig) -> IndexerResult<Self> {
        let client = SolanaRpcClient::new(config.rpc.clone())?;
        Ok(Self::with_source(Arc::new(client), config))
    }

    /// Construct over a caller-supplied chain source (connection sharing,
    /// test doubles)
    pub fn with_source(source: Arc<dyn ChainSource>, config: IndexerConfig) -> Self {
        let registry =
            TokenRegistry::with_overrides(config.network, config.token_overrides.clone());
        let metadata = Arc::new(TokenMetadataFetcher::new(
            registry.clone(),
            config.metadata.clone(),
        ));
        let pipeline = Pipeline::new(registry, Arc::clone(&metadata));

        Self {
            source,
            pipeline,
            metadata,
            spam_defaults: config.spam,
        }
    }

    /// Current native and token balances for a wallet. `mints` narrows the
    /// token list when supplied.
    pub async fn get_balance(
        &self,
        wallet: &str,
        mints: Option<&[String]>,
    ) -> IndexerResult<WalletBalance> {
        validate_wallet_address(wallet)?;

        let native_raw = self.source.fetch_native_balance(wallet).await?;
        debug!(
            "Native balance for {}: {}",
            wallet,
            format_lamports_as_sol(native_raw)
        );

        let mut token_accounts = self.source.fetch_token_balances(wallet).await?;
        if let Some(mints) = mints {
            token_accounts.retain(|account| mints.contains(&account.mint));
        }

        let wanted: Vec<(String, u8)> = token_accounts
            .iter()
            .map(|account| (account.mint.clone(), account.decimals))
            .collect();
        let resolved: HashMap<String, TokenInfo> = self.metadata.resolve_many(&wanted).await;

        let tokens = token_accounts
            .into_iter()
            .map(|account| {
                let symbol = resolved
                    .get(&account.mint)
                    .map(|info| info.symbol.clone())
                    .unwrap_or_else(|| TokenInfo::placeholder(&account.mint, account.decimals).symbol);
                WalletTokenBalance {
                    symbol,
                    amount: BalanceAmount::from_raw(account.raw_amount, account.decimals),
                    mint: account.mint,
                    decimals: account.decimals,
                }
            })
            .collect();

        Ok(WalletBalance {
            native: BalanceAmount::from_raw(native_raw as u128, NATIVE_DECIMALS),
            tokens,
        })
    }

    /// Classified transactions for a wallet, newest first, per the
    /// accumulation contract
    pub async fn get_transactions(
        &self,
        wallet: &str,
        mut options: FetchOptions,
    ) -> IndexerResult<Vec<ClassifiedTransaction>> {
        validate_wallet_address(wallet)?;
        if let Some(before) = &options.before {
            validate_signature(before)
                .map_err(|_| IndexerError::InvalidInput(format!("malformed cursor: {}", before)))?;
        }
        if let Some(until) = &options.until {
            validate_signature(until)
                .map_err(|_| IndexerError::InvalidInput(format!("malformed cursor: {}", until)))?;
        }

        if options.spam_config.is_none() {
            options.spam_config = Some(self.spam_defaults.clone());
        }

        fetch::fetch_classified(self.source.as_ref(), &self.pipeline, wallet, &options).await
    }

    /// One classified transaction, from the given wallet's viewpoint
    pub async fn get_transaction(
        &self,
        signature: &str,
        wallet: &str,
    ) -> IndexerResult<Option<ClassifiedTransaction>> {
        validate_signature(signature)?;
        validate_wallet_address(wallet)?;

        let transactions = self
            .source
            .fetch_transactions(&[signature.to_string()])
            .await?;
        let Some(raw) = transactions.into_iter().next().flatten() else {
            return Ok(None);
        };

        Ok(Some(
            self.pipeline.classify_transaction(raw, Some(wallet)).await,
        ))
    }

    /// One raw transaction, undecorated
    pub async fn get_raw_transaction(
        &self,
        signature: &str,
    ) -> IndexerResult<Option<RawTransaction>> {
        validate_signature(signature)?;

        let transactions = self
            .source
            .fetch_transactions(&[signature.to_string()])
            .await?;
        Ok(transactions.into_iter().next().flatten())
    }
}

/// A wallet address must be the base58 form of a 32-byte public key
pub fn validate_wallet_address(address: &str) -> IndexerResult<()> {
    let decoded = bs58::decode(address)
        .into_vec()
        .map_err(|_| IndexerError::InvalidInput(format!("malformed wallet address: {}", address)))?;
    if decoded.len() != 32 {
        return Err(IndexerError::InvalidInput(format!(
            "wallet address must decode to 32 bytes, got {}: {}",
            decoded.len(),
            address
        )));
    }
    Ok(())
}

/// A transaction signature must be the base58 form of a 64-byte signature
pub fn validate_signature(signature: &str) -> IndexerResult<()> {
    let decoded = bs58::decode(signature)
        .into_vec()
        .map_err(|_| IndexerError::InvalidInput(format!("malformed signature: {}", signature)))?;
    if decoded.len() != 64 {
        return Err(IndexerError::InvalidInput(format!(
            "signature must decode to 64 bytes, got {}: {}",
            decoded.len(),
            signature
        )));
    }
    Ok(())
}
