//! The per-transaction classification pipeline
//!
//! Raw transaction in, classified transaction out: detect the protocol,
//! resolve token metadata for every mint the transaction touches, build the
//! double-entry legs, dispatch the classifier registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::classify::ClassificationEngine;
use crate::detect::detect_protocol;
use crate::ledger::LegBuilder;
use crate::metadata::TokenMetadataFetcher;
use crate::registry::TokenRegistry;
use crate::types::classification::ClassifiedTransaction;
use crate::types::token::{TokenInfo, NATIVE_DECIMALS, NATIVE_MINT};
use crate::types::transaction::RawTransaction;

pub struct Pipeline {
    builder: LegBuilder,
    engine: ClassificationEngine,
    metadata: Arc<TokenMetadataFetcher>,
}

impl Pipeline {
    pub fn new(registry: TokenRegistry, metadata: Arc<TokenMetadataFetcher>) -> Self {
        Self {
            builder: LegBuilder::new(registry),
            engine: ClassificationEngine::new(),
            metadata,
        }
    }

    /// Run one transaction through the whole pipeline.
    ///
    /// `wallet` is the perspective the caller asked about; classifiers that
    /// support a viewpoint (swap) use it.
    pub async fn classify_transaction(
        &self,
        mut tx: RawTransaction,
        wallet: Option<&str>,
    ) -> ClassifiedTransaction {
        if tx.protocol.is_none() {
            tx.protocol = detect_protocol(&tx.program_ids);
        }

        let resolved = self.resolve_transaction_tokens(&tx).await;
        let built = self.builder.build_with_metadata(&tx, &resolved);
        let classification = self.engine.classify(&built.legs, &tx, wallet);

        ClassifiedTransaction {
            tx,
            legs: built.legs,
            classification,
            balanced: built.balanced,
        }
    }

    /// Metadata for every mint the transaction touches, native included
    async fn resolve_transaction_tokens(
        &self,
        tx: &RawTransaction,
    ) -> HashMap<String, TokenInfo> {
        let mut mints: Vec<(String, u8)> = vec![(NATIVE_MINT.to_string(), NATIVE_DECIMALS)];
        for balance in tx
            .pre_token_balances
            .iter()
            .chain(tx.post_token_balances.iter())
        {
            mints.push((balance.mint.clone(), balance.decimals));
        }
        self.metadata.resolve_many(&mints).await
    }
}
