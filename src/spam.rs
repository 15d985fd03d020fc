//! Spam and dust filtering
//!
//! A classified transaction is spam when it failed on-chain (unless the
//! caller opted in to failures), when classification confidence is too low,
//! when the classifier marked it irrelevant, or when its primary amount
//! falls under the dust floor for its token class. Thresholds are
//! configurable; the defaults suit a wallet activity feed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::classification::ClassifiedTransaction;
use crate::types::token::MoneyAmount;

/// Symbols treated as stablecoins for the dust floor
pub const STABLECOIN_SYMBOLS: &[&str] = &["USDC", "USDT"];

/// Spam-filter thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpamConfig {
    /// Dust floor for the native token, in ui units
    pub native_dust_floor: f64,
    /// Dust floor for stablecoins, in ui units
    pub stable_dust_floor: f64,
    /// Minimum classification confidence
    pub confidence_floor: f64,
    /// Keep transactions that failed on-chain
    pub allow_failed: bool,
}

impl Default for SpamConfig {
    fn default() -> Self {
        Self {
            native_dust_floor: 0.001,
            stable_dust_floor: 0.01,
            confidence_floor: 0.5,
            allow_failed: false,
        }
    }
}

/// Predicate plus batch filter over classified transactions
#[derive(Debug, Clone, Default)]
pub struct SpamFilter {
    config: SpamConfig,
}

impl SpamFilter {
    pub fn new(config: SpamConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SpamConfig {
        &self.config
    }

    /// Whether one classified transaction should be hidden
    pub fn is_spam(&self, classified: &ClassifiedTransaction) -> bool {
        if classified.tx.is_failed() && !self.config.allow_failed {
            return true;
        }
        if classified.classification.confidence < self.config.confidence_floor {
            return true;
        }
        if !classified.classification.is_relevant {
            return true;
        }
        if let Some(amount) = &classified.classification.primary_amount {
            if self.is_dust(amount) {
                return true;
            }
        }
        false
    }

    /// Keep the non-spam subset, preserving input order. Idempotent:
    /// filtering an already-filtered batch changes nothing.
    pub fn filter_batch(&self, batch: Vec<ClassifiedTransaction>) -> Vec<ClassifiedTransaction> {
        let before = batch.len();
        let kept: Vec<ClassifiedTransaction> = batch
            .into_iter()
            .filter(|classified| !self.is_spam(classified))
            .collect();
        if kept.len() < before {
            debug!("Spam filter dropped {} of {} transactions", before - kept.len(), before);
        }
        kept
    }

    fn is_dust(&self, amount: &MoneyAmount) -> bool {
        let floor = if amount.token.is_native() {
            self.config.native_dust_floor
        } else if STABLECOIN_SYMBOLS.contains(&amount.token.symbol.as_str()) {
            self.config.stable_dust_floor
        } else {
            // No floor for arbitrary tokens: an unknown token's unit value
            // is unknowable, and the engine does not guess
            return false;
        };
        amount.ui_units.abs() < floor
    }
}
