//! Transaction classification
//!
//! An ordered registry of classifiers, each a pure decision function over
//! (legs, raw transaction, optional wallet perspective). Dispatch walks the
//! registry in descending priority; the first classifier to return a result
//! wins. A transaction no classifier claims becomes `unclassified` with
//! confidence zero.
//!
//! The registry is immutable after construction; adding a classifier is a
//! compile-time decision.

pub mod airdrop;
pub mod bridge;
pub mod fee_only;
pub mod helpers;
pub mod lending;
pub mod liquidity;
pub mod nft_mint;
pub mod privacy;
pub mod reward;
pub mod solana_pay;
pub mod stake;
pub mod swap;
pub mod transfer;

use tracing::debug;

use crate::types::classification::TransactionClassification;
use crate::types::leg::TxLeg;
use crate::types::transaction::RawTransaction;

/// One entry of the classifier registry.
///
/// Classifiers are pure: they never mutate their inputs and never fail.
/// Malformed input reads as "no match".
pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;

    /// Dispatch priority; higher runs first. Ties are broken by
    /// registration order.
    fn priority(&self) -> u8;

    fn classify(
        &self,
        legs: &[TxLeg],
        tx: &RawTransaction,
        wallet: Option<&str>,
    ) -> Option<TransactionClassification>;
}

/// The default registry, in registration order. The duplicate priority 82
/// (stake-deposit, then liquidity) is deliberate: the two only fire under
/// mutually exclusive protocol categories.
pub fn default_classifiers() -> Vec<Box<dyn Classifier>> {
    vec![
        Box::new(solana_pay::SolanaPayClassifier),     // 95
        Box::new(bridge::BridgeClassifier),            // 88
        Box::new(privacy::PrivacyCashClassifier),      // 86
        Box::new(nft_mint::NftMintClassifier),         // 85
        Box::new(lending::LendingClassifier),          // 83
        Box::new(stake::StakeDepositClassifier),       // 82
        Box::new(liquidity::LiquidityClassifier),      // 82
        Box::new(stake::StakeWithdrawClassifier),      // 81
        Box::new(swap::SwapClassifier),                // 80
        Box::new(reward::RewardClassifier),            // 71
        Box::new(airdrop::AirdropClassifier),          // 70
        Box::new(fee_only::FeeOnlyClassifier),         // 60
        Box::new(transfer::TransferClassifier),        // 20
    ]
}

/// Priority-ordered classifier dispatch
pub struct ClassificationEngine {
    classifiers: Vec<Box<dyn Classifier>>,
}

impl Default for ClassificationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassificationEngine {
    /// Engine over the default registry
    pub fn new() -> Self {
        Self::with_classifiers(default_classifiers())
    }

    /// Engine over a caller-supplied registry
    pub fn with_classifiers(mut classifiers: Vec<Box<dyn Classifier>>) -> Self {
        // Stable sort: equal priorities keep their registration order
        classifiers.sort_by(|a, b| b.priority().cmp(&a.priority()));
        Self { classifiers }
    }

    /// Classify one transaction. Exactly one classification comes back;
    /// when nothing matches it is `unclassified` with confidence zero.
    pub fn classify(
        &self,
        legs: &[TxLeg],
        tx: &RawTransaction,
        wallet: Option<&str>,
    ) -> TransactionClassification {
        for classifier in &self.classifiers {
            if let Some(classification) = classifier.classify(legs, tx, wallet) {
                debug!(
                    "{} classified {} as {:?} (confidence {:.2})",
                    classifier.name(),
                    tx.signature,
                    classification.primary_type,
                    classification.confidence
                );
                return classification;
            }
        }

        debug!("No classifier matched {}", tx.signature);
        TransactionClassification::unclassified()
    }

    /// Registered classifier names in dispatch order
    pub fn classifier_names(&self) -> Vec<&'static str> {
        self.classifiers.iter().map(|c| c.name()).collect()
    }
}
