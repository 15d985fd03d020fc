//! Classification results
//!
//! One transaction receives exactly one classification: a primary type, the
//! amounts that matter for that type, the parties involved and a confidence
//! score. Classifier-specific detail travels in the metadata map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::leg::TxLeg;
use crate::types::token::MoneyAmount;
use crate::types::transaction::RawTransaction;

/// High-level transaction type, one variant per recognised activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryType {
    Transfer,
    Payment,
    Swap,
    NftMint,
    StakeDeposit,
    StakeWithdraw,
    Reward,
    Airdrop,
    LiquidityAdd,
    LiquidityRemove,
    TokenDeposit,
    TokenWithdraw,
    BridgeIn,
    BridgeOut,
    PrivacyDeposit,
    PrivacyWithdraw,
    FeeOnly,
    Unclassified,
}

/// What kind of entity sits on the other side of the movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterpartyKind {
    Wallet,
    Protocol,
    Merchant,
    Unknown,
}

/// The other party of a classified movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counterparty {
    pub kind: CounterpartyKind,
    pub address: Option<String>,
    pub name: Option<String>,
}

impl Counterparty {
    pub fn unknown(address: &str, name: &str) -> Self {
        Self {
            kind: CounterpartyKind::Unknown,
            address: Some(address.to_string()),
            name: Some(name.to_string()),
        }
    }

    pub fn protocol(name: &str) -> Self {
        Self {
            kind: CounterpartyKind::Protocol,
            address: None,
            name: Some(name.to_string()),
        }
    }

    pub fn merchant(name: &str, address: Option<String>) -> Self {
        Self {
            kind: CounterpartyKind::Merchant,
            address,
            name: Some(name.to_string()),
        }
    }
}

/// The single classification attached to a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionClassification {
    pub primary_type: PrimaryType,
    pub primary_amount: Option<MoneyAmount>,
    pub secondary_amount: Option<MoneyAmount>,
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub counterparty: Option<Counterparty>,
    /// Classifier confidence in [0, 1]
    pub confidence: f64,
    /// False for activity a feed should hide by default (fee-only, unclassified)
    pub is_relevant: bool,
    /// Classifier-specific annotations, deterministic iteration order
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl TransactionClassification {
    /// Start a classification of the given type; amounts and parties are
    /// filled in by the classifier
    pub fn new(primary_type: PrimaryType, confidence: f64) -> Self {
        Self {
            primary_type,
            primary_amount: None,
            secondary_amount: None,
            sender: None,
            receiver: None,
            counterparty: None,
            confidence,
            is_relevant: true,
            metadata: BTreeMap::new(),
        }
    }

    /// The fallback when no classifier matched
    pub fn unclassified() -> Self {
        Self {
            primary_type: PrimaryType::Unclassified,
            primary_amount: None,
            secondary_amount: None,
            sender: None,
            receiver: None,
            counterparty: None,
            confidence: 0.0,
            is_relevant: false,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_primary(mut self, amount: MoneyAmount) -> Self {
        self.primary_amount = Some(amount);
        self
    }

    pub fn with_secondary(mut self, amount: MoneyAmount) -> Self {
        self.secondary_amount = Some(amount);
        self
    }

    pub fn with_sender(mut self, address: &str) -> Self {
        self.sender = Some(address.to_string());
        self
    }

    pub fn with_receiver(mut self, address: &str) -> Self {
        self.receiver = Some(address.to_string());
        self
    }

    pub fn with_counterparty(mut self, counterparty: Counterparty) -> Self {
        self.counterparty = Some(counterparty);
        self
    }

    pub fn with_relevance(mut self, is_relevant: bool) -> Self {
        self.is_relevant = is_relevant;
        self
    }

    pub fn with_metadata(mut self, key: &str, value: serde_json::Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }
}

/// The engine's per-transaction output: raw record, normalised legs and the
/// classification. Immutable once produced, cheap to clone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedTransaction {
    pub tx: RawTransaction,
    pub legs: Vec<TxLeg>,
    pub classification: TransactionClassification,
    /// Diagnostic: false when the per-token double-entry check failed.
    /// The transaction is still returned; callers may surface the flag.
    pub balanced: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::token::TokenInfo;

    #[test]
    fn test_unclassified_defaults() {
        let c = TransactionClassification::unclassified();
        assert_eq!(c.primary_type, PrimaryType::Unclassified);
        assert_eq!(c.confidence, 0.0);
        assert!(!c.is_relevant);
        assert!(c.primary_amount.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let amount = MoneyAmount::from_raw(TokenInfo::native(), 1_500_000_000);
        let c = TransactionClassification::new(PrimaryType::Transfer, 0.95)
            .with_primary(amount)
            .with_sender("alice")
            .with_receiver("bob")
            .with_metadata("payment_type", serde_json::json!("facilitated"));

        assert_eq!(c.primary_type, PrimaryType::Transfer);
        assert_eq!(c.sender.as_deref(), Some("alice"));
        assert_eq!(c.receiver.as_deref(), Some("bob"));
        assert_eq!(
            c.metadata.get("payment_type"),
            Some(&serde_json::json!("facilitated"))
        );
        assert!(c.is_relevant);
    }

    #[test]
    fn test_primary_type_serialises_snake_case() {
        let json = serde_json::to_string(&PrimaryType::PrivacyWithdraw).unwrap();
        assert_eq!(json, "\"privacy_withdraw\"");
        let json = serde_json::to_string(&PrimaryType::NftMint).unwrap();
        assert_eq!(json, "\"nft_mint\"");
    }
}
