//! Cross-chain bridge classification
//!
//! Under a bridge protocol: user debits only means funds left for another
//! chain, user credits only means funds arrived from one. When both sides
//! are present (relayer refunds, dust change) the inbound reading wins.

use serde_json::json;

use crate::classify::helpers::{external_user_credits, external_user_debits, largest};
use crate::classify::Classifier;
use crate::types::classification::{Counterparty, PrimaryType, TransactionClassification};
use crate::types::leg::TxLeg;
use crate::types::transaction::RawTransaction;

const CONFIDENCE: f64 = 0.9;

pub struct BridgeClassifier;

impl Classifier for BridgeClassifier {
    fn name(&self) -> &'static str {
        "bridge"
    }

    fn priority(&self) -> u8 {
        88
    }

    fn classify(
        &self,
        legs: &[TxLeg],
        tx: &RawTransaction,
        _wallet: Option<&str>,
    ) -> Option<TransactionClassification> {
        let protocol = tx.protocol.as_ref().filter(|p| p.is_bridge())?;

        let debits = external_user_debits(legs);
        let credits = external_user_credits(legs);

        // Inbound takes precedence when both sides are present
        let (primary_type, primary_leg) = if !credits.is_empty() {
            (PrimaryType::BridgeIn, largest(&credits)?)
        } else if !debits.is_empty() {
            (PrimaryType::BridgeOut, largest(&debits)?)
        } else {
            return None;
        };
        let user = primary_leg.external_address()?;

        let mut classification = TransactionClassification::new(primary_type, CONFIDENCE)
            .with_primary(primary_leg.amount.clone())
            .with_counterparty(Counterparty::protocol(&protocol.name))
            .with_metadata("bridge", json!(protocol.id));

        classification = match primary_type {
            PrimaryType::BridgeIn => classification.with_receiver(user),
            _ => classification.with_sender(user),
        };

        Some(classification)
    }
}
