//! Plain transfer classification
//!
//! The lowest-priority real classifier: a sender debit with a matching
//! receiver credit in the same token, both on external accounts. Everything
//! more specific has already had its chance by the time this runs.

use serde_json::json;

use crate::classify::helpers::{find_transfer_pair, short_address};
use crate::classify::Classifier;
use crate::detect::is_known_facilitator;
use crate::types::classification::{Counterparty, PrimaryType, TransactionClassification};
use crate::types::leg::TxLeg;
use crate::types::transaction::RawTransaction;

const CONFIDENCE: f64 = 0.95;

pub struct TransferClassifier;

impl Classifier for TransferClassifier {
    fn name(&self) -> &'static str {
        "transfer"
    }

    fn priority(&self) -> u8 {
        20
    }

    fn classify(
        &self,
        legs: &[TxLeg],
        tx: &RawTransaction,
        _wallet: Option<&str>,
    ) -> Option<TransactionClassification> {
        let (sender_leg, receiver_leg) = find_transfer_pair(legs)?;
        let sender = sender_leg.external_address()?;
        let receiver = receiver_leg.external_address()?;

        let mut classification = TransactionClassification::new(PrimaryType::Transfer, CONFIDENCE)
            .with_primary(sender_leg.amount.clone())
            .with_sender(sender)
            .with_receiver(receiver)
            .with_counterparty(Counterparty::unknown(receiver, &short_address(receiver)));

        if is_known_facilitator(receiver) {
            classification =
                classification.with_metadata("facilitated_by_receiver", json!(receiver));
        }
        if let Some(facilitator) = tx
            .account_keys
            .iter()
            .find(|key| is_known_facilitator(key))
        {
            classification = classification
                .with_metadata("payment_type", json!("facilitated"))
                .with_metadata("facilitator", json!(facilitator));
        }

        Some(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::KNOWN_FACILITATORS;
    use crate::types::account::external_account;
    use crate::types::leg::{LegRole, LegSide};
    use crate::types::token::{MoneyAmount, TokenInfo};

    fn transfer_legs(sender: &str, receiver: &str, lamports: u128) -> Vec<TxLeg> {
        vec![
            TxLeg::new(
                external_account(sender),
                LegSide::Debit,
                LegRole::Sent,
                MoneyAmount::from_raw(TokenInfo::native(), lamports),
            ),
            TxLeg::new(
                external_account(receiver),
                LegSide::Credit,
                LegRole::Received,
                MoneyAmount::from_raw(TokenInfo::native(), lamports),
            ),
        ]
    }

    fn tx_with_keys(keys: Vec<String>) -> RawTransaction {
        RawTransaction {
            signature: "sig".to_string(),
            slot: 1,
            block_time: Some(1_700_000_000),
            err: None,
            program_ids: vec![],
            protocol: None,
            account_keys: keys,
            memo: None,
            fee: 5_000,
            pre_balances: vec![],
            post_balances: vec![],
            pre_token_balances: vec![],
            post_token_balances: vec![],
        }
    }

    #[test]
    fn test_plain_transfer() {
        let legs = transfer_legs("alice", "bob", 1_500_000_000);
        let tx = tx_with_keys(vec!["alice".to_string(), "bob".to_string()]);

        let c = TransferClassifier.classify(&legs, &tx, None).unwrap();
        assert_eq!(c.primary_type, PrimaryType::Transfer);
        assert_eq!(c.confidence, CONFIDENCE);
        assert!((c.primary_amount.unwrap().ui_units - 1.5).abs() < 1e-9);
        assert_eq!(c.sender.as_deref(), Some("alice"));
        assert_eq!(c.receiver.as_deref(), Some("bob"));
        let counterparty = c.counterparty.unwrap();
        assert_eq!(counterparty.name.as_deref(), Some("bob…"));
    }

    #[test]
    fn test_one_sided_movement_is_not_a_transfer() {
        let legs = vec![TxLeg::new(
            external_account("alice"),
            LegSide::Debit,
            LegRole::Sent,
            MoneyAmount::from_raw(TokenInfo::native(), 1_000_000),
        )];
        let tx = tx_with_keys(vec!["alice".to_string()]);
        assert!(TransferClassifier.classify(&legs, &tx, None).is_none());
    }

    #[test]
    fn test_facilitator_annotation() {
        let facilitator = KNOWN_FACILITATORS[0];
        let legs = transfer_legs("alice", "bob", 1_000_000_000);
        let tx = tx_with_keys(vec![
            "alice".to_string(),
            "bob".to_string(),
            facilitator.to_string(),
        ]);

        let c = TransferClassifier.classify(&legs, &tx, None).unwrap();
        assert_eq!(c.metadata.get("payment_type"), Some(&json!("facilitated")));
        assert_eq!(c.metadata.get("facilitator"), Some(&json!(facilitator)));
    }
}
