//! Solana-Pay payment classification
//!
//! Fires only when the transaction references the memo program and actually
//! carries a memo. A JSON memo with a `merchant` key promotes the
//! counterparty to a merchant and surfaces the payment fields; any other
//! memo is preserved raw. The movement itself is paired exactly like a
//! transfer.

use serde_json::{json, Value};

use crate::classify::helpers::{find_transfer_pair, short_address};
use crate::classify::Classifier;
use crate::detect::{MEMO_PROGRAM, MEMO_V1_PROGRAM};
use crate::types::classification::{Counterparty, PrimaryType, TransactionClassification};
use crate::types::leg::TxLeg;
use crate::types::transaction::RawTransaction;

const CONFIDENCE: f64 = 0.98;

/// Memo fields surfaced into classification metadata
const PAYMENT_FIELDS: &[&str] = &["merchant", "item", "reference", "label", "message"];

pub struct SolanaPayClassifier;

impl Classifier for SolanaPayClassifier {
    fn name(&self) -> &'static str {
        "solana-pay"
    }

    fn priority(&self) -> u8 {
        95
    }

    fn classify(
        &self,
        legs: &[TxLeg],
        tx: &RawTransaction,
        _wallet: Option<&str>,
    ) -> Option<TransactionClassification> {
        let references_memo_program =
            tx.invokes_program(MEMO_PROGRAM) || tx.invokes_program(MEMO_V1_PROGRAM);
        if !references_memo_program {
            return None;
        }
        let memo = tx.memo.as_deref()?;

        let (sender_leg, receiver_leg) = find_transfer_pair(legs)?;
        let sender = sender_leg.external_address()?;
        let receiver = receiver_leg.external_address()?;

        let mut classification = TransactionClassification::new(PrimaryType::Payment, CONFIDENCE)
            .with_primary(sender_leg.amount.clone())
            .with_sender(sender)
            .with_receiver(receiver);

        match parse_merchant_memo(memo) {
            Some(fields) => {
                let merchant_name = fields
                    .get("merchant")
                    .and_then(Value::as_str)
                    .unwrap_or(receiver);
                classification = classification.with_counterparty(Counterparty::merchant(
                    merchant_name,
                    Some(receiver.to_string()),
                ));
                for key in PAYMENT_FIELDS {
                    if let Some(value) = fields.get(*key) {
                        classification = classification.with_metadata(key, value.clone());
                    }
                }
            }
            None => {
                classification = classification
                    .with_counterparty(Counterparty::unknown(receiver, &short_address(receiver)))
                    .with_metadata("memo", json!(memo));
            }
        }

        Some(classification)
    }
}

/// A memo counts as a merchant payload only when it is a JSON object with a
/// `merchant` key
fn parse_merchant_memo(memo: &str) -> Option<serde_json::Map<String, Value>> {
    let value: Value = serde_json::from_str(memo).ok()?;
    let object = value.as_object()?;
    if object.contains_key("merchant") {
        Some(object.clone())
    } else {
        None
    }
}
