//! Swap classification
//!
//! A swap is a debit and a credit in *different* tokens on the same user's
//! external account. Pairing maximises `max(out.ui, in.ui)` so fee dust never
//! becomes the primary leg. Refuses to classify when only one side exists or
//! the symbols match: one-sided flows are not swaps, and the engine does not
//! guess.

use serde_json::json;

use crate::classify::helpers::{compare_ui, initiator, is_user_credit_role, is_user_debit_role};
use crate::classify::Classifier;
use crate::types::account::external_account;
use crate::types::classification::{Counterparty, PrimaryType, TransactionClassification};
use crate::types::leg::TxLeg;
use crate::types::transaction::RawTransaction;

const CONFIDENCE_KNOWN_DEX: f64 = 0.95;
const CONFIDENCE_UNKNOWN_ROUTER: f64 = 0.75;

pub struct SwapClassifier;

impl Classifier for SwapClassifier {
    fn name(&self) -> &'static str {
        "swap"
    }

    fn priority(&self) -> u8 {
        80
    }

    fn classify(
        &self,
        legs: &[TxLeg],
        tx: &RawTransaction,
        wallet: Option<&str>,
    ) -> Option<TransactionClassification> {
        // Default perspective is the initiator; a supplied wallet address
        // wins when a pair exists from its point of view
        let (perspective, pair) = match wallet.and_then(|w| swap_pair_for(legs, w).map(|p| (w, p)))
        {
            Some((w, pair)) => (w, pair),
            None => {
                let init = initiator(tx)?;
                (init, swap_pair_for(legs, init)?)
            }
        };
        let (out_leg, in_leg) = pair;

        let confidence = if tx.protocol.as_ref().is_some_and(|p| p.is_dex()) {
            CONFIDENCE_KNOWN_DEX
        } else {
            CONFIDENCE_UNKNOWN_ROUTER
        };

        let mut classification = TransactionClassification::new(PrimaryType::Swap, confidence)
            .with_primary(out_leg.amount.clone())
            .with_secondary(in_leg.amount.clone())
            .with_sender(perspective)
            .with_receiver(perspective)
            .with_metadata("from_token", json!(out_leg.amount.token.symbol))
            .with_metadata("from_amount", json!(out_leg.amount.ui_units))
            .with_metadata("to_token", json!(in_leg.amount.token.symbol))
            .with_metadata("to_amount", json!(in_leg.amount.ui_units));

        if let Some(protocol) = &tx.protocol {
            classification =
                classification.with_counterparty(Counterparty::protocol(&protocol.name));
        }

        Some(classification)
    }
}

/// Best (out, in) pair for one address: different token symbols, maximising
/// the larger of the two ui amounts
fn swap_pair_for<'a>(legs: &'a [TxLeg], address: &str) -> Option<(&'a TxLeg, &'a TxLeg)> {
    let account_id = external_account(address);

    let debits: Vec<&TxLeg> = legs
        .iter()
        .filter(|leg| {
            leg.account_id == account_id && leg.is_debit() && is_user_debit_role(leg.role)
        })
        .collect();
    let credits: Vec<&TxLeg> = legs
        .iter()
        .filter(|leg| {
            leg.account_id == account_id && leg.is_credit() && is_user_credit_role(leg.role)
        })
        .collect();

    let mut best: Option<(&TxLeg, &TxLeg)> = None;
    let mut best_magnitude = f64::NEG_INFINITY;

    for &out_leg in &debits {
        for &in_leg in &credits {
            if out_leg.amount.token.symbol == in_leg.amount.token.symbol {
                continue;
            }
            let magnitude = out_leg.amount.ui_units.max(in_leg.amount.ui_units);
            if compare_ui(magnitude, best_magnitude).is_gt() {
                best_magnitude = magnitude;
                best = Some((out_leg, in_leg));
            }
        }
    }

    best
}
