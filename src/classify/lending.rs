//! Lending deposit and withdraw classification
//!
//! Under a lending protocol the direction is read off the initiator's legs:
//! only debits is a deposit, only credits is a withdraw, and a mixed
//! transaction goes with the side carrying the larger summed ui amount.
//! Non-native tokens are preferred for the primary leg; wrapped or native
//! movements alongside are usually rent and noise.

use serde_json::json;

use crate::classify::helpers::{
    compare_ui, initiator, is_user_credit_role, is_user_debit_role, sum_ui,
};
use crate::classify::Classifier;
use crate::types::account::external_account;
use crate::types::classification::{Counterparty, PrimaryType, TransactionClassification};
use crate::types::leg::TxLeg;
use crate::types::transaction::RawTransaction;

const CONFIDENCE: f64 = 0.9;

pub struct LendingClassifier;

impl Classifier for LendingClassifier {
    fn name(&self) -> &'static str {
        "lending"
    }

    fn priority(&self) -> u8 {
        83
    }

    fn classify(
        &self,
        legs: &[TxLeg],
        tx: &RawTransaction,
        _wallet: Option<&str>,
    ) -> Option<TransactionClassification> {
        let protocol = tx.protocol.as_ref().filter(|p| p.is_lending())?;
        let user = initiator(tx)?;
        let account_id = external_account(user);

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

        let (primary_type, side_legs) = match (debits.is_empty(), credits.is_empty()) {
            (false, true) => (PrimaryType::TokenDeposit, &debits),
            (true, false) => (PrimaryType::TokenWithdraw, &credits),
            (false, false) => {
                if compare_ui(sum_ui(&debits), sum_ui(&credits)).is_gt() {
                    (PrimaryType::TokenDeposit, &debits)
                } else {
                    (PrimaryType::TokenWithdraw, &credits)
                }
            }
            (true, true) => return None,
        };

        let primary_leg = pick_primary(side_legs)?;

        let mut classification = TransactionClassification::new(primary_type, CONFIDENCE)
            .with_primary(primary_leg.amount.clone())
            .with_counterparty(Counterparty::protocol(&protocol.name))
            .with_metadata("protocol", json!(protocol.id));

        classification = match primary_type {
            PrimaryType::TokenDeposit => classification.with_sender(user),
            _ => classification.with_receiver(user),
        };

        Some(classification)
    }
}

/// Largest non-native leg when one exists, else the largest leg outright
fn pick_primary<'a>(legs: &[&'a TxLeg]) -> Option<&'a TxLeg> {
    let non_native: Vec<&TxLeg> = legs
        .iter()
        .copied()
        .filter(|leg| !leg.amount.token.is_native())
        .collect();
    let pool = if non_native.is_empty() {
        legs
    } else {
        &non_native[..]
    };
    pool.iter()
        .copied()
        .max_by(|a, b| compare_ui(a.amount.ui_units, b.amount.ui_units))
}
