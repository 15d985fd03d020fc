//! Privacy-pool shield and unshield classification
//!
//! Fires on a privacy protocol match, or on any leg touching a known
//! Privacy-Cash pool account. The second trigger matters: relayer-submitted
//! unshields are signed by the relayer, invoke no recognisable program from
//! the user's side and would otherwise read as plain transfers.
//!
//! Pool accounts are excluded from the user-side legs, so a pool debit with
//! a user credit reads as a withdrawal to the user rather than a transfer
//! between the two.

use serde_json::json;

use crate::classify::helpers::{compare_ui, largest, sum_ui};
use crate::classify::Classifier;
use crate::detect::is_privacy_pool_account;
use crate::types::account::{parse_account_id, ParsedAccountId};
use crate::types::classification::{PrimaryType, TransactionClassification};
use crate::types::leg::{LegRole, TxLeg};
use crate::types::transaction::RawTransaction;

const CONFIDENCE_KNOWN_TOKEN: f64 = 0.95;
const CONFIDENCE_UNKNOWN_TOKEN: f64 = 0.85;

pub struct PrivacyCashClassifier;

impl Classifier for PrivacyCashClassifier {
    fn name(&self) -> &'static str {
        "privacy-cash"
    }

    fn priority(&self) -> u8 {
        86
    }

    fn classify(
        &self,
        legs: &[TxLeg],
        tx: &RawTransaction,
        _wallet: Option<&str>,
    ) -> Option<TransactionClassification> {
        let protocol_matched = tx.protocol.as_ref().is_some_and(|p| p.is_privacy());
        let pool_legs: Vec<&TxLeg> = legs.iter().filter(|leg| is_pool_leg(leg)).collect();

        if !protocol_matched && pool_legs.is_empty() {
            return None;
        }

        let user_debits: Vec<&TxLeg> = legs
            .iter()
            .filter(|leg| {
                leg.is_external()
                    && leg.is_debit()
                    && leg.role != LegRole::Fee
                    && !is_pool_leg(leg)
            })
            .collect();
        let user_credits: Vec<&TxLeg> = legs
            .iter()
            .filter(|leg| {
                leg.is_external()
                    && leg.is_credit()
                    && leg.role != LegRole::Fee
                    && !is_pool_leg(leg)
            })
            .collect();

        let pool_debit_present = pool_legs.iter().any(|leg| leg.is_debit());

        let (primary_type, primary_leg) = if pool_debit_present && !user_credits.is_empty() {
            // Funds left the pool towards users: an unshield, relayed or not
            (PrimaryType::PrivacyWithdraw, largest(&user_credits)?)
        } else {
            match (user_debits.is_empty(), user_credits.is_empty()) {
                (false, true) => (PrimaryType::PrivacyDeposit, largest(&user_debits)?),
                (true, false) => (PrimaryType::PrivacyWithdraw, largest(&user_credits)?),
                (false, false) => {
                    if compare_ui(sum_ui(&user_debits), sum_ui(&user_credits)).is_gt() {
                        (PrimaryType::PrivacyDeposit, largest(&user_debits)?)
                    } else {
                        (PrimaryType::PrivacyWithdraw, largest(&user_credits)?)
                    }
                }
                (true, true) => return None,
            }
        };

        let user = primary_leg.external_address()?;
        let token = &primary_leg.amount.token;

        let confidence = if token.is_placeholder() {
            CONFIDENCE_UNKNOWN_TOKEN
        } else {
            CONFIDENCE_KNOWN_TOKEN
        };
        let operation = match primary_type {
            PrimaryType::PrivacyDeposit => "shield",
            _ => "unshield",
        };
        let token_type = if token.is_native() { "SOL" } else { "SPL" };

        let mut classification = TransactionClassification::new(primary_type, confidence)
            .with_primary(primary_leg.amount.clone())
            .with_metadata("privacy_operation", json!(operation))
            .with_metadata("token_type", json!(token_type));

        classification = match primary_type {
            PrimaryType::PrivacyDeposit => classification.with_sender(user),
            _ => classification.with_receiver(user),
        };

        Some(classification)
    }
}

/// A leg sits on a pool account when its address (external or
/// protocol-qualified) is in the known pool list, or when it was rewritten
/// onto the privacy protocol's own account
fn is_pool_leg(leg: &TxLeg) -> bool {
    match parse_account_id(&leg.account_id) {
        ParsedAccountId::External { address } => is_privacy_pool_account(&address),
        ParsedAccountId::Protocol {
            protocol_id,
            address,
            ..
        } => protocol_id == "privacy-cash" || is_privacy_pool_account(&address),
        _ => false,
    }
}
