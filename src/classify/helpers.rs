//! Shared leg-selection helpers for classifiers

use std::cmp::Ordering;

use crate::types::leg::{LegRole, TxLeg};
use crate::types::transaction::RawTransaction;

/// The initiator: the transaction's fee payer at account-keys position 0
pub fn initiator(tx: &RawTransaction) -> Option<&str> {
    tx.fee_payer()
}

/// First 8 characters of an address, ellipsised, for display names
pub fn short_address(address: &str) -> String {
    let head: String = address.chars().take(8).collect();
    format!("{}…", head)
}

/// Roles a user-side debit can carry
pub fn is_user_debit_role(role: LegRole) -> bool {
    matches!(role, LegRole::Sent | LegRole::ProtocolDeposit)
}

/// Roles a user-side credit can carry
pub fn is_user_credit_role(role: LegRole) -> bool {
    matches!(role, LegRole::Received | LegRole::ProtocolWithdraw)
}

/// External debit legs with a user-side role
pub fn external_user_debits(legs: &[TxLeg]) -> Vec<&TxLeg> {
    legs.iter()
        .filter(|leg| leg.is_external() && leg.is_debit() && is_user_debit_role(leg.role))
        .collect()
}

/// External credit legs with a user-side role
pub fn external_user_credits(legs: &[TxLeg]) -> Vec<&TxLeg> {
    legs.iter()
        .filter(|leg| leg.is_external() && leg.is_credit() && is_user_credit_role(leg.role))
        .collect()
}

/// The leg with the largest ui amount
pub fn largest<'a>(legs: &[&'a TxLeg]) -> Option<&'a TxLeg> {
    legs.iter()
        .copied()
        .max_by(|a, b| compare_ui(a.amount.ui_units, b.amount.ui_units))
}

/// Sum of ui amounts
pub fn sum_ui(legs: &[&TxLeg]) -> f64 {
    legs.iter().map(|leg| leg.amount.ui_units).sum()
}

/// Total-order float comparison that never panics on NaN
pub fn compare_ui(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// The canonical transfer pairing: the largest external `sent` debit that has
/// a matching external `received` credit in the same token on a different
/// account. Returns `(sender_leg, receiver_leg)`.
pub fn find_transfer_pair<'a>(legs: &'a [TxLeg]) -> Option<(&'a TxLeg, &'a TxLeg)> {
    let mut debits: Vec<&TxLeg> = legs
        .iter()
        .filter(|leg| leg.is_external() && leg.is_debit() && leg.role == LegRole::Sent)
        .collect();
    debits.sort_by(|a, b| compare_ui(b.amount.ui_units, a.amount.ui_units));

    for debit in debits {
        let matching_credit = legs.iter().find(|leg| {
            leg.is_external()
                && leg.is_credit()
                && leg.role == LegRole::Received
                && leg.amount.token.mint == debit.amount.token.mint
                && leg.account_id != debit.account_id
        });
        if let Some(credit) = matching_credit {
            return Some((debit, credit));
        }
    }
    None
}
