//! Leg-set invariant checks and grouping utilities
//!
//! Pure helpers over leg lists: the per-token double-entry balance check and
//! the group-by views classifiers and tests use.

use std::collections::BTreeMap;

use crate::types::leg::{LegSide, TxLeg};

/// Tolerance for the per-token debit/credit balance, in ui units
pub const BALANCE_EPSILON: f64 = 1e-6;

/// Per-token debit/credit totals
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBalanceTotals {
    pub debits: f64,
    pub credits: f64,
    /// `debits - credits`; balanced when its magnitude is below epsilon
    pub diff: f64,
}

/// Result of the double-entry balance check
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceReport {
    pub balanced: bool,
    pub per_token: BTreeMap<String, TokenBalanceTotals>,
}

/// Check that every token's debits equal its credits within
/// [`BALANCE_EPSILON`] ui units.
///
/// # Examples
/// ```
/// use tx_indexer::ledger::validate_balance;
///
/// let report = validate_balance(&[]);
/// assert!(report.balanced);
/// assert!(report.per_token.is_empty());
/// ```
pub fn validate_balance(legs: &[TxLeg]) -> BalanceReport {
    let mut per_token: BTreeMap<String, TokenBalanceTotals> = BTreeMap::new();

    for leg in legs {
        let totals = per_token
            .entry(leg.amount.token.symbol.clone())
            .or_insert(TokenBalanceTotals {
                debits: 0.0,
                credits: 0.0,
                diff: 0.0,
            });
        match leg.side {
            LegSide::Debit => totals.debits += leg.amount.ui_units,
            LegSide::Credit => totals.credits += leg.amount.ui_units,
        }
    }

    let mut balanced = true;
    for totals in per_token.values_mut() {
        totals.diff = totals.debits - totals.credits;
        if totals.diff.abs() >= BALANCE_EPSILON {
            balanced = false;
        }
    }

    BalanceReport {
        balanced,
        per_token,
    }
}

/// Group legs by account id, preserving leg order within each group
pub fn group_by_account(legs: &[TxLeg]) -> BTreeMap<String, Vec<&TxLeg>> {
    let mut groups: BTreeMap<String, Vec<&TxLeg>> = BTreeMap::new();
    for leg in legs {
        groups.entry(leg.account_id.clone()).or_default().push(leg);
    }
    groups
}

/// Group legs by token symbol, preserving leg order within each group
pub fn group_by_token(legs: &[TxLeg]) -> BTreeMap<String, Vec<&TxLeg>> {
    let mut groups: BTreeMap<String, Vec<&TxLeg>> = BTreeMap::new();
    for leg in legs {
        groups
            .entry(leg.amount.token.symbol.clone())
            .or_default()
            .push(leg);
    }
    groups
}
