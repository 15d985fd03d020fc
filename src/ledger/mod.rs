//! Double-entry ledger construction and validation

pub mod builder;
pub mod validate;

pub use builder::{BuiltLegs, LegBuilder};
pub use validate::{
    group_by_account, group_by_token, validate_balance, BalanceReport, TokenBalanceTotals,
    BALANCE_EPSILON,
};
