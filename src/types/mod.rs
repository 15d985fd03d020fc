//! Core data model shared across the whole pipeline
//!
//! Everything downstream of the RPC layer operates on these types: token
//! identity and amounts, raw transactions, account identifiers, double-entry
//! legs and the final classification records.

pub mod account;
pub mod classification;
pub mod leg;
pub mod protocol;
pub mod token;
pub mod transaction;

pub use account::{
    external_account, network_fee_account, parse_account_id, protocol_account, strip_external_tag,
    wallet_account, ParsedAccountId, NETWORK_FEE_ACCOUNT,
};
pub use classification::{
    ClassifiedTransaction, Counterparty, CounterpartyKind, PrimaryType, TransactionClassification,
};
pub use leg::{LegRole, LegSide, TxLeg};
pub use protocol::{ProtocolCategory, ProtocolInfo};
pub use token::{raw_amount, ui_amount, MoneyAmount, TokenInfo, NATIVE_DECIMALS, NATIVE_MINT};
pub use transaction::{RawTransaction, SignatureInfo, TokenBalance};
