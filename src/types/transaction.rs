//! Raw transaction records as consumed by the leg builder
//!
//! `RawTransaction` is the decoded, chain-shaped view of one confirmed
//! transaction: account keys, balance snapshots before and after, fee, memo
//! and the set of invoked program ids. The protocol field starts empty and is
//! filled by the detector before leg construction.

use serde::{Deserialize, Serialize};

use crate::types::protocol::ProtocolInfo;

/// Per-token-account balance snapshot (one side of a pre/post pair)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
    /// Index of the token account in `account_keys`
    pub account_index: usize,
    pub mint: String,
    /// Wallet that owns the token account; deltas are attributed to this address
    pub owner: String,
    pub decimals: u8,
    /// Raw amount in the token's smallest unit
    pub raw_amount: u128,
}

/// One confirmed on-chain transaction, decoded but not yet interpreted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub signature: String,
    pub slot: u64,
    /// Epoch seconds; absent for very old or unfinalised slots
    pub block_time: Option<i64>,
    /// Present when the transaction failed on-chain
    pub err: Option<String>,
    /// Invoked program ids, in instruction order (treated as a set by the detector)
    pub program_ids: Vec<String>,
    /// Filled by the protocol detector
    pub protocol: Option<ProtocolInfo>,
    /// Ordered account keys; position 0 is the fee payer
    pub account_keys: Vec<String>,
    pub memo: Option<String>,
    /// Total network fee in lamports
    pub fee: u64,
    /// Native balances aligned with `account_keys`
    pub pre_balances: Vec<u64>,
    pub post_balances: Vec<u64>,
    pub pre_token_balances: Vec<TokenBalance>,
    pub post_token_balances: Vec<TokenBalance>,
}

impl RawTransaction {
    /// The fee payer: always position 0 of the account keys
    pub fn fee_payer(&self) -> Option<&str> {
        self.account_keys.first().map(String::as_str)
    }

    pub fn is_failed(&self) -> bool {
        self.err.is_some()
    }

    /// Whether any instruction invoked the given program
    pub fn invokes_program(&self, program_id: &str) -> bool {
        self.program_ids.iter().any(|id| id == program_id)
    }
}

/// Signature listing entry returned by the signature source, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureInfo {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
    pub err: Option<String>,
    pub memo: Option<String>,
}
