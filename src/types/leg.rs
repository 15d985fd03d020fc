//! Double-entry transaction legs
//!
//! A leg is one half of a double-entry pair: a single balance movement on one
//! account for one token. Credits increase the account's balance, debits
//! decrease it. The legs of a transaction are the authoritative normalised
//! view; classifiers operate on legs plus transaction metadata, never on raw
//! balance snapshots.

use serde::{Deserialize, Serialize};

use crate::types::account::strip_external_tag;
use crate::types::token::MoneyAmount;

/// Which side of the double entry this leg sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegSide {
    Debit,
    Credit,
}

/// Semantic role of the movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegRole {
    Sent,
    Received,
    Fee,
    Reward,
    ProtocolDeposit,
    ProtocolWithdraw,
}

/// One balance movement on one account for one token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxLeg {
    pub account_id: String,
    pub side: LegSide,
    pub role: LegRole,
    pub amount: MoneyAmount,
}

impl TxLeg {
    pub fn new(account_id: String, side: LegSide, role: LegRole, amount: MoneyAmount) -> Self {
        Self {
            account_id,
            side,
            role,
            amount,
        }
    }

    pub fn is_debit(&self) -> bool {
        self.side == LegSide::Debit
    }

    pub fn is_credit(&self) -> bool {
        self.side == LegSide::Credit
    }

    /// Whether this leg sits on an `external:` account
    pub fn is_external(&self) -> bool {
        self.account_id.starts_with("external:")
    }

    /// Whether this leg sits on a `protocol:` account
    pub fn is_protocol(&self) -> bool {
        self.account_id.starts_with("protocol:")
    }

    /// Raw address when the leg sits on an `external:` account
    pub fn external_address(&self) -> Option<&str> {
        strip_external_tag(&self.account_id)
    }
}
