//! Liquidity provision classification
//!
//! Under a DEX protocol, two or more distinct tokens leaving against one
//! coming in is a liquidity add (deposit both sides, receive the LP token);
//! the mirror image is a liquidity remove. The primary amount is the largest
//! leg on the composite side.

use serde_json::json;

use crate::classify::helpers::{
    initiator, is_user_credit_role, is_user_debit_role, largest,
};
use crate::classify::Classifier;
use crate::types::account::external_account;
use crate::types::classification::{Counterparty, PrimaryType, TransactionClassification};
use crate::types::leg::TxLeg;
use crate::types::transaction::RawTransaction;

const CONFIDENCE: f64 = 0.85;

pub struct LiquidityClassifier;

impl Classifier for LiquidityClassifier {
    fn name(&self) -> &'static str {
        "liquidity"
    }

    fn priority(&self) -> u8 {
        82
    }

    fn classify(
        &self,
        legs: &[TxLeg],
        tx: &RawTransaction,
        _wallet: Option<&str>,
    ) -> Option<TransactionClassification> {
        let protocol = tx.protocol.as_ref().filter(|p| p.is_dex())?;
        let user = initiator(tx)?;
        let account_id = external_account(user);

        let out_legs: Vec<&TxLeg> = legs
            .iter()
            .filter(|leg| {
                leg.account_id == account_id && leg.is_debit() && is_user_debit_role(leg.role)
            })
            .collect();
        let in_legs: Vec<&TxLeg> = legs
            .iter()
            .filter(|leg| {
                leg.account_id == account_id && leg.is_credit() && is_user_credit_role(leg.role)
            })
            .collect();

        let out_mints = distinct_mints(&out_legs);
        let in_mints = distinct_mints(&in_legs);

        let (primary_type, composite, other) = if out_mints >= 2 && in_mints == 1 {
            (PrimaryType::LiquidityAdd, &out_legs, &in_legs)
        } else if out_mints == 1 && in_mints >= 2 {
            (PrimaryType::LiquidityRemove, &in_legs, &out_legs)
        } else {
            return None;
        };

        let primary_leg = largest(composite)?;
        let other_leg = largest(other);

        let pool_tokens: Vec<&str> = composite
            .iter()
            .map(|leg| leg.amount.token.symbol.as_str())
            .collect();

        let mut classification = TransactionClassification::new(primary_type, CONFIDENCE)
            .with_primary(primary_leg.amount.clone())
            .with_sender(user)
            .with_counterparty(Counterparty::protocol(&protocol.name))
            .with_metadata("pool_tokens", json!(pool_tokens));

        if let Some(other_leg) = other_leg {
            classification = classification.with_secondary(other_leg.amount.clone());
        }

        Some(classification)
    }
}

fn distinct_mints(legs: &[&TxLeg]) -> usize {
    let mut mints: Vec<&str> = legs.iter().map(|leg| leg.amount.token.mint.as_str()).collect();
    mints.sort_unstable();
    mints.dedup();
    mints.len()
}
