//! Stake deposit and withdraw classification
//!
//! Both fire only under a staking protocol (native stake program or a liquid
//! staking pool). A deposit is the user's native debit; a withdraw is the
//! user's native credit with no matching native debit from the same user,
//! which keeps re-stake patterns out.

use serde_json::json;

use crate::classify::helpers::{
    compare_ui, is_user_credit_role, is_user_debit_role,
};
use crate::classify::Classifier;
use crate::types::classification::{Counterparty, PrimaryType, TransactionClassification};
use crate::types::leg::TxLeg;
use crate::types::transaction::RawTransaction;

const CONFIDENCE: f64 = 0.9;

pub struct StakeDepositClassifier;

impl Classifier for StakeDepositClassifier {
    fn name(&self) -> &'static str {
        "stake-deposit"
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
        let protocol = tx.protocol.as_ref().filter(|p| p.is_stake())?;

        let deposit_leg = legs
            .iter()
            .filter(|leg| {
                leg.is_external()
                    && leg.is_debit()
                    && is_user_debit_role(leg.role)
                    && leg.amount.token.is_native()
            })
            .max_by(|a, b| compare_ui(a.amount.ui_units, b.amount.ui_units))?;
        let staker = deposit_leg.external_address()?;

        Some(
            TransactionClassification::new(PrimaryType::StakeDeposit, CONFIDENCE)
                .with_primary(deposit_leg.amount.clone())
                .with_sender(staker)
                .with_counterparty(Counterparty::protocol(&protocol.name))
                .with_metadata("protocol", json!(protocol.id)),
        )
    }
}

pub struct StakeWithdrawClassifier;

impl Classifier for StakeWithdrawClassifier {
    fn name(&self) -> &'static str {
        "stake-withdraw"
    }

    fn priority(&self) -> u8 {
        81
    }

    fn classify(
        &self,
        legs: &[TxLeg],
        tx: &RawTransaction,
        _wallet: Option<&str>,
    ) -> Option<TransactionClassification> {
        let protocol = tx.protocol.as_ref().filter(|p| p.is_stake())?;

        let withdraw_leg = legs
            .iter()
            .filter(|leg| {
                leg.is_external()
                    && leg.is_credit()
                    && is_user_credit_role(leg.role)
                    && leg.amount.token.is_native()
            })
            .max_by(|a, b| compare_ui(a.amount.ui_units, b.amount.ui_units))?;
        let staker = withdraw_leg.external_address()?;

        // A native debit by the same user alongside the credit is a re-stake
        // pattern, not a withdraw; refuse rather than guess
        let has_matching_debit = legs.iter().any(|leg| {
            leg.is_debit()
                && is_user_debit_role(leg.role)
                && leg.amount.token.is_native()
                && leg.external_address() == Some(staker)
        });
        if has_matching_debit {
            return None;
        }

        Some(
            TransactionClassification::new(PrimaryType::StakeWithdraw, CONFIDENCE)
                .with_primary(withdraw_leg.amount.clone())
                .with_receiver(staker)
                .with_counterparty(Counterparty::protocol(&protocol.name))
                .with_metadata("protocol", json!(protocol.id)),
        )
    }
}
