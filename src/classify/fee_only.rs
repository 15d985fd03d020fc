//! Fee-only classification
//!
//! Transactions whose only external movement is the network fee: failed
//! transactions, account-creation noise, compute-budget-only submissions.
//! Classified with high confidence but flagged not relevant so feeds hide
//! them by default.

use crate::classify::Classifier;
use crate::types::classification::{PrimaryType, TransactionClassification};
use crate::types::leg::{LegRole, TxLeg};
use crate::types::transaction::RawTransaction;

const CONFIDENCE: f64 = 0.95;

pub struct FeeOnlyClassifier;

impl Classifier for FeeOnlyClassifier {
    fn name(&self) -> &'static str {
        "fee-only"
    }

    fn priority(&self) -> u8 {
        60
    }

    fn classify(
        &self,
        legs: &[TxLeg],
        _tx: &RawTransaction,
        _wallet: Option<&str>,
    ) -> Option<TransactionClassification> {
        let external_legs: Vec<&TxLeg> = legs.iter().filter(|leg| leg.is_external()).collect();
        if external_legs.is_empty() {
            return None;
        }
        if !external_legs.iter().all(|leg| leg.role == LegRole::Fee) {
            return None;
        }

        let fee_debit = external_legs
            .iter()
            .find(|leg| leg.is_debit() && leg.amount.token.is_native())?;
        let payer = fee_debit.external_address()?;

        Some(
            TransactionClassification::new(PrimaryType::FeeOnly, CONFIDENCE)
                .with_primary(fee_debit.amount.clone())
                .with_sender(payer)
                .with_relevance(false),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::account::{external_account, network_fee_account};
    use crate::types::leg::LegSide;
    use crate::types::token::{MoneyAmount, TokenInfo};

    const PAYER: &str = "PayerWa11et111111111111111111111111111111111";

    fn bare_tx() -> RawTransaction {
        RawTransaction {
            signature: "sig".to_string(),
            slot: 1,
            block_time: Some(1_700_000_000),
            err: None,
            program_ids: vec![],
            protocol: None,
            account_keys: vec![PAYER.to_string()],
            memo: None,
            fee: 5_000,
            pre_balances: vec![],
            post_balances: vec![],
            pre_token_balances: vec![],
            post_token_balances: vec![],
        }
    }

    fn fee_legs() -> Vec<TxLeg> {
        vec![
            TxLeg::new(
                network_fee_account().to_string(),
                LegSide::Credit,
                LegRole::Fee,
                MoneyAmount::from_raw(TokenInfo::native(), 5_000),
            ),
            TxLeg::new(
                external_account(PAYER),
                LegSide::Debit,
                LegRole::Fee,
                MoneyAmount::from_raw(TokenInfo::native(), 5_000),
            ),
        ]
    }

    #[test]
    fn test_fee_only() {
        let c = FeeOnlyClassifier.classify(&fee_legs(), &bare_tx(), None).unwrap();
        assert_eq!(c.primary_type, PrimaryType::FeeOnly);
        assert!(!c.is_relevant);
        assert_eq!(c.sender.as_deref(), Some(PAYER));
        assert_eq!(c.primary_amount.unwrap().raw(), 5_000);
    }

    #[test]
    fn test_real_movement_disqualifies() {
        let mut legs = fee_legs();
        legs.push(TxLeg::new(
            external_account(PAYER),
            LegSide::Debit,
            LegRole::Sent,
            MoneyAmount::from_raw(TokenInfo::native(), 1_000_000_000),
        ));
        assert!(FeeOnlyClassifier.classify(&legs, &bare_tx(), None).is_none());
    }

    #[test]
    fn test_empty_legs_yield_none() {
        assert!(FeeOnlyClassifier.classify(&[], &bare_tx(), None).is_none());
    }
}
