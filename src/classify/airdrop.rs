//! Airdrop classification
//!
//! Tokens arriving from a protocol with nothing given in return: at least
//! one protocol-side leg, at least one external credit of a non-native
//! token, and no external non-native debit.

use serde_json::json;

use crate::classify::helpers::{is_user_credit_role, is_user_debit_role, largest};
use crate::classify::Classifier;
use crate::types::account::{parse_account_id, ParsedAccountId};
use crate::types::classification::{Counterparty, PrimaryType, TransactionClassification};
use crate::types::leg::TxLeg;
use crate::types::transaction::RawTransaction;

const CONFIDENCE: f64 = 0.85;

pub struct AirdropClassifier;

impl Classifier for AirdropClassifier {
    fn name(&self) -> &'static str {
        "airdrop"
    }

    fn priority(&self) -> u8 {
        70
    }

    fn classify(
        &self,
        legs: &[TxLeg],
        tx: &RawTransaction,
        _wallet: Option<&str>,
    ) -> Option<TransactionClassification> {
        if !legs.iter().any(|leg| leg.is_protocol()) {
            return None;
        }

        let airdropped: Vec<&TxLeg> = legs
            .iter()
            .filter(|leg| {
                leg.is_external()
                    && leg.is_credit()
                    && is_user_credit_role(leg.role)
                    && !leg.amount.token.is_native()
            })
            .collect();
        if airdropped.is_empty() {
            return None;
        }

        // Anything paid in tokens means this was bought, not dropped
        let has_token_spending = legs.iter().any(|leg| {
            leg.is_external()
                && leg.is_debit()
                && is_user_debit_role(leg.role)
                && !leg.amount.token.is_native()
        });
        if has_token_spending {
            return None;
        }

        let primary_leg = largest(&airdropped)?;
        let receiver = primary_leg.external_address()?;

        let mut classification = TransactionClassification::new(PrimaryType::Airdrop, CONFIDENCE)
            .with_primary(primary_leg.amount.clone())
            .with_receiver(receiver)
            .with_metadata("token", json!(primary_leg.amount.token.mint));

        // The dropping protocol, read off the protocol-side debit when present
        let protocol_debit = legs.iter().find(|leg| leg.is_protocol() && leg.is_debit());
        if let Some(protocol_leg) = protocol_debit {
            if let ParsedAccountId::Protocol {
                protocol_id,
                address,
                ..
            } = parse_account_id(&protocol_leg.account_id)
            {
                classification = classification
                    .with_sender(&address)
                    .with_counterparty(Counterparty {
                        kind: crate::types::classification::CounterpartyKind::Protocol,
                        address: Some(address.clone()),
                        name: Some(protocol_id),
                    });
            }
        } else if let Some(protocol) = &tx.protocol {
            classification =
                classification.with_counterparty(Counterparty::protocol(&protocol.name));
        }

        Some(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::account::{external_account, protocol_account};
    use crate::types::leg::{LegRole, LegSide};
    use crate::types::token::{MoneyAmount, TokenInfo};

    const CLAIMER: &str = "C1aimerWa11et1111111111111111111111111111111";

    fn drop_token() -> TokenInfo {
        TokenInfo {
            mint: "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN".to_string(),
            symbol: "JUP".to_string(),
            name: "Jupiter".to_string(),
            decimals: 6,
            logo_uri: None,
        }
    }

    fn bare_tx() -> RawTransaction {
        RawTransaction {
            signature: "sig".to_string(),
            slot: 1,
            block_time: Some(1_700_000_000),
            err: None,
            program_ids: vec![],
            protocol: None,
            account_keys: vec![CLAIMER.to_string()],
            memo: None,
            fee: 5_000,
            pre_balances: vec![],
            post_balances: vec![],
            pre_token_balances: vec![],
            post_token_balances: vec![],
        }
    }

    fn airdrop_legs() -> Vec<TxLeg> {
        vec![
            TxLeg::new(
                protocol_account("jupiter", None, "distributor"),
                LegSide::Debit,
                LegRole::ProtocolDeposit,
                MoneyAmount::from_raw(drop_token(), 200_000_000),
            ),
            TxLeg::new(
                external_account(CLAIMER),
                LegSide::Credit,
                LegRole::Received,
                MoneyAmount::from_raw(drop_token(), 200_000_000),
            ),
        ]
    }

    #[test]
    fn test_airdrop_claim() {
        let c = AirdropClassifier
            .classify(&airdrop_legs(), &bare_tx(), None)
            .unwrap();
        assert_eq!(c.primary_type, PrimaryType::Airdrop);
        assert_eq!(c.receiver.as_deref(), Some(CLAIMER));
        assert_eq!(c.sender.as_deref(), Some("distributor"));
        assert!((c.primary_amount.unwrap().ui_units - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_requires_protocol_leg() {
        let legs = vec![TxLeg::new(
            external_account(CLAIMER),
            LegSide::Credit,
            LegRole::Received,
            MoneyAmount::from_raw(drop_token(), 200_000_000),
        )];
        assert!(AirdropClassifier.classify(&legs, &bare_tx(), None).is_none());
    }

    #[test]
    fn test_token_payment_disqualifies() {
        let mut legs = airdrop_legs();
        legs.push(TxLeg::new(
            external_account(CLAIMER),
            LegSide::Debit,
            LegRole::Sent,
            MoneyAmount::from_raw(drop_token(), 50_000_000),
        ));
        assert!(AirdropClassifier.classify(&legs, &bare_tx(), None).is_none());
    }

    #[test]
    fn test_native_only_credit_is_not_an_airdrop() {
        let legs = vec![
            TxLeg::new(
                protocol_account("jupiter", None, "distributor"),
                LegSide::Debit,
                LegRole::ProtocolDeposit,
                MoneyAmount::from_raw(TokenInfo::native(), 1_000_000),
            ),
            TxLeg::new(
                external_account(CLAIMER),
                LegSide::Credit,
                LegRole::Received,
                MoneyAmount::from_raw(TokenInfo::native(), 1_000_000),
            ),
        ];
        assert!(AirdropClassifier.classify(&legs, &bare_tx(), None).is_none());
    }
}
