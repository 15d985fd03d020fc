//! NFT mint classification
//!
//! Only fires under an NFT-mint protocol (candy machine, Metaplex,
//! Bubblegum). The signal is one or more incoming zero-decimal tokens with a
//! whole-unit amount; the optional native debit alongside is the mint price.

use serde_json::json;

use crate::classify::helpers::{compare_ui, is_user_credit_role};
use crate::classify::Classifier;
use crate::types::classification::{Counterparty, PrimaryType, TransactionClassification};
use crate::types::leg::{LegRole, TxLeg};
use crate::types::transaction::RawTransaction;

const CONFIDENCE: f64 = 0.9;

pub struct NftMintClassifier;

impl Classifier for NftMintClassifier {
    fn name(&self) -> &'static str {
        "nft-mint"
    }

    fn priority(&self) -> u8 {
        85
    }

    fn classify(
        &self,
        legs: &[TxLeg],
        tx: &RawTransaction,
        _wallet: Option<&str>,
    ) -> Option<TransactionClassification> {
        let protocol = tx.protocol.as_ref().filter(|p| p.is_nft_mint())?;

        let minted: Vec<&TxLeg> = legs
            .iter()
            .filter(|leg| {
                leg.is_external()
                    && leg.is_credit()
                    && is_user_credit_role(leg.role)
                    && leg.amount.token.decimals == 0
                    && leg.amount.ui_units >= 1.0
            })
            .collect();
        let first_minted = minted.first()?;
        let minter = first_minted.external_address()?;

        let quantity: f64 = minted.iter().map(|leg| leg.amount.ui_units).sum();

        // The mint price, when the mint wasn't free
        let price_leg = legs
            .iter()
            .filter(|leg| {
                leg.is_external()
                    && leg.is_debit()
                    && leg.role == LegRole::Sent
                    && leg.amount.token.is_native()
            })
            .max_by(|a, b| compare_ui(a.amount.ui_units, b.amount.ui_units));

        let mut classification = TransactionClassification::new(PrimaryType::NftMint, CONFIDENCE)
            .with_primary(first_minted.amount.clone())
            .with_receiver(minter)
            .with_counterparty(Counterparty::protocol(&protocol.name))
            .with_metadata("quantity", json!(quantity));

        if let Some(price_leg) = price_leg {
            classification = classification
                .with_secondary(price_leg.amount.clone())
                .with_metadata("mint_price", json!(price_leg.amount.ui_units));
        }

        Some(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect;
    use crate::types::account::external_account;
    use crate::types::leg::LegSide;
    use crate::types::token::{MoneyAmount, TokenInfo};

    const MINTER: &str = "MinterWa11et11111111111111111111111111111111";

    fn nft(mint_index: usize) -> TokenInfo {
        TokenInfo::placeholder(&format!("NftMint{}111111111111111111111111111", mint_index), 0)
    }

    fn candy_machine_tx() -> RawTransaction {
        let program_ids = vec![detect::CANDY_MACHINE_V3_PROGRAM.to_string()];
        RawTransaction {
            signature: "sig".to_string(),
            slot: 1,
            block_time: Some(1_700_000_000),
            err: None,
            protocol: detect::detect_protocol(&program_ids),
            program_ids,
            account_keys: vec![MINTER.to_string()],
            memo: None,
            fee: 5_000,
            pre_balances: vec![],
            post_balances: vec![],
            pre_token_balances: vec![],
            post_token_balances: vec![],
        }
    }

    fn minted_leg(index: usize) -> TxLeg {
        TxLeg::new(
            external_account(MINTER),
            LegSide::Credit,
            LegRole::Received,
            MoneyAmount::from_raw(nft(index), 1),
        )
    }

    #[test]
    fn test_three_nft_mint_with_price() {
        let mut legs = vec![minted_leg(1), minted_leg(2), minted_leg(3)];
        legs.push(TxLeg::new(
            external_account(MINTER),
            LegSide::Debit,
            LegRole::Sent,
            MoneyAmount::from_raw(TokenInfo::native(), 3_000_000_000),
        ));

        let c = NftMintClassifier
            .classify(&legs, &candy_machine_tx(), None)
            .unwrap();
        assert_eq!(c.primary_type, PrimaryType::NftMint);
        assert_eq!(c.confidence, CONFIDENCE);
        assert_eq!(c.metadata.get("quantity"), Some(&json!(3.0)));
        assert_eq!(c.metadata.get("mint_price"), Some(&json!(3.0)));
        assert_eq!(c.receiver.as_deref(), Some(MINTER));
        assert_eq!(c.primary_amount.unwrap().token.decimals, 0);
    }

    #[test]
    fn test_free_mint_has_no_price() {
        let legs = vec![minted_leg(1)];
        let c = NftMintClassifier
            .classify(&legs, &candy_machine_tx(), None)
            .unwrap();
        assert!(c.secondary_amount.is_none());
        assert!(!c.metadata.contains_key("mint_price"));
        assert_eq!(c.metadata.get("quantity"), Some(&json!(1.0)));
    }

    #[test]
    fn test_requires_nft_protocol() {
        let mut tx = candy_machine_tx();
        tx.protocol = None;
        assert!(NftMintClassifier
            .classify(&[minted_leg(1)], &tx, None)
            .is_none());
    }

    #[test]
    fn test_fungible_credit_is_not_a_mint() {
        let usdc = TokenInfo {
            mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string(),
            symbol: "USDC".to_string(),
            name: "USD Coin".to_string(),
            decimals: 6,
            logo_uri: None,
        };
        let legs = vec![TxLeg::new(
            external_account(MINTER),
            LegSide::Credit,
            LegRole::Received,
            MoneyAmount::from_raw(usdc, 5_000_000),
        )];
        assert!(NftMintClassifier
            .classify(&legs, &candy_machine_tx(), None)
            .is_none());
    }
}
