//! Cross-module engine properties
//!
//! Quantified invariants over the whole pipeline: double-entry balance for
//! every decodable transaction, single-classification dispatch, spam-filter
//! idempotence, detector order-independence and codec round-trips.

mod common;

use common::*;
use tx_indexer::detect;
use tx_indexer::ledger::{validate_balance, BALANCE_EPSILON};
use tx_indexer::spam::SpamFilter;
use tx_indexer::types::account::{
    external_account, network_fee_account, parse_account_id, protocol_account, wallet_account,
    ParsedAccountId,
};
use tx_indexer::types::classification::PrimaryType;
use tx_indexer::types::transaction::RawTransaction;

fn scenario_transactions() -> Vec<RawTransaction> {
    vec![
        plain_transfer_tx("p1"),
        jupiter_swap_tx("p2"),
        candy_mint_tx("p3"),
        privacy_shield_tx("p4"),
        relayer_unshield_tx("p5"),
        stake_reward_tx("p6"),
        dust_transfer_tx("p7"),
        base_tx("p8", WALLET_ALPHA),
    ]
}

#[tokio::test]
async fn every_scenario_satisfies_double_entry_balance() {
    let pipeline = test_pipeline();

    for tx in scenario_transactions() {
        let signature = tx.signature.clone();
        let classified = pipeline.classify_transaction(tx, Some(WALLET_ALPHA)).await;
        let report = validate_balance(&classified.legs);

        assert!(
            report.balanced,
            "{} unbalanced: {:?}",
            signature, report.per_token
        );
        for (symbol, totals) in &report.per_token {
            assert!(
                totals.diff.abs() < BALANCE_EPSILON,
                "{} {} diff {}",
                signature,
                symbol,
                totals.diff
            );
        }
    }
}

#[tokio::test]
async fn every_transaction_gets_exactly_one_classification() {
    let pipeline = test_pipeline();

    for tx in scenario_transactions() {
        let classified = pipeline.classify_transaction(tx, Some(WALLET_ALPHA)).await;
        // Unclassified is itself a classification; confidence stays in range
        let confidence = classified.classification.confidence;
        assert!((0.0..=1.0).contains(&confidence));
        if classified.classification.primary_type == PrimaryType::Unclassified {
            assert_eq!(confidence, 0.0);
            assert!(!classified.classification.is_relevant);
        }
    }
}

#[tokio::test]
async fn spam_filter_is_idempotent_over_the_pipeline() {
    let pipeline = test_pipeline();
    let filter = SpamFilter::default();

    let mut batch = Vec::new();
    for tx in scenario_transactions() {
        batch.push(pipeline.classify_transaction(tx, Some(WALLET_ALPHA)).await);
    }

    let once = filter.filter_batch(batch);
    let twice = filter.filter_batch(once.clone());
    assert_eq!(once, twice);

    // The dust transfer and the fee-only noise are gone, the real activity
    // is not
    assert!(once
        .iter()
        .all(|t| t.tx.signature != "p7" && t.tx.signature != "p8"));
    assert!(once.iter().any(|t| t.tx.signature == "p1"));
}

#[test]
fn detector_is_order_independent() {
    let sets: Vec<Vec<&str>> = vec![
        vec![detect::SYSTEM_PROGRAM, detect::JUPITER_V6_PROGRAM],
        vec![
            detect::SPL_TOKEN_PROGRAM,
            detect::CANDY_MACHINE_V3_PROGRAM,
            detect::COMPUTE_BUDGET_PROGRAM,
        ],
        vec![
            detect::STAKE_PROGRAM,
            detect::SOLEND_PROGRAM,
            detect::WORMHOLE_TOKEN_BRIDGE_PROGRAM,
        ],
    ];

    for set in sets {
        let forward: Vec<String> = set.iter().map(|s| s.to_string()).collect();
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(
            detect::detect_protocol(&forward),
            detect::detect_protocol(&reversed)
        );
    }
}

#[test]
fn account_id_codec_round_trips() {
    let cases = vec![
        wallet_account(WALLET_ALPHA),
        external_account(WALLET_BETA),
        protocol_account("jupiter", None, WALLET_GAMMA),
        protocol_account("solend", Some("USDC"), WALLET_GAMMA),
        network_fee_account().to_string(),
    ];

    for account_id in cases {
        let parsed = parse_account_id(&account_id);
        assert_ne!(
            parsed,
            ParsedAccountId::Unknown,
            "{} failed to parse",
            account_id
        );

        let rebuilt = match &parsed {
            ParsedAccountId::Wallet { address } => wallet_account(address),
            ParsedAccountId::External { address } => external_account(address),
            ParsedAccountId::Protocol {
                protocol_id,
                token,
                address,
            } => protocol_account(protocol_id, token.as_deref(), address),
            ParsedAccountId::NetworkFee => network_fee_account().to_string(),
            ParsedAccountId::Unknown => unreachable!(),
        };
        assert_eq!(rebuilt, account_id);
    }
}
