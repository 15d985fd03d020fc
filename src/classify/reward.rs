//! Staking reward classification
//!
//! Pure reward payouts: one or more reward-role credits under the stake
//! protocol with no user spending in the same transaction. A user debit
//! alongside means a stake operation is happening; that is not a reward and
//! the higher-priority stake classifiers own it.

use serde_json::json;

use crate::classify::helpers::{compare_ui, largest};
use crate::classify::Classifier;
use crate::types::classification::{Counterparty, PrimaryType, TransactionClassification};
use crate::types::leg::{LegRole, TxLeg};
use crate::types::protocol::ProtocolCategory;
use crate::types::transaction::RawTransaction;

const CONFIDENCE: f64 = 0.85;

pub struct RewardClassifier;

impl Classifier for RewardClassifier {
    fn name(&self) -> &'static str {
        "reward"
    }

    fn priority(&self) -> u8 {
        71
    }

    fn classify(
        &self,
        legs: &[TxLeg],
        tx: &RawTransaction,
        _wallet: Option<&str>,
    ) -> Option<TransactionClassification> {
        let protocol = tx
            .protocol
            .as_ref()
            .filter(|p| p.category == ProtocolCategory::Stake)?;

        let reward_legs: Vec<&TxLeg> = legs
            .iter()
            .filter(|leg| leg.is_external() && leg.is_credit() && leg.role == LegRole::Reward)
            .collect();
        if reward_legs.is_empty() {
            return None;
        }

        // Any non-fee spending by an external account makes this a stake
        // operation, not a pure reward
        let has_user_spending = legs
            .iter()
            .any(|leg| leg.is_external() && leg.is_debit() && leg.role != LegRole::Fee);
        if has_user_spending {
            return None;
        }

        let primary_leg = largest(&reward_legs)?;
        let receiver = primary_leg.external_address()?;

        let mut sorted_rewards = reward_legs.clone();
        sorted_rewards.sort_by(|a, b| compare_ui(b.amount.ui_units, a.amount.ui_units));
        let rewards: Vec<serde_json::Value> = sorted_rewards
            .iter()
            .map(|leg| {
                json!({
                    "token": leg.amount.token.symbol,
                    "amount": leg.amount.ui_units,
                })
            })
            .collect();

        Some(
            TransactionClassification::new(PrimaryType::Reward, CONFIDENCE)
                .with_primary(primary_leg.amount.clone())
                .with_receiver(receiver)
                .with_counterparty(Counterparty::protocol(&protocol.name))
                .with_metadata("reward_type", json!("staking"))
                .with_metadata("rewards", json!(rewards)),
        )
    }
}
