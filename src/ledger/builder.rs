//! Leg construction
//!
//! Turns one raw transaction into a balanced list of double-entry legs:
//!
//! 1. A `fee:network` credit and a matching fee-payer debit for the network fee.
//! 2. One leg per token-account balance delta, attributed to the owner address.
//! 3. One leg per native balance delta, after removing the fee movement
//!    already accounted for in step 1.
//! 4. Native credits attributable to a staking protocol's reward mechanism
//!    (no ordinary sender present) are retagged `reward`.
//! 5. Legs sitting on protocol-owned addresses are rewritten to `protocol:`
//!    accounts, and one-sided net flows against a detected protocol get a
//!    balancing leg on the protocol's account.
//!
//! The double-entry invariant is checked before returning. A failed check
//! does not discard the transaction: the legs are returned with a diagnostic
//! flag for the caller to surface.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::detect;
use crate::ledger::validate::{validate_balance, BalanceReport};
use crate::registry::TokenRegistry;
use crate::types::account::{external_account, network_fee_account, protocol_account};
use crate::types::leg::{LegRole, LegSide, TxLeg};
use crate::types::protocol::{ProtocolCategory, ProtocolInfo};
use crate::types::token::{MoneyAmount, TokenInfo, NATIVE_DECIMALS, NATIVE_MINT};
use crate::types::transaction::{RawTransaction, TokenBalance};

/// Leg-construction output: the legs plus the balance diagnostic
#[derive(Debug, Clone)]
pub struct BuiltLegs {
    pub legs: Vec<TxLeg>,
    /// False when the per-token double-entry check failed
    pub balanced: bool,
    pub report: BalanceReport,
}

/// Builds balanced double-entry legs from raw transactions
#[derive(Debug, Clone)]
pub struct LegBuilder {
    registry: TokenRegistry,
}

impl LegBuilder {
    pub fn new(registry: TokenRegistry) -> Self {
        Self { registry }
    }

    /// Build legs resolving token metadata from the static registry only
    pub fn build(&self, tx: &RawTransaction) -> BuiltLegs {
        self.build_with_metadata(tx, &HashMap::new())
    }

    /// Build legs with pre-resolved token metadata layered over the registry
    pub fn build_with_metadata(
        &self,
        tx: &RawTransaction,
        resolved: &HashMap<String, TokenInfo>,
    ) -> BuiltLegs {
        let mut legs = Vec::new();

        self.push_fee_legs(tx, resolved, &mut legs);
        self.push_token_delta_legs(tx, resolved, &mut legs);
        self.push_native_delta_legs(tx, resolved, &mut legs);

        if let Some(protocol) = &tx.protocol {
            retag_reward_credits(protocol, &mut legs);
            rewrite_protocol_owned_legs(protocol, &mut legs);
            synthesise_protocol_counter_legs(tx, protocol, &mut legs);
        }

        let report = validate_balance(&legs);
        if !report.balanced {
            warn!(
                "Leg set for {} failed double-entry check: {:?}",
                tx.signature, report.per_token
            );
        }

        BuiltLegs {
            balanced: report.balanced,
            legs,
            report,
        }
    }

    fn token_info(
        &self,
        mint: &str,
        decimals: u8,
        resolved: &HashMap<String, TokenInfo>,
    ) -> TokenInfo {
        if let Some(info) = resolved.get(mint) {
            return info.clone();
        }
        self.registry.get_or_placeholder(mint, decimals)
    }

    fn push_fee_legs(
        &self,
        tx: &RawTransaction,
        resolved: &HashMap<String, TokenInfo>,
        legs: &mut Vec<TxLeg>,
    ) {
        let Some(fee_payer) = tx.fee_payer() else {
            return;
        };
        if tx.fee == 0 {
            return;
        }

        let native = self.token_info(NATIVE_MINT, NATIVE_DECIMALS, resolved);

        legs.push(TxLeg::new(
            network_fee_account().to_string(),
            LegSide::Credit,
            LegRole::Fee,
            MoneyAmount::from_raw(native.clone(), tx.fee as u128),
        ));
        legs.push(TxLeg::new(
            external_account(fee_payer),
            LegSide::Debit,
            LegRole::Fee,
            MoneyAmount::from_raw(native, tx.fee as u128),
        ));
    }

    fn push_token_delta_legs(
        &self,
        tx: &RawTransaction,
        resolved: &HashMap<String, TokenInfo>,
        legs: &mut Vec<TxLeg>,
    ) {
        // Pair pre/post snapshots by token-account index; iterate in index
        // order so output is deterministic
        let pre: HashMap<usize, &TokenBalance> = tx
            .pre_token_balances
            .iter()
            .map(|balance| (balance.account_index, balance))
            .collect();
        let post: HashMap<usize, &TokenBalance> = tx
            .post_token_balances
            .iter()
            .map(|balance| (balance.account_index, balance))
            .collect();

        let mut indices: Vec<usize> = pre.keys().chain(post.keys()).copied().collect();
        indices.sort_unstable();
        indices.dedup();

        for index in indices {
            let record = post.get(&index).or_else(|| pre.get(&index));
            let Some(record) = record else { continue };

            let pre_raw = pre.get(&index).map(|balance| balance.raw_amount).unwrap_or(0);
            let post_raw = post
                .get(&index)
                .map(|balance| balance.raw_amount)
                .unwrap_or(0);
            let delta = post_raw as i128 - pre_raw as i128;
            if delta == 0 {
                continue;
            }

            let token = self.token_info(&record.mint, record.decimals, resolved);
            let amount = MoneyAmount::from_raw(token, delta.unsigned_abs());
            let account_id = external_account(&record.owner);

            if delta > 0 {
                legs.push(TxLeg::new(account_id, LegSide::Credit, LegRole::Received, amount));
            } else {
                legs.push(TxLeg::new(account_id, LegSide::Debit, LegRole::Sent, amount));
            }
        }
    }

    fn push_native_delta_legs(
        &self,
        tx: &RawTransaction,
        resolved: &HashMap<String, TokenInfo>,
        legs: &mut Vec<TxLeg>,
    ) {
        let native = self.token_info(NATIVE_MINT, NATIVE_DECIMALS, resolved);

        for (index, key) in tx.account_keys.iter().enumerate() {
            let pre = tx.pre_balances.get(index).copied().unwrap_or(0);
            let post = tx.post_balances.get(index).copied().unwrap_or(0);
            let mut delta = post as i128 - pre as i128;

            // The fee payer's fee movement is already captured by the fee legs
            if index == 0 {
                delta += tx.fee as i128;
            }
            if delta == 0 {
                continue;
            }

            let amount = MoneyAmount::from_raw(native.clone(), delta.unsigned_abs());
            let account_id = external_account(key);

            if delta > 0 {
                legs.push(TxLeg::new(account_id, LegSide::Credit, LegRole::Received, amount));
            } else {
                legs.push(TxLeg::new(account_id, LegSide::Debit, LegRole::Sent, amount));
            }
        }
    }
}

/// Retag native credits as rewards when a staking protocol is attached and
/// there is no ordinary external sender in the transaction (one-sided native
/// inflows on a stake transaction come from the protocol's reward mechanism,
/// not from another wallet).
fn retag_reward_credits(protocol: &ProtocolInfo, legs: &mut [TxLeg]) {
    if protocol.category != ProtocolCategory::Stake {
        return;
    }

    let has_ordinary_sender = legs.iter().any(|leg| {
        leg.is_external()
            && leg.is_debit()
            && leg.role == LegRole::Sent
            && leg.amount.token.is_native()
    });
    if has_ordinary_sender {
        return;
    }

    for leg in legs.iter_mut() {
        if leg.is_external()
            && leg.is_credit()
            && leg.role == LegRole::Received
            && leg.amount.token.is_native()
        {
            debug!("Retagging native credit on {} as reward", leg.account_id);
            leg.role = LegRole::Reward;
        }
    }
}

/// Rewrite legs sitting on addresses the detected protocol owns from
/// `external:` to `protocol:<id>:<addr>` and retag their roles.
fn rewrite_protocol_owned_legs(protocol: &ProtocolInfo, legs: &mut [TxLeg]) {
    for leg in legs.iter_mut() {
        if leg.role == LegRole::Fee {
            continue;
        }
        let Some(address) = leg.external_address().map(str::to_string) else {
            continue;
        };
        if !detect::is_protocol_owned_address(protocol, &address) {
            continue;
        }

        leg.account_id = protocol_account(&protocol.id, None, &address);
        leg.role = match leg.side {
            LegSide::Credit => LegRole::ProtocolWithdraw,
            LegSide::Debit => LegRole::ProtocolDeposit,
        };
    }
}

/// Balance one-sided net flows against the detected protocol.
///
/// When users net-receive a token with no visible sender (an NFT leaving a
/// candy machine, stake rewards, pool output), the protocol owns the other
/// side of the flow: a counter-leg on the protocol's account restores the
/// double entry.
fn synthesise_protocol_counter_legs(
    tx: &RawTransaction,
    protocol: &ProtocolInfo,
    legs: &mut Vec<TxLeg>,
) {
    // Net raw imbalance per mint, credits positive
    let mut imbalance: BTreeMap<String, (TokenInfo, i128)> = BTreeMap::new();
    for leg in legs.iter() {
        let entry = imbalance
            .entry(leg.amount.token.mint.clone())
            .or_insert_with(|| (leg.amount.token.clone(), 0));
        match leg.side {
            LegSide::Credit => entry.1 += leg.amount.raw() as i128,
            LegSide::Debit => entry.1 -= leg.amount.raw() as i128,
        }
    }

    // The protocol leg carries the program address when we can see it
    let program_address = tx
        .program_ids
        .iter()
        .find(|id| {
            detect::protocol_for_program(id).is_some_and(|candidate| candidate.id == protocol.id)
        })
        .cloned()
        .unwrap_or_else(|| protocol.id.clone());
    let account_id = protocol_account(&protocol.id, None, &program_address);

    for (token, net) in imbalance.into_values() {
        if net == 0 {
            continue;
        }
        let amount = MoneyAmount::from_raw(token, net.unsigned_abs());
        if net > 0 {
            // Users net-received: the protocol side is a debit
            legs.push(TxLeg::new(
                account_id.clone(),
                LegSide::Debit,
                LegRole::ProtocolDeposit,
                amount,
            ));
        } else {
            // Users net-sent: the protocol side is a credit
            legs.push(TxLeg::new(
                account_id.clone(),
                LegSide::Credit,
                LegRole::ProtocolWithdraw,
                amount,
            ));
        }
    }
}
