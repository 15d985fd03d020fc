//! Paged fetch and accumulation
//!
//! The loop behind `get_transactions`: fetch a page of signatures, fetch and
//! classify the transactions, filter spam, and keep going until the caller's
//! quota is met, the history is exhausted, or the iteration cap is hit. Work
//! is strictly bounded; the loop never spins forever on a spam-heavy wallet.

pub mod pipeline;

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::IndexerResult;
use crate::rpc::ChainSource;
use crate::spam::{SpamConfig, SpamFilter};
use crate::types::classification::ClassifiedTransaction;
use crate::utils::time::format_block_time;

pub use pipeline::Pipeline;

/// Options for one `get_transactions` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchOptions {
    /// Number of non-spam transactions to return
    pub limit: usize,
    /// Start fetching strictly before this signature
    pub before: Option<String>,
    /// Do not consider signatures older than this one
    pub until: Option<String>,
    pub filter_spam: bool,
    /// Overrides the indexer's spam thresholds for this call
    pub spam_config: Option<SpamConfig>,
    /// Upper bound on fetch iterations when filtering spam
    pub max_iterations: usize,
    /// Page-size multiplier after the first iteration
    pub overfetch_multiplier: usize,
    /// Floor for overfetched page sizes
    pub min_page_size: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            before: None,
            until: None,
            filter_spam: true,
            spam_config: None,
            max_iterations: 10,
            overfetch_multiplier: 2,
            min_page_size: 20,
        }
    }
}

impl FetchOptions {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
}

/// Newest first: block time, then slot, then signature. A stable total order.
pub fn newest_first(a: &ClassifiedTransaction, b: &ClassifiedTransaction) -> Ordering {
    b.tx
        .block_time
        .unwrap_or(0)
        .cmp(&a.tx.block_time.unwrap_or(0))
        .then_with(|| b.tx.slot.cmp(&a.tx.slot))
        .then_with(|| a.tx.signature.cmp(&b.tx.signature))
}

/// Fetch, classify and accumulate transactions for a wallet.
///
/// With `filter_spam` off this is a single page of exactly `limit`
/// signatures. With it on, the loop overfetches subsequent pages and
/// accumulates non-spam results until the quota is met, the wallet's history
/// is exhausted, or `max_iterations` is reached - whichever comes first. The
/// first non-recoverable error propagates; partial results are not returned
/// on error.
pub async fn fetch_classified<S>(
    source: &S,
    pipeline: &Pipeline,
    wallet: &str,
    options: &FetchOptions,
) -> IndexerResult<Vec<ClassifiedTransaction>>
where
    S: ChainSource + ?Sized,
{
    if !options.filter_spam {
        let signatures = source
            .fetch_signatures(
                wallet,
                options.limit,
                options.before.as_deref(),
                options.until.as_deref(),
            )
            .await?;
        let mut results = classify_page(source, pipeline, wallet, &signatures).await?;
        results.sort_by(newest_first);
        return Ok(results);
    }

    let spam_filter = SpamFilter::new(options.spam_config.clone().unwrap_or_default());
    let mut accumulated: Vec<ClassifiedTransaction> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut cursor = options.before.clone();

    for iteration in 0..options.max_iterations {
        // First page matches the quota; later pages overfetch to ride out
        // spam runs
        let page_size = if iteration == 0 {
            options.limit
        } else {
            (options.limit * options.overfetch_multiplier).max(options.min_page_size)
        };

        let signatures = source
            .fetch_signatures(wallet, page_size, cursor.as_deref(), options.until.as_deref())
            .await?;
        if signatures.is_empty() {
            debug!("Signature history exhausted after {} iterations", iteration);
            break;
        }

        // Advance past the oldest signature of this page
        if let Some(oldest) = signatures.last() {
            cursor = Some(oldest.signature.clone());
        }

        let classified = classify_page(source, pipeline, wallet, &signatures).await?;
        let kept = spam_filter.filter_batch(classified);

        for transaction in kept {
            if seen.insert(transaction.tx.signature.clone()) {
                accumulated.push(transaction);
            }
        }

        debug!(
            "Iteration {}: {} accumulated of {} wanted",
            iteration + 1,
            accumulated.len(),
            options.limit
        );
        if accumulated.len() >= options.limit {
            break;
        }
    }

    accumulated.sort_by(newest_first);
    accumulated.truncate(options.limit);

    match accumulated.first() {
        Some(newest) => info!(
            "Returning {} classified transactions for {} (newest {})",
            accumulated.len(),
            wallet,
            format_block_time(newest.tx.block_time)
        ),
        None => info!("Returning no classified transactions for {}", wallet),
    }
    Ok(accumulated)
}

/// Fetch and classify the transactions behind one page of signatures.
/// Missing transactions are skipped.
async fn classify_page<S>(
    source: &S,
    pipeline: &Pipeline,
    wallet: &str,
    signatures: &[crate::types::transaction::SignatureInfo],
) -> IndexerResult<Vec<ClassifiedTransaction>>
where
    S: ChainSource + ?Sized,
{
    let keys: Vec<String> = signatures
        .iter()
        .map(|info| info.signature.clone())
        .collect();
    let transactions = source.fetch_transactions(&keys).await?;

    let mut classified = Vec::with_capacity(transactions.len());
    for transaction in transactions.into_iter().flatten() {
        classified.push(pipeline.classify_transaction(transaction, Some(wallet)).await);
    }
    Ok(classified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::classification::TransactionClassification;
    use crate::types::transaction::RawTransaction;

    fn classified(signature: &str, block_time: Option<i64>, slot: u64) -> ClassifiedTransaction {
        ClassifiedTransaction {
            tx: RawTransaction {
                signature: signature.to_string(),
                slot,
                block_time,
                err: None,
                program_ids: vec![],
                protocol: None,
                account_keys: vec![],
                memo: None,
                fee: 0,
                pre_balances: vec![],
                post_balances: vec![],
                pre_token_balances: vec![],
                post_token_balances: vec![],
            },
            legs: vec![],
            classification: TransactionClassification::unclassified(),
            balanced: true,
        }
    }

    #[test]
    fn test_defaults() {
        let options = FetchOptions::default();
        assert_eq!(options.limit, 10);
        assert!(options.filter_spam);
        assert_eq!(options.max_iterations, 10);
        assert_eq!(options.overfetch_multiplier, 2);
    }

    #[test]
    fn test_newest_first_total_order() {
        let mut batch = vec![
            classified("c", Some(100), 5),
            classified("a", Some(300), 9),
            classified("b", Some(300), 8),
            classified("d", None, 1),
        ];
        batch.sort_by(newest_first);

        let order: Vec<&str> = batch.iter().map(|t| t.tx.signature.as_str()).collect();
        // Highest block time first; equal times fall back to slot; missing
        // block time sorts oldest
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_newest_first_tiebreaks_on_signature() {
        let mut batch = vec![
            classified("zzz", Some(100), 5),
            classified("aaa", Some(100), 5),
        ];
        batch.sort_by(newest_first);
        assert_eq!(batch[0].tx.signature, "aaa");
    }
}
