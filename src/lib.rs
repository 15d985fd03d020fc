//! Solana chain-indexing SDK
//!
//! Fetches confirmed transactions for a wallet, normalises them into balanced
//! double-entry legs and assigns each one a single high-level classification
//! (transfer, swap, NFT mint, stake activity, bridge, privacy pool, ...).

pub mod classify;
pub mod config;
pub mod detect;
pub mod errors;
pub mod fetch;
pub mod indexer;
pub mod ledger;
pub mod metadata;
pub mod registry;
pub mod rpc;
pub mod spam;
pub mod types;
pub mod utils;

pub use errors::{IndexerError, IndexerResult};
pub use indexer::Indexer;
