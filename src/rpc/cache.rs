//! Bounded cache of fetched raw transactions
//!
//! Confirmed transactions are immutable, so entries never go stale and need
//! no TTL. What they do need is a size bound: one accumulation run over a
//! spam-heavy wallet can page through hundreds of transactions, and the
//! cursor-driven loop frequently re-requests signatures it has already seen.
//! The cache keeps the most recent `capacity` insertions and evicts the
//! oldest beyond that.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::types::transaction::RawTransaction;

/// Default insertion bound, sized for a full accumulation run
/// (max_iterations x overfetched page) with room to spare
pub const DEFAULT_CACHE_CAPACITY: usize = 512;

struct CacheInner {
    capacity: usize,
    entries: HashMap<String, RawTransaction>,
    /// Signatures in insertion order; front is the eviction candidate
    insertion_order: VecDeque<String>,
}

/// Signature-keyed, capacity-bounded transaction cache
#[derive(Clone)]
pub struct TransactionCache {
    inner: Arc<Mutex<CacheInner>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl TransactionCache {
    /// Cache holding at most `capacity` transactions. A capacity of zero
    /// disables caching entirely (every lookup misses, stores are dropped).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner {
                capacity,
                entries: HashMap::with_capacity(capacity.min(DEFAULT_CACHE_CAPACITY)),
                insertion_order: VecDeque::new(),
            })),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Look up a transaction by signature
    pub fn lookup(&self, signature: &str) -> Option<RawTransaction> {
        let inner = self.inner.lock().unwrap();
        match inner.entries.get(signature) {
            Some(transaction) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(transaction.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert a transaction, keyed by its own signature. Evicts the oldest
    /// insertion once the capacity is reached; re-storing a cached signature
    /// replaces the entry without consuming capacity.
    pub fn store(&self, transaction: RawTransaction) {
        let mut inner = self.inner.lock().unwrap();
        if inner.capacity == 0 {
            return;
        }

        let signature = transaction.signature.clone();
        if inner.entries.insert(signature.clone(), transaction).is_some() {
            return;
        }

        inner.insertion_order.push_back(signature);
        if inner.insertion_order.len() > inner.capacity {
            if let Some(evicted) = inner.insertion_order.pop_front() {
                inner.entries.remove(&evicted);
                debug!("Evicted cached transaction {}", evicted);
            }
        }
    }

    /// Number of cached transactions
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of cache effectiveness counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl Default for TransactionCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

/// Cache effectiveness counters
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups served from cache, in [0, 1]
    pub fn hit_fraction(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            return 0.0;
        }
        self.hits as f64 / lookups as f64
    }
}
