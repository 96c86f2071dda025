//! Answer cache keyed by document and question.
//!
//! Entries expire after a TTL and the least recently used entry is evicted at
//! capacity. Concurrent lookups of the same key share one computation; a
//! computation that fails leaves nothing behind, so the next lookup retries.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use lexis_core::config::CacheConfig;
use lexis_core::DocId;
use lru::LruCache;
use tokio::sync::OnceCell;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    doc_id: DocId,
    question: String,
}

impl CacheKey {
    fn new(doc_id: DocId, question: &str) -> Self {
        Self {
            doc_id,
            question: question.trim().to_string(),
        }
    }
}

struct Slot<V> {
    cell: Arc<OnceCell<V>>,
    created_at: Instant,
}

pub struct AnswerCache<V> {
    entries: Mutex<LruCache<CacheKey, Slot<V>>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> AnswerCache<V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity, Duration::from_secs(config.ttl_secs))
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, Slot<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Live slot for `key`, replacing an expired one.
    fn slot(&self, key: CacheKey) -> Arc<OnceCell<V>> {
        let mut entries = self.lock();
        if let Some(slot) = entries.get(&key) {
            if slot.created_at.elapsed() < self.ttl {
                return Arc::clone(&slot.cell);
            }
        }
        let cell = Arc::new(OnceCell::new());
        entries.put(
            key,
            Slot {
                cell: Arc::clone(&cell),
                created_at: Instant::now(),
            },
        );
        cell
    }

    /// Cached value, if present and not expired.
    pub fn get(&self, doc_id: DocId, question: &str) -> Option<V> {
        let key = CacheKey::new(doc_id, question);
        let mut entries = self.lock();
        let value = entries
            .get(&key)
            .filter(|slot| slot.created_at.elapsed() < self.ttl)
            .and_then(|slot| slot.cell.get().cloned());
        match value {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        value
    }

    /// Return the cached value or run `compute` to fill it.
    ///
    /// Callers racing on the same key wait for the first computation. An `Err`
    /// is returned to its caller and not stored.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        doc_id: DocId,
        question: &str,
        compute: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<V, E>>,
    {
        let cell = self.slot(CacheKey::new(doc_id, question));
        if let Some(value) = cell.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value.clone());
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        cell.get_or_try_init(compute).await.cloned()
    }

    /// Drop every entry for one document.
    pub fn invalidate(&self, doc_id: DocId) -> usize {
        let mut entries = self.lock();
        let stale: Vec<CacheKey> = entries
            .iter()
            .filter(|(k, _)| k.doc_id == doc_id)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &stale {
            entries.pop(key);
        }
        stale.len()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits() + self.misses();
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
