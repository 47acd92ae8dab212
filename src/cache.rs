//! Read-through TTL caching of index metadata.
//!
//! Index definitions change rarely while coverage questions arrive often,
//! so the decorator memoizes successful lookups per namespace for a bounded
//! lifetime. Expiry is checked on read; there is no background sweeper and
//! therefore nothing to shut down. Errors are never cached.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use crate::errors::Result;
use crate::metadata::IndexSource;
use crate::model::{Index, Namespace};

/// Hit/miss counters exposed for observability.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    /// Lookups served from a live cache entry.
    pub hits: u64,
    /// Lookups that went through to the inner source.
    pub misses: u64,
}

struct CacheEntry {
    indexes: Vec<Index>,
    stored_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() > ttl
    }
}

/// Caching decorator over any [`IndexSource`].
pub struct CachedIndexSource<S> {
    inner: S,
    ttl: Duration,
    entries: Mutex<HashMap<Namespace, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S> CachedIndexSource<S> {
    /// Wraps `inner`, keeping each successful lookup for `ttl`.
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Drops the cached entry for one namespace, if present.
    pub fn invalidate(&self, namespace: &Namespace) {
        if self.entries.lock().remove(namespace).is_some() {
            debug!(namespace = %namespace, "invalidated cached indexes");
        }
    }

    /// Drops every cached entry.
    pub fn invalidate_all(&self) {
        self.entries.lock().clear();
    }

    /// Number of namespaces currently cached (including expired entries not
    /// yet touched by a lookup).
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Snapshot of the hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<S: IndexSource> IndexSource for CachedIndexSource<S> {
    fn lookup(&self, namespace: &Namespace) -> Result<Vec<Index>> {
        {
            let mut entries = self.entries.lock();
            match entries.get(namespace) {
                Some(entry) if !entry.is_expired(self.ttl) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    debug!(namespace = %namespace, "index cache hit");
                    return Ok(entry.indexes.clone());
                }
                Some(_) => {
                    entries.remove(namespace);
                }
                None => {}
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(namespace = %namespace, "index cache miss");
        let indexes = self.inner.lookup(namespace)?;
        self.entries.lock().insert(
            namespace.clone(),
            CacheEntry {
                indexes: indexes.clone(),
                stored_at: Instant::now(),
            },
        );
        Ok(indexes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoverageError;
    use crate::model::IndexField;
    use std::sync::atomic::AtomicUsize;

    /// Counts how often the inner source is actually consulted.
    struct CountingSource {
        calls: AtomicUsize,
        result: Result<Vec<Index>>,
    }

    impl CountingSource {
        fn returning(result: Result<Vec<Index>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::Relaxed)
        }
    }

    impl IndexSource for CountingSource {
        fn lookup(&self, _namespace: &Namespace) -> Result<Vec<Index>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.result.clone()
        }
    }

    fn sample_indexes() -> Vec<Index> {
        vec![Index::new(
            "userId_1",
            vec![IndexField::from_token("userId", 1)],
        )]
    }

    fn ns() -> Namespace {
        Namespace::parse("app.users").unwrap()
    }

    #[test]
    fn second_lookup_is_served_from_cache() {
        let inner = CountingSource::returning(Ok(sample_indexes()));
        let cached = CachedIndexSource::new(&inner, Duration::from_secs(60));

        assert_eq!(cached.lookup(&ns()).unwrap().len(), 1);
        assert_eq!(cached.lookup(&ns()).unwrap().len(), 1);
        assert_eq!(inner.calls(), 1);
        assert_eq!(cached.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let inner = CountingSource::returning(Ok(sample_indexes()));
        let cached = CachedIndexSource::new(&inner, Duration::ZERO);

        cached.lookup(&ns()).unwrap();
        cached.lookup(&ns()).unwrap();
        assert_eq!(inner.calls(), 2);
    }

    #[test]
    fn errors_are_not_cached() {
        let inner = CountingSource::returning(Err(CoverageError::Backend("down".into())));
        let cached = CachedIndexSource::new(&inner, Duration::from_secs(60));

        assert!(cached.lookup(&ns()).is_err());
        assert!(cached.lookup(&ns()).is_err());
        assert_eq!(inner.calls(), 2);
        assert_eq!(cached.len(), 0);
    }

    #[test]
    fn invalidation_forces_a_refetch() {
        let inner = CountingSource::returning(Ok(sample_indexes()));
        let cached = CachedIndexSource::new(&inner, Duration::from_secs(60));

        cached.lookup(&ns()).unwrap();
        cached.invalidate(&ns());
        assert!(cached.is_empty());
        cached.lookup(&ns()).unwrap();
        assert_eq!(inner.calls(), 2);
    }

    #[test]
    fn invalidate_all_clears_every_namespace() {
        let inner = CountingSource::returning(Ok(sample_indexes()));
        let cached = CachedIndexSource::new(&inner, Duration::from_secs(60));

        cached.lookup(&ns()).unwrap();
        cached
            .lookup(&Namespace::parse("app.orders").unwrap())
            .unwrap();
        assert_eq!(cached.len(), 2);
        cached.invalidate_all();
        assert!(cached.is_empty());
    }
}
