//! Per-call-site polymorphic dispatch cache.
//!
//! A [`DispatchSite`] memoizes, for up to `limit` distinct concrete types, the
//! method resolved for one [`Operation`]. Sites move through three states:
//!
//! - `Empty`: nothing cached yet.
//! - `Populating`: between 1 and `limit` entries.
//! - `Uncached`: a type outside the cache arrived after the cache was full.
//!   This state is terminal; every later call resolves afresh.
//!
//! Entries are append-only and never evicted. Resolution for a type is
//! invariant for the life of the process, so an entry never goes stale.
//!
//! # Concurrency
//!
//! Hits take a read lock only. A miss performs the host lookup with no lock
//! held and then re-checks under the write lock, so two threads racing on
//! the same new type converge on a single entry, and the entry count never
//! exceeds the limit. The `uncached` flag is only ever set, never cleared.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::config::DEFAULT_CACHE_LIMIT;
use crate::host::Operation;

#[derive(Clone, Debug)]
struct CacheEntry<K, M> {
    klass: K,
    method: M,
}

/// How a call was resolved, which also selects the invocation path.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution<M> {
    /// Found in the cache: invoke directly.
    Cached(M),
    /// Looked up and appended by this call: invoke indirectly once.
    Installed(M),
    /// Looked up because the site is uncached: invoke indirectly.
    Megamorphic(M),
}

impl<M> Resolution<M> {
    pub fn method(&self) -> &M {
        match self {
            Resolution::Cached(m) | Resolution::Installed(m) | Resolution::Megamorphic(m) => m,
        }
    }
}

/// Observable state of a site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SiteState {
    Empty,
    Populating,
    Uncached,
}

impl fmt::Display for SiteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteState::Empty => write!(f, "empty"),
            SiteState::Populating => write!(f, "populating"),
            SiteState::Uncached => write!(f, "uncached"),
        }
    }
}

/// Point-in-time copy of a site's state and counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SiteSnapshot {
    pub operation: Operation,
    pub state: SiteState,
    pub entries: usize,
    pub limit: usize,
    pub hits: u64,
    pub installs: u64,
    pub megamorphic_calls: u64,
}

impl fmt::Display for SiteSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4} {} {}/{} hits={} installs={} uncached={}",
            self.operation.name(),
            self.state,
            self.entries,
            self.limit,
            self.hits,
            self.installs,
            self.megamorphic_calls
        )
    }
}

pub struct DispatchSite<K, M> {
    operation: Operation,
    limit: usize,
    entries: RwLock<SmallVec<[CacheEntry<K, M>; DEFAULT_CACHE_LIMIT]>>,
    uncached: AtomicBool,
    hits: AtomicU64,
    installs: AtomicU64,
    megamorphic_calls: AtomicU64,
}

impl<K, M> DispatchSite<K, M>
where
    K: Clone + PartialEq + fmt::Debug,
    M: Clone,
{
    pub fn new(operation: Operation, limit: usize) -> Self {
        Self {
            operation,
            limit,
            entries: RwLock::new(SmallVec::new()),
            uncached: AtomicBool::new(false),
            hits: AtomicU64::new(0),
            installs: AtomicU64::new(0),
            megamorphic_calls: AtomicU64::new(0),
        }
    }

    /// A site that starts, and stays, in uncached mode.
    pub fn uncached(operation: Operation) -> Self {
        let site = Self::new(operation, 0);
        site.uncached.store(true, Ordering::Release);
        site
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn is_uncached(&self) -> bool {
        self.uncached.load(Ordering::Acquire)
    }

    /// Resolve the method for `klass`, calling `lookup` only on a miss.
    pub fn resolve(&self, klass: &K, lookup: impl FnOnce(&K) -> M) -> Resolution<M> {
        if !self.is_uncached() {
            if let Some(method) = self.find(klass) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(op = %self.operation, ?klass, "dispatch cache hit");
                return Resolution::Cached(method);
            }
        }

        // Lookups run outside the lock; a racing thread may do the same work.
        let method = lookup(klass);

        if !self.is_uncached() {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            // Re-checked under the write lock: another thread may have
            // installed this klass or flipped the site while we looked up.
            if !self.is_uncached() {
                if let Some(existing) = entries.iter().find(|e| e.klass == *klass) {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Resolution::Cached(existing.method.clone());
                }
                if entries.len() < self.limit {
                    entries.push(CacheEntry {
                        klass: klass.clone(),
                        method: method.clone(),
                    });
                    self.installs.fetch_add(1, Ordering::Relaxed);
                    debug!(
                        op = %self.operation,
                        ?klass,
                        entries = entries.len(),
                        limit = self.limit,
                        "dispatch cache install"
                    );
                    return Resolution::Installed(method);
                }
                self.uncached.store(true, Ordering::Release);
                debug!(
                    op = %self.operation,
                    ?klass,
                    limit = self.limit,
                    "dispatch site exceeded cache limit, switching to uncached mode"
                );
            }
        }

        self.megamorphic_calls.fetch_add(1, Ordering::Relaxed);
        Resolution::Megamorphic(method)
    }

    fn find(&self, klass: &K) -> Option<M> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .iter()
            .find(|e| e.klass == *klass)
            .map(|e| e.method.clone())
    }

    /// Cached concrete types, in installation order.
    pub fn cached_klasses(&self) -> Vec<K> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.iter().map(|e| e.klass.clone()).collect()
    }

    pub fn state(&self) -> SiteState {
        if self.is_uncached() {
            return SiteState::Uncached;
        }
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        if entries.is_empty() {
            SiteState::Empty
        } else {
            SiteState::Populating
        }
    }

    pub fn snapshot(&self) -> SiteSnapshot {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        SiteSnapshot {
            operation: self.operation,
            state: self.state(),
            entries,
            limit: self.limit,
            hits: self.hits.load(Ordering::Relaxed),
            installs: self.installs.load(Ordering::Relaxed),
            megamorphic_calls: self.megamorphic_calls.load(Ordering::Relaxed),
        }
    }
}

impl<K, M> fmt::Debug for DispatchSite<K, M>
where
    K: Clone + PartialEq + fmt::Debug,
    M: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchSite")
            .field("operation", &self.operation)
            .field("state", &self.state())
            .field("klasses", &self.cached_klasses())
            .field("limit", &self.limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    fn site() -> DispatchSite<u32, String> {
        DispatchSite::new(Operation::Size, 3)
    }

    #[test]
    fn test_empty_site() {
        let site = site();
        assert_eq!(site.state(), SiteState::Empty);
        assert!(site.cached_klasses().is_empty());
    }

    #[test]
    fn test_install_then_hit() {
        let site = site();
        let lookups = AtomicUsize::new(0);
        let lookup = |k: &u32| {
            lookups.fetch_add(1, Ordering::SeqCst);
            format!("size@{k}")
        };

        assert_eq!(
            site.resolve(&1, lookup),
            Resolution::Installed("size@1".to_string())
        );
        assert_eq!(site.state(), SiteState::Populating);

        let second = site.resolve(&1, |_| unreachable!("cached klass looked up again"));
        assert_eq!(second, Resolution::Cached("size@1".to_string()));
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fourth_klass_goes_uncached() {
        let site = site();
        for k in 1..=3 {
            let r = site.resolve(&k, |k| format!("m{k}"));
            assert!(matches!(r, Resolution::Installed(_)));
        }
        assert_eq!(site.state(), SiteState::Populating);

        let r = site.resolve(&4, |k| format!("m{k}"));
        assert_eq!(r, Resolution::Megamorphic("m4".to_string()));
        assert_eq!(site.state(), SiteState::Uncached);

        // Terminal: previously cached klasses are now resolved afresh too.
        let r = site.resolve(&1, |k| format!("fresh{k}"));
        assert_eq!(r, Resolution::Megamorphic("fresh1".to_string()));
        assert_eq!(site.cached_klasses(), vec![1, 2, 3]);
    }

    #[test]
    fn test_uncached_constructor() {
        let site: DispatchSite<u32, &str> = DispatchSite::uncached(Operation::Get);
        assert_eq!(site.state(), SiteState::Uncached);
        assert!(matches!(site.resolve(&1, |_| "m"), Resolution::Megamorphic("m")));
        assert!(site.cached_klasses().is_empty());
    }

    #[test]
    fn test_zero_limit() {
        let site: DispatchSite<u32, u32> = DispatchSite::new(Operation::Set, 0);
        assert_eq!(site.state(), SiteState::Empty);
        assert!(matches!(site.resolve(&9, |k| *k), Resolution::Megamorphic(9)));
        assert_eq!(site.state(), SiteState::Uncached);
    }

    #[test]
    fn test_snapshot_counters() {
        let site = site();
        site.resolve(&1, |_| "a".to_string());
        site.resolve(&1, |_| "a".to_string());
        site.resolve(&1, |_| "a".to_string());
        site.resolve(&2, |_| "b".to_string());

        let snap = site.snapshot();
        assert_eq!(snap.state, SiteState::Populating);
        assert_eq!(snap.entries, 2);
        assert_eq!(snap.hits, 2);
        assert_eq!(snap.installs, 2);
        assert_eq!(snap.megamorphic_calls, 0);
        assert_eq!(
            snap.to_string(),
            "size populating 2/3 hits=2 installs=2 uncached=0"
        );
    }

    #[test]
    fn test_concurrent_population_converges() {
        let site = Arc::new(DispatchSite::<u32, u32>::new(Operation::Get, 3));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let site = Arc::clone(&site);
                std::thread::spawn(move || {
                    for i in 0..200u32 {
                        let klass = (i + t) % 3;
                        let r = site.resolve(&klass, |k| k * 10);
                        assert_eq!(*r.method(), klass * 10);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let mut klasses = site.cached_klasses();
        klasses.sort();
        assert_eq!(klasses, vec![0, 1, 2]);
        assert_eq!(site.state(), SiteState::Populating);
        assert_eq!(site.snapshot().installs, 3);
    }

    #[test]
    fn test_concurrent_overflow_respects_limit() {
        let site = Arc::new(DispatchSite::<u32, u32>::new(Operation::Get, 3));
        let handles: Vec<_> = (0..6u32)
            .map(|t| {
                let site = Arc::clone(&site);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let r = site.resolve(&t, |k| k + 100);
                        assert_eq!(*r.method(), t + 100);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(site.state(), SiteState::Uncached);
        assert!(site.cached_klasses().len() <= 3);
    }
}
