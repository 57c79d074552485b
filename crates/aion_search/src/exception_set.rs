//! Canonical, shared exception-state sets.
//!
//! An [`ExceptionStatePool`] hash-conses finished staging sets: promoting two
//! staging sets with the same membership yields handles to one pooled entry.
//! [`ExceptionStateSet`] handles share the entry through an `Rc`; cloning a
//! handle bumps the count and dropping the last one evicts the entry from its
//! pool. An empty staging set promotes to the sentinel handle, which owns no
//! entry.
//!
//! Pools and handles are confined to the thread that created them. Each
//! traversal worker owns its own pool, so promotion never takes a lock, and
//! moving a handle to another thread is rejected at compile time:
//!
//! ```compile_fail
//! fn assert_send<T: Send>() {}
//! assert_send::<aion_search::ExceptionStateSet<aion_search::MatcherState>>();
//! ```
//!
//! Identity equality (`==`) is only meaningful between handles of one pool.
//! Content-equal sets built on different threads live in different pools;
//! compare those with [`ExceptionStateSet::content_eq`] or
//! [`ExceptionStateSet::compare`].

use crate::config::SearchConfig;
use crate::exception::ExceptionState;
use crate::exception_states::ExceptionStates;
use aion_common::QuantizedHasher;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// Counters describing a pool's activity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Calls to [`ExceptionStatePool::promote`].
    pub promotions: u64,
    /// Promotions of empty staging sets.
    pub sentinel_promotions: u64,
    /// Promotions resolved to an existing entry.
    pub hits: u64,
    /// Promotions that created a new entry.
    pub inserts: u64,
    /// Entries removed after their last handle was dropped.
    pub evictions: u64,
}

struct Registry<S: ExceptionState> {
    buckets: HashMap<u64, Vec<Weak<Entry<S>>>>,
    live: usize,
    next_serial: u64,
    stats: PoolStats,
}

impl<S: ExceptionState> Registry<S> {
    fn find(&self, hash: u64, members: &[S]) -> Option<Rc<Entry<S>>> {
        self.buckets.get(&hash).and_then(|bucket| {
            bucket
                .iter()
                .filter_map(Weak::upgrade)
                .find(|entry| *entry.members == *members)
        })
    }

    // Called from `Entry::drop`, when the entry's strong count is already 0.
    fn evict(&mut self, hash: u64, serial: u64) {
        debug_assert!(
            self.buckets.contains_key(&hash),
            "evicting entry {serial} from an empty bucket"
        );
        let Some(bucket) = self.buckets.get_mut(&hash) else {
            return;
        };
        let before = bucket.len();
        bucket.retain(|entry| entry.strong_count() > 0);
        let removed = before - bucket.len();
        if bucket.is_empty() {
            self.buckets.remove(&hash);
        }
        debug_assert!(removed <= self.live, "pool entry count underflow");
        self.live -= removed;
        self.stats.evictions += removed as u64;
        trace!(serial, hash, live = self.live, "evicted exception-state set");
    }
}

struct Entry<S: ExceptionState> {
    members: Box<[S]>,
    hash: u64,
    has_loop_path: bool,
    has_filter_path: bool,
    serial: u64,
    registry: Weak<RefCell<Registry<S>>>,
}

impl<S: ExceptionState> Drop for Entry<S> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().evict(self.hash, self.serial);
        }
    }
}

fn set_hash<S: ExceptionState>(members: &[S]) -> u64 {
    let mut hasher = QuantizedHasher::new();
    for state in members {
        hasher.mix(&state.state_hash());
    }
    hasher.finish()
}

/// Thread-owned registry of canonical exception-state sets.
pub struct ExceptionStatePool<S: ExceptionState> {
    registry: Rc<RefCell<Registry<S>>>,
}

impl<S: ExceptionState> Default for ExceptionStatePool<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ExceptionState> ExceptionStatePool<S> {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty pool with room for `capacity` distinct hashes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                buckets: HashMap::with_capacity(capacity),
                live: 0,
                next_serial: 0,
                stats: PoolStats::default(),
            })),
        }
    }

    /// Creates a pool sized by the `[pool]` configuration table.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::with_capacity(config.pool.initial_capacity)
    }

    /// Converts a staging set into a canonical handle.
    ///
    /// An empty staging set yields the sentinel without touching the pool.
    /// Otherwise the pooled entry with the same membership is shared, or a
    /// new entry is registered.
    pub fn promote(&self, states: ExceptionStates<S>) -> ExceptionStateSet<S> {
        let mut registry = self.registry.borrow_mut();
        registry.stats.promotions += 1;
        if states.is_empty() {
            registry.stats.sentinel_promotions += 1;
            return ExceptionStateSet::empty();
        }

        let (members, has_loop_path, has_filter_path) = states.into_parts();
        let hash = set_hash(&members);
        if let Some(entry) = registry.find(hash, &members) {
            registry.stats.hits += 1;
            trace!(serial = entry.serial, hash, "reused exception-state set");
            return ExceptionStateSet { entry: Some(entry) };
        }

        let serial = registry.next_serial;
        registry.next_serial += 1;
        let entry = Rc::new(Entry {
            members: members.into_boxed_slice(),
            hash,
            has_loop_path,
            has_filter_path,
            serial,
            registry: Rc::downgrade(&self.registry),
        });
        registry
            .buckets
            .entry(hash)
            .or_default()
            .push(Rc::downgrade(&entry));
        registry.live += 1;
        registry.stats.inserts += 1;
        trace!(
            serial,
            hash,
            len = entry.members.len(),
            live = registry.live,
            "registered exception-state set"
        );
        ExceptionStateSet { entry: Some(entry) }
    }

    /// Number of live canonical entries.
    pub fn len(&self) -> usize {
        self.registry.borrow().live
    }

    /// Returns `true` when no canonical entry is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Activity counters.
    pub fn stats(&self) -> PoolStats {
        self.registry.borrow().stats
    }

    /// Returns `true` when `set` is the sentinel or an entry of this pool.
    pub fn owns(&self, set: &ExceptionStateSet<S>) -> bool {
        set.entry
            .as_ref()
            .map_or(true, |entry| entry.registry.as_ptr() == Rc::as_ptr(&self.registry))
    }
}

impl<S: ExceptionState> Drop for ExceptionStatePool<S> {
    fn drop(&mut self) {
        let registry = self.registry.borrow();
        debug!(
            live = registry.live,
            promotions = registry.stats.promotions,
            hits = registry.stats.hits,
            inserts = registry.stats.inserts,
            evictions = registry.stats.evictions,
            "dropping exception-state pool"
        );
    }
}

impl<S: ExceptionState> fmt::Debug for ExceptionStatePool<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("ExceptionStatePool")
            .field("live", &registry.live)
            .field("stats", &registry.stats)
            .finish()
    }
}

/// Shared handle to a canonical exception-state set, or the empty sentinel.
pub struct ExceptionStateSet<S: ExceptionState> {
    entry: Option<Rc<Entry<S>>>,
}

impl<S: ExceptionState> ExceptionStateSet<S> {
    /// The "no exceptions" sentinel.
    pub fn empty() -> Self {
        Self { entry: None }
    }

    /// Returns `true` for the sentinel.
    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    /// Number of member states; 0 for the sentinel.
    pub fn len(&self) -> usize {
        self.entry.as_ref().map_or(0, |entry| entry.members.len())
    }

    /// Whether any member belongs to a loop exception.
    pub fn has_loop_path(&self) -> bool {
        self.entry.as_ref().is_some_and(|entry| entry.has_loop_path)
    }

    /// Whether any member belongs to a report filter.
    pub fn has_filter_path(&self) -> bool {
        self.entry.as_ref().is_some_and(|entry| entry.has_filter_path)
    }

    /// Cached content hash; 0 for the sentinel.
    pub fn hash_value(&self) -> u64 {
        self.entry.as_ref().map_or(0, |entry| entry.hash)
    }

    /// Number of live handles to the entry; 0 for the sentinel.
    pub fn ref_count(&self) -> usize {
        self.entry.as_ref().map_or(0, Rc::strong_count)
    }

    /// Serial number of the entry within its pool. Entries are numbered in
    /// creation order, so a re-created entry never reuses an old serial.
    pub fn serial(&self) -> Option<u64> {
        self.entry.as_ref().map(|entry| entry.serial)
    }

    /// Iterates over the member states in ascending order.
    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.members().iter()
    }

    fn members(&self) -> &[S] {
        match &self.entry {
            Some(entry) => &entry.members[..],
            None => &[],
        }
    }

    /// Returns `true` when both handles reference entries of the same pool,
    /// or either is the sentinel.
    pub fn same_pool(&self, other: &Self) -> bool {
        match (&self.entry, &other.entry) {
            (Some(a), Some(b)) => Weak::ptr_eq(&a.registry, &b.registry),
            _ => true,
        }
    }

    /// Structural equality, valid across pools.
    pub fn content_eq(&self, other: &Self) -> bool {
        self.hash_value() == other.hash_value() && self.members() == other.members()
    }

    /// Total order: sentinel first, then fewer members first, then the first
    /// differing member in iteration order.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (&self.entry, &other.entry) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) if Rc::ptr_eq(a, b) => Ordering::Equal,
            (Some(a), Some(b)) => a
                .members
                .len()
                .cmp(&b.members.len())
                .then_with(|| a.members.iter().cmp(b.members.iter())),
        }
    }
}

impl<S: ExceptionState> Default for ExceptionStateSet<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: ExceptionState> Clone for ExceptionStateSet<S> {
    fn clone(&self) -> Self {
        Self {
            entry: self.entry.clone(),
        }
    }
}

impl<S: ExceptionState> PartialEq for ExceptionStateSet<S> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.entry, &other.entry) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<S: ExceptionState> Eq for ExceptionStateSet<S> {}

impl<S: ExceptionState> Hash for ExceptionStateSet<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_value());
    }
}

impl<'a, S: ExceptionState> IntoIterator for &'a ExceptionStateSet<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: ExceptionState + fmt::Debug> fmt::Debug for ExceptionStateSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entry {
            None => write!(f, "ExceptionStateSet(empty)"),
            Some(entry) => f
                .debug_struct("ExceptionStateSet")
                .field("serial", &entry.serial)
                .field("members", &entry.members)
                .finish(),
        }
    }
}
