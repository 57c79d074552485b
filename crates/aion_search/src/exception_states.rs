//! Staging accumulator for exception matcher states.
//!
//! Graph traversal collects the matcher states armed along a path segment in
//! an [`ExceptionStates`], then hands it to
//! [`ExceptionStatePool::promote`](crate::ExceptionStatePool::promote) to get
//! a canonical, shared set. The staging set is single-owner: it cannot be
//! cloned, only moved or drained with [`take`](ExceptionStates::take).

use crate::exception::ExceptionState;
use std::collections::BTreeSet;

/// Mutable, move-only set of matcher states under construction.
///
/// Storage is allocated on the first insert. The loop/filter flags are
/// maintained incrementally as states are inserted.
#[derive(Debug)]
pub struct ExceptionStates<S: ExceptionState> {
    holder: Option<BTreeSet<S>>,
    has_loop_path: bool,
    has_filter_path: bool,
}

impl<S: ExceptionState> Default for ExceptionStates<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ExceptionState> ExceptionStates<S> {
    /// Creates an empty staging set without allocating.
    pub fn new() -> Self {
        Self {
            holder: None,
            has_loop_path: false,
            has_filter_path: false,
        }
    }

    /// Adds a state. Inserting a state already present is a no-op.
    pub fn insert(&mut self, state: S) {
        self.has_loop_path |= state.is_loop();
        self.has_filter_path |= state.is_filter();
        self.holder.get_or_insert_with(BTreeSet::new).insert(state);
    }

    /// Discards all states and resets both flags.
    pub fn clear(&mut self) {
        self.holder = None;
        self.has_loop_path = false;
        self.has_filter_path = false;
    }

    /// Returns `true` when no storage is held.
    pub fn is_empty(&self) -> bool {
        self.holder.as_ref().map_or(true, BTreeSet::is_empty)
    }

    /// Number of distinct states.
    pub fn len(&self) -> usize {
        self.holder.as_ref().map_or(0, BTreeSet::len)
    }

    /// Whether any state belongs to a loop exception.
    pub fn has_loop_path(&self) -> bool {
        self.has_loop_path
    }

    /// Whether any state belongs to a report filter.
    pub fn has_filter_path(&self) -> bool {
        self.has_filter_path
    }

    /// Iterates over the states in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.holder.iter().flatten()
    }

    /// Moves the storage and flags into a new staging set, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Replaces the contents of `self` with those of `other`.
    pub fn take_over(&mut self, other: Self) {
        *self = other;
    }

    /// Consumes the staging set, yielding its sorted states and flags.
    pub(crate) fn into_parts(self) -> (Vec<S>, bool, bool) {
        let states = self
            .holder
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();
        (states, self.has_loop_path, self.has_filter_path)
    }
}

impl<S: ExceptionState> Extend<S> for ExceptionStates<S> {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for state in iter {
            self.insert(state);
        }
    }
}

impl<S: ExceptionState> FromIterator<S> for ExceptionStates<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut states = Self::new();
        states.extend(iter);
        states
    }
}
