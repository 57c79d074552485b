//! Timing-exception matcher states as seen by the path search.
//!
//! The exception model decides which exception applies where. The search layer
//! only stores the resulting matcher states and needs two classifications
//! from each: does it belong to a loop exception, and does it belong to a
//! report filter.

use crate::ids::ExceptionId;
use aion_common::QuantizedHasher;
use serde::{Deserialize, Serialize};

/// The kind of timing exception a matcher state belongs to.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionKind {
    /// `set_false_path`.
    FalsePath,
    /// `set_multicycle_path`.
    Multicycle,
    /// `set_max_delay` / `set_min_delay`.
    PathDelay,
    /// Report filter (`report_checks -from/-through/-to`).
    Filter,
    /// Combinational loop breaker.
    Loop,
    /// `group_path`.
    GroupPath,
}

impl ExceptionKind {
    /// Returns `true` for loop exceptions.
    pub fn is_loop(self) -> bool {
        self == ExceptionKind::Loop
    }

    /// Returns `true` for report filters.
    pub fn is_filter(self) -> bool {
        self == ExceptionKind::Filter
    }
}

/// A matcher state that can be stored in an exception-state set.
///
/// The ordering must be a total order consistent with equality; it defines
/// the iteration order of canonical sets and therefore their comparison.
pub trait ExceptionState: Ord + Clone {
    /// Stable hash of the state.
    fn state_hash(&self) -> u64;

    /// Whether the owning exception is a loop exception.
    fn is_loop(&self) -> bool;

    /// Whether the owning exception is a report filter.
    fn is_filter(&self) -> bool;
}

/// "Exception `exception` is armed at position `index` of its through-list."
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct MatcherState {
    /// The owning exception.
    pub exception: ExceptionId,
    /// Kind of the owning exception.
    pub kind: ExceptionKind,
    /// Position within the exception's `-through` sequence.
    pub index: u32,
}

impl MatcherState {
    /// Creates a matcher state.
    pub fn new(exception: ExceptionId, kind: ExceptionKind, index: u32) -> Self {
        Self {
            exception,
            kind,
            index,
        }
    }
}

impl ExceptionState for MatcherState {
    fn state_hash(&self) -> u64 {
        QuantizedHasher::new()
            .mix(&self.exception)
            .mix_ordinal(self.kind as usize)
            .mix(&self.index)
            .finish()
    }

    fn is_loop(&self) -> bool {
        self.kind.is_loop()
    }

    fn is_filter(&self) -> bool {
        self.kind.is_filter()
    }
}
