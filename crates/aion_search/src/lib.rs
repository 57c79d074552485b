//! Canonical path-identity contexts for the Aion static timing search.
//!
//! Path search enumerates huge numbers of timing paths, but only a small
//! number of distinct derivation contexts. This crate provides the pieces a
//! tag is built from, in deduplicated form:
//!
//! - [`ClkInfo`] — the clock-derivation context of a path, hashed once at
//!   construction with time values quantized to picoseconds.
//! - [`ExceptionStates`] — a move-only staging set of armed exception matcher
//!   states, filled while walking the graph.
//! - [`ExceptionStatePool`] / [`ExceptionStateSet`] — a per-thread
//!   hash-consing pool turning staging sets into shared, reference-counted
//!   canonical sets.
//!
//! # Usage
//!
//! ```
//! use aion_search::{
//!     ExceptionId, ExceptionKind, ExceptionStatePool, ExceptionStates, MatcherState,
//! };
//!
//! let pool = ExceptionStatePool::new();
//! let mut states = ExceptionStates::new();
//! states.insert(MatcherState::new(ExceptionId::from_raw(0), ExceptionKind::FalsePath, 0));
//! let set = pool.promote(states);
//! assert_eq!(set.len(), 1);
//! assert_eq!(pool.len(), 1);
//! ```
//!
//! # Architecture
//!
//! - [`ids`] — opaque ids of clock edges, pins, vertices, analysis points
//! - [`transition`] — rise/fall and min/max enums
//! - [`context`] — [`SearchContext`], the engine state consulted by `ClkInfo`
//! - [`config`] — TOML search configuration
//! - [`clk_info`] — clock-derivation context
//! - [`exception`] — matcher-state classification
//! - [`exception_states`] — staging set
//! - [`exception_set`] — canonical pool and handles

#![warn(missing_docs)]

pub mod clk_info;
pub mod config;
pub mod context;
pub mod error;
pub mod exception;
pub mod exception_set;
pub mod exception_states;
pub mod ids;
pub mod transition;

pub use clk_info::{ClkInfo, ClkInfoParts, ClockUncertainties};
pub use config::{load_config, load_config_from_str, SearchConfig};
pub use context::SearchContext;
pub use error::ConfigError;
pub use exception::{ExceptionKind, ExceptionState, MatcherState};
pub use exception_set::{ExceptionStatePool, ExceptionStateSet, PoolStats};
pub use exception_states::ExceptionStates;
pub use ids::{ClockEdgeId, ExceptionId, PathApIndex, PathRef, PinId, VertexId};
pub use transition::{MinMax, RiseFall};
