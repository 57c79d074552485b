//! Shared foundational types used across the Aion timing search layer.
//!
//! This crate provides the quantized hashing utility used to build stable
//! identity hashes from ids, flags and floating time values.

#![warn(missing_docs)]

pub mod hash;

pub use hash::{mix, quantize_time, HashMix, QuantizedHasher, HASH_INIT, TICKS_PER_SECOND};
