//! Quantized hashing for identity keys built from heterogeneous fields.
//!
//! Timing identities mix opaque ids, flags, small enums and floating time
//! values into one 64-bit hash. Floating values are first quantized to integer
//! ticks of [`TICKS_PER_SECOND`] so that values equal within the engine's time
//! resolution always contribute the same bits, independent of representation
//! noise in the low mantissa bits.

/// Initial value of every running hash.
pub const HASH_INIT: u64 = 5381;

/// Quantization scale applied to time values (seconds) before mixing.
///
/// One tick is one picosecond.
pub const TICKS_PER_SECOND: f64 = 1e12;

/// Converts a time in seconds to integer ticks, rounding to the nearest tick.
///
/// Bucket edges sit at half ticks, so values a whisker off a whole tick still
/// land on it. NaN maps to zero and out-of-range values saturate.
pub fn quantize_time(seconds: f64) -> i64 {
    (seconds * TICKS_PER_SECOND).round() as i64
}

/// Folds one field's contribution into a running hash.
pub fn mix<T: HashMix + ?Sized>(hash: &mut u64, field: &T) {
    field.mix_into(hash);
}

fn mix_word(hash: &mut u64, word: u64) {
    *hash = xxhash_rust::xxh3::xxh3_64_with_seed(&word.to_le_bytes(), *hash);
}

/// A value that can contribute to a quantized hash.
pub trait HashMix {
    /// Mixes this value into `hash`.
    fn mix_into(&self, hash: &mut u64);
}

macro_rules! impl_mix_int {
    ($($ty:ty),*) => {
        $(
            impl HashMix for $ty {
                fn mix_into(&self, hash: &mut u64) {
                    mix_word(hash, *self as u64);
                }
            }
        )*
    };
}

impl_mix_int!(u8, u16, u32, u64, usize, i32, i64);

impl HashMix for bool {
    fn mix_into(&self, hash: &mut u64) {
        mix_word(hash, u64::from(*self));
    }
}

impl HashMix for f64 {
    fn mix_into(&self, hash: &mut u64) {
        mix_word(hash, quantize_time(*self) as u64);
    }
}

impl HashMix for f32 {
    fn mix_into(&self, hash: &mut u64) {
        f64::from(*self).mix_into(hash);
    }
}

/// A presence word is mixed ahead of the value, so `(None, Some(x))` and
/// `(Some(x), None)` hash apart.
impl<T: HashMix> HashMix for Option<T> {
    fn mix_into(&self, hash: &mut u64) {
        match self {
            Some(value) => {
                mix_word(hash, 1);
                value.mix_into(hash);
            }
            None => mix_word(hash, 0),
        }
    }
}

impl<T: HashMix + ?Sized> HashMix for &T {
    fn mix_into(&self, hash: &mut u64) {
        (**self).mix_into(hash);
    }
}

/// Accumulator over [`mix`] for building a hash field by field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuantizedHasher(u64);

impl QuantizedHasher {
    /// Starts a new hash at [`HASH_INIT`].
    pub fn new() -> Self {
        Self(HASH_INIT)
    }

    /// Mixes one field.
    pub fn mix<T: HashMix + ?Sized>(&mut self, field: &T) -> &mut Self {
        field.mix_into(&mut self.0);
        self
    }

    /// Mixes a fieldless enum by its ordinal.
    pub fn mix_ordinal(&mut self, ordinal: usize) -> &mut Self {
        mix_word(&mut self.0, ordinal as u64);
        self
    }

    /// Returns the accumulated hash.
    pub fn finish(&self) -> u64 {
        self.0
    }
}

impl Default for QuantizedHasher {
    fn default() -> Self {
        Self::new()
    }
}
