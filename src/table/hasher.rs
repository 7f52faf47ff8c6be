//! Hash functions over `u64` keys.
//!
//! The table takes the low bits of the hash as the home slot, so every
//! [`KeyHasher`] must spread entropy into the low bits. Identity hashing of
//! strided keys (multiples of 1024, say) would put every key in one probe run.

use std::hash::BuildHasher;

/// Maps a key to the 64-bit hash the table indexes with.
///
/// Implementations must be deterministic for the lifetime of a map: the same
/// key must always produce the same hash from the same hasher value.
pub trait KeyHasher {
    /// Hashes a single key.
    fn hash_key(&self, key: u64) -> u64;
}

/// The splitmix64 finalizer. Full avalanche; the default hasher.
///
/// # Examples
///
/// ```rust
/// use fixedmap::table::{KeyHasher, SplitMix64};
///
/// let hasher = SplitMix64;
/// assert_eq!(hasher.hash_key(1), hasher.hash_key(1));
/// assert_ne!(hasher.hash_key(1), hasher.hash_key(2));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitMix64;

impl KeyHasher for SplitMix64 {
    #[inline]
    fn hash_key(&self, key: u64) -> u64 {
        let mut mixed = key.wrapping_add(0x9e37_79b9_7f4a_7c15);
        mixed = (mixed ^ (mixed >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        mixed = (mixed ^ (mixed >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        mixed ^ (mixed >> 31)
    }
}

/// Fx-style multiplicative hash with an xor-shift pre-mix.
///
/// Cheaper than [`SplitMix64`]. The pre-mix folds bits 16.. down before the
/// multiply so that strided keys do not all share their low bits; the final
/// fold brings the well-mixed high half of the product into the low half.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FxMix;

impl KeyHasher for FxMix {
    #[inline]
    fn hash_key(&self, key: u64) -> u64 {
        let premixed = key ^ (key >> 16);
        let product = premixed.wrapping_mul(0x517c_c1b7_2722_0a95);
        product ^ (product >> 32)
    }
}

/// Adapts any [`BuildHasher`] into a [`KeyHasher`].
///
/// # Examples
///
/// ```rust
/// use std::collections::hash_map::RandomState;
/// use fixedmap::table::{BuildHasherKeys, FixedIntMap};
///
/// let mut map = FixedIntMap::with_hasher(BuildHasherKeys::new(RandomState::new()));
/// map.insert(3, 30);
/// assert_eq!(map.get(3), Some(30));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BuildHasherKeys<S> {
    build_hasher: S,
}

impl<S: BuildHasher> BuildHasherKeys<S> {
    /// Wraps a `BuildHasher`.
    #[must_use]
    pub const fn new(build_hasher: S) -> Self {
        Self { build_hasher }
    }

    /// Returns the wrapped `BuildHasher`.
    #[must_use]
    pub const fn build_hasher(&self) -> &S {
        &self.build_hasher
    }
}

impl<S: BuildHasher> KeyHasher for BuildHasherKeys<S> {
    #[inline]
    fn hash_key(&self, key: u64) -> u64 {
        self.build_hasher.hash_one(key)
    }
}

/// `rustc-hash`'s `FxHasher` as a [`KeyHasher`].
#[cfg(feature = "fxhash")]
pub type FxKeys = BuildHasherKeys<rustc_hash::FxBuildHasher>;

/// `ahash` with a per-map random seed as a [`KeyHasher`].
#[cfg(feature = "ahash")]
pub type AKeys = BuildHasherKeys<ahash::RandomState>;
