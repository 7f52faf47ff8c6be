//! # fixedmap
//!
//! An open-addressed hash map from `u64` keys to `u64` values, built from
//! scratch, plus a handle-based procedural surface for callers that cannot
//! hold Rust references.
//!
//! ## Overview
//!
//! - **Hash table**: [`FixedIntMap`](table::FixedIntMap) with linear probing,
//!   tombstone deletion and power-of-two growth
//! - **Hashers**: splitmix64 by default, Fx-style multiply, or any `BuildHasher`
//! - **Handles**: [`MapRegistry`](handle::MapRegistry) hands out generational
//!   handles and reports use-after-free and double free as errors
//!
//! ## Feature Flags
//!
//! - `handle`: the handle registry (enabled by default)
//! - `serde`: `Serialize`/`Deserialize` for maps and configuration
//! - `fxhash`: `rustc-hash` based [`FxKeys`](table::FxKeys) hasher
//! - `ahash`: `ahash` based [`AKeys`](table::AKeys) hasher
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use fixedmap::prelude::*;
//!
//! let mut map = FixedIntMap::new();
//! map.insert(1, 100);
//! map.insert(1, 200);
//! assert_eq!(map.get(1), Some(200));
//! assert_eq!(map.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Entry and slot counts are converted to f64 for load-factor arithmetic
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use fixedmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::table::*;

    #[cfg(feature = "handle")]
    pub use crate::handle::*;
}

pub mod table;

#[cfg(feature = "handle")]
pub mod handle;
