//! Integer hash table.
//!
//! This module provides the from-scratch hash map and everything it is built
//! from:
//!
//! - [`FixedIntMap`]: open-addressed `u64 -> u64` map with tombstone deletion
//! - [`KeyHasher`]: the mixing functions that place keys in the table
//! - [`MapConfig`]: validated construction-time settings
//! - [`MapError`] / [`ConfigError`]: the error taxonomy
//!
//! # Examples
//!
//! ## Basic use
//!
//! ```rust
//! use fixedmap::table::FixedIntMap;
//!
//! let mut map = FixedIntMap::new();
//! assert!(map.is_empty());
//!
//! map.insert(1, 100);
//! assert!(map.contains_key(1));
//! assert_eq!(map.get(1), Some(100));
//!
//! map.insert(1, 200);
//! assert_eq!(map.get(1), Some(200));
//! assert_eq!(map.len(), 1);
//!
//! map.discard(1);
//! assert!(map.is_empty());
//! ```
//!
//! ## Choosing a hasher
//!
//! ```rust
//! use fixedmap::table::{FixedIntMap, FxMix};
//!
//! let mut map = FixedIntMap::with_hasher(FxMix);
//! map.extend((0..1000).map(|key| (key, key * 2)));
//! assert_eq!(map.get(500), Some(1000));
//! ```
//!
//! ## Contract violations
//!
//! ```rust
//! use fixedmap::table::{FixedIntMap, MapError};
//!
//! let mut map = FixedIntMap::new();
//! assert_eq!(map.take(9), Err(MapError::KeyNotFound { key: 9 }));
//! ```

mod config;
mod error;
mod hasher;
mod int_map;

pub use config::DEFAULT_MAX_LOAD_FACTOR;
pub use config::MAX_LOAD_FACTOR;
pub use config::MIN_LOAD_FACTOR;
pub use config::MapConfig;
pub use error::ConfigError;
pub use error::MapError;
#[cfg(feature = "ahash")]
pub use hasher::AKeys;
pub use hasher::BuildHasherKeys;
#[cfg(feature = "fxhash")]
pub use hasher::FxKeys;
pub use hasher::FxMix;
pub use hasher::KeyHasher;
pub use hasher::SplitMix64;
pub use int_map::Drain;
pub use int_map::FixedIntMap;
pub use int_map::IntoIter;
pub use int_map::Iter;
pub use int_map::MIN_CAPACITY;
pub use int_map::MapStats;
