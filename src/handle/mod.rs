//! Handle-based procedural surface over [`FixedIntMap`](crate::table::FixedIntMap).
//!
//! A [`MapRegistry`] owns any number of maps and hands out [`MapHandle`]s,
//! small copyable tokens that can be stored, passed around, or flattened to a
//! single `u64` with [`MapHandle::as_raw`]. Every operation takes the handle
//! as its first argument, in the shape of a flat C-style interface:
//!
//! | operation       | method                                  |
//! |-----------------|-----------------------------------------|
//! | `create`        | [`MapRegistry::create`]                 |
//! | `free`          | [`MapRegistry::free`]                   |
//! | `is_empty`      | [`MapRegistry::is_empty`]               |
//! | `insert`        | [`MapRegistry::insert`]                 |
//! | `contains`      | [`MapRegistry::contains`]               |
//! | `get`           | [`MapRegistry::get`]                    |
//! | `remove`        | [`MapRegistry::remove`]                 |
//! | `remove_return` | [`MapRegistry::remove_return`]          |
//! | `len`           | [`MapRegistry::len`]                    |
//!
//! Releasing a map bumps its slot's generation. Any later use of the old
//! handle, including a second `free`, returns [`MapError::ReleasedHandle`]
//! instead of touching whichever map reuses the slot.
//!
//! # Examples
//!
//! ```rust
//! use fixedmap::handle::MapRegistry;
//! use fixedmap::table::MapError;
//!
//! let mut registry = MapRegistry::new();
//! let handle = registry.create();
//!
//! registry.insert(handle, 5, 50).unwrap();
//! registry.insert(handle, 9, 90).unwrap();
//! assert_eq!(registry.remove_return(handle, 5), Ok(50));
//! assert_eq!(registry.len(handle), Ok(1));
//!
//! registry.free(handle).unwrap();
//! assert_eq!(
//!     registry.free(handle),
//!     Err(MapError::ReleasedHandle { handle })
//! );
//! ```

mod registry;

pub use registry::MapHandle;
pub use registry::MapRegistry;
