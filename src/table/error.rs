//! Error types for the integer hash map and its handle registry.
//!
//! Every failure is one of two kinds:
//!
//! - a **contract violation**: the caller asked for a key that is not present,
//!   used a handle that was already released (or never issued), or passed an
//!   invalid configuration;
//! - **resource exhaustion**: the requested table size overflows `usize` or the
//!   allocator refused the new slot array.
//!
//! Neither kind is retried. Fallible operations leave the map exactly as it
//! was before the call.

#[cfg(feature = "handle")]
use crate::handle::MapHandle;

/// Errors reported by [`FixedIntMap`](super::FixedIntMap) and by the
/// handle-based procedural surface.
///
/// # Examples
///
/// ```rust
/// use fixedmap::table::{FixedIntMap, MapError};
///
/// let map = FixedIntMap::new();
/// let error = map.value_of(7).unwrap_err();
/// assert_eq!(error, MapError::KeyNotFound { key: 7 });
/// assert!(error.is_contract_violation());
/// assert_eq!(format!("{error}"), "key 7 is not present in the map");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// A value was requested for a key that is not present.
    KeyNotFound {
        /// The missing key.
        key: u64,
    },
    /// The handle was released by an earlier `free`.
    #[cfg(feature = "handle")]
    ReleasedHandle {
        /// The stale handle.
        handle: MapHandle,
    },
    /// The handle was never issued by this registry.
    #[cfg(feature = "handle")]
    UnknownHandle {
        /// The unrecognised handle.
        handle: MapHandle,
    },
    /// A map was built from an invalid [`MapConfig`](super::MapConfig).
    InvalidConfig {
        /// What the validation rejected.
        source: ConfigError,
    },
    /// The slot count needed for the request does not fit in `usize`.
    CapacityOverflow {
        /// Number of entries the table was asked to hold.
        requested: usize,
    },
    /// The allocator could not provide the new slot array.
    AllocationFailed {
        /// Number of slots that could not be allocated.
        capacity: usize,
    },
}

impl MapError {
    /// Returns `true` for errors caused by misuse of the API.
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        match self {
            Self::KeyNotFound { .. } | Self::InvalidConfig { .. } => true,
            #[cfg(feature = "handle")]
            Self::ReleasedHandle { .. } | Self::UnknownHandle { .. } => true,
            Self::CapacityOverflow { .. } | Self::AllocationFailed { .. } => false,
        }
    }

    /// Returns `true` for errors caused by running out of memory or address space.
    #[must_use]
    pub const fn is_resource_exhaustion(&self) -> bool {
        matches!(
            self,
            Self::CapacityOverflow { .. } | Self::AllocationFailed { .. }
        )
    }
}

impl std::fmt::Display for MapError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyNotFound { key } => write!(formatter, "key {key} is not present in the map"),
            #[cfg(feature = "handle")]
            Self::ReleasedHandle { handle } => {
                write!(formatter, "map handle {handle} was already released")
            }
            #[cfg(feature = "handle")]
            Self::UnknownHandle { handle } => {
                write!(formatter, "map handle {handle} was never issued by this registry")
            }
            Self::InvalidConfig { source } => write!(formatter, "invalid map configuration: {source}"),
            Self::CapacityOverflow { requested } => write!(
                formatter,
                "capacity overflow: a table for {requested} entries does not fit in usize"
            ),
            Self::AllocationFailed { capacity } => {
                write!(formatter, "failed to allocate a table of {capacity} slots")
            }
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig { source } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for MapError {
    fn from(source: ConfigError) -> Self {
        Self::InvalidConfig { source }
    }
}

/// Errors reported when validating a [`MapConfig`](super::MapConfig).
///
/// Rejected load factors compare by bit pattern, so an error carrying `NaN`
/// equals itself.
#[derive(Debug, Clone, Copy)]
pub enum ConfigError {
    /// The maximum load factor is not finite or lies outside
    /// [`MIN_LOAD_FACTOR`](super::MIN_LOAD_FACTOR)..=[`MAX_LOAD_FACTOR`](super::MAX_LOAD_FACTOR).
    InvalidLoadFactor {
        /// The rejected value.
        value: f64,
    },
}

impl PartialEq for ConfigError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidLoadFactor { value }, Self::InvalidLoadFactor { value: other }) => {
                value.to_bits() == other.to_bits()
            }
        }
    }
}

impl Eq for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLoadFactor { value } => write!(
                formatter,
                "invalid max load factor {value}: expected a value in [{}, {}]",
                super::MIN_LOAD_FACTOR,
                super::MAX_LOAD_FACTOR
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
