//! Construction-time configuration for [`FixedIntMap`](super::FixedIntMap).

use super::error::ConfigError;

/// Default maximum ratio of used slots (entries plus tombstones) to capacity.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// Smallest accepted maximum load factor.
pub const MIN_LOAD_FACTOR: f64 = 0.125;

/// Largest accepted maximum load factor.
///
/// Linear probing degrades sharply as the table fills, and a value of `1.0`
/// would leave probe sequences without a terminating empty slot.
pub const MAX_LOAD_FACTOR: f64 = 0.95;

/// Settings applied when a map is created.
///
/// # Examples
///
/// ```rust
/// use fixedmap::table::{FixedIntMap, MapConfig};
///
/// let config = MapConfig::new()
///     .with_initial_capacity(100)
///     .with_max_load_factor(0.5)
///     .unwrap();
/// let map = FixedIntMap::with_config(config).unwrap();
/// assert!(map.capacity() >= 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MapConfig {
    /// Number of entries the map can hold before its first rehash.
    pub initial_capacity: usize,
    /// Ratio of used slots to capacity that triggers a rehash.
    pub max_load_factor: f64,
}

impl MapConfig {
    /// Creates the default configuration: no preallocation, load factor 0.75.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            initial_capacity: 0,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }

    /// Sets the number of entries to preallocate for.
    #[must_use]
    pub const fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the maximum load factor.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLoadFactor`] if `max_load_factor` is not
    /// finite or lies outside [`MIN_LOAD_FACTOR`]..=[`MAX_LOAD_FACTOR`].
    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Result<Self, ConfigError> {
        check_load_factor(max_load_factor)?;
        self.max_load_factor = max_load_factor;
        Ok(self)
    }

    /// Checks a configuration built by hand or deserialized.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLoadFactor`] for an out-of-range load factor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_load_factor(self.max_load_factor)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub(super) fn check_load_factor(value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (MIN_LOAD_FACTOR..=MAX_LOAD_FACTOR).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidLoadFactor { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_default_config() {
        let config = MapConfig::default();
        assert_eq!(config.initial_capacity, 0);
        assert!((config.max_load_factor - DEFAULT_MAX_LOAD_FACTOR).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case(MIN_LOAD_FACTOR)]
    #[case(0.5)]
    #[case(DEFAULT_MAX_LOAD_FACTOR)]
    #[case(MAX_LOAD_FACTOR)]
    fn test_accepts_load_factor(#[case] value: f64) {
        let config = MapConfig::new().with_max_load_factor(value).unwrap();
        assert!((config.max_load_factor - value).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.1)]
    #[case(1.0)]
    #[case(-0.5)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_rejects_load_factor(#[case] value: f64) {
        assert!(MapConfig::new().with_max_load_factor(value).is_err());
    }

    #[rstest]
    fn test_validate_catches_hand_built_config() {
        let config = MapConfig {
            initial_capacity: 16,
            max_load_factor: 2.0,
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidLoadFactor { value: 2.0 })
        );
    }
}
