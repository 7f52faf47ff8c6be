//! Generational registry of owned maps.

use std::fmt;

use crate::table::{ConfigError, FixedIntMap, KeyHasher, MapConfig, MapError, SplitMix64};

// =============================================================================
// MapHandle
// =============================================================================

/// Opaque reference to a map owned by a [`MapRegistry`].
///
/// A handle is a slot index plus the generation of that slot at the time the
/// map was created. It stays valid until the map is freed.
///
/// # Examples
///
/// ```rust
/// use fixedmap::handle::{MapHandle, MapRegistry};
///
/// let mut registry = MapRegistry::new();
/// let handle = registry.create();
///
/// let raw: u64 = handle.as_raw();
/// assert_eq!(MapHandle::from_raw(raw), handle);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapHandle {
    index: u32,
    generation: u32,
}

impl MapHandle {
    /// Packs the handle into a single integer: generation in the high half,
    /// slot index in the low half.
    #[must_use]
    pub fn as_raw(self) -> u64 {
        (u64::from(self.generation) << 32) | u64::from(self.index)
    }

    /// Rebuilds a handle from [`as_raw`](Self::as_raw) output.
    ///
    /// Any integer is accepted; the registry rejects values it never issued.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_raw(raw: u64) -> Self {
        Self {
            index: raw as u32,
            generation: (raw >> 32) as u32,
        }
    }
}

impl fmt::Display for MapHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}v{}", self.index, self.generation)
    }
}

// =============================================================================
// MapRegistry
// =============================================================================

struct RegistrySlot<H> {
    generation: u32,
    map: Option<FixedIntMap<H>>,
}

/// Owns maps and exposes them through [`MapHandle`]s.
///
/// Freed slots are reused for later maps with a bumped generation. A slot
/// whose generation is exhausted is retired rather than reused, so a stale
/// handle can never alias a newer map.
///
/// Like [`FixedIntMap`], the registry is not synchronized.
pub struct MapRegistry<H = SplitMix64> {
    slots: Vec<RegistrySlot<H>>,
    free_slots: Vec<u32>,
    config: MapConfig,
    live: usize,
}

impl MapRegistry<SplitMix64> {
    /// Creates an empty registry whose maps use the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self::from_validated_config(MapConfig::new())
    }

    /// Creates an empty registry whose maps are all built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLoadFactor`] if the configuration is invalid.
    pub fn with_config(config: MapConfig) -> Result<Self, ConfigError> {
        Self::with_hasher_config(config)
    }
}

impl<H: KeyHasher + Default> Default for MapRegistry<H> {
    fn default() -> Self {
        Self::from_validated_config(MapConfig::new())
    }
}

impl<H> MapRegistry<H> {
    const fn from_validated_config(config: MapConfig) -> Self {
        Self {
            slots: Vec::new(),
            free_slots: Vec::new(),
            config,
            live: 0,
        }
    }
}

impl<H: KeyHasher + Default> MapRegistry<H> {
    /// Creates an empty registry for maps hashed with `H`, all built from
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLoadFactor`] if the configuration is invalid.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixedmap::handle::MapRegistry;
    /// use fixedmap::table::{FxMix, MapConfig};
    ///
    /// let mut registry = MapRegistry::<FxMix>::with_hasher_config(MapConfig::new()).unwrap();
    /// let handle = registry.create();
    /// registry.insert(handle, 1, 2).unwrap();
    /// assert_eq!(registry.get(handle, 1), Ok(2));
    /// ```
    pub fn with_hasher_config(config: MapConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated_config(config))
    }

    /// Returns the configuration applied to new maps.
    #[must_use]
    pub const fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Returns the number of maps that have been created and not freed.
    #[must_use]
    pub const fn live_maps(&self) -> usize {
        self.live
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Creates a new empty map and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if the registry already spans `u32::MAX` slots, or if the
    /// configured initial capacity cannot be allocated.
    pub fn create(&mut self) -> MapHandle {
        match self.try_create() {
            Ok(handle) => handle,
            Err(error) => panic!("MapRegistry::create: {error}"),
        }
    }

    /// Creates a new empty map and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::CapacityOverflow`] if the registry already spans
    /// `u32::MAX` slots or the configured initial capacity does not fit in
    /// `usize`, and [`MapError::AllocationFailed`] if the initial table cannot
    /// be allocated. The registry is unchanged in either case.
    pub fn try_create(&mut self) -> Result<MapHandle, MapError> {
        let recycled = self.free_slots.last().copied();
        let index = recycled.map_or_else(|| self.fresh_index(), Ok)?;
        let map = FixedIntMap::try_with_validated_config(self.config, H::default())?;

        let generation = if recycled.is_some() {
            self.free_slots.pop();
            let slot = &mut self.slots[index as usize];
            slot.map = Some(map);
            slot.generation
        } else {
            self.slots.push(RegistrySlot {
                generation: 0,
                map: Some(map),
            });
            0
        };
        let handle = MapHandle { index, generation };

        self.live += 1;
        tracing::trace!("MapRegistry created map {handle}");
        Ok(handle)
    }

    /// Index the next pushed slot will get, if the handle space has room.
    fn fresh_index(&self) -> Result<u32, MapError> {
        u32::try_from(self.slots.len())
            .ok()
            .filter(|index| *index < u32::MAX)
            .ok_or(MapError::CapacityOverflow {
                requested: self.slots.len(),
            })
    }

    /// Releases the map behind `handle` and all of its storage.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::ReleasedHandle`] if the map was already freed, or
    /// [`MapError::UnknownHandle`] if this registry never issued `handle`.
    pub fn free(&mut self, handle: MapHandle) -> Result<(), MapError> {
        self.map(handle)?;

        let slot = &mut self.slots[handle.index as usize];
        slot.map = None;
        if let Some(generation) = slot.generation.checked_add(1) {
            slot.generation = generation;
            self.free_slots.push(handle.index);
        } else {
            tracing::debug!("MapRegistry retired slot {} (generations exhausted)", handle.index);
        }

        self.live -= 1;
        tracing::trace!("MapRegistry freed map {handle}");
        Ok(())
    }

    // =========================================================================
    // Map Operations
    // =========================================================================

    /// Returns `true` if the map contains no entries.
    ///
    /// # Errors
    ///
    /// Returns a handle error if `handle` is not live.
    pub fn is_empty(&self, handle: MapHandle) -> Result<bool, MapError> {
        Ok(self.map(handle)?.is_empty())
    }

    /// Inserts `value` for `key`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns a handle error if `handle` is not live, or a resource error if
    /// the map could not grow.
    pub fn insert(&mut self, handle: MapHandle, key: u64, value: u64) -> Result<(), MapError> {
        self.map_mut(handle)?.try_insert(key, value)?;
        Ok(())
    }

    /// Returns `true` if the map contains `key`.
    ///
    /// # Errors
    ///
    /// Returns a handle error if `handle` is not live.
    pub fn contains(&self, handle: MapHandle, key: u64) -> Result<bool, MapError> {
        Ok(self.map(handle)?.contains_key(key))
    }

    /// Returns the value stored for `key`.
    ///
    /// # Errors
    ///
    /// Returns a handle error if `handle` is not live, or
    /// [`MapError::KeyNotFound`] if `key` is absent.
    pub fn get(&self, handle: MapHandle, key: u64) -> Result<u64, MapError> {
        self.map(handle)?.value_of(key)
    }

    /// Removes `key` if present; an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a handle error if `handle` is not live.
    pub fn remove(&mut self, handle: MapHandle, key: u64) -> Result<(), MapError> {
        self.map_mut(handle)?.discard(key);
        Ok(())
    }

    /// Removes `key` and returns its value.
    ///
    /// # Errors
    ///
    /// Returns a handle error if `handle` is not live, or
    /// [`MapError::KeyNotFound`] if `key` is absent.
    pub fn remove_return(&mut self, handle: MapHandle, key: u64) -> Result<u64, MapError> {
        self.map_mut(handle)?.take(key)
    }

    /// Returns the number of entries in the map.
    ///
    /// # Errors
    ///
    /// Returns a handle error if `handle` is not live.
    pub fn len(&self, handle: MapHandle) -> Result<u64, MapError> {
        let len = self.map(handle)?.len();
        Ok(u64::try_from(len).unwrap_or(u64::MAX))
    }

    // =========================================================================
    // Direct Access
    // =========================================================================

    /// Borrows the map behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::ReleasedHandle`] or [`MapError::UnknownHandle`].
    pub fn map(&self, handle: MapHandle) -> Result<&FixedIntMap<H>, MapError> {
        let Some(slot) = self.slots.get(handle.index as usize) else {
            return Err(rejected(MapError::UnknownHandle { handle }));
        };
        if handle.generation > slot.generation {
            return Err(rejected(MapError::UnknownHandle { handle }));
        }
        match &slot.map {
            Some(map) if handle.generation == slot.generation => Ok(map),
            _ => Err(rejected(MapError::ReleasedHandle { handle })),
        }
    }

    /// Mutably borrows the map behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::ReleasedHandle`] or [`MapError::UnknownHandle`].
    pub fn map_mut(&mut self, handle: MapHandle) -> Result<&mut FixedIntMap<H>, MapError> {
        self.map(handle)?;
        self.slots[handle.index as usize]
            .map
            .as_mut()
            .ok_or(MapError::ReleasedHandle { handle })
    }
}

fn rejected(error: MapError) -> MapError {
    tracing::warn!("MapRegistry rejected a handle: {error}");
    error
}

impl<H> fmt::Debug for MapRegistry<H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("MapRegistry")
            .field("live_maps", &self.live)
            .field("slots", &self.slots.len())
            .field("free_slots", &self.free_slots.len())
            .field("config", &self.config)
            .finish()
    }
}
