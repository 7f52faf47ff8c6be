//! Open-addressed hash map from `u64` keys to `u64` values.
//!
//! This module provides [`FixedIntMap`], a mutable hash table that owns a
//! single power-of-two slot array and resolves collisions by linear probing.
//!
//! # Overview
//!
//! - Amortized O(1) `insert`, `get`, `remove`
//! - O(1) `len` and `is_empty`
//! - O(n) rehash when the load factor limit is reached
//!
//! # Examples
//!
//! ```rust
//! use fixedmap::table::FixedIntMap;
//!
//! let mut map = FixedIntMap::new();
//! map.insert(1, 100);
//! map.insert(1, 200);
//! assert_eq!(map.get(1), Some(200));
//! assert_eq!(map.len(), 1);
//!
//! assert_eq!(map.remove(1), Some(200));
//! assert!(map.is_empty());
//! ```
//!
//! # Internal Structure
//!
//! Each slot is empty, a tombstone, or occupied. A lookup walks forward from
//! the key's home slot and stops at the first empty slot; tombstones keep
//! those walks intact after a removal. The load factor counts entries and
//! tombstones together, and every rehash drops all tombstones.
//!
//! The table always keeps at least one empty slot, so every probe loop
//! terminates.

use std::fmt;
use std::iter::FusedIterator;
use std::ops::Index;

use static_assertions::{assert_impl_all, const_assert};

use super::config::{MapConfig, check_load_factor};
use super::error::{ConfigError, MapError};
use super::hasher::{KeyHasher, SplitMix64};

// =============================================================================
// Constants
// =============================================================================

/// Smallest slot count of an allocated table.
pub const MIN_CAPACITY: usize = 8;

const_assert!(MIN_CAPACITY.is_power_of_two());
const_assert!(MIN_CAPACITY >= 2);

// =============================================================================
// Slot Definition
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Empty,
    Tombstone,
    Occupied { key: u64, value: u64 },
}

/// Outcome of walking a key's probe sequence.
enum Probe {
    /// The key lives at this index.
    Found(usize),
    /// The key is absent; a new entry would go at `index`.
    Vacant { index: usize, reuses_tombstone: bool },
}

// =============================================================================
// FixedIntMap Definition
// =============================================================================

/// A hash map from `u64` keys to `u64` values using open addressing.
///
/// Not synchronized: sharing a map between threads needs an external lock.
///
/// # Time Complexity
///
/// | Operation      | Complexity          |
/// |----------------|---------------------|
/// | `new`          | O(1), no allocation |
/// | `get`          | O(1) expected       |
/// | `insert`       | O(1) amortized      |
/// | `remove`       | O(1) expected       |
/// | `contains_key` | O(1) expected       |
/// | `len`          | O(1)                |
/// | `is_empty`     | O(1)                |
///
/// # Contract Violations
///
/// Looking up an absent key through [`Index`] panics, and
/// [`value_of`](Self::value_of) / [`take`](Self::take) return
/// [`MapError::KeyNotFound`]. No operation returns an unspecified value.
///
/// # Examples
///
/// ```rust
/// use fixedmap::table::FixedIntMap;
///
/// let mut map = FixedIntMap::new();
/// map.insert(5, 50);
/// map.insert(9, 90);
///
/// assert_eq!(map.take(5), Ok(50));
/// assert_eq!(map.len(), 1);
/// assert!(map.contains_key(9));
/// assert_eq!(map[9], 90);
/// ```
#[derive(Clone)]
pub struct FixedIntMap<H = SplitMix64> {
    /// Slot array; empty or a power of two long
    slots: Vec<Slot>,
    /// Number of occupied slots
    len: usize,
    /// Number of tombstone slots
    tombstones: usize,
    max_load_factor: f64,
    hasher: H,
}

assert_impl_all!(FixedIntMap: Send, Sync, Clone);

impl FixedIntMap<SplitMix64> {
    /// Creates an empty map. Nothing is allocated until the first insert.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixedmap::table::FixedIntMap;
    ///
    /// let map = FixedIntMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 0);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(SplitMix64)
    }

    /// Creates an empty map that can hold `capacity` entries without rehashing.
    ///
    /// # Panics
    ///
    /// Panics if the slot count overflows `usize` or the allocation fails.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut map = Self::new();
        map.reserve(capacity);
        map
    }

    /// Creates an empty map from a [`MapConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidConfig`] if the configuration is invalid, or
    /// a resource error if the initial table cannot be allocated.
    pub fn with_config(config: MapConfig) -> Result<Self, MapError> {
        Self::with_config_and_hasher(config, SplitMix64)
    }
}

impl<H: KeyHasher> FixedIntMap<H> {
    /// Creates an empty map using `hasher` to place keys.
    #[must_use]
    pub const fn with_hasher(hasher: H) -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
            tombstones: 0,
            max_load_factor: super::config::DEFAULT_MAX_LOAD_FACTOR,
            hasher,
        }
    }

    /// Creates an empty map from a [`MapConfig`] and a hasher.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidConfig`] if the configuration is invalid, or
    /// [`MapError::CapacityOverflow`] / [`MapError::AllocationFailed`] if the
    /// initial table cannot be allocated.
    pub fn with_config_and_hasher(config: MapConfig, hasher: H) -> Result<Self, MapError> {
        config.validate()?;
        Self::try_with_validated_config(config, hasher)
    }

    pub(crate) fn try_with_validated_config(
        config: MapConfig,
        hasher: H,
    ) -> Result<Self, MapError> {
        let mut map = Self::with_hasher(hasher);
        map.max_load_factor = config.max_load_factor;
        map.try_reserve(config.initial_capacity)?;
        Ok(map)
    }

    /// Returns the number of entries in the map.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the table.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of tombstones left behind by removals.
    #[inline]
    #[must_use]
    pub const fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns the ratio of used slots (entries plus tombstones) to capacity.
    #[must_use]
    pub fn load_factor(&self) -> f64 {
        if self.slots.is_empty() {
            0.0
        } else {
            (self.len + self.tombstones) as f64 / self.slots.len() as f64
        }
    }

    /// Returns the load factor limit.
    #[inline]
    #[must_use]
    pub const fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// Changes the load factor limit.
    ///
    /// The new limit is enforced by the next insert that needs a fresh slot,
    /// so [`load_factor`](Self::load_factor) may exceed it until then.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLoadFactor`] and leaves the limit unchanged
    /// if `max_load_factor` is out of range.
    pub fn set_max_load_factor(&mut self, max_load_factor: f64) -> Result<(), ConfigError> {
        check_load_factor(max_load_factor)?;
        self.max_load_factor = max_load_factor;
        Ok(())
    }

    /// Returns the map's hasher.
    #[inline]
    #[must_use]
    pub const fn hasher(&self) -> &H {
        &self.hasher
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Returns the value stored for `key`, or `None` if it is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixedmap::table::FixedIntMap;
    ///
    /// let mut map = FixedIntMap::new();
    /// map.insert(1, 100);
    /// assert_eq!(map.get(1), Some(100));
    /// assert_eq!(map.get(2), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn get(&self, key: u64) -> Option<u64> {
        self.get_ref(key).copied()
    }

    /// Returns a mutable reference to the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixedmap::table::FixedIntMap;
    ///
    /// let mut map = FixedIntMap::new();
    /// map.insert(1, 100);
    /// if let Some(value) = map.get_mut(1) {
    ///     *value += 1;
    /// }
    /// assert_eq!(map.get(1), Some(101));
    /// ```
    pub fn get_mut(&mut self, key: u64) -> Option<&mut u64> {
        let index = self.find(key)?;
        match &mut self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Returns the value stored for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if `key` is absent.
    pub fn value_of(&self, key: u64) -> Result<u64, MapError> {
        self.get(key).ok_or(MapError::KeyNotFound { key })
    }

    /// Returns `true` if the map contains `key`.
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: u64) -> bool {
        self.find(key).is_some()
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Inserts `value` for `key`, returning the value it replaced.
    ///
    /// An existing key keeps its slot and only has its value overwritten.
    ///
    /// # Panics
    ///
    /// Panics if growing the table overflows `usize` or the allocation fails.
    /// Use [`try_insert`](Self::try_insert) to handle those cases.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixedmap::table::FixedIntMap;
    ///
    /// let mut map = FixedIntMap::new();
    /// assert_eq!(map.insert(1, 100), None);
    /// assert_eq!(map.insert(1, 200), Some(100));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: u64, value: u64) -> Option<u64> {
        match self.try_insert(key, value) {
            Ok(previous) => previous,
            Err(error) => panic!("FixedIntMap::insert: {error}"),
        }
    }

    /// Inserts `value` for `key`, returning the value it replaced.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::CapacityOverflow`] or [`MapError::AllocationFailed`]
    /// if the table had to grow and could not. The map is unchanged in that case.
    pub fn try_insert(&mut self, key: u64, value: u64) -> Result<Option<u64>, MapError> {
        let probe = if self.slots.is_empty() {
            None
        } else {
            Some(self.probe(key))
        };

        let index = match probe {
            Some(Probe::Found(index)) => {
                let previous = std::mem::replace(&mut self.slots[index], Slot::Occupied { key, value });
                return Ok(match previous {
                    Slot::Occupied { value, .. } => Some(value),
                    Slot::Empty | Slot::Tombstone => None,
                });
            }
            Some(Probe::Vacant {
                index,
                reuses_tombstone: true,
            }) => {
                self.tombstones -= 1;
                index
            }
            Some(Probe::Vacant {
                index,
                reuses_tombstone: false,
            }) if !self.exceeds_max_load(self.len + self.tombstones + 1) => index,
            _ => {
                self.grow_for_insert()?;
                self.first_empty(key)
            }
        };

        self.slots[index] = Slot::Occupied { key, value };
        self.len += 1;
        Ok(None)
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Removes `key`, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixedmap::table::FixedIntMap;
    ///
    /// let mut map = FixedIntMap::new();
    /// map.insert(1, 100);
    /// assert_eq!(map.remove(1), Some(100));
    /// assert_eq!(map.remove(1), None);
    /// ```
    pub fn remove(&mut self, key: u64) -> Option<u64> {
        let index = self.find(key)?;
        let removed = self.vacate(index);
        self.len -= 1;
        match removed {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Removes `key` if present. Returns `true` if an entry was removed.
    pub fn discard(&mut self, key: u64) -> bool {
        self.remove(key).is_some()
    }

    /// Removes `key` and returns its value.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if `key` is absent; the map is unchanged.
    pub fn take(&mut self, key: u64) -> Result<u64, MapError> {
        self.remove(key).ok_or(MapError::KeyNotFound { key })
    }

    /// Removes every entry, keeping the allocated table.
    pub fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
        self.len = 0;
        self.tombstones = 0;
    }

    /// Keeps only the entries for which `predicate` returns `true`.
    ///
    /// The predicate may modify the values it is shown.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixedmap::table::FixedIntMap;
    ///
    /// let mut map: FixedIntMap = (0..10).map(|key| (key, key * 10)).collect();
    /// map.retain(|key, _| key % 2 == 0);
    /// assert_eq!(map.len(), 5);
    /// assert!(!map.contains_key(3));
    /// ```
    pub fn retain<F>(&mut self, mut predicate: F)
    where
        F: FnMut(u64, &mut u64) -> bool,
    {
        for index in 0..self.slots.len() {
            let keep = match &mut self.slots[index] {
                Slot::Occupied { key, value } => predicate(*key, value),
                Slot::Empty | Slot::Tombstone => true,
            };
            if !keep {
                self.vacate(index);
                self.len -= 1;
            }
        }
    }

    /// Removes every entry and returns them as an iterator.
    ///
    /// The allocated table is kept.
    pub fn drain(&mut self) -> Drain {
        let mut entries = Vec::with_capacity(self.len);
        for slot in &mut self.slots {
            if let Slot::Occupied { key, value } = std::mem::replace(slot, Slot::Empty) {
                entries.push((key, value));
            }
        }
        self.len = 0;
        self.tombstones = 0;
        Drain {
            entries: entries.into_iter(),
        }
    }

    // =========================================================================
    // Capacity Management
    // =========================================================================

    /// Reserves room for at least `additional` more entries.
    ///
    /// # Panics
    ///
    /// Panics if the slot count overflows `usize` or the allocation fails.
    pub fn reserve(&mut self, additional: usize) {
        if let Err(error) = self.try_reserve(additional) {
            panic!("FixedIntMap::reserve: {error}");
        }
    }

    /// Reserves room for at least `additional` more entries.
    ///
    /// After a successful call, `additional` inserts of new keys will not
    /// rehash.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::CapacityOverflow`] or [`MapError::AllocationFailed`];
    /// the map is unchanged in that case.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), MapError> {
        if additional == 0 {
            return Ok(());
        }
        let needed = self
            .len
            .checked_add(additional)
            .ok_or(MapError::CapacityOverflow {
                requested: usize::MAX,
            })?;
        let used = needed.saturating_add(self.tombstones);
        if !self.slots.is_empty() && !self.exceeds_max_load(used) {
            return Ok(());
        }
        let capacity = self.capacity_for(needed)?.max(self.capacity());
        self.rehash(capacity)
    }

    /// Shrinks the table as far as possible while holding at least
    /// `min_capacity` entries, dropping all tombstones.
    ///
    /// If `min_capacity` is too large to size a table for, or the smaller
    /// table cannot be allocated, the map is left as it was.
    pub fn shrink_to(&mut self, min_capacity: usize) {
        let capacity = match self.capacity_for(self.len.max(min_capacity)) {
            Ok(capacity) => capacity,
            Err(error) => {
                tracing::warn!("FixedIntMap::shrink_to({min_capacity}) skipped: {error}");
                return;
            }
        };
        let shrinks = capacity < self.capacity()
            || (capacity == self.capacity() && self.tombstones > 0);
        if shrinks && let Err(error) = self.rehash(capacity) {
            tracing::warn!("FixedIntMap::shrink_to({min_capacity}) skipped: {error}");
        }
    }

    /// Shrinks the table to the smallest capacity that holds the current
    /// entries. An empty map releases its table entirely.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixedmap::table::FixedIntMap;
    ///
    /// let mut map: FixedIntMap = (0..1000).map(|key| (key, key)).collect();
    /// map.retain(|key, _| key < 10);
    /// map.shrink_to_fit();
    /// assert!(map.capacity() <= 16);
    /// assert_eq!(map.tombstones(), 0);
    /// ```
    pub fn shrink_to_fit(&mut self) {
        self.shrink_to(0);
    }

    /// Returns occupancy statistics for the current table.
    #[must_use]
    pub fn stats(&self) -> MapStats {
        let longest_probe = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Occupied { key, .. } => Some(self.distance_from_home(*key, index) + 1),
                Slot::Empty | Slot::Tombstone => None,
            })
            .max()
            .unwrap_or(0);

        MapStats {
            len: self.len,
            capacity: self.slots.len(),
            tombstones: self.tombstones,
            load_factor: self.load_factor(),
            max_load_factor: self.max_load_factor,
            longest_probe,
        }
    }

    // =========================================================================
    // Iteration
    // =========================================================================

    /// Returns an iterator over `(key, value)` pairs in unspecified order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixedmap::table::FixedIntMap;
    ///
    /// let map: FixedIntMap = [(1, 10), (2, 20)].into_iter().collect();
    /// let mut entries: Vec<(u64, u64)> = map.iter().collect();
    /// entries.sort_unstable();
    /// assert_eq!(entries, vec![(1, 10), (2, 20)]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Returns an iterator over the keys in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values in unspecified order.
    pub fn values(&self) -> impl Iterator<Item = u64> + '_ {
        self.iter().map(|(_, value)| value)
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn home(&self, key: u64) -> usize {
        (self.hasher.hash_key(key) as usize) & (self.slots.len() - 1)
    }

    #[inline]
    const fn next_index(&self, index: usize) -> usize {
        (index + 1) & (self.slots.len() - 1)
    }

    fn distance_from_home(&self, key: u64, index: usize) -> usize {
        index.wrapping_sub(self.home(key)) & (self.slots.len() - 1)
    }

    fn exceeds_max_load(&self, used: usize) -> bool {
        used as f64 > self.slots.len() as f64 * self.max_load_factor
    }

    /// Walks the probe sequence for `key`. Requires a non-empty table.
    fn probe(&self, key: u64) -> Probe {
        let mut index = self.home(key);
        let mut first_tombstone = None;
        loop {
            match self.slots[index] {
                Slot::Empty => {
                    return first_tombstone.map_or(
                        Probe::Vacant {
                            index,
                            reuses_tombstone: false,
                        },
                        |tombstone| Probe::Vacant {
                            index: tombstone,
                            reuses_tombstone: true,
                        },
                    );
                }
                Slot::Tombstone => {
                    first_tombstone.get_or_insert(index);
                }
                Slot::Occupied { key: stored, .. } if stored == key => return Probe::Found(index),
                Slot::Occupied { .. } => {}
            }
            index = self.next_index(index);
        }
    }

    fn find(&self, key: u64) -> Option<usize> {
        if self.slots.is_empty() {
            return None;
        }
        match self.probe(key) {
            Probe::Found(index) => Some(index),
            Probe::Vacant { .. } => None,
        }
    }

    fn get_ref(&self, key: u64) -> Option<&u64> {
        match &self.slots[self.find(key)?] {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// First empty slot on `key`'s probe sequence, for tables without tombstones.
    fn first_empty(&self, key: u64) -> usize {
        let mut index = self.home(key);
        while self.slots[index] != Slot::Empty {
            index = self.next_index(index);
        }
        index
    }

    /// Clears the slot at `index` and returns what it held.
    ///
    /// A slot followed by an empty slot ends every probe run through it, so it
    /// becomes empty itself, together with the tombstones directly before it.
    /// Otherwise it becomes a tombstone.
    fn vacate(&mut self, index: usize) -> Slot {
        if self.slots[self.next_index(index)] != Slot::Empty {
            self.tombstones += 1;
            return std::mem::replace(&mut self.slots[index], Slot::Tombstone);
        }

        let removed = std::mem::replace(&mut self.slots[index], Slot::Empty);
        let mask = self.slots.len() - 1;
        let mut previous = index.wrapping_sub(1) & mask;
        while self.slots[previous] == Slot::Tombstone {
            self.slots[previous] = Slot::Empty;
            self.tombstones -= 1;
            previous = previous.wrapping_sub(1) & mask;
        }
        removed
    }

    /// Smallest power-of-two slot count that keeps `entries` within the load limit.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn capacity_for(&self, entries: usize) -> Result<usize, MapError> {
        if entries == 0 {
            return Ok(0);
        }
        let overflow = MapError::CapacityOverflow { requested: entries };
        let minimum = (entries as f64 / self.max_load_factor).ceil();
        if minimum >= usize::MAX as f64 {
            return Err(overflow);
        }
        let mut capacity = (minimum as usize)
            .max(MIN_CAPACITY)
            .checked_next_power_of_two()
            .ok_or_else(|| overflow.clone())?;
        while entries as f64 > capacity as f64 * self.max_load_factor || entries >= capacity {
            capacity = capacity.checked_mul(2).ok_or_else(|| overflow.clone())?;
        }
        Ok(capacity)
    }

    /// Makes room for one more entry in an empty slot.
    fn grow_for_insert(&mut self) -> Result<(), MapError> {
        let needed = self.len + 1;
        let current = self.capacity();
        // Tombstones are at least half of the used slots: compact in place.
        let preferred = if self.tombstones >= self.len {
            current
        } else {
            current
                .checked_mul(2)
                .ok_or(MapError::CapacityOverflow { requested: needed })?
        };
        let capacity = preferred.max(self.capacity_for(needed)?);
        self.rehash(capacity)
    }

    /// Moves every entry into a fresh table of `capacity` slots.
    fn rehash(&mut self, capacity: usize) -> Result<(), MapError> {
        debug_assert!(capacity == 0 || capacity.is_power_of_two());
        debug_assert!(capacity > self.len || (capacity == 0 && self.len == 0));

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| MapError::AllocationFailed { capacity })?;
        slots.resize(capacity, Slot::Empty);

        let previous = std::mem::replace(&mut self.slots, slots);
        tracing::debug!(
            "FixedIntMap rehash: {} -> {} slots, {} entries, {} tombstones dropped",
            previous.len(),
            capacity,
            self.len,
            self.tombstones
        );
        self.tombstones = 0;

        for slot in previous {
            if let Slot::Occupied { key, .. } = slot {
                let index = self.first_empty(key);
                self.slots[index] = slot;
            }
        }
        Ok(())
    }
}

// =============================================================================
// MapStats
// =============================================================================

/// A snapshot of a map's occupancy, returned by [`FixedIntMap::stats`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapStats {
    /// Number of entries.
    pub len: usize,
    /// Number of slots.
    pub capacity: usize,
    /// Number of tombstones.
    pub tombstones: usize,
    /// Used slots (entries plus tombstones) over capacity.
    pub load_factor: f64,
    /// The rehash threshold.
    pub max_load_factor: f64,
    /// Slots visited by the longest successful lookup.
    pub longest_probe: usize,
}

impl fmt::Display for MapStats {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "len={} capacity={} tombstones={} load={:.3}/{:.3} longest_probe={}",
            self.len,
            self.capacity,
            self.tombstones,
            self.load_factor,
            self.max_load_factor,
            self.longest_probe
        )
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over the entries of a [`FixedIntMap`].
pub struct Iter<'a> {
    slots: std::slice::Iter<'a, Slot>,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied { key, value } = *slot {
                self.remaining -= 1;
                return Some((key, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}
impl FusedIterator for Iter<'_> {}

/// Owning iterator over the entries of a [`FixedIntMap`].
pub struct IntoIter {
    slots: std::vec::IntoIter<Slot>,
    remaining: usize,
}

impl Iterator for IntoIter {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied { key, value } = slot {
                self.remaining -= 1;
                return Some((key, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for IntoIter {}
impl FusedIterator for IntoIter {}

/// Iterator returned by [`FixedIntMap::drain`].
pub struct Drain {
    entries: std::vec::IntoIter<(u64, u64)>,
}

impl Iterator for Drain {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl ExactSizeIterator for Drain {}
impl FusedIterator for Drain {}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<H: KeyHasher + Default> Default for FixedIntMap<H> {
    fn default() -> Self {
        Self::with_hasher(H::default())
    }
}

impl<H: KeyHasher> Index<u64> for FixedIntMap<H> {
    type Output = u64;

    /// Returns the value stored for `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is absent.
    fn index(&self, key: u64) -> &u64 {
        self.get_ref(key)
            .unwrap_or_else(|| panic!("{}", MapError::KeyNotFound { key }))
    }
}

impl<H: KeyHasher + Default> FromIterator<(u64, u64)> for FixedIntMap<H> {
    fn from_iter<I: IntoIterator<Item = (u64, u64)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<H: KeyHasher> Extend<(u64, u64)> for FixedIntMap<H> {
    fn extend<I: IntoIterator<Item = (u64, u64)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(lower);
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<H> IntoIterator for FixedIntMap<H> {
    type Item = (u64, u64);
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            slots: self.slots.into_iter(),
            remaining: self.len,
        }
    }
}

impl<'a, H: KeyHasher> IntoIterator for &'a FixedIntMap<H> {
    type Item = (u64, u64);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<H: KeyHasher, Other: KeyHasher> PartialEq<FixedIntMap<Other>> for FixedIntMap<H> {
    fn eq(&self, other: &FixedIntMap<Other>) -> bool {
        self.len == other.len() && self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<H: KeyHasher> Eq for FixedIntMap<H> {}

impl<H: KeyHasher> fmt::Debug for FixedIntMap<H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<H: KeyHasher> fmt::Display for FixedIntMap<H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<H: KeyHasher> serde::Serialize for FixedIntMap<H> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len))?;
        for (key, value) in self {
            map.serialize_entry(&key, &value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct FixedIntMapVisitor<H> {
    marker: std::marker::PhantomData<H>,
}

#[cfg(feature = "serde")]
impl<'de, H: KeyHasher + Default> serde::de::Visitor<'de> for FixedIntMapVisitor<H> {
    type Value = FixedIntMap<H>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of u64 keys to u64 values")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        // Cap the preallocation: the size hint comes from untrusted input.
        let mut map = FixedIntMap::default();
        map.try_reserve(access.size_hint().unwrap_or(0).min(4096))
            .map_err(<A::Error as serde::de::Error>::custom)?;
        while let Some((key, value)) = access.next_entry()? {
            map.try_insert(key, value).map_err(<A::Error as serde::de::Error>::custom)?;
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, H: KeyHasher + Default> serde::Deserialize<'de> for FixedIntMap<H> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(FixedIntMapVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
