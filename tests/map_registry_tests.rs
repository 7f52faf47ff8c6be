#![cfg(feature = "handle")]
//! Unit tests for MapRegistry.
//!
//! This module drives the handle-based surface through full map lifecycles,
//! including the misuse cases a flat interface has to survive.

use fixedmap::handle::{MapHandle, MapRegistry};
use fixedmap::table::{FxMix, MapConfig, MapError};
use rstest::{fixture, rstest};
use tracing_subscriber::EnvFilter;

#[fixture]
fn registry() -> MapRegistry {
    // RUST_LOG=fixedmap=trace shows handle lifecycle events
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    MapRegistry::new()
}

// =============================================================================
// TDD Cycle 1: Create and free
// =============================================================================

#[rstest]
fn test_create_returns_empty_map(mut registry: MapRegistry) {
    let handle = registry.create();
    assert_eq!(registry.is_empty(handle), Ok(true));
    assert_eq!(registry.len(handle), Ok(0));
    assert_eq!(registry.live_maps(), 1);
}

#[rstest]
fn test_maps_are_independent(mut registry: MapRegistry) {
    let first = registry.create();
    let second = registry.create();
    assert_ne!(first, second);

    registry.insert(first, 1, 10).unwrap();
    registry.insert(second, 1, 20).unwrap();

    assert_eq!(registry.get(first, 1), Ok(10));
    assert_eq!(registry.get(second, 1), Ok(20));
}

#[rstest]
fn test_free_releases_map(mut registry: MapRegistry) {
    let handle = registry.create();
    registry.insert(handle, 1, 1).unwrap();

    assert_eq!(registry.free(handle), Ok(()));
    assert_eq!(registry.live_maps(), 0);
}

// =============================================================================
// TDD Cycle 2: Map operations through a handle
// =============================================================================

#[rstest]
fn test_insert_overwrite_remove_scenario(mut registry: MapRegistry) {
    let handle = registry.create();

    registry.insert(handle, 1, 100).unwrap();
    assert_eq!(registry.contains(handle, 1), Ok(true));
    assert_eq!(registry.get(handle, 1), Ok(100));
    assert_eq!(registry.len(handle), Ok(1));

    registry.insert(handle, 1, 200).unwrap();
    assert_eq!(registry.get(handle, 1), Ok(200));
    assert_eq!(registry.len(handle), Ok(1));

    registry.remove(handle, 1).unwrap();
    assert_eq!(registry.contains(handle, 1), Ok(false));
    assert_eq!(registry.is_empty(handle), Ok(true));
}

#[rstest]
fn test_remove_return_scenario(mut registry: MapRegistry) {
    let handle = registry.create();
    registry.insert(handle, 5, 50).unwrap();
    registry.insert(handle, 9, 90).unwrap();

    assert_eq!(registry.remove_return(handle, 5), Ok(50));
    assert_eq!(registry.contains(handle, 5), Ok(false));
    assert_eq!(registry.contains(handle, 9), Ok(true));
    assert_eq!(registry.len(handle), Ok(1));
}

#[rstest]
fn test_remove_absent_key_is_not_an_error(mut registry: MapRegistry) {
    let handle = registry.create();
    assert_eq!(registry.remove(handle, 3), Ok(()));
    assert_eq!(registry.len(handle), Ok(0));
}

#[rstest]
fn test_absent_key_is_reported(mut registry: MapRegistry) {
    let handle = registry.create();
    registry.insert(handle, 1, 1).unwrap();

    assert_eq!(registry.get(handle, 2), Err(MapError::KeyNotFound { key: 2 }));
    assert_eq!(
        registry.remove_return(handle, 2),
        Err(MapError::KeyNotFound { key: 2 })
    );
    assert_eq!(registry.len(handle), Ok(1));
}

#[rstest]
fn test_large_map_through_handle(mut registry: MapRegistry) {
    let handle = registry.create();
    for key in 0..10_000 {
        registry.insert(handle, key, key + 1).unwrap();
    }
    assert_eq!(registry.len(handle), Ok(10_000));
    assert_eq!(registry.get(handle, 9_999), Ok(10_000));
    assert!(registry.map(handle).unwrap().load_factor() <= 0.75);
}

// =============================================================================
// TDD Cycle 3: Stale and foreign handles
// =============================================================================

#[rstest]
fn test_double_free_is_rejected(mut registry: MapRegistry) {
    let handle = registry.create();
    registry.free(handle).unwrap();

    assert_eq!(
        registry.free(handle),
        Err(MapError::ReleasedHandle { handle })
    );
    assert_eq!(registry.live_maps(), 0);
}

#[rstest]
fn test_use_after_free_is_rejected(mut registry: MapRegistry) {
    let handle = registry.create();
    registry.free(handle).unwrap();
    let released = MapError::ReleasedHandle { handle };

    assert_eq!(registry.is_empty(handle), Err(released.clone()));
    assert_eq!(registry.insert(handle, 1, 1), Err(released.clone()));
    assert_eq!(registry.contains(handle, 1), Err(released.clone()));
    assert_eq!(registry.get(handle, 1), Err(released.clone()));
    assert_eq!(registry.remove(handle, 1), Err(released.clone()));
    assert_eq!(registry.remove_return(handle, 1), Err(released.clone()));
    assert_eq!(registry.len(handle), Err(released));
}

#[rstest]
fn test_stale_handle_cannot_reach_recycled_slot(mut registry: MapRegistry) {
    let stale = registry.create();
    registry.insert(stale, 1, 1).unwrap();
    registry.free(stale).unwrap();

    let fresh = registry.create();
    registry.insert(fresh, 2, 2).unwrap();

    assert_eq!(
        registry.get(stale, 2),
        Err(MapError::ReleasedHandle { handle: stale })
    );
    assert_eq!(registry.free(stale), Err(MapError::ReleasedHandle { handle: stale }));
    assert_eq!(registry.get(fresh, 2), Ok(2));
    assert_eq!(registry.get(fresh, 1), Err(MapError::KeyNotFound { key: 1 }));
}

#[rstest]
fn test_never_issued_handle_is_unknown(registry: MapRegistry) {
    let forged = MapHandle::from_raw(42);
    assert_eq!(
        registry.len(forged),
        Err(MapError::UnknownHandle { handle: forged })
    );
}

#[rstest]
fn test_raw_handle_round_trip(mut registry: MapRegistry) {
    registry.create();
    let handle = registry.create();
    registry.insert(handle, 7, 70).unwrap();

    let raw = handle.as_raw();
    assert_eq!(registry.get(MapHandle::from_raw(raw), 7), Ok(70));
}

// =============================================================================
// TDD Cycle 4: Configuration
// =============================================================================

#[rstest]
fn test_config_applies_to_every_map() {
    let config = MapConfig::new()
        .with_initial_capacity(100)
        .with_max_load_factor(0.5)
        .unwrap();
    let mut registry = MapRegistry::with_config(config).unwrap();
    let handle = registry.create();

    let map = registry.map(handle).unwrap();
    assert!(map.capacity() >= 200);
    assert!((map.max_load_factor() - 0.5).abs() < f64::EPSILON);
    assert_eq!(registry.config(), &config);
}

#[rstest]
fn test_invalid_config_is_rejected() {
    let config = MapConfig {
        initial_capacity: 0,
        max_load_factor: 0.01,
    };
    assert!(MapRegistry::with_config(config).is_err());
}

#[rstest]
fn test_registry_with_other_hasher() {
    let mut registry = MapRegistry::<FxMix>::default();
    let handle = registry.create();
    for key in 0..1_000 {
        registry.insert(handle, key << 32, key).unwrap();
    }
    assert_eq!(registry.get(handle, 999 << 32), Ok(999));
    registry.map_mut(handle).unwrap().shrink_to_fit();
    assert_eq!(registry.len(handle), Ok(1_000));
}

// =============================================================================
// TDD Cycle 5: Resource exhaustion
// =============================================================================

#[rstest]
fn test_try_create_reports_oversized_initial_capacity() {
    let config = MapConfig::new().with_initial_capacity(usize::MAX / 2);
    let mut registry = MapRegistry::with_config(config).unwrap();

    let error = registry.try_create().unwrap_err();

    assert!(matches!(error, MapError::CapacityOverflow { .. }));
    assert!(error.is_resource_exhaustion());
    assert_eq!(registry.live_maps(), 0);
    let never_issued = MapHandle::from_raw(0);
    assert_eq!(
        registry.len(never_issued),
        Err(MapError::UnknownHandle {
            handle: never_issued
        })
    );
}

#[rstest]
#[should_panic(expected = "MapRegistry::create: capacity overflow")]
fn test_create_panics_on_oversized_initial_capacity() {
    let config = MapConfig::new().with_initial_capacity(usize::MAX / 2);
    let mut registry = MapRegistry::with_config(config).unwrap();
    registry.create();
}

#[rstest]
fn test_failed_reserve_leaves_registered_map_intact(mut registry: MapRegistry) {
    let handle = registry.create();
    for key in 0..200 {
        registry.insert(handle, key, key + 1).unwrap();
    }
    for key in (0..200).step_by(4) {
        registry.remove(handle, key).unwrap();
    }
    let snapshot = registry.map(handle).unwrap().clone();

    let error = registry.map_mut(handle).unwrap().try_reserve(usize::MAX).unwrap_err();
    assert!(error.is_resource_exhaustion());

    let map = registry.map(handle).unwrap();
    assert_eq!(map.len(), snapshot.len());
    assert_eq!(map.capacity(), snapshot.capacity());
    assert_eq!(map.tombstones(), snapshot.tombstones());
    assert_eq!(map, &snapshot);
    assert_eq!(registry.len(handle), Ok(150));
    assert_eq!(registry.remove_return(handle, 1), Ok(2));
}

#[rstest]
fn test_recycled_slot_is_used_after_free(mut registry: MapRegistry) {
    let first = registry.create();
    let second = registry.create();
    registry.free(first).unwrap();

    let third = registry.try_create().unwrap();

    assert_eq!(third.as_raw() & u64::from(u32::MAX), first.as_raw() & u64::from(u32::MAX));
    assert_ne!(third, first);
    assert_eq!(registry.live_maps(), 2);
    assert_eq!(registry.is_empty(second), Ok(true));
    assert_eq!(registry.is_empty(third), Ok(true));
}
