//! Encoding of the two persisted facts: the per-building liberation marker
//! and the world-wide anchor of the last liberated building.

use crate::error::PersistError;
use crate::store::FlagStore;

/// Marker value written for a liberated building's TileKey.
pub const LIBERATED_MARKER: &str = "x";

/// Decode a present persisted value. Anything other than the marker is
/// corrupt.
pub fn decode_liberated(key: &str, value: &str) -> Result<bool, PersistError> {
    if value == LIBERATED_MARKER {
        Ok(true)
    } else {
        Err(PersistError::CorruptFlag {
            key: key.to_owned(),
            value: value.to_owned(),
        })
    }
}

/// Read the liberation flag for a TileKey. Absent means hostile; a corrupt
/// value fails open to hostile so a damaged save never locks a chunk into a
/// bad state.
pub fn read_liberated(store: &dyn FlagStore, key: &str) -> bool {
    match store.get(key) {
        None => false,
        Some(value) => match decode_liberated(key, &value) {
            Ok(liberated) => liberated,
            Err(err) => {
                log::warn!("treating building as hostile: {err}");
                false
            }
        },
    }
}

/// Persist the liberation marker for a TileKey. Idempotent.
pub fn write_liberated(store: &mut dyn FlagStore, key: &str) {
    store.set(key, LIBERATED_MARKER);
}

/// Persist the world-space anchor of the most recently liberated building
/// under the world-seed key (diagnostic/respawn hint).
pub fn write_anchor(store: &mut dyn FlagStore, key: &str, anchor: [f32; 3]) {
    match serde_json::to_string(&anchor) {
        Ok(json) => store.set(key, &json),
        Err(err) => log::warn!("failed to encode anchor for {key:?}: {err}"),
    }
}

/// Read back the last-liberated anchor, if one was written.
pub fn read_anchor(store: &dyn FlagStore, key: &str) -> Result<Option<[f32; 3]>, PersistError> {
    match store.get(key) {
        None => Ok(None),
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
    }
}
