//! Deterministic state hashing for debugging
//!
//! Hashes the gameplay-relevant part of a [`GameState`]. Two states that
//! play identically produce the same hash, which makes divergence between
//! two runs (or a leak out of speculation) easy to spot in a log.

use crate::game::GameState;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Fields to exclude when computing deterministic state hash
///
/// - config: rule constants, fixed for the whole match
/// - text: card rules text is presentation only
const EXCLUDED_FIELDS: &[&str] = &["config", "text"];

/// Compute a deterministic hash of game state
///
/// Serializes to JSON (object keys come out sorted), strips the excluded
/// fields, and hashes the canonical string.
pub fn compute_state_hash(game: &GameState) -> u64 {
    let json_value = match serde_json::to_value(game) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Warning: Failed to serialize game state for hashing: {e}");
            return 0;
        }
    };

    let cleaned = strip_metadata(json_value);

    let canonical = match serde_json::to_string(&cleaned) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Warning: Failed to canonicalize cleaned state: {e}");
            return 0;
        }
    };

    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);
    hasher.finish()
}

/// Recursively strip excluded fields from a JSON value
fn strip_metadata(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter()
                .filter(|(k, _)| !EXCLUDED_FIELDS.contains(&k.as_str()))
                .map(|(k, v)| (k, strip_metadata(v)))
                .collect(),
        ),
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(strip_metadata).collect())
        }
        other => other,
    }
}

/// Format a hash for display (shows first 8 hex digits)
pub fn format_hash(hash: u64) -> String {
    format!("{:08x}", (hash >> 32) as u32)
}
