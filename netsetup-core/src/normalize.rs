//! Desired-state canonicalization.
//!
//! Callers describe networks and bondings as plain attribute maps with
//! a `status: present|absent` field. Normalization resolves that field
//! into the canonical [`Attrs`] form before any diffing happens, so a
//! malformed entry fails the whole invocation up front, never halfway
//! through an apply.

use crate::attrs::{AttrMap, Attrs, EntryMap};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

const STATUS_KEY: &str = "status";

/// Bond options applied when the caller leaves them out. The setup
/// service canonicalizes its own records to an explicit mode, so an
/// omitted mode would otherwise diff forever against a converged host.
const DEFAULT_BOND_OPTIONS: &str = "mode=0";

/// Invalid desired-state errors.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("with status=absent, \"{0}\" cannot carry any other attributes")]
    AbsentWithAttrs(String),

    #[error("invalid status {1} for \"{0}\"")]
    InvalidStatus(String, String),
}

pub type Result<T> = std::result::Result<T, StateError>;

/// Resolve the `status` field of every entry into a canonical
/// attribute set.
///
/// `status` defaults to `present` and is consumed here; it never
/// reaches the diff engine or the setup service. Applied identically
/// to the networks and the bondings collection.
pub fn normalize_entries(entries: BTreeMap<String, AttrMap>) -> Result<EntryMap> {
    let mut normalized = EntryMap::new();

    for (name, mut attrs) in entries {
        let status = match attrs.remove(STATUS_KEY) {
            None => "present".to_string(),
            Some(Value::String(s)) => s,
            Some(other) => return Err(StateError::InvalidStatus(name, other.to_string())),
        };

        match status.as_str() {
            "present" => {
                normalized.insert(name, Attrs::Present(attrs));
            }
            "absent" => {
                if !attrs.is_empty() {
                    return Err(StateError::AbsentWithAttrs(name));
                }
                normalized.insert(name, Attrs::Remove);
            }
            other => {
                return Err(StateError::InvalidStatus(name, format!("\"{}\"", other)));
            }
        }
    }

    Ok(normalized)
}

/// Ensure every present bonding carries explicit bond options,
/// defaulting to round-robin (`mode=0`).
pub fn fill_bonding_defaults(bondings: &mut EntryMap) {
    for attrs in bondings.values_mut() {
        if let Attrs::Present(map) = attrs
            && !map.contains_key("options")
        {
            map.insert(
                "options".to_string(),
                Value::String(DEFAULT_BOND_OPTIONS.to_string()),
            );
        }
    }
}
