//! Change-set computation between desired and running state.

use crate::attrs::{Attrs, EntryMap};
use crate::runstate::RunningMap;

/// Per-entity predicate: does this desired entry require an action
/// against the given running collection?
///
/// A removal only acts on an entity that is actually running; removing
/// something absent is a no-op, not an error. A present entry acts
/// when the running side is missing or structurally unequal. Equality
/// is over the full normalized attribute map, order-insensitive and
/// type-sensitive (boolean `true` is not the string `"true"`).
pub fn needs_action(name: &str, attrs: &Attrs, running: &RunningMap) -> bool {
    match attrs {
        Attrs::Remove => running.contains_key(name),
        Attrs::Present(desired) => running.get(name) != Some(desired),
    }
}

/// Collect the subset of `desired` that differs from `running`.
///
/// Entities running on the host but not named in `desired` are never
/// included; this layer only acts on what the caller mentions.
pub fn changed_entries(desired: &EntryMap, running: &RunningMap) -> EntryMap {
    desired
        .iter()
        .filter(|(name, attrs)| needs_action(name, attrs, running))
        .map(|(name, attrs)| (name.clone(), attrs.clone()))
        .collect()
}
