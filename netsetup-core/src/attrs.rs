//! Attribute sets for network and bonding entities.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Attributes of a single entity, as exchanged with the setup service.
pub type AttrMap = serde_json::Map<String, Value>;

/// Canonicalized desired entries, keyed by entity name.
pub type EntryMap = BTreeMap<String, Attrs>;

/// Canonical attribute set of one desired entity.
///
/// A present entity carries its full attribute map; a removal carries
/// nothing. The two shapes are mutually exclusive, which rules out the
/// sentinel-key ambiguity of mixing `remove` into a regular map.
#[derive(Debug, Clone, PartialEq)]
pub enum Attrs {
    /// The entity should exist with exactly these attributes.
    Present(AttrMap),
    /// The entity should be removed from the host.
    Remove,
}

impl Attrs {
    pub fn is_remove(&self) -> bool {
        matches!(self, Attrs::Remove)
    }
}

// On the wire a removal is the `{"remove": true}` marker the setup
// service understands; a present entity is just its attribute map.
impl Serialize for Attrs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Attrs::Present(map) => map.serialize(serializer),
            Attrs::Remove => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("remove", &true)?;
                map.end()
            }
        }
    }
}
