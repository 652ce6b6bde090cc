//! Authored content definitions and the identifiers that reference them.

mod ability;
mod item;

pub use ability::*;
pub use item::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for item ids derived from authored keys.
const ITEM_NAMESPACE: Uuid = Uuid::from_u128(0x5348_4920_6974_656d_2d6b_6579_7300_0001);

/// Identifier of an item definition.
///
/// Ids are derived from the authored item key, so every process that loads the
/// same catalog agrees on them. Replicated state refers to items by id only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    /// Derive the id for an authored item key.
    pub fn from_key(key: &str) -> Self {
        Self(Uuid::new_v5(&ITEM_NAMESPACE, key.as_bytes()))
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a spawned character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    /// Create a new random character ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a nil/empty character ID (useful for defaults).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
