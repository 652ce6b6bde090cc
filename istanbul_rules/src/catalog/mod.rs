//! Content catalogs - the authored item and ability databases.
//!
//! Catalogs are built once at load time and only read afterwards. Items are
//! authored in TOML or JSON under an `items` array; each entry is keyed by a
//! stable `key` from which its [`ItemId`] is derived.

mod abilities;

pub use abilities::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::config::ContentConfig;
use crate::entities::{AbilityDefinition, ItemDefinition, ItemId, ItemRef};
use crate::mechanics::{ConsumableEffect, EquipmentSlotType, ItemType, StatModifier, WeaponClass};

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("item key must not be empty")]
    EmptyKey,

    #[error("duplicate item key: {0}")]
    DuplicateKey(String),

    #[error("item {0} has a max stack size of zero")]
    ZeroStackSize(String),
}

/// Result type for catalog loading.
pub type CatalogResult<T> = Result<T, CatalogError>;

fn default_stack_size() -> u32 {
    1
}

/// One item as written by content authors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemEntry {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub item_type: ItemType,
    #[serde(default = "default_stack_size")]
    pub max_stack_size: u32,
    #[serde(default)]
    pub value: u32,
    #[serde(default)]
    pub equipment_slot: Option<EquipmentSlotType>,
    #[serde(default)]
    pub stat_bonuses: Vec<StatModifier>,
    #[serde(default)]
    pub abilities: Vec<AbilityDefinition>,
    #[serde(default)]
    pub weapon_class: Option<WeaponClass>,
    #[serde(default)]
    pub consumable: Option<ConsumableEffect>,
}

impl ItemEntry {
    fn into_definition(self, content: &ContentConfig) -> ItemDefinition {
        let mut item = ItemDefinition::new(self.key, self.name, self.item_type);
        item.description = self.description;
        item.max_stack_size = self.max_stack_size;
        item.value = self.value;
        item.equipment_slot = self.equipment_slot;
        item.stat_bonuses = self.stat_bonuses;
        item.abilities = self.abilities;
        item.weapon_class = self.weapon_class;
        item.consumable = self.consumable;
        item.infer_class_from_name = content.infer_weapon_class_from_name;
        item
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    items: Vec<ItemEntry>,
}

/// All item definitions, addressable by id or authored key.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: HashMap<ItemId, ItemRef>,
    by_key: HashMap<String, ItemId>,
}

impl ItemCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML catalog.
    pub fn from_toml_str(source: &str, content: &ContentConfig) -> CatalogResult<Self> {
        let file: CatalogFile = toml::from_str(source)?;
        Self::from_entries(file.items, content)
    }

    /// Parse a JSON catalog.
    pub fn from_json_str(source: &str, content: &ContentConfig) -> CatalogResult<Self> {
        let file: CatalogFile = serde_json::from_str(source)?;
        Self::from_entries(file.items, content)
    }

    /// Build a catalog from authored entries.
    pub fn from_entries(
        entries: impl IntoIterator<Item = ItemEntry>,
        content: &ContentConfig,
    ) -> CatalogResult<Self> {
        let mut catalog = Self::new();
        for entry in entries {
            if entry.key.trim().is_empty() {
                return Err(CatalogError::EmptyKey);
            }
            if entry.max_stack_size == 0 {
                return Err(CatalogError::ZeroStackSize(entry.key));
            }
            catalog.insert(entry.into_definition(content))?;
        }
        debug!(items = catalog.len(), "item catalog loaded");
        Ok(catalog)
    }

    /// Add a single definition. Keys must be unique.
    pub fn insert(&mut self, item: ItemDefinition) -> CatalogResult<ItemRef> {
        if self.by_key.contains_key(&item.key) {
            return Err(CatalogError::DuplicateKey(item.key));
        }
        let item = Arc::new(item);
        self.by_key.insert(item.key.clone(), item.id);
        self.items.insert(item.id, Arc::clone(&item));
        Ok(item)
    }

    pub fn get(&self, id: ItemId) -> Option<&ItemRef> {
        self.items.get(&id)
    }

    pub fn get_by_key(&self, key: &str) -> Option<&ItemRef> {
        self.by_key.get(key).and_then(|id| self.items.get(id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemRef> {
        self.items.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanics::StatName;

    const SAMPLE: &str = r#"
        [[items]]
        key = "iron_sword"
        name = "Demir Kılıç"
        item_type = "Weapon"
        weapon_class = "Sword"
        stat_bonuses = [{ stat = "Guc", amount = 5.0 }]

        [[items.abilities]]
        kind = "SwordSlash"
        name = "Kılıç Doğrama"
        cooldown_seconds = 3.0
        base_damage = 75.0

        [[items]]
        key = "health_potion"
        name = "Health Potion"
        item_type = "Consumable"
        max_stack_size = 10
        consumable = { kind = "restore_health", amount = 50.0 }
    "#;

    #[test]
    fn test_load_toml_catalog() {
        let catalog = ItemCatalog::from_toml_str(SAMPLE, &ContentConfig::default()).unwrap();
        assert_eq!(catalog.len(), 2);

        let sword = catalog.get_by_key("iron_sword").unwrap();
        assert!(sword.is_sword());
        assert_eq!(sword.abilities.len(), 1);
        assert_eq!(sword.stat_bonuses[0].stat, StatName::Guc);

        let potion = catalog.get(ItemId::from_key("health_potion")).unwrap();
        assert!(potion.is_stackable());
        assert_eq!(
            potion.consumable,
            Some(ConsumableEffect::RestoreHealth { amount: 50.0 })
        );
    }

    #[test]
    fn test_load_json_catalog() {
        let json = r#"{"items":[{"key":"fez","name":"Fes","item_type":"Armor"}]}"#;
        let catalog = ItemCatalog::from_json_str(json, &ContentConfig::default()).unwrap();
        assert_eq!(catalog.get_by_key("fez").unwrap().item_type, ItemType::Armor);
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let toml = r#"
            [[items]]
            key = "a"
            name = "A"
            item_type = "Material"
            [[items]]
            key = "a"
            name = "A again"
            item_type = "Material"
        "#;
        let err = ItemCatalog::from_toml_str(toml, &ContentConfig::default()).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateKey(k) if k == "a"));
    }

    #[test]
    fn test_zero_stack_rejected() {
        let toml = r#"
            [[items]]
            key = "dust"
            name = "Dust"
            item_type = "Material"
            max_stack_size = 0
        "#;
        let err = ItemCatalog::from_toml_str(toml, &ContentConfig::default()).unwrap_err();
        assert!(matches!(err, CatalogError::ZeroStackSize(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml = r#"
            [[items]]
            key = "dust"
            name = "Dust"
            item_type = "Material"
            rarity = "epic"
        "#;
        assert!(ItemCatalog::from_toml_str(toml, &ContentConfig::default()).is_err());
    }

    #[test]
    fn test_inference_flag_follows_config() {
        let toml = r#"
            [[items]]
            key = "blade"
            name = "Old Sword"
            item_type = "Weapon"
        "#;
        let content = ContentConfig {
            infer_weapon_class_from_name: false,
        };
        let catalog = ItemCatalog::from_toml_str(toml, &content).unwrap();
        assert_eq!(catalog.get_by_key("blade").unwrap().weapon_class(), None);
    }
}
