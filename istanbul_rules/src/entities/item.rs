//! Item definitions.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{AbilityDefinition, ItemId};
use crate::mechanics::{ConsumableEffect, EquipmentSlotType, ItemType, StatModifier, WeaponClass};

/// Shared handle to an immutable item definition.
pub type ItemRef = Arc<ItemDefinition>;

fn default_stack_size() -> u32 {
    1
}

/// An immutable catalog entry, authored as content and read-only at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: ItemId,
    /// Authored key the id is derived from.
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub item_type: ItemType,
    #[serde(default = "default_stack_size")]
    pub max_stack_size: u32,
    /// Gold value.
    #[serde(default)]
    pub value: u32,
    /// Preferred slot for UI hints; compatibility is decided by
    /// [`ItemDefinition::can_equip_in`].
    #[serde(default)]
    pub equipment_slot: Option<EquipmentSlotType>,
    #[serde(default)]
    pub stat_bonuses: Vec<StatModifier>,
    #[serde(default)]
    pub abilities: Vec<AbilityDefinition>,
    /// Explicit weapon family tag.
    #[serde(default)]
    pub weapon_class: Option<WeaponClass>,
    #[serde(default)]
    pub consumable: Option<ConsumableEffect>,
    /// Whether a missing `weapon_class` may be inferred from `name`.
    #[serde(default = "default_infer")]
    pub infer_class_from_name: bool,
}

fn default_infer() -> bool {
    true
}

impl ItemDefinition {
    /// Create a new item definition for `key`.
    pub fn new(key: impl Into<String>, name: impl Into<String>, item_type: ItemType) -> Self {
        let key = key.into();
        Self {
            id: ItemId::from_key(&key),
            key,
            name: name.into(),
            description: String::new(),
            item_type,
            max_stack_size: 1,
            value: 0,
            equipment_slot: None,
            stat_bonuses: Vec::new(),
            abilities: Vec::new(),
            weapon_class: None,
            consumable: None,
            infer_class_from_name: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_stack_size(mut self, max_stack_size: u32) -> Self {
        self.max_stack_size = max_stack_size.max(1);
        self
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn with_slot_hint(mut self, slot: EquipmentSlotType) -> Self {
        self.equipment_slot = Some(slot);
        self
    }

    pub fn with_bonus(mut self, bonus: StatModifier) -> Self {
        self.stat_bonuses.push(bonus);
        self
    }

    pub fn with_ability(mut self, ability: AbilityDefinition) -> Self {
        self.abilities.push(ability);
        self
    }

    pub fn with_weapon_class(mut self, class: WeaponClass) -> Self {
        self.weapon_class = Some(class);
        self
    }

    pub fn with_consumable(mut self, effect: ConsumableEffect) -> Self {
        self.consumable = Some(effect);
        self
    }

    /// Disable name-based weapon class inference for this item.
    pub fn without_name_inference(mut self) -> Self {
        self.infer_class_from_name = false;
        self
    }

    /// Wrap into a shared handle.
    pub fn into_ref(self) -> ItemRef {
        Arc::new(self)
    }

    pub fn is_equippable(&self) -> bool {
        self.item_type.is_equippable()
    }

    pub fn is_stackable(&self) -> bool {
        self.max_stack_size > 1
    }

    /// Effective weapon class: the explicit tag, else the name-inferred one.
    /// Only weapons have a class.
    pub fn weapon_class(&self) -> Option<WeaponClass> {
        if self.item_type != ItemType::Weapon {
            return None;
        }
        self.weapon_class.or_else(|| {
            if self.infer_class_from_name {
                WeaponClass::infer_from_name(&self.name)
            } else {
                None
            }
        })
    }

    pub fn is_shield(&self) -> bool {
        self.weapon_class() == Some(WeaponClass::Shield)
    }

    pub fn is_sword(&self) -> bool {
        self.weapon_class() == Some(WeaponClass::Sword)
    }

    /// Slot compatibility by item type and weapon class.
    pub fn can_equip_in(&self, slot: EquipmentSlotType) -> bool {
        if !self.is_equippable() {
            return false;
        }
        match slot {
            EquipmentSlotType::Helmet | EquipmentSlotType::Chest => {
                self.item_type == ItemType::Armor
            }
            EquipmentSlotType::Weapon1 | EquipmentSlotType::Weapon2 => {
                self.item_type == ItemType::Weapon && !self.is_shield()
            }
            EquipmentSlotType::Shield => self.item_type == ItemType::Weapon && self.is_shield(),
            EquipmentSlotType::Necklace | EquipmentSlotType::Ring | EquipmentSlotType::Earring => {
                self.item_type == ItemType::Accessory
            }
        }
    }

    /// Effect when consumed: the explicit effect, else the legacy name mapping.
    pub fn consumable_effect(&self, heal: f32, energy: f32) -> Option<ConsumableEffect> {
        if self.item_type != ItemType::Consumable {
            return None;
        }
        self.consumable
            .or_else(|| ConsumableEffect::infer_from_name(&self.name, heal, energy))
    }
}
