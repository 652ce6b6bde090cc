//! Game mechanics: item categories, equipment slots, weapon classes and
//! consumable effects.

mod stats;

pub use stats::*;

use serde::{Deserialize, Serialize};

/// Broad item categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Weapon,
    Armor,
    Accessory,
    Consumable,
    Material,
    Special,
}

impl ItemType {
    /// Only weapons, armor and accessories go into equipment slots.
    pub fn is_equippable(&self) -> bool {
        matches!(self, ItemType::Weapon | ItemType::Armor | ItemType::Accessory)
    }
}

/// Equipment slots for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipmentSlotType {
    Helmet,
    Chest,
    Shield,
    Weapon1,
    Weapon2,
    Necklace,
    Ring,
    Earring,
}

impl EquipmentSlotType {
    /// Every slot, in display order.
    pub const ALL: [EquipmentSlotType; 8] = [
        EquipmentSlotType::Helmet,
        EquipmentSlotType::Chest,
        EquipmentSlotType::Shield,
        EquipmentSlotType::Weapon1,
        EquipmentSlotType::Weapon2,
        EquipmentSlotType::Necklace,
        EquipmentSlotType::Ring,
        EquipmentSlotType::Earring,
    ];

    /// Slots that can hold the active weapon.
    pub fn is_weapon(&self) -> bool {
        matches!(self, EquipmentSlotType::Weapon1 | EquipmentSlotType::Weapon2)
    }

    pub fn is_armor(&self) -> bool {
        matches!(self, EquipmentSlotType::Helmet | EquipmentSlotType::Chest)
    }

    pub fn is_accessory(&self) -> bool {
        matches!(
            self,
            EquipmentSlotType::Necklace | EquipmentSlotType::Ring | EquipmentSlotType::Earring
        )
    }

    /// The sibling weapon slot, if this is a weapon slot.
    pub fn other_weapon(&self) -> Option<EquipmentSlotType> {
        match self {
            EquipmentSlotType::Weapon1 => Some(EquipmentSlotType::Weapon2),
            EquipmentSlotType::Weapon2 => Some(EquipmentSlotType::Weapon1),
            _ => None,
        }
    }

    /// Position of this slot in [`EquipmentSlotType::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Weapon families. Drives shield dependency checks and the legacy ability
/// fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponClass {
    Sword,
    Axe,
    Rapier,
    FireStaff,
    /// Shields are weapon-type items that only fit the shield slot.
    Shield,
}

/// Name tokens per class, checked in order. Shield tokens come first so a
/// name mentioning both a sword and a shield is a shield.
const CLASS_TOKENS: &[(WeaponClass, &[&str])] = &[
    (WeaponClass::Shield, &["kalkan", "shield", "buckler"]),
    (WeaponClass::Sword, &["kilic", "sword", "saber", "sabre"]),
    (WeaponClass::Axe, &["balta", "axe"]),
    (WeaponClass::Rapier, &["mec", "rapier"]),
    (WeaponClass::FireStaff, &["ates", "fire", "asa"]),
];

impl WeaponClass {
    /// Infer a class from a display name by case- and diacritic-insensitive
    /// token matching.
    pub fn infer_from_name(name: &str) -> Option<WeaponClass> {
        let folded = fold_name(name);
        CLASS_TOKENS
            .iter()
            .find(|(_, tokens)| tokens.iter().any(|token| folded.contains(token)))
            .map(|(class, _)| *class)
    }
}

/// Lowercase and strip Turkish diacritics so "Kılıç", "KILIÇ" and "Kilic"
/// compare equal.
pub fn fold_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'ı' | 'İ' => 'i',
            'ç' | 'Ç' | 'č' | 'Č' => 'c',
            'ş' | 'Ş' => 's',
            'ğ' | 'Ğ' => 'g',
            'ö' | 'Ö' => 'o',
            'ü' | 'Ü' => 'u',
            'â' | 'Â' => 'a',
            other => other,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// What using a consumable does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsumableEffect {
    RestoreHealth { amount: f32 },
    RestoreEnergy { amount: f32 },
    TemporaryStat {
        stat: StatName,
        amount: f32,
        duration_seconds: f32,
    },
}

impl ConsumableEffect {
    /// Legacy mapping from consumable display names to effects.
    pub fn infer_from_name(name: &str, heal: f32, energy: f32) -> Option<ConsumableEffect> {
        let folded = fold_name(name);
        if ["potion", "iksir", "health"].iter().any(|t| folded.contains(t)) {
            Some(ConsumableEffect::RestoreHealth { amount: heal })
        } else if folded.contains("mana") {
            Some(ConsumableEffect::RestoreEnergy { amount: energy })
        } else {
            None
        }
    }
}
