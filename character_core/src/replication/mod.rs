//! Replicated character state.
//!
//! A [`CharacterSnapshot`] is the full observable state of one character with
//! items referenced by [`ItemId`]. [`SnapshotDelta`] carries only the blocks
//! that differ between two snapshots. A receiver applies deltas in an
//! unbroken chain from its own revision, drops anything older, and asks for a
//! full snapshot when it detects a gap.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use istanbul_rules::{AbilityKind, CharacterId, EquipmentSlotType, ItemCatalog, ItemId, StatBlock};

use crate::abilities::{CooldownState, Hotkey};
use crate::character::{Character, Vitals};
use crate::stack::ItemStack;

#[derive(Debug, Error)]
pub enum ReplicationError {
    #[error("delta revision {received} is not newer than {current}")]
    Stale { current: u64, received: u64 },

    #[error("delta built on revision {base} but replica is at {expected}")]
    Gap { expected: u64, base: u64 },

    #[error("delta for {received} applied to {expected}")]
    CharacterMismatch {
        expected: CharacterId,
        received: CharacterId,
    },

    #[error("inventory index {index} out of range (capacity {capacity})")]
    IndexOutOfRange { index: usize, capacity: usize },

    #[error("unknown item {0:?}")]
    UnknownItem(ItemId),

    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

pub type ReplicationResult<T> = Result<T, ReplicationError>;

/// An occupied slot on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEntry {
    pub item: ItemId,
    pub quantity: u32,
}

impl From<&ItemStack> for SlotEntry {
    fn from(stack: &ItemStack) -> Self {
        Self {
            item: stack.id(),
            quantity: stack.quantity,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AbilitySnapshot {
    pub kind: Option<AbilityKind>,
    pub cooldown: CooldownState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub character: CharacterId,
    pub revision: u64,
    pub equipment: BTreeMap<EquipmentSlotType, SlotEntry>,
    pub active_weapon: EquipmentSlotType,
    pub base_stats: StatBlock,
    pub current_stats: StatBlock,
    pub vitals: Vitals,
    pub inventory: Vec<Option<SlotEntry>>,
    pub abilities: [AbilitySnapshot; 3],
}

impl CharacterSnapshot {
    pub fn capture(character: &Character) -> Self {
        let equipment = character
            .equipment()
            .iter()
            .filter_map(|(slot, stack)| stack.map(|stack| (slot, SlotEntry::from(stack))))
            .collect();
        let abilities = Hotkey::ALL.map(|hotkey| {
            let slot = character.abilities().slot(hotkey);
            AbilitySnapshot {
                kind: slot.ability.as_ref().map(|ability| ability.kind),
                cooldown: slot.cooldown,
            }
        });
        Self {
            character: character.id(),
            revision: character.revision(),
            equipment,
            active_weapon: character.equipment().active_weapon_slot(),
            base_stats: *character.stats().base(),
            current_stats: *character.stats().current(),
            vitals: character.vitals(),
            inventory: character.inventory().iter().map(|slot| slot.map(SlotEntry::from)).collect(),
            abilities,
        }
    }

    /// Bring this snapshot up to the delta's revision.
    ///
    /// The delta must be built on exactly this snapshot's revision, since the
    /// inventory block only lists slots that changed since then. Nothing
    /// changes when it is rejected.
    pub fn apply_delta(&mut self, delta: &SnapshotDelta) -> ReplicationResult<()> {
        if delta.character != self.character {
            return Err(ReplicationError::CharacterMismatch {
                expected: self.character,
                received: delta.character,
            });
        }
        if delta.revision <= self.revision {
            return Err(ReplicationError::Stale {
                current: self.revision,
                received: delta.revision,
            });
        }
        if delta.base_revision != self.revision {
            return Err(ReplicationError::Gap {
                expected: self.revision,
                base: delta.base_revision,
            });
        }
        let capacity = self.inventory.len();
        if let Some(&(index, _)) = delta.inventory.iter().find(|(index, _)| *index >= capacity) {
            return Err(ReplicationError::IndexOutOfRange { index, capacity });
        }

        if let Some(equipment) = &delta.equipment {
            self.equipment = equipment.clone();
        }
        if let Some(active_weapon) = delta.active_weapon {
            self.active_weapon = active_weapon;
        }
        if let Some(base_stats) = delta.base_stats {
            self.base_stats = base_stats;
        }
        if let Some(current_stats) = delta.current_stats {
            self.current_stats = current_stats;
        }
        if let Some(vitals) = delta.vitals {
            self.vitals = vitals;
        }
        if let Some(abilities) = delta.abilities {
            self.abilities = abilities;
        }
        for &(index, entry) in &delta.inventory {
            self.inventory[index] = entry;
        }
        debug!(
            character = %self.character,
            from = self.revision,
            to = delta.revision,
            "delta applied"
        );
        self.revision = delta.revision;
        Ok(())
    }

    /// Look up every equipped item for display.
    pub fn resolve_equipment(
        &self,
        catalog: &ItemCatalog,
    ) -> ReplicationResult<BTreeMap<EquipmentSlotType, ItemStack>> {
        self.equipment
            .iter()
            .map(|(&slot, entry)| {
                let item = catalog
                    .get(entry.item)
                    .ok_or(ReplicationError::UnknownItem(entry.item))?;
                Ok((slot, ItemStack::new(item.clone(), entry.quantity)))
            })
            .collect()
    }

    pub fn to_bytes(&self) -> ReplicationResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> ReplicationResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Changed blocks between two snapshots of the same character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDelta {
    pub character: CharacterId,
    pub base_revision: u64,
    pub revision: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<BTreeMap<EquipmentSlotType, SlotEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_weapon: Option<EquipmentSlotType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_stats: Option<StatBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stats: Option<StatBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vitals: Option<Vitals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abilities: Option<[AbilitySnapshot; 3]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inventory: Vec<(usize, Option<SlotEntry>)>,
}

fn changed<T: PartialEq + Clone>(before: &T, after: &T) -> Option<T> {
    (before != after).then(|| after.clone())
}

impl SnapshotDelta {
    pub fn between(prev: &CharacterSnapshot, next: &CharacterSnapshot) -> Self {
        let inventory = next
            .inventory
            .iter()
            .enumerate()
            .filter(|&(index, entry)| prev.inventory.get(index) != Some(entry))
            .map(|(index, entry)| (index, *entry))
            .collect();
        Self {
            character: next.character,
            base_revision: prev.revision,
            revision: next.revision,
            equipment: changed(&prev.equipment, &next.equipment),
            active_weapon: changed(&prev.active_weapon, &next.active_weapon),
            base_stats: changed(&prev.base_stats, &next.base_stats),
            current_stats: changed(&prev.current_stats, &next.current_stats),
            vitals: changed(&prev.vitals, &next.vitals),
            abilities: changed(&prev.abilities, &next.abilities),
            inventory,
        }
    }

    /// True when no block changed.
    pub fn is_empty(&self) -> bool {
        self.equipment.is_none()
            && self.active_weapon.is_none()
            && self.base_stats.is_none()
            && self.current_stats.is_none()
            && self.vitals.is_none()
            && self.abilities.is_none()
            && self.inventory.is_empty()
    }

    pub fn to_bytes(&self) -> ReplicationResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> ReplicationResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
