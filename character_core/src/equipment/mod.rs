//! Equipment registry - what a character is wearing and wielding.
//!
//! Eight fixed slots plus the active weapon pointer. The shield slot depends
//! on a sword being held in one of the two weapon slots; that dependency is
//! enforced when equipping and re-checked whenever a weapon slot changes, so
//! a shield is never left equipped without its sword.

use thiserror::Error;
use tracing::{info, warn};

use istanbul_rules::{EquipmentSlotType, ItemRef, StatModifier};

use crate::error::ErrorKind;
use crate::events::{CharacterEvent, EventQueue};
use crate::stack::ItemStack;

/// Errors from equipment changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquipmentError {
    #[error("{item} cannot be equipped in {slot:?}")]
    IncompatibleItem {
        item: String,
        slot: EquipmentSlotType,
    },

    #[error("cannot equip a zero quantity")]
    ZeroQuantity,

    #[error("a shield requires a sword in a weapon slot")]
    ShieldRequiresSword,

    #[error("slot {0:?} is empty")]
    SlotEmpty(EquipmentSlotType),

    #[error("{0:?} is not a weapon slot")]
    NotAWeaponSlot(EquipmentSlotType),

    #[error("cannot make empty slot {0:?} the active weapon")]
    EmptyWeaponSlot(EquipmentSlotType),
}

impl EquipmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EquipmentError::ShieldRequiresSword | EquipmentError::EmptyWeaponSlot(_) => {
                ErrorKind::DependencyViolation
            }
            _ => ErrorKind::InvalidInput,
        }
    }
}

/// What left the registry as a result of an equip.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct EquipOutcome {
    /// The stack previously in the target slot.
    pub replaced: Option<ItemStack>,
    /// The shield, if replacing a weapon removed the last sword.
    pub auto_unequipped_shield: Option<ItemStack>,
}

/// What left the registry as a result of an unequip.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Unequipped {
    pub stack: ItemStack,
    pub auto_unequipped_shield: Option<ItemStack>,
}

#[derive(Debug, Clone)]
pub struct EquipmentRegistry {
    slots: [Option<ItemStack>; 8],
    active_weapon_slot: EquipmentSlotType,
    events: EventQueue,
}

impl Default for EquipmentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EquipmentRegistry {
    pub fn new() -> Self {
        Self {
            slots: Default::default(),
            active_weapon_slot: EquipmentSlotType::Weapon1,
            events: EventQueue::new(),
        }
    }

    /// Whether `item` is allowed in `slot` by type and weapon class.
    pub fn can_equip(&self, item: &ItemRef, slot: EquipmentSlotType) -> bool {
        item.can_equip_in(slot)
    }

    /// Put `quantity` of `item` into `slot`, replacing its contents.
    pub fn equip(
        &mut self,
        slot: EquipmentSlotType,
        item: ItemRef,
        quantity: u32,
    ) -> Result<EquipOutcome, EquipmentError> {
        if !self.can_equip(&item, slot) {
            warn!(item = %item.name, ?slot, "item does not fit slot");
            return Err(EquipmentError::IncompatibleItem {
                item: item.name.clone(),
                slot,
            });
        }
        if quantity == 0 {
            return Err(EquipmentError::ZeroQuantity);
        }
        if slot == EquipmentSlotType::Shield && !self.has_valid_sword_equipped() {
            warn!(item = %item.name, "shield rejected without a sword");
            return Err(EquipmentError::ShieldRequiresSword);
        }

        let had_active_weapon = self.active_weapon().is_some();
        let new_id = item.id;
        info!(item = %item.name, ?slot, quantity, "equipped");
        let replaced = self.slots[slot.index()].replace(ItemStack::new(item, quantity));

        if slot.is_weapon() && (!had_active_weapon || slot == self.active_weapon_slot) {
            self.active_weapon_slot = slot;
            self.push_active_weapon_changed();
        }
        self.events.push(CharacterEvent::EquipmentChanged {
            slot,
            new_item: Some(new_id),
            old_item: replaced.as_ref().map(ItemStack::id),
        });

        let auto_unequipped_shield = if slot.is_weapon() {
            self.validate_shield()
        } else {
            None
        };
        Ok(EquipOutcome {
            replaced,
            auto_unequipped_shield,
        })
    }

    /// Empty `slot`, moving the active weapon to the other weapon slot when
    /// the active one is removed.
    pub fn unequip(&mut self, slot: EquipmentSlotType) -> Result<Unequipped, EquipmentError> {
        let Some(stack) = self.slots[slot.index()].take() else {
            warn!(?slot, "unequip from empty slot");
            return Err(EquipmentError::SlotEmpty(slot));
        };
        info!(item = %stack.item.name, ?slot, "unequipped");

        if slot == self.active_weapon_slot {
            self.active_weapon_slot = match slot.other_weapon() {
                Some(other) if !self.is_slot_empty(other) => other,
                _ => EquipmentSlotType::Weapon1,
            };
            self.push_active_weapon_changed();
        }
        self.events.push(CharacterEvent::EquipmentChanged {
            slot,
            new_item: None,
            old_item: Some(stack.id()),
        });

        let auto_unequipped_shield = self.validate_shield();
        Ok(Unequipped {
            stack,
            auto_unequipped_shield,
        })
    }

    /// Make `slot` the active weapon. Returns whether the active slot moved.
    pub fn set_active_weapon(&mut self, slot: EquipmentSlotType) -> Result<bool, EquipmentError> {
        if !slot.is_weapon() {
            return Err(EquipmentError::NotAWeaponSlot(slot));
        }
        if self.is_slot_empty(slot) {
            warn!(?slot, "cannot activate empty weapon slot");
            return Err(EquipmentError::EmptyWeaponSlot(slot));
        }
        if slot == self.active_weapon_slot {
            return Ok(false);
        }
        info!(from = ?self.active_weapon_slot, to = ?slot, "active weapon switched");
        self.active_weapon_slot = slot;
        self.push_active_weapon_changed();
        Ok(true)
    }

    /// Drop the shield if no sword backs it.
    fn validate_shield(&mut self) -> Option<ItemStack> {
        if self.has_valid_sword_equipped() {
            return None;
        }
        let shield = self.slots[EquipmentSlotType::Shield.index()].take()?;
        warn!(item = %shield.item.name, "shield auto-unequipped, no sword equipped");
        self.events.push(CharacterEvent::EquipmentChanged {
            slot: EquipmentSlotType::Shield,
            new_item: None,
            old_item: Some(shield.id()),
        });
        Some(shield)
    }

    fn push_active_weapon_changed(&mut self) {
        self.events.push(CharacterEvent::ActiveWeaponChanged {
            slot: self.active_weapon_slot,
            weapon: self.active_weapon().map(|item| item.id),
        });
    }

    pub fn equipped(&self, slot: EquipmentSlotType) -> Option<&ItemStack> {
        self.slots[slot.index()].as_ref()
    }

    pub fn is_slot_empty(&self, slot: EquipmentSlotType) -> bool {
        self.slots[slot.index()].is_none()
    }

    pub fn active_weapon_slot(&self) -> EquipmentSlotType {
        self.active_weapon_slot
    }

    pub fn active_weapon(&self) -> Option<&ItemRef> {
        self.equipped(self.active_weapon_slot).map(|stack| &stack.item)
    }

    pub fn has_valid_sword_equipped(&self) -> bool {
        self.equipped_sword().is_some()
    }

    /// The first sword found in Weapon1 then Weapon2.
    pub fn equipped_sword(&self) -> Option<&ItemRef> {
        [EquipmentSlotType::Weapon1, EquipmentSlotType::Weapon2]
            .into_iter()
            .filter_map(|slot| self.equipped(slot))
            .map(|stack| &stack.item)
            .find(|item| item.is_sword())
    }

    /// Every equipped item's bonuses, in slot order.
    pub fn all_stat_bonuses(&self) -> Vec<StatModifier> {
        self.slots
            .iter()
            .flatten()
            .flat_map(|stack| stack.item.stat_bonuses.iter().copied())
            .collect()
    }

    pub fn equipped_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Every slot with its contents, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EquipmentSlotType, Option<&ItemStack>)> {
        EquipmentSlotType::ALL
            .into_iter()
            .map(|slot| (slot, self.equipped(slot)))
    }

    pub fn drain_events(&mut self) -> Vec<CharacterEvent> {
        self.events.drain()
    }
}
