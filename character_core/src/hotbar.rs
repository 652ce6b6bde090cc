//! Consumable quick slots bound to number keys.

use thiserror::Error;
use tracing::{info, warn};

use istanbul_rules::{ConsumableEffect, ConsumablesConfig, HotbarConfig, ItemRef, ItemType};

use crate::error::ErrorKind;
use crate::events::{CharacterEvent, EventQueue};
use crate::stack::ItemStack;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotbarError {
    #[error("key {0} is not bound to a hotbar slot")]
    UnknownKey(u8),

    #[error("{0} is not a consumable")]
    NotConsumable(String),

    #[error("hotbar slot {0} is empty")]
    EmptySlot(u8),

    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

impl HotbarError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

/// One unit taken from a slot, with the effect it should have.
#[derive(Debug, Clone, PartialEq)]
pub struct Consumed {
    pub item: ItemRef,
    /// `None` for consumables that do nothing mechanically.
    pub effect: Option<ConsumableEffect>,
}

#[derive(Debug, Clone)]
pub struct ConsumableHotbar {
    first_key: u8,
    slots: Vec<Option<ItemStack>>,
    default_heal: f32,
    default_energy: f32,
    events: EventQueue,
}

impl Default for ConsumableHotbar {
    fn default() -> Self {
        Self::new(&HotbarConfig::default(), &ConsumablesConfig::default())
    }
}

impl ConsumableHotbar {
    /// Slots whose key would pass 255 are not created.
    pub fn new(hotbar: &HotbarConfig, consumables: &ConsumablesConfig) -> Self {
        let max_slots = usize::from(u8::MAX - hotbar.first_key) + 1;
        if hotbar.slots > max_slots {
            warn!(
                first_key = hotbar.first_key,
                slots = hotbar.slots,
                kept = max_slots,
                "hotbar keys out of range, extra slots dropped"
            );
        }
        Self {
            first_key: hotbar.first_key,
            slots: vec![None; hotbar.slots.min(max_slots)],
            default_heal: consumables.default_heal,
            default_energy: consumables.default_energy,
            events: EventQueue::new(),
        }
    }

    fn index(&self, key: u8) -> Result<usize, HotbarError> {
        key.checked_sub(self.first_key)
            .map(usize::from)
            .filter(|&index| index < self.slots.len())
            .ok_or(HotbarError::UnknownKey(key))
    }

    /// Bind `quantity` of a consumable to `key`. Returns what was there.
    pub fn set_slot(
        &mut self,
        key: u8,
        item: ItemRef,
        quantity: u32,
    ) -> Result<Option<ItemStack>, HotbarError> {
        let index = self.index(key)?;
        if item.item_type != ItemType::Consumable {
            return Err(HotbarError::NotConsumable(item.name.clone()));
        }
        if quantity == 0 {
            return Err(HotbarError::ZeroQuantity);
        }
        info!(key, item = %item.name, quantity, "hotbar slot set");
        let previous = self.slots[index].replace(ItemStack::new(item, quantity));
        self.push_changed(key, index);
        Ok(previous)
    }

    pub fn clear_slot(&mut self, key: u8) -> Result<Option<ItemStack>, HotbarError> {
        let index = self.index(key)?;
        let previous = self.slots[index].take();
        if previous.is_some() {
            self.push_changed(key, index);
        }
        Ok(previous)
    }

    /// Consume one unit from the slot on `key`.
    pub fn use_slot(&mut self, key: u8) -> Result<Consumed, HotbarError> {
        let index = self.index(key)?;
        let Some(stack) = self.slots[index].as_mut() else {
            warn!(key, "hotbar slot empty");
            return Err(HotbarError::EmptySlot(key));
        };
        let item = ItemRef::clone(&stack.item);
        stack.quantity -= 1;
        if stack.quantity == 0 {
            self.slots[index] = None;
        }
        self.push_changed(key, index);

        let effect = item.consumable_effect(self.default_heal, self.default_energy);
        info!(key, item = %item.name, ?effect, "hotbar item used");
        Ok(Consumed { item, effect })
    }

    fn push_changed(&mut self, key: u8, index: usize) {
        let slot = self.slots[index].as_ref();
        self.events.push(CharacterEvent::HotbarChanged {
            key,
            item: slot.map(ItemStack::id),
            quantity: slot.map_or(0, |stack| stack.quantity),
        });
    }

    pub fn slot(&self, key: u8) -> Option<&ItemStack> {
        self.index(key).ok().and_then(|index| self.slots[index].as_ref())
    }

    /// Bound keys in order.
    pub fn keys(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.slots.len())
            .filter_map(|index| u8::try_from(index).ok())
            .filter_map(|offset| self.first_key.checked_add(offset))
    }

    pub fn drain_events(&mut self) -> Vec<CharacterEvent> {
        self.events.drain()
    }
}
