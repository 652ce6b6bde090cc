//! Inventory store - a fixed grid of item stacks.
//!
//! Adding fills existing partial stacks of the same item lowest index first,
//! then opens new stacks in the first empty slots. Whatever does not fit is
//! reported back as dropped.

use thiserror::Error;
use tracing::{debug, warn};

use istanbul_rules::{ItemRef, ItemType};

use crate::error::ErrorKind;
use crate::events::{CharacterEvent, EventQueue};
use crate::stack::ItemStack;

/// Inventory error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("slot {index} is out of range (capacity {capacity})")]
    SlotOutOfRange { index: usize, capacity: usize },

    #[error("slot {0} is empty")]
    EmptySlot(usize),

    #[error("{0} is not a consumable")]
    NotConsumable(String),

    #[error("no room for {quantity} x {item}")]
    Full { item: String, quantity: u32 },
}

impl InventoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InventoryError::Full { .. } => ErrorKind::Capacity,
            _ => ErrorKind::InvalidInput,
        }
    }
}

/// Result type for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// How much of an add landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct AddOutcome {
    pub added: u32,
    pub dropped: u32,
}

impl AddOutcome {
    pub fn is_complete(&self) -> bool {
        self.dropped == 0
    }
}

#[derive(Debug, Clone)]
pub struct InventoryStore {
    slots: Vec<Option<ItemStack>>,
    events: EventQueue,
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::new(30)
    }
}

impl InventoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            events: EventQueue::new(),
        }
    }

    /// Whether all `quantity` units of `item` would fit.
    pub fn can_add(&self, item: &ItemRef, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        let empty = self.slots.iter().filter(|slot| slot.is_none()).count() as u64;
        if !item.is_stackable() {
            return u64::from(quantity) <= empty;
        }
        let room: u64 = self
            .slots
            .iter()
            .flatten()
            .filter(|stack| stack.holds(item))
            .map(|stack| u64::from(stack.room()))
            .sum();
        let rest = u64::from(quantity).saturating_sub(room);
        let needed = rest.div_ceil(u64::from(item.max_stack_size));
        needed <= empty
    }

    /// Add up to `quantity` units. Fails only when nothing fits.
    pub fn add_item(&mut self, item: &ItemRef, quantity: u32) -> InventoryResult<AddOutcome> {
        if quantity == 0 {
            return Err(InventoryError::ZeroQuantity);
        }
        let mut remaining = quantity;

        if item.is_stackable() {
            for index in 0..self.slots.len() {
                if remaining == 0 {
                    break;
                }
                let Some(stack) = self.slots[index].as_mut() else {
                    continue;
                };
                if !stack.holds(item) || stack.room() == 0 {
                    continue;
                }
                let moved = remaining.min(stack.room());
                stack.quantity += moved;
                remaining -= moved;
                self.push_changed(index);
            }
        }

        let per_slot = if item.is_stackable() { item.max_stack_size } else { 1 };
        while remaining > 0 {
            let Some(index) = self.find_first_empty_slot() else {
                break;
            };
            let placed = remaining.min(per_slot);
            self.slots[index] = Some(ItemStack::new(ItemRef::clone(item), placed));
            remaining -= placed;
            self.push_changed(index);
            self.events.push(CharacterEvent::ItemAdded {
                index,
                item: item.id,
                quantity: placed,
            });
        }

        let added = quantity - remaining;
        if added == 0 {
            warn!(item = %item.name, quantity, "inventory full");
            return Err(InventoryError::Full {
                item: item.name.clone(),
                quantity,
            });
        }
        if remaining > 0 {
            warn!(item = %item.name, dropped = remaining, "inventory full, remainder dropped");
        }
        debug!(item = %item.name, added, "items added");
        Ok(AddOutcome {
            added,
            dropped: remaining,
        })
    }

    /// Take up to `quantity` from one slot. Returns how many were removed.
    pub fn remove_item(&mut self, index: usize, quantity: u32) -> InventoryResult<u32> {
        if quantity == 0 {
            return Err(InventoryError::ZeroQuantity);
        }
        let stack = self.stack_mut(index)?;
        let removed = quantity.min(stack.quantity);
        stack.quantity -= removed;
        if stack.quantity == 0 {
            self.slots[index] = None;
        }
        self.push_changed(index);
        Ok(removed)
    }

    /// Swap two slots. Returns false when nothing moved.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.slots.len() || to >= self.slots.len() {
            return false;
        }
        self.slots.swap(from, to);
        self.push_changed(from);
        self.push_changed(to);
        true
    }

    /// Consume one unit of the consumable at `index` and return its definition.
    pub fn use_item(&mut self, index: usize) -> InventoryResult<ItemRef> {
        let item = ItemRef::clone(&self.stack_mut(index)?.item);
        if item.item_type != ItemType::Consumable {
            return Err(InventoryError::NotConsumable(item.name.clone()));
        }
        self.remove_item(index, 1)?;
        Ok(item)
    }

    fn stack_mut(&mut self, index: usize) -> InventoryResult<&mut ItemStack> {
        let capacity = self.slots.len();
        self.slots
            .get_mut(index)
            .ok_or(InventoryError::SlotOutOfRange { index, capacity })?
            .as_mut()
            .ok_or(InventoryError::EmptySlot(index))
    }

    fn push_changed(&mut self, index: usize) {
        let (item, quantity) = match &self.slots[index] {
            Some(stack) => (Some(stack.id()), stack.quantity),
            None => (None, 0),
        };
        self.events.push(CharacterEvent::InventoryChanged {
            index,
            item,
            quantity,
        });
    }

    pub fn find_first_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// First slot holding `item`.
    pub fn find_item_slot(&self, item: &ItemRef) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|stack| stack.holds(item)))
    }

    /// Total units of `item` across all slots.
    pub fn item_count(&self, item: &ItemRef) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| stack.holds(item))
            .map(|stack| stack.quantity)
            .sum()
    }

    pub fn slot(&self, index: usize) -> Option<&ItemStack> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn used_slots(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&ItemStack>> {
        self.slots.iter().map(Option::as_ref)
    }

    pub fn drain_events(&mut self) -> Vec<CharacterEvent> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use istanbul_rules::ItemDefinition;
    use proptest::prelude::*;

    fn potion() -> ItemRef {
        ItemDefinition::new("health_potion", "Health Potion", ItemType::Consumable)
            .with_stack_size(10)
            .into_ref()
    }

    fn sword() -> ItemRef {
        ItemDefinition::new("iron_sword", "Demir Kılıç", ItemType::Weapon).into_ref()
    }

    #[test]
    fn test_potions_merge_into_existing_stack() {
        let mut inventory = InventoryStore::new(2);
        let potion = potion();
        let _ = inventory.add_item(&potion, 3).unwrap();

        assert!(inventory.can_add(&potion, 5));
        let outcome = inventory.add_item(&potion, 5).unwrap();

        assert_eq!(outcome, AddOutcome { added: 5, dropped: 0 });
        assert_eq!(inventory.slot(0).unwrap().quantity, 8);
        assert!(inventory.slot(1).is_none());
        assert_eq!(inventory.find_first_empty_slot(), Some(1));
    }

    #[test]
    fn test_stack_overflow_opens_new_slot() {
        let mut inventory = InventoryStore::new(5);
        let potion = potion();
        let _ = inventory.add_item(&potion, 7).unwrap();
        inventory.drain_events();

        let _ = inventory.add_item(&potion, 25).unwrap();
        let quantities: Vec<_> = inventory.iter().map(|s| s.map_or(0, |s| s.quantity)).collect();
        assert_eq!(quantities, vec![10, 10, 10, 2, 0]);

        let added = inventory
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, CharacterEvent::ItemAdded { .. }))
            .count();
        assert_eq!(added, 3);
    }

    #[test]
    fn test_non_stackables_take_one_slot_each() {
        let mut inventory = InventoryStore::new(3);
        let sword = sword();
        assert!(inventory.can_add(&sword, 3));
        assert!(!inventory.can_add(&sword, 4));

        let outcome = inventory.add_item(&sword, 4).unwrap();
        assert_eq!(outcome, AddOutcome { added: 3, dropped: 1 });
        assert!(!outcome.is_complete());
        assert_eq!(inventory.item_count(&sword), 3);
    }

    #[test]
    fn test_full_inventory_rejects() {
        let mut inventory = InventoryStore::new(1);
        let _ = inventory.add_item(&sword(), 1).unwrap();
        inventory.drain_events();

        let err = inventory.add_item(&potion(), 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capacity);
        assert!(inventory.drain_events().is_empty());
    }

    #[test]
    fn test_can_add_counts_partial_room() {
        let mut inventory = InventoryStore::new(2);
        let potion = potion();
        let _ = inventory.add_item(&potion, 6).unwrap();

        assert!(inventory.can_add(&potion, 14));
        assert!(!inventory.can_add(&potion, 15));
        assert!(!inventory.can_add(&potion, 0));
    }

    #[test]
    fn test_remove_clamps_and_clears() {
        let mut inventory = InventoryStore::new(3);
        let potion = potion();
        let _ = inventory.add_item(&potion, 4).unwrap();

        assert_eq!(inventory.remove_item(0, 1), Ok(1));
        assert_eq!(inventory.remove_item(0, 10), Ok(3));
        assert!(inventory.slot(0).is_none());
        assert_eq!(inventory.remove_item(0, 1), Err(InventoryError::EmptySlot(0)));
        assert_eq!(
            inventory.remove_item(3, 1),
            Err(InventoryError::SlotOutOfRange { index: 3, capacity: 3 })
        );
    }

    #[test]
    fn test_move_swaps() {
        let mut inventory = InventoryStore::new(3);
        let _ = inventory.add_item(&sword(), 1).unwrap();
        let _ = inventory.add_item(&potion(), 2).unwrap();

        assert!(inventory.move_item(0, 2));
        assert!(inventory.slot(0).is_none());
        assert_eq!(inventory.slot(2).unwrap().item.key, "iron_sword");

        assert!(inventory.move_item(1, 2));
        assert_eq!(inventory.slot(1).unwrap().item.key, "iron_sword");
        assert_eq!(inventory.slot(2).unwrap().quantity, 2);

        assert!(!inventory.move_item(1, 1));
        assert!(!inventory.move_item(1, 9));
    }

    #[test]
    fn test_use_item_consumes_one() {
        let mut inventory = InventoryStore::new(3);
        let _ = inventory.add_item(&potion(), 2).unwrap();
        let _ = inventory.add_item(&sword(), 1).unwrap();

        let used = inventory.use_item(0).unwrap();
        assert_eq!(used.key, "health_potion");
        assert_eq!(inventory.slot(0).unwrap().quantity, 1);

        assert_eq!(
            inventory.use_item(1),
            Err(InventoryError::NotConsumable("Demir Kılıç".into()))
        );
        assert_eq!(inventory.slot(1).unwrap().quantity, 1);
    }

    #[test]
    fn test_find_item_slot() {
        let mut inventory = InventoryStore::new(3);
        let potion = potion();
        let _ = inventory.add_item(&sword(), 1).unwrap();
        let _ = inventory.add_item(&potion, 1).unwrap();

        assert_eq!(inventory.find_item_slot(&potion), Some(1));
        assert_eq!(inventory.used_slots(), 2);
        assert_eq!(inventory.capacity(), 3);
    }

    proptest! {
        #[test]
        fn test_add_remove_round_trip(
            existing in 0u32..40,
            added in 1u32..40,
        ) {
            let mut inventory = InventoryStore::new(10);
            let potion = potion();
            if existing > 0 {
                let _ = inventory.add_item(&potion, existing).unwrap();
            }
            let before: Vec<_> = inventory.iter().map(|s| s.map(|s| s.quantity)).collect();

            prop_assume!(inventory.can_add(&potion, added));
            let outcome = inventory.add_item(&potion, added).unwrap();
            prop_assert_eq!(outcome.dropped, 0);
            prop_assert_eq!(inventory.item_count(&potion), existing + added);

            // Take back exactly what each slot gained.
            let mut to_remove = added;
            for index in (0..inventory.capacity()).rev() {
                if to_remove == 0 {
                    break;
                }
                let held = before[index].unwrap_or(0);
                let now = inventory.slot(index).map_or(0, |s| s.quantity);
                let surplus = now - held;
                if surplus > 0 {
                    to_remove -= inventory.remove_item(index, surplus).unwrap();
                }
            }

            let after: Vec<_> = inventory.iter().map(|s| s.map(|s| s.quantity)).collect();
            prop_assert_eq!(before, after);
        }
    }
}
