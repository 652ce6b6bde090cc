//! A quantity of one item definition.

use istanbul_rules::{ItemId, ItemRef};

/// An occupied slot's contents. Quantity is always at least one; an empty
/// slot is `None` rather than a zero stack.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStack {
    pub item: ItemRef,
    pub quantity: u32,
}

impl ItemStack {
    pub fn new(item: ItemRef, quantity: u32) -> Self {
        Self { item, quantity }
    }

    pub fn id(&self) -> ItemId {
        self.item.id
    }

    /// How many more units fit on this stack.
    pub fn room(&self) -> u32 {
        self.item.max_stack_size.saturating_sub(self.quantity)
    }

    pub fn holds(&self, item: &ItemRef) -> bool {
        self.item.id == item.id
    }
}
