//! Character events and the bus that delivers them.
//!
//! Components record what changed into their own [`EventQueue`]. The owning
//! [`crate::Character`] drains the queues after every operation, reacts to
//! the events that other components depend on, and publishes them on its
//! [`EventBus`] in the order they were recorded.

use serde::{Deserialize, Serialize};

use istanbul_rules::{AbilityKind, EquipmentSlotType, ItemId, StatBlock, StatName};

/// Something observable happened to a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CharacterEvent {
    /// A slot's contents changed.
    EquipmentChanged {
        slot: EquipmentSlotType,
        new_item: Option<ItemId>,
        old_item: Option<ItemId>,
    },
    ActiveWeaponChanged {
        slot: EquipmentSlotType,
        weapon: Option<ItemId>,
    },
    /// Emitted after every recompute, whether or not anything moved.
    StatsRecalculated { current: StatBlock },
    StatChanged {
        stat: StatName,
        old_value: f32,
        new_value: f32,
    },
    InventoryChanged {
        index: usize,
        item: Option<ItemId>,
        quantity: u32,
    },
    /// A previously empty inventory slot was filled.
    ItemAdded {
        index: usize,
        item: ItemId,
        quantity: u32,
    },
    /// The Q/R/F loadout was replaced.
    AbilitiesChanged { loadout: [Option<AbilityKind>; 3] },
    AbilityUsed { kind: AbilityKind, value: f32 },
    AbilityCooldownUpdated {
        kind: AbilityKind,
        remaining_seconds: f32,
    },
    HotbarChanged {
        key: u8,
        item: Option<ItemId>,
        quantity: u32,
    },
    VitalsChanged {
        health: f32,
        max_health: f32,
        energy: f32,
        max_energy: f32,
    },
}

/// Ordered buffer of events a component has produced but nobody has read.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<CharacterEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CharacterEvent) {
        self.events.push(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<CharacterEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&CharacterEvent)>;

/// Synchronous fan-out to subscribers, in registration order.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Handler)>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&CharacterEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, event: &CharacterEvent) {
        for (_, handler) in &mut self.subscribers {
            handler(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
