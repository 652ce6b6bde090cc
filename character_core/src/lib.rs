//! # Character Core
//!
//! Mutable per-character state for Still Here Istanbul: stats aggregation,
//! equipment with the sword/shield rule, weapon-driven ability loadouts with
//! cooldowns, the stacked inventory and the consumable hotbar.
//!
//! [`Character`] owns one of each component and wires them together through
//! [`CharacterEvent`]s. The [`replication`] module turns a character into
//! snapshots and deltas for observers.
//!
//! Everything here is single-threaded and synchronous; time only moves when
//! the host calls [`Character::tick`].

pub mod abilities;
pub mod character;
pub mod clock;
pub mod equipment;
pub mod error;
pub mod events;
pub mod hotbar;
pub mod inventory;
pub mod notifier;
pub mod replication;
pub mod stack;
pub mod stats;

pub use abilities::{AbilityError, AbilityLoadout, AbilitySlot, CooldownState, Hotkey};
pub use character::{Character, Vitals};
pub use clock::TimerQueue;
pub use equipment::{EquipOutcome, EquipmentError, EquipmentRegistry, Unequipped};
pub use error::{CharacterError, CharacterResult, ErrorKind};
pub use events::{CharacterEvent, EventBus, EventQueue, SubscriptionId};
pub use hotbar::{ConsumableHotbar, Consumed, HotbarError};
pub use inventory::{AddOutcome, InventoryError, InventoryResult, InventoryStore};
pub use notifier::{Notifier, RecordingNotifier, TracingNotifier};
pub use replication::{
    AbilitySnapshot, CharacterSnapshot, ReplicationError, ReplicationResult, SlotEntry,
    SnapshotDelta,
};
pub use stack::ItemStack;
pub use stats::{StatsAggregator, StatsError};
