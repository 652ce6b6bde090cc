//! The character - owns every component and keeps them consistent.
//!
//! Each public operation mutates one component, then drains all component
//! event queues. Equipment changes feed the stats aggregator, active weapon
//! changes rebuild the ability loadout, and stat recomputes re-clamp vitals.
//! Every event is then published to subscribers in the order it was raised.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use istanbul_rules::{
    AbilityCatalog, AbilityEffect, AbilityKind, CharacterId, ConsumableEffect, CoreConfig,
    EquipmentSlotType, ItemRef, StatBlock, StatName,
};

use crate::abilities::{AbilityLoadout, Hotkey};
use crate::equipment::EquipmentRegistry;
use crate::error::{CharacterError, CharacterResult};
use crate::events::{CharacterEvent, EventBus, EventQueue, SubscriptionId};
use crate::hotbar::ConsumableHotbar;
use crate::inventory::{AddOutcome, InventoryError, InventoryStore};
use crate::notifier::{Notifier, TracingNotifier};
use crate::replication::CharacterSnapshot;
use crate::stack::ItemStack;
use crate::stats::{StatsAggregator, StatsError};

/// Current health and energy, bounded by the derived maxima.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f32,
    pub energy: f32,
}

pub struct Character {
    id: CharacterId,
    name: String,
    config: CoreConfig,
    stats: StatsAggregator,
    equipment: EquipmentRegistry,
    abilities: AbilityLoadout,
    inventory: InventoryStore,
    hotbar: ConsumableHotbar,
    vitals: Vitals,
    revision: u64,
    events: EventQueue,
    bus: EventBus,
    notifier: Box<dyn Notifier>,
}

impl std::fmt::Debug for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Character")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("revision", &self.revision)
            .field("vitals", &self.vitals)
            .field("current_stats", self.stats.current())
            .finish_non_exhaustive()
    }
}

impl Character {
    /// A fresh character with default stats and full vitals.
    pub fn new(name: impl Into<String>, config: &CoreConfig) -> Self {
        if let Err(err) = config.validate() {
            warn!(error = %err, "character built from an invalid config");
        }
        let mut stats = StatsAggregator::default().with_threshold_step(config.stats.threshold_step);
        stats.drain_events();
        let derived = stats.derived();
        Self {
            id: CharacterId::new(),
            name: name.into(),
            config: config.clone(),
            stats,
            equipment: EquipmentRegistry::new(),
            abilities: AbilityLoadout::default(),
            inventory: InventoryStore::new(config.inventory.size),
            hotbar: ConsumableHotbar::new(&config.hotbar, &config.consumables),
            vitals: Vitals {
                health: derived.max_health,
                energy: derived.max_energy,
            },
            revision: 0,
            events: EventQueue::new(),
            bus: EventBus::new(),
            notifier: Box::new(TracingNotifier),
        }
    }

    pub fn with_id(mut self, id: CharacterId) -> Self {
        self.id = id;
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Start from `base` instead of the default attributes. Vitals refill.
    pub fn with_base_stats(mut self, base: StatBlock) -> Self {
        self.stats.set_base(base);
        self.stats.drain_events();
        let derived = self.stats.derived();
        self.vitals = Vitals {
            health: derived.max_health,
            energy: derived.max_energy,
        };
        self
    }

    /// Use `catalog` for weapons authored without abilities.
    pub fn with_ability_catalog(mut self, catalog: AbilityCatalog) -> Self {
        self.abilities = AbilityLoadout::new(catalog);
        self
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&CharacterEvent) + 'static) -> SubscriptionId {
        self.bus.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    // Equipment

    /// Equip `quantity` of `item`. Anything displaced goes to the inventory.
    pub fn equip(
        &mut self,
        slot: EquipmentSlotType,
        item: ItemRef,
        quantity: u32,
    ) -> CharacterResult<()> {
        let result = self.equipment.equip(slot, item, quantity);
        let outcome = self.check("equip", result)?;
        self.stash(outcome.replaced);
        self.stash(outcome.auto_unequipped_shield);
        self.pump();
        Ok(())
    }

    /// Move one unit from an inventory slot into `slot`.
    pub fn equip_from_inventory(
        &mut self,
        index: usize,
        slot: EquipmentSlotType,
    ) -> CharacterResult<()> {
        let selected = self.inventory.slot(index).map(|stack| ItemRef::clone(&stack.item));
        let Some(item) = selected else {
            let capacity = self.inventory.capacity();
            let err = if index >= capacity {
                InventoryError::SlotOutOfRange { index, capacity }
            } else {
                InventoryError::EmptySlot(index)
            };
            return self.check("equip_from_inventory", Err(err));
        };
        let result = self.equipment.equip(slot, item, 1);
        let outcome = self.check("equip_from_inventory", result)?;
        let result = self.inventory.remove_item(index, 1);
        self.check("equip_from_inventory", result)?;
        self.stash(outcome.replaced);
        self.stash(outcome.auto_unequipped_shield);
        self.pump();
        Ok(())
    }

    /// Unequip into the inventory. Items that do not fit are dropped.
    pub fn unequip(&mut self, slot: EquipmentSlotType) -> CharacterResult<()> {
        let result = self.equipment.unequip(slot);
        let removed = self.check("unequip", result)?;
        self.stash(Some(removed.stack));
        self.stash(removed.auto_unequipped_shield);
        self.pump();
        Ok(())
    }

    /// Returns whether the active slot moved.
    pub fn set_active_weapon(&mut self, slot: EquipmentSlotType) -> CharacterResult<bool> {
        let result = self.equipment.set_active_weapon(slot);
        let changed = self.check("set_active_weapon", result)?;
        self.pump();
        Ok(changed)
    }

    fn stash(&mut self, stack: Option<ItemStack>) {
        let Some(stack) = stack else {
            return;
        };
        match self.inventory.add_item(&stack.item, stack.quantity) {
            Ok(outcome) if !outcome.is_complete() => {
                warn!(item = %stack.item.name, dropped = outcome.dropped, "no room, items dropped");
            }
            Ok(_) => {}
            Err(err) => {
                warn!(item = %stack.item.name, error = %err, "no room, items dropped");
            }
        }
    }

    // Abilities

    pub fn use_ability(&mut self, kind: AbilityKind) -> CharacterResult<AbilityEffect> {
        let result = self.abilities.use_ability(kind);
        let effect = self.check("use_ability", result)?;
        self.pump();
        Ok(effect)
    }

    pub fn use_hotkey(&mut self, hotkey: Hotkey) -> CharacterResult<AbilityEffect> {
        let result = self.abilities.use_hotkey(hotkey);
        let effect = self.check("use_hotkey", result)?;
        self.pump();
        Ok(effect)
    }

    // Inventory

    pub fn add_item(&mut self, item: &ItemRef, quantity: u32) -> CharacterResult<AddOutcome> {
        let result = self.inventory.add_item(item, quantity);
        let outcome = self.check("add_item", result)?;
        self.pump();
        Ok(outcome)
    }

    /// Take all of a world pickup or none of it.
    pub fn pick_up(&mut self, item: &ItemRef, quantity: u32) -> CharacterResult<()> {
        if quantity == 0 {
            return self.check("pick_up", Err(InventoryError::ZeroQuantity));
        }
        if !self.inventory.can_add(item, quantity) {
            let err = InventoryError::Full {
                item: item.name.clone(),
                quantity,
            };
            return self.check("pick_up", Err(err));
        }
        let result = self.inventory.add_item(item, quantity);
        let _ = self.check("pick_up", result)?;
        info!(item = %item.name, quantity, "picked up");
        self.pump();
        Ok(())
    }

    pub fn remove_item(&mut self, index: usize, quantity: u32) -> CharacterResult<u32> {
        let result = self.inventory.remove_item(index, quantity);
        let removed = self.check("remove_item", result)?;
        self.pump();
        Ok(removed)
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        let moved = self.inventory.move_item(from, to);
        self.pump();
        moved
    }

    /// Consume one unit from an inventory slot and apply its effect.
    pub fn use_item(&mut self, index: usize) -> CharacterResult<Option<ConsumableEffect>> {
        let pending = self.inventory.slot(index).and_then(|stack| self.effect_of(&stack.item));
        self.check("use_item", validate_effect(pending))?;
        let result = self.inventory.use_item(index);
        let item = self.check("use_item", result)?;
        let effect = self.effect_of(&item);
        info!(item = %item.name, ?effect, "item used");
        self.apply_effect(effect);
        self.pump();
        Ok(effect)
    }

    // Hotbar

    pub fn set_hotbar_slot(&mut self, key: u8, item: ItemRef, quantity: u32) -> CharacterResult<()> {
        let result = self.hotbar.set_slot(key, item, quantity);
        self.check("set_hotbar_slot", result)?;
        self.pump();
        Ok(())
    }

    pub fn use_hotbar(&mut self, key: u8) -> CharacterResult<Option<ConsumableEffect>> {
        let pending = self.hotbar.slot(key).and_then(|stack| self.effect_of(&stack.item));
        self.check("use_hotbar", validate_effect(pending))?;
        let result = self.hotbar.use_slot(key);
        let consumed = self.check("use_hotbar", result)?;
        self.apply_effect(consumed.effect);
        self.pump();
        Ok(consumed.effect)
    }

    fn effect_of(&self, item: &ItemRef) -> Option<ConsumableEffect> {
        item.consumable_effect(
            self.config.consumables.default_heal,
            self.config.consumables.default_energy,
        )
    }

    fn apply_effect(&mut self, effect: Option<ConsumableEffect>) {
        match effect {
            Some(ConsumableEffect::RestoreHealth { amount }) => {
                self.set_vitals(self.vitals.health + amount, self.vitals.energy);
            }
            Some(ConsumableEffect::RestoreEnergy { amount }) => {
                self.set_vitals(self.vitals.health, self.vitals.energy + amount);
            }
            Some(ConsumableEffect::TemporaryStat {
                stat,
                amount,
                duration_seconds,
            }) => {
                if let Err(err) = self.stats.apply_temporary_modifier(stat, amount, duration_seconds) {
                    warn!(error = %err, "consumable effect not applied");
                }
            }
            None => {}
        }
    }

    // Stats and vitals

    pub fn modify_base_stat(&mut self, stat: StatName, delta: f32) -> CharacterResult<f32> {
        let result = self.stats.modify_base_stat(stat, delta);
        let value = self.check("modify_base_stat", result)?;
        self.pump();
        Ok(value)
    }

    pub fn apply_temporary_modifier(
        &mut self,
        stat: StatName,
        amount: f32,
        duration_seconds: f32,
    ) -> CharacterResult<()> {
        let result = self.stats.apply_temporary_modifier(stat, amount, duration_seconds);
        self.check("apply_temporary_modifier", result)?;
        self.pump();
        Ok(())
    }

    /// Lose health, floored at zero. Returns the remaining health.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if amount.is_finite() && amount > 0.0 {
            self.set_vitals(self.vitals.health - amount, self.vitals.energy);
            self.pump();
        }
        self.vitals.health
    }

    /// Spend energy if enough is available.
    pub fn spend_energy(&mut self, amount: f32) -> bool {
        if !amount.is_finite() || amount < 0.0 || amount > self.vitals.energy {
            return false;
        }
        self.set_vitals(self.vitals.health, self.vitals.energy - amount);
        self.pump();
        true
    }

    fn set_vitals(&mut self, health: f32, energy: f32) {
        let derived = self.stats.derived();
        let next = Vitals {
            health: health.clamp(0.0, derived.max_health),
            energy: energy.clamp(0.0, derived.max_energy),
        };
        if next == self.vitals {
            return;
        }
        self.vitals = next;
        self.events.push(CharacterEvent::VitalsChanged {
            health: next.health,
            max_health: derived.max_health,
            energy: next.energy,
            max_energy: derived.max_energy,
        });
    }

    /// Advance cooldowns and modifier timers.
    pub fn tick(&mut self, dt: f32) {
        self.stats.tick(dt);
        self.abilities.tick(dt);
        self.pump();
    }

    // Event plumbing

    fn check<T, E: Into<CharacterError>>(
        &mut self,
        operation: &'static str,
        result: Result<T, E>,
    ) -> CharacterResult<T> {
        result.map_err(|err| {
            let err: CharacterError = err.into();
            warn!(character = %self.id, operation, kind = ?err.kind(), error = %err, "rejected");
            if let Some(message) = err.user_message() {
                self.notifier.notify(&message);
            }
            err
        })
    }

    fn react(&mut self, event: &CharacterEvent) {
        match event {
            CharacterEvent::EquipmentChanged { .. } => {
                let bonuses = self.equipment.all_stat_bonuses();
                self.stats.apply_equipment_bonuses(&bonuses);
            }
            CharacterEvent::ActiveWeaponChanged { .. } => {
                let weapon = self.equipment.active_weapon().cloned();
                self.abilities.update_for_weapon(weapon.as_deref());
            }
            CharacterEvent::StatsRecalculated { .. } => {
                self.set_vitals(self.vitals.health, self.vitals.energy);
            }
            _ => {}
        }
    }

    fn drain_components(&mut self) -> Vec<CharacterEvent> {
        let mut batch = self.equipment.drain_events();
        batch.extend(self.stats.drain_events());
        batch.extend(self.abilities.drain_events());
        batch.extend(self.inventory.drain_events());
        batch.extend(self.hotbar.drain_events());
        batch.extend(self.events.drain());
        batch
    }

    /// Deliver pending events until every reaction has settled.
    fn pump(&mut self) {
        let mut published = 0usize;
        loop {
            let batch = self.drain_components();
            if batch.is_empty() {
                break;
            }
            for event in &batch {
                self.react(event);
                self.bus.publish(event);
            }
            published += batch.len();
        }
        if published > 0 {
            self.revision += 1;
            debug!(character = %self.id, revision = self.revision, published, "events published");
        }
    }

    // Accessors

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn stats(&self) -> &StatsAggregator {
        &self.stats
    }

    pub fn equipment(&self) -> &EquipmentRegistry {
        &self.equipment
    }

    pub fn abilities(&self) -> &AbilityLoadout {
        &self.abilities
    }

    pub fn inventory(&self) -> &InventoryStore {
        &self.inventory
    }

    pub fn hotbar(&self) -> &ConsumableHotbar {
        &self.hotbar
    }

    pub fn vitals(&self) -> Vitals {
        self.vitals
    }

    /// Bumped once per operation that changed anything.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot::capture(self)
    }
}

fn validate_effect(effect: Option<ConsumableEffect>) -> Result<(), StatsError> {
    if let Some(ConsumableEffect::TemporaryStat {
        amount,
        duration_seconds,
        ..
    }) = effect
    {
        if !amount.is_finite() {
            return Err(StatsError::InvalidAmount(amount));
        }
        if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
            return Err(StatsError::InvalidDuration(duration_seconds));
        }
    }
    Ok(())
}
