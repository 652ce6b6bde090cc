//! Stats aggregation - base attributes plus equipment and timed modifiers.
//!
//! `current = max(1, base + equipment + temporary)` per attribute, with each
//! temporary modifier also floored at 1 as it is applied. The current block
//! is recomputed synchronously whenever any input changes.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, trace};

use istanbul_rules::{
    active_threshold_bonuses, threshold_level, DerivedStats, StatBlock, StatModifier, StatName,
    ThresholdBonus, MIN_STAT_VALUE,
};

use crate::clock::TimerQueue;
use crate::error::ErrorKind;
use crate::events::{CharacterEvent, EventQueue};

/// Errors from stat changes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("stat amount must be finite, got {0}")]
    InvalidAmount(f32),

    #[error("modifier duration must be positive and finite, got {0}")]
    InvalidDuration(f32),
}

impl StatsError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

/// Owns one character's attribute inputs and their aggregate.
#[derive(Debug, Clone)]
pub struct StatsAggregator {
    base: StatBlock,
    equipment_bonuses: StatBlock,
    temporary: BTreeMap<StatName, f32>,
    expiry: TimerQueue<StatName>,
    current: StatBlock,
    threshold_step: f32,
    events: EventQueue,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new(StatBlock::default())
    }
}

impl StatsAggregator {
    pub fn new(base: StatBlock) -> Self {
        let mut stats = Self {
            base: base.clamped_min(MIN_STAT_VALUE),
            equipment_bonuses: StatBlock::zero(),
            temporary: BTreeMap::new(),
            expiry: TimerQueue::new(),
            current: base,
            threshold_step: 50.0,
            events: EventQueue::new(),
        };
        stats.recompute();
        stats
    }

    pub fn with_threshold_step(mut self, step: f32) -> Self {
        self.threshold_step = step;
        self
    }

    /// Add `delta` to a base attribute, flooring at 1. Returns the new value.
    pub fn modify_base_stat(&mut self, stat: StatName, delta: f32) -> Result<f32, StatsError> {
        if !delta.is_finite() {
            return Err(StatsError::InvalidAmount(delta));
        }
        let old_value = self.base.get(stat);
        let new_value = (old_value + delta).max(MIN_STAT_VALUE);
        self.base.set(stat, new_value);
        self.recompute();
        self.events.push(CharacterEvent::StatChanged {
            stat,
            old_value,
            new_value,
        });
        Ok(new_value)
    }

    /// Replace the equipment contribution with the sum of `modifiers`.
    pub fn apply_equipment_bonuses(&mut self, modifiers: &[StatModifier]) {
        let mut bonuses = StatBlock::zero();
        bonuses.apply_modifiers(modifiers);
        self.equipment_bonuses = bonuses;
        self.recompute();
    }

    pub fn clear_equipment_bonuses(&mut self) {
        self.equipment_bonuses = StatBlock::zero();
        self.recompute();
    }

    /// Set a timed modifier on `stat`, replacing any existing one and
    /// restarting its timer.
    pub fn apply_temporary_modifier(
        &mut self,
        stat: StatName,
        amount: f32,
        duration_seconds: f32,
    ) -> Result<(), StatsError> {
        if !amount.is_finite() {
            return Err(StatsError::InvalidAmount(amount));
        }
        if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
            return Err(StatsError::InvalidDuration(duration_seconds));
        }
        self.temporary.insert(stat, amount);
        self.expiry.schedule(stat, duration_seconds);
        debug!(%stat, amount, duration_seconds, "temporary modifier applied");
        self.recompute();
        Ok(())
    }

    /// Drop the timed modifier on `stat`. Returns whether one existed.
    pub fn remove_temporary_modifier(&mut self, stat: StatName) -> bool {
        self.expiry.cancel(&stat);
        let removed = self.temporary.remove(&stat).is_some();
        self.recompute();
        removed
    }

    /// Advance modifier timers, removing any that expire.
    pub fn tick(&mut self, dt: f32) {
        for stat in self.expiry.advance(dt) {
            trace!(%stat, "temporary modifier expired");
            self.temporary.remove(&stat);
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        let mut current = self.base + self.equipment_bonuses;
        for (&stat, &amount) in &self.temporary {
            current.set(stat, (current.get(stat) + amount).max(MIN_STAT_VALUE));
        }
        self.current = current.clamped_min(MIN_STAT_VALUE);
        debug!(current = ?self.current, "stats recalculated");
        self.events.push(CharacterEvent::StatsRecalculated {
            current: self.current,
        });
    }

    pub fn base(&self) -> &StatBlock {
        &self.base
    }

    pub fn current(&self) -> &StatBlock {
        &self.current
    }

    pub fn equipment_bonuses(&self) -> &StatBlock {
        &self.equipment_bonuses
    }

    pub fn temporary_modifier(&self, stat: StatName) -> Option<f32> {
        self.temporary.get(&stat).copied()
    }

    pub fn temporary_remaining(&self, stat: StatName) -> Option<f32> {
        self.expiry.remaining(&stat)
    }

    pub fn derived(&self) -> DerivedStats {
        self.current.derived()
    }

    pub fn threshold_level(&self, stat: StatName) -> u32 {
        threshold_level(self.current.get(stat), self.threshold_step)
    }

    pub fn active_threshold_bonuses(&self) -> Vec<&'static ThresholdBonus> {
        active_threshold_bonuses(&self.current, self.threshold_step)
    }

    /// Overwrite the base block, as when applying replicated state.
    pub fn set_base(&mut self, base: StatBlock) {
        self.base = base.clamped_min(MIN_STAT_VALUE);
        self.recompute();
    }

    pub fn drain_events(&mut self) -> Vec<CharacterEvent> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn recalculations(events: &[CharacterEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, CharacterEvent::StatsRecalculated { .. }))
            .count()
    }

    #[test]
    fn test_defaults() {
        let mut stats = StatsAggregator::default();
        assert_eq!(*stats.current(), StatBlock::default());
        assert_eq!(recalculations(&stats.drain_events()), 1);
    }

    #[test]
    fn test_modify_base_floors_at_one() {
        let mut stats = StatsAggregator::default();
        stats.drain_events();

        assert_eq!(stats.modify_base_stat(StatName::Guc, -50.0), Ok(1.0));
        assert_eq!(stats.current().guc, 1.0);

        let events = stats.drain_events();
        assert_eq!(recalculations(&events), 1);
        assert!(events.contains(&CharacterEvent::StatChanged {
            stat: StatName::Guc,
            old_value: 10.0,
            new_value: 1.0,
        }));
    }

    #[test]
    fn test_equipment_bonuses_replace() {
        let mut stats = StatsAggregator::default();
        let bonus = [StatModifier::new(StatName::Guc, 5.0)];

        stats.apply_equipment_bonuses(&bonus);
        stats.apply_equipment_bonuses(&bonus);
        assert_eq!(stats.current().guc, 15.0);

        stats.clear_equipment_bonuses();
        assert_eq!(stats.current().guc, 10.0);
    }

    #[test]
    fn test_negative_bonus_clamped() {
        let mut stats = StatsAggregator::default();
        stats.apply_equipment_bonuses(&[StatModifier::new(StatName::Zeka, -40.0)]);
        assert_eq!(stats.current().zeka, 1.0);
        assert_eq!(stats.equipment_bonuses().zeka, -40.0);
    }

    #[test]
    fn test_temporary_modifier_expires() {
        let mut stats = StatsAggregator::default();
        stats
            .apply_temporary_modifier(StatName::Ceviklik, 20.0, 2.0)
            .unwrap();
        assert_eq!(stats.current().ceviklik, 30.0);

        stats.tick(1.5);
        assert_eq!(stats.current().ceviklik, 30.0);
        assert_eq!(stats.temporary_remaining(StatName::Ceviklik), Some(0.5));

        stats.tick(0.5);
        assert_eq!(stats.current().ceviklik, 10.0);
        assert_eq!(stats.temporary_modifier(StatName::Ceviklik), None);
    }

    #[test]
    fn test_temporary_modifier_overwrites_and_restarts() {
        let mut stats = StatsAggregator::default();
        stats.apply_temporary_modifier(StatName::Guc, 5.0, 1.0).unwrap();
        stats.tick(0.9);
        stats.apply_temporary_modifier(StatName::Guc, 8.0, 1.0).unwrap();
        stats.tick(0.5);

        assert_eq!(stats.temporary_modifier(StatName::Guc), Some(8.0));
        assert_eq!(stats.current().guc, 18.0);
    }

    #[test]
    fn test_remove_temporary_modifier() {
        let mut stats = StatsAggregator::default();
        stats.apply_temporary_modifier(StatName::Zeka, 3.0, 10.0).unwrap();
        assert!(stats.remove_temporary_modifier(StatName::Zeka));
        assert!(!stats.remove_temporary_modifier(StatName::Zeka));
        assert_eq!(stats.current().zeka, 10.0);
        assert_eq!(stats.temporary_remaining(StatName::Zeka), None);
    }

    #[test]
    fn test_invalid_duration_rejected() {
        let mut stats = StatsAggregator::default();
        assert_eq!(
            stats.apply_temporary_modifier(StatName::Guc, 5.0, 0.0),
            Err(StatsError::InvalidDuration(0.0))
        );
        assert!(stats
            .apply_temporary_modifier(StatName::Guc, 5.0, f32::INFINITY)
            .is_err());
        assert_eq!(stats.current().guc, 10.0);
    }

    #[test]
    fn test_thresholds_follow_current() {
        let mut stats = StatsAggregator::default();
        stats.apply_equipment_bonuses(&[StatModifier::new(StatName::Guc, 95.0)]);
        assert_eq!(stats.threshold_level(StatName::Guc), 2);
        assert_eq!(stats.active_threshold_bonuses().len(), 2);
    }

    #[test]
    fn test_derived_uses_current() {
        let mut stats = StatsAggregator::default();
        stats.apply_equipment_bonuses(&[StatModifier::new(StatName::Dayaniklilik, 10.0)]);
        assert_eq!(stats.derived().max_health, 400.0);
    }

    fn stat_name() -> impl Strategy<Value = StatName> {
        prop::sample::select(StatName::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn test_recompute_matches_formula(
            base in prop::array::uniform5(1.0f32..200.0),
            bonuses in prop::collection::vec((stat_name(), -100.0f32..100.0), 0..8),
            temps in prop::collection::vec((stat_name(), -100.0f32..100.0), 0..5),
        ) {
            let base_block = StatBlock {
                guc: base[0],
                ceviklik: base[1],
                zeka: base[2],
                odaklanma: base[3],
                dayaniklilik: base[4],
            };
            let mut stats = StatsAggregator::new(base_block);
            let modifiers: Vec<_> = bonuses
                .iter()
                .map(|&(stat, amount)| StatModifier::new(stat, amount))
                .collect();
            stats.apply_equipment_bonuses(&modifiers);

            let mut last_temp = BTreeMap::new();
            for &(stat, amount) in &temps {
                stats.apply_temporary_modifier(stat, amount, 5.0).unwrap();
                last_temp.insert(stat, amount);
            }

            for stat in StatName::ALL {
                let mut expected = base_block.get(stat)
                    + modifiers.iter().filter(|m| m.stat == stat).map(|m| m.amount).sum::<f32>();
                if let Some(amount) = last_temp.get(&stat) {
                    expected = (expected + amount).max(MIN_STAT_VALUE);
                }
                let expected = expected.max(MIN_STAT_VALUE);
                let actual = stats.current().get(stat);
                prop_assert!(actual >= MIN_STAT_VALUE);
                prop_assert!((actual - expected).abs() < 1e-3, "{stat}: {actual} vs {expected}");
            }
        }
    }
}
