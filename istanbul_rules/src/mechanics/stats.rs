//! Core attributes, stat modifiers and the formulas derived from them.

use serde::{Deserialize, Serialize};
use std::ops::Add;
use std::str::FromStr;
use thiserror::Error;

/// Lowest value any current stat may take.
pub const MIN_STAT_VALUE: f32 = 1.0;

/// Default value of every base attribute for a fresh character.
pub const DEFAULT_STAT_VALUE: f32 = 10.0;

/// The five core attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatName {
    /// Strength.
    Guc,
    /// Dexterity.
    Ceviklik,
    /// Intelligence.
    Zeka,
    /// Focus.
    Odaklanma,
    /// Constitution.
    Dayaniklilik,
}

impl StatName {
    pub const ALL: [StatName; 5] = [
        StatName::Guc,
        StatName::Ceviklik,
        StatName::Zeka,
        StatName::Odaklanma,
        StatName::Dayaniklilik,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatName::Guc => "Guc",
            StatName::Ceviklik => "Ceviklik",
            StatName::Zeka => "Zeka",
            StatName::Odaklanma => "Odaklanma",
            StatName::Dayaniklilik => "Dayaniklilik",
        }
    }
}

impl std::fmt::Display for StatName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stat name does not match any attribute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stat name: {0}")]
pub struct UnknownStatName(pub String);

impl FromStr for StatName {
    type Err = UnknownStatName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatName::ALL
            .into_iter()
            .find(|stat| stat.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStatName(s.to_string()))
    }
}

/// A single additive bonus to one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatModifier {
    pub stat: StatName,
    pub amount: f32,
}

impl StatModifier {
    pub fn new(stat: StatName, amount: f32) -> Self {
        Self { stat, amount }
    }
}

/// A full set of the five attributes.
///
/// Used for base stats, equipment bonuses and the current aggregate alike;
/// bonus blocks start from [`StatBlock::zero`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    pub guc: f32,
    pub ceviklik: f32,
    pub zeka: f32,
    pub odaklanma: f32,
    pub dayaniklilik: f32,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self::uniform(DEFAULT_STAT_VALUE)
    }
}

impl StatBlock {
    /// A block with every attribute set to `value`.
    pub fn uniform(value: f32) -> Self {
        Self {
            guc: value,
            ceviklik: value,
            zeka: value,
            odaklanma: value,
            dayaniklilik: value,
        }
    }

    /// The additive identity, used as the starting point for bonus blocks.
    pub fn zero() -> Self {
        Self::uniform(0.0)
    }

    pub fn get(&self, stat: StatName) -> f32 {
        match stat {
            StatName::Guc => self.guc,
            StatName::Ceviklik => self.ceviklik,
            StatName::Zeka => self.zeka,
            StatName::Odaklanma => self.odaklanma,
            StatName::Dayaniklilik => self.dayaniklilik,
        }
    }

    pub fn set(&mut self, stat: StatName, value: f32) {
        match stat {
            StatName::Guc => self.guc = value,
            StatName::Ceviklik => self.ceviklik = value,
            StatName::Zeka => self.zeka = value,
            StatName::Odaklanma => self.odaklanma = value,
            StatName::Dayaniklilik => self.dayaniklilik = value,
        }
    }

    /// Add every modifier's amount onto the attribute it names.
    pub fn apply_modifiers<'a>(&mut self, modifiers: impl IntoIterator<Item = &'a StatModifier>) {
        for modifier in modifiers {
            let value = self.get(modifier.stat) + modifier.amount;
            self.set(modifier.stat, value);
        }
    }

    /// Copy of this block with every attribute floored at `min`.
    pub fn clamped_min(&self, min: f32) -> Self {
        Self {
            guc: self.guc.max(min),
            ceviklik: self.ceviklik.max(min),
            zeka: self.zeka.max(min),
            odaklanma: self.odaklanma.max(min),
            dayaniklilik: self.dayaniklilik.max(min),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatName, f32)> + '_ {
        StatName::ALL.into_iter().map(|stat| (stat, self.get(stat)))
    }

    /// Secondary stats derived from this block.
    pub fn derived(&self) -> DerivedStats {
        DerivedStats::from_stats(self)
    }
}

impl Add for StatBlock {
    type Output = StatBlock;

    fn add(self, other: StatBlock) -> StatBlock {
        StatBlock {
            guc: self.guc + other.guc,
            ceviklik: self.ceviklik + other.ceviklik,
            zeka: self.zeka + other.zeka,
            odaklanma: self.odaklanma + other.odaklanma,
            dayaniklilik: self.dayaniklilik + other.dayaniklilik,
        }
    }
}

/// Secondary combat values computed from current attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub max_health: f32,
    pub max_energy: f32,
    pub damage_bonus: f32,
    pub defense: f32,
}

impl DerivedStats {
    pub fn from_stats(stats: &StatBlock) -> Self {
        Self {
            max_health: 100.0 + stats.dayaniklilik * 15.0,
            max_energy: 50.0 + stats.zeka * 8.0 + stats.odaklanma * 5.0,
            damage_bonus: stats.guc * 0.8 + stats.ceviklik * 0.3,
            defense: stats.dayaniklilik * 0.5 + stats.ceviklik * 0.2,
        }
    }
}

/// Discrete tier reached by a stat value, one tier per `step` points.
pub fn threshold_level(value: f32, step: f32) -> u32 {
    if step <= 0.0 || !value.is_finite() || value <= 0.0 {
        return 0;
    }
    (value / step).floor() as u32
}

/// An informational combat bonus unlocked at a stat tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThresholdBonus {
    pub stat: StatName,
    pub level: u32,
    pub description: &'static str,
}

/// Bonuses unlocked by stat tiers. Informational only; nothing in the rule
/// core applies them numerically.
pub const THRESHOLD_BONUSES: &[ThresholdBonus] = &[
    ThresholdBonus {
        stat: StatName::Guc,
        level: 1,
        description: "Güç 50+: Ağır saldırı +15% stamina hasarı",
    },
    ThresholdBonus {
        stat: StatName::Guc,
        level: 2,
        description: "Güç 100+: Ağır saldırı +20% hasar",
    },
    ThresholdBonus {
        stat: StatName::Guc,
        level: 3,
        description: "Güç 150+: Hafif saldırı %10 yavaşlatma",
    },
    ThresholdBonus {
        stat: StatName::Ceviklik,
        level: 1,
        description: "Çeviklik 50+: Arkadan saldırı +15% hasar",
    },
    ThresholdBonus {
        stat: StatName::Ceviklik,
        level: 2,
        description: "Çeviklik 100+: Kaçınma sonrası +20% hasar",
    },
];

/// All bonuses whose tier is reached by `stats`, in table order.
pub fn active_threshold_bonuses(stats: &StatBlock, step: f32) -> Vec<&'static ThresholdBonus> {
    THRESHOLD_BONUSES
        .iter()
        .filter(|bonus| threshold_level(stats.get(bonus.stat), step) >= bonus.level)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_block() {
        let stats = StatBlock::default();
        for (_, value) in stats.iter() {
            assert_eq!(value, DEFAULT_STAT_VALUE);
        }
    }

    #[test]
    fn test_apply_modifiers_by_name() {
        let mut bonuses = StatBlock::zero();
        bonuses.apply_modifiers(&[
            StatModifier::new(StatName::Guc, 5.0),
            StatModifier::new(StatName::Guc, 2.5),
            StatModifier::new(StatName::Zeka, -3.0),
        ]);

        assert_eq!(bonuses.guc, 7.5);
        assert_eq!(bonuses.zeka, -3.0);
        assert_eq!(bonuses.ceviklik, 0.0);
    }

    #[test]
    fn test_add_is_element_wise() {
        let mut bonus = StatBlock::zero();
        bonus.set(StatName::Dayaniklilik, 4.0);
        let total = StatBlock::default() + bonus;

        assert_eq!(total.dayaniklilik, 14.0);
        assert_eq!(total.guc, 10.0);
    }

    #[test]
    fn test_clamped_min() {
        let mut stats = StatBlock::zero();
        stats.set(StatName::Odaklanma, -20.0);
        stats.set(StatName::Guc, 3.0);
        let clamped = stats.clamped_min(MIN_STAT_VALUE);

        assert_eq!(clamped.odaklanma, 1.0);
        assert_eq!(clamped.guc, 3.0);
        assert_eq!(clamped.zeka, 1.0);
    }

    #[test]
    fn test_derived_stats_for_defaults() {
        let derived = StatBlock::default().derived();

        assert_eq!(derived.max_health, 250.0);
        assert_eq!(derived.max_energy, 180.0);
        assert!((derived.damage_bonus - 11.0).abs() < 1e-4);
        assert!((derived.defense - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_stat_name_parsing() {
        assert_eq!("Guc".parse::<StatName>(), Ok(StatName::Guc));
        assert_eq!("dayaniklilik".parse::<StatName>(), Ok(StatName::Dayaniklilik));
        assert!("Charisma".parse::<StatName>().is_err());
    }

    #[test]
    fn test_threshold_levels() {
        assert_eq!(threshold_level(49.9, 50.0), 0);
        assert_eq!(threshold_level(50.0, 50.0), 1);
        assert_eq!(threshold_level(149.0, 50.0), 2);
        assert_eq!(threshold_level(10.0, 0.0), 0);
    }

    #[test]
    fn test_active_threshold_bonuses() {
        let mut stats = StatBlock::default();
        stats.guc = 105.0;
        stats.ceviklik = 55.0;

        let bonuses = active_threshold_bonuses(&stats, 50.0);
        let guc_count = bonuses.iter().filter(|b| b.stat == StatName::Guc).count();
        let cev_count = bonuses.iter().filter(|b| b.stat == StatName::Ceviklik).count();

        assert_eq!(guc_count, 2);
        assert_eq!(cev_count, 1);
        assert_eq!(bonuses[0].description, "Güç 50+: Ağır saldırı +15% stamina hasarı");
        assert_eq!(bonuses[2].description, "Çeviklik 50+: Arkadan saldırı +15% hasar");
    }

    fn stat_name() -> impl Strategy<Value = StatName> {
        prop::sample::select(StatName::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn test_apply_modifiers_matches_add(
            values in prop::array::uniform5(-100.0f32..100.0),
            modifiers in prop::collection::vec((stat_name(), -50.0f32..50.0), 0..10),
        ) {
            let base = StatBlock {
                guc: values[0],
                ceviklik: values[1],
                zeka: values[2],
                odaklanma: values[3],
                dayaniklilik: values[4],
            };
            let modifiers: Vec<StatModifier> = modifiers
                .into_iter()
                .map(|(stat, amount)| StatModifier::new(stat, amount))
                .collect();

            let mut applied = base;
            applied.apply_modifiers(&modifiers);

            let mut bonus = StatBlock::zero();
            bonus.apply_modifiers(&modifiers);
            let added = base + bonus;

            for stat in StatName::ALL {
                prop_assert!((applied.get(stat) - added.get(stat)).abs() < 1e-3);
            }
        }

        #[test]
        fn test_clamped_min_floors_every_field(values in prop::array::uniform5(-100.0f32..100.0)) {
            let block = StatBlock {
                guc: values[0],
                ceviklik: values[1],
                zeka: values[2],
                odaklanma: values[3],
                dayaniklilik: values[4],
            }
            .clamped_min(MIN_STAT_VALUE);
            for (_, value) in block.iter() {
                prop_assert!(value >= MIN_STAT_VALUE);
            }
        }
    }
}
