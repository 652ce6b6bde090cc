//! Weapon ability definitions.

use serde::{Deserialize, Serialize};

use crate::mechanics::WeaponClass;

/// Every weapon ability, grouped by the weapon family that grants it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    // Sword
    SwordSlash,
    SwordThrust,
    SwordGuard,

    // Axe
    AxeChop,
    AxeThrow,
    AxeWhirlwind,

    // Rapier
    RapierLunge,
    RapierParry,
    RapierRiposte,

    // Fire staff
    Fireball,
    FireBurn,
    FireIgnite,
}

/// Outcome of using an ability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AbilityEffect {
    Damage(f32),
    DamageOverTime(f32),
    /// Temporary armor instead of damage.
    Armor(f32),
    /// Readies a counter attack; carries no value of its own.
    Counter,
}

impl AbilityEffect {
    /// The number reported to listeners for this effect.
    pub fn value(&self) -> f32 {
        match self {
            AbilityEffect::Damage(v) | AbilityEffect::DamageOverTime(v) | AbilityEffect::Armor(v) => *v,
            AbilityEffect::Counter => 0.0,
        }
    }
}

impl AbilityKind {
    pub fn family(&self) -> WeaponClass {
        match self {
            AbilityKind::SwordSlash | AbilityKind::SwordThrust | AbilityKind::SwordGuard => {
                WeaponClass::Sword
            }
            AbilityKind::AxeChop | AbilityKind::AxeThrow | AbilityKind::AxeWhirlwind => {
                WeaponClass::Axe
            }
            AbilityKind::RapierLunge | AbilityKind::RapierParry | AbilityKind::RapierRiposte => {
                WeaponClass::Rapier
            }
            AbilityKind::Fireball | AbilityKind::FireBurn | AbilityKind::FireIgnite => {
                WeaponClass::FireStaff
            }
        }
    }

    /// Effect of this ability for the given base damage.
    pub fn effect(&self, base_damage: f32) -> AbilityEffect {
        match self {
            AbilityKind::SwordGuard => AbilityEffect::Armor(base_damage * 0.5),
            AbilityKind::AxeWhirlwind => AbilityEffect::Damage(base_damage * 1.5),
            AbilityKind::RapierParry => AbilityEffect::Counter,
            AbilityKind::RapierRiposte => AbilityEffect::Damage(base_damage * 1.2),
            AbilityKind::FireBurn => AbilityEffect::DamageOverTime(base_damage * 0.3),
            AbilityKind::FireIgnite => AbilityEffect::Damage(base_damage * 0.8),
            _ => AbilityEffect::Damage(base_damage),
        }
    }
}

/// Static description of an ability as authored on a weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDefinition {
    pub kind: AbilityKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cooldown_seconds: f32,
    pub base_damage: f32,
    #[serde(default)]
    pub range: f32,
}

impl AbilityDefinition {
    pub fn new(kind: AbilityKind, name: impl Into<String>, cooldown_seconds: f32, base_damage: f32) -> Self {
        Self {
            kind,
            name: name.into(),
            description: String::new(),
            cooldown_seconds,
            base_damage,
            range: 0.0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    pub fn effect(&self) -> AbilityEffect {
        self.kind.effect(self.base_damage)
    }
}
