//! Built-in weapon ability database.

use std::collections::HashMap;

use crate::entities::{AbilityDefinition, AbilityKind};
use crate::mechanics::WeaponClass;

// (kind, name, description, cooldown, base damage, range)
const BUILTIN: &[(AbilityKind, &str, &str, f32, f32, f32)] = &[
    (AbilityKind::SwordSlash, "Kılıç Doğrama", "Hızlı ve keskin bir doğrama saldırısı yapar.", 3.0, 75.0, 200.0),
    (AbilityKind::SwordThrust, "Kılıç Saplanması", "Düşmanı delerek yüksek hasar verir.", 5.0, 120.0, 250.0),
    (AbilityKind::SwordGuard, "Kılıç Savunması", "Savunma duruşu alır ve gelen hasarı azaltır.", 8.0, 0.0, 0.0),
    (AbilityKind::AxeChop, "Balta Doğrama", "Güçlü bir balta darbesi indirir.", 4.0, 100.0, 180.0),
    (AbilityKind::AxeThrow, "Balta Fırlatma", "Baltayı düşmana fırlatır.", 6.0, 90.0, 500.0),
    (AbilityKind::AxeWhirlwind, "Balta Kasırgası", "Etraftaki tüm düşmanlara dönerek saldırır.", 10.0, 80.0, 300.0),
    (AbilityKind::RapierLunge, "Meç Hamlesi", "Ani bir hamle ile düşmana saldırır.", 3.5, 85.0, 220.0),
    (AbilityKind::RapierParry, "Meç Savması", "Gelen saldırıyı savarak karşı saldırıya hazırlanır.", 7.0, 0.0, 0.0),
    (AbilityKind::RapierRiposte, "Meç Geri Saldırısı", "Savma sonrası güçlü bir geri saldırı yapar.", 5.5, 110.0, 200.0),
    (AbilityKind::Fireball, "Ateş Topu", "Büyülü bir ateş topu fırlatır.", 4.5, 95.0, 600.0),
    (AbilityKind::FireBurn, "Yakıcı Alan", "Yerde yanıcı bir alan oluşturur.", 8.0, 60.0, 400.0),
    (AbilityKind::FireIgnite, "Tutuşturma", "Düşmanı tutuşturarak sürekli hasar verir.", 6.5, 70.0, 300.0),
];

/// Ability definitions by kind.
///
/// Weapons normally carry their own abilities; this database backs weapons
/// authored without any.
#[derive(Debug, Clone, Default)]
pub struct AbilityCatalog {
    abilities: HashMap<AbilityKind, AbilityDefinition>,
}

impl AbilityCatalog {
    /// The stock database of twelve abilities, three per weapon family.
    pub fn builtin() -> Self {
        let abilities = BUILTIN
            .iter()
            .map(|&(kind, name, description, cooldown, damage, range)| {
                let def = AbilityDefinition::new(kind, name, cooldown, damage)
                    .with_description(description)
                    .with_range(range);
                (kind, def)
            })
            .collect();
        Self { abilities }
    }

    pub fn get(&self, kind: AbilityKind) -> Option<&AbilityDefinition> {
        self.abilities.get(&kind)
    }

    /// Add or replace a definition.
    pub fn insert(&mut self, ability: AbilityDefinition) {
        self.abilities.insert(ability.kind, ability);
    }

    /// The family's abilities in hotkey order. Shields have none.
    pub fn for_weapon_class(&self, class: WeaponClass) -> Vec<AbilityDefinition> {
        BUILTIN
            .iter()
            .map(|entry| entry.0)
            .filter(|kind| kind.family() == class)
            .filter_map(|kind| self.get(kind).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}
