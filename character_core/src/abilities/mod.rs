//! Ability loadout - the three weapon abilities on Q, R and F.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use istanbul_rules::{AbilityCatalog, AbilityDefinition, AbilityEffect, AbilityKind, ItemDefinition};

use crate::error::ErrorKind;
use crate::events::{CharacterEvent, EventQueue};

/// Errors from ability use.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AbilityError {
    #[error("ability {0:?} is not in the current loadout")]
    NotLoaded(AbilityKind),

    #[error("{name} is on cooldown for {remaining_seconds:.1}s")]
    OnCooldown {
        kind: AbilityKind,
        name: String,
        remaining_seconds: f32,
    },

    #[error("no ability bound to {0:?}")]
    EmptyHotkey(Hotkey),
}

impl AbilityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AbilityError::OnCooldown { .. } => ErrorKind::DependencyViolation,
            _ => ErrorKind::InvalidInput,
        }
    }
}

/// Remaining time at or below this counts as ready. Absorbs f32 drift from
/// fractional frame steps.
pub const COOLDOWN_EPSILON: f32 = 1e-4;

/// Ability hotkeys in loadout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hotkey {
    Q,
    R,
    F,
}

impl Hotkey {
    pub const ALL: [Hotkey; 3] = [Hotkey::Q, Hotkey::R, Hotkey::F];

    pub fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CooldownState {
    pub remaining_seconds: f32,
    pub on_cooldown: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbilitySlot {
    pub ability: Option<AbilityDefinition>,
    pub cooldown: CooldownState,
}

#[derive(Debug, Clone)]
pub struct AbilityLoadout {
    slots: [AbilitySlot; 3],
    fallback: AbilityCatalog,
    events: EventQueue,
}

impl Default for AbilityLoadout {
    fn default() -> Self {
        Self::new(AbilityCatalog::builtin())
    }
}

impl AbilityLoadout {
    /// A loadout that falls back to `fallback` for weapons authored without
    /// abilities.
    pub fn new(fallback: AbilityCatalog) -> Self {
        Self {
            slots: Default::default(),
            fallback,
            events: EventQueue::new(),
        }
    }

    /// Rebuild the loadout for a newly active weapon, or clear it.
    ///
    /// Cooldowns always reset, so switching weapons back and forth refreshes
    /// every ability.
    pub fn update_for_weapon(&mut self, weapon: Option<&ItemDefinition>) {
        let abilities = match weapon {
            None => Vec::new(),
            Some(weapon) if !weapon.abilities.is_empty() => weapon.abilities.clone(),
            Some(weapon) => {
                debug!(weapon = %weapon.name, "weapon has no abilities, using family defaults");
                weapon
                    .weapon_class()
                    .map(|class| self.fallback.for_weapon_class(class))
                    .unwrap_or_default()
            }
        };

        let mut loaded: Vec<AbilityKind> = Vec::with_capacity(self.slots.len());
        let mut abilities = abilities.into_iter().filter(|ability| {
            if loaded.contains(&ability.kind) {
                debug!(kind = ?ability.kind, "duplicate ability skipped");
                return false;
            }
            loaded.push(ability.kind);
            true
        });
        for slot in &mut self.slots {
            *slot = AbilitySlot {
                ability: abilities.next(),
                cooldown: CooldownState::default(),
            };
        }
        info!(
            weapon = weapon.map(|w| w.name.as_str()).unwrap_or("none"),
            loadout = ?self.loadout(),
            "abilities updated"
        );
        self.events.push(CharacterEvent::AbilitiesChanged {
            loadout: self.loadout(),
        });
    }

    pub fn can_use(&self, kind: AbilityKind) -> bool {
        self.find(kind).is_some_and(|slot| !slot.cooldown.on_cooldown)
    }

    /// Fire an ability and start its cooldown.
    pub fn use_ability(&mut self, kind: AbilityKind) -> Result<AbilityEffect, AbilityError> {
        let Some(index) = self.position(kind) else {
            warn!(?kind, "ability not loaded");
            return Err(AbilityError::NotLoaded(kind));
        };
        let slot = &mut self.slots[index];
        let Some(ability) = slot.ability.as_ref() else {
            return Err(AbilityError::NotLoaded(kind));
        };
        if slot.cooldown.on_cooldown {
            warn!(?kind, remaining = slot.cooldown.remaining_seconds, "ability on cooldown");
            return Err(AbilityError::OnCooldown {
                kind,
                name: ability.name.clone(),
                remaining_seconds: slot.cooldown.remaining_seconds,
            });
        }

        let effect = ability.effect();
        slot.cooldown = CooldownState {
            remaining_seconds: ability.cooldown_seconds,
            on_cooldown: ability.cooldown_seconds > 0.0,
        };
        info!(?kind, ?effect, "ability used");
        self.events.push(CharacterEvent::AbilityUsed {
            kind,
            value: effect.value(),
        });
        Ok(effect)
    }

    pub fn use_hotkey(&mut self, hotkey: Hotkey) -> Result<AbilityEffect, AbilityError> {
        let kind = self.slots[hotkey.index()]
            .ability
            .as_ref()
            .map(|ability| ability.kind)
            .ok_or(AbilityError::EmptyHotkey(hotkey))?;
        self.use_ability(kind)
    }

    /// Count cooldowns down by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        for slot in &mut self.slots {
            let Some(ability) = slot.ability.as_ref() else {
                continue;
            };
            if !slot.cooldown.on_cooldown {
                continue;
            }
            slot.cooldown.remaining_seconds -= dt;
            if slot.cooldown.remaining_seconds <= COOLDOWN_EPSILON {
                slot.cooldown = CooldownState::default();
            }
            trace!(kind = ?ability.kind, remaining = slot.cooldown.remaining_seconds, "cooldown");
            self.events.push(CharacterEvent::AbilityCooldownUpdated {
                kind: ability.kind,
                remaining_seconds: slot.cooldown.remaining_seconds,
            });
        }
    }

    fn position(&self, kind: AbilityKind) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.ability.as_ref().is_some_and(|a| a.kind == kind))
    }

    fn find(&self, kind: AbilityKind) -> Option<&AbilitySlot> {
        self.position(kind).map(|index| &self.slots[index])
    }

    pub fn is_on_cooldown(&self, kind: AbilityKind) -> bool {
        self.find(kind).is_some_and(|slot| slot.cooldown.on_cooldown)
    }

    /// Seconds left on `kind`'s cooldown; zero when ready or not loaded.
    pub fn cooldown_remaining(&self, kind: AbilityKind) -> f32 {
        self.find(kind)
            .map_or(0.0, |slot| slot.cooldown.remaining_seconds)
    }

    pub fn slot(&self, hotkey: Hotkey) -> &AbilitySlot {
        &self.slots[hotkey.index()]
    }

    /// Loaded kinds in Q, R, F order.
    pub fn loadout(&self) -> [Option<AbilityKind>; 3] {
        let kind = |slot: &AbilitySlot| slot.ability.as_ref().map(|a| a.kind);
        [kind(&self.slots[0]), kind(&self.slots[1]), kind(&self.slots[2])]
    }

    pub fn drain_events(&mut self) -> Vec<CharacterEvent> {
        self.events.drain()
    }
}
