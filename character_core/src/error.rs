//! Error classification shared by every component.

use thiserror::Error;

use crate::abilities::AbilityError;
use crate::equipment::EquipmentError;
use crate::hotbar::HotbarError;
use crate::inventory::InventoryError;
use crate::stats::StatsError;

/// How a rejected operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad argument: out-of-range index, zero quantity, wrong slot or item.
    InvalidInput,
    /// A game rule forbids the operation in the current state.
    DependencyViolation,
    /// Not enough room.
    Capacity,
}

/// Any rejection surfaced by [`crate::Character`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CharacterError {
    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Equipment(#[from] EquipmentError),

    #[error(transparent)]
    Ability(#[from] AbilityError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Hotbar(#[from] HotbarError),
}

impl CharacterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CharacterError::Stats(e) => e.kind(),
            CharacterError::Equipment(e) => e.kind(),
            CharacterError::Ability(e) => e.kind(),
            CharacterError::Inventory(e) => e.kind(),
            CharacterError::Hotbar(e) => e.kind(),
        }
    }

    /// Player-facing text for rule violations. Other rejections are not shown
    /// to the player.
    pub fn user_message(&self) -> Option<String> {
        match self {
            CharacterError::Equipment(EquipmentError::ShieldRequiresSword) => {
                Some("Kalkan takmak için kılıç gerekli!".to_string())
            }
            CharacterError::Equipment(EquipmentError::EmptyWeaponSlot(slot)) => {
                Some(format!("{slot:?} boş, aktif silah yapılamaz!"))
            }
            CharacterError::Ability(AbilityError::OnCooldown { name, .. }) => {
                Some(format!("{name} henüz hazır değil!"))
            }
            CharacterError::Inventory(InventoryError::Full { .. }) => {
                Some("Envanter dolu!".to_string())
            }
            _ => None,
        }
    }
}

/// Result type for character operations.
pub type CharacterResult<T> = Result<T, CharacterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use istanbul_rules::{AbilityKind, EquipmentSlotType};

    #[test]
    fn test_kind_passes_through() {
        let err: CharacterError = EquipmentError::ShieldRequiresSword.into();
        assert_eq!(err.kind(), ErrorKind::DependencyViolation);

        let err: CharacterError = InventoryError::SlotOutOfRange { index: 99, capacity: 30 }.into();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_only_rule_violations_have_user_messages() {
        let cooldown: CharacterError = AbilityError::OnCooldown {
            kind: AbilityKind::SwordSlash,
            name: "Kılıç Doğrama".into(),
            remaining_seconds: 1.5,
        }
        .into();
        assert_eq!(cooldown.user_message().as_deref(), Some("Kılıç Doğrama henüz hazır değil!"));

        let empty: CharacterError = EquipmentError::SlotEmpty(EquipmentSlotType::Ring).into();
        assert_eq!(empty.user_message(), None);
    }
}
