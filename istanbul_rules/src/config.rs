//! Tunable rule parameters, loadable from TOML.
//!
//! Every section and key is optional; anything missing takes its default.
//!
//! ```toml
//! [inventory]
//! size = 40
//!
//! [hotbar]
//! first_key = 3
//! slots = 4
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Inventory sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InventoryConfig {
    /// Number of inventory slots.
    pub size: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self { size: 30 }
    }
}

/// Consumable quick-slot bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HotbarConfig {
    /// Number key bound to the first quick slot.
    pub first_key: u8,

    /// Number of quick slots; keys run consecutively from `first_key`.
    pub slots: usize,
}

impl Default for HotbarConfig {
    fn default() -> Self {
        Self {
            first_key: 3,
            slots: 4,
        }
    }
}

/// Content interpretation switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Infer a weapon's class from its display name when it carries no
    /// explicit tag.
    pub infer_weapon_class_from_name: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            infer_weapon_class_from_name: true,
        }
    }
}

/// Amounts used by consumables that carry no explicit effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumablesConfig {
    pub default_heal: f32,
    pub default_energy: f32,
}

impl Default for ConsumablesConfig {
    fn default() -> Self {
        Self {
            default_heal: 50.0,
            default_energy: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatsConfig {
    /// Points per threshold tier.
    pub threshold_step: f32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            threshold_step: 50.0,
        }
    }
}

/// Top-level configuration for the character rule core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub inventory: InventoryConfig,
    pub hotbar: HotbarConfig,
    pub content: ContentConfig,
    pub consumables: ConsumablesConfig,
    pub stats: StatsConfig,
}

impl CoreConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: CoreConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that parse but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inventory.size == 0 {
            return Err(ConfigError::Invalid("inventory.size must be at least 1".into()));
        }
        if self.hotbar.first_key > 9 || usize::from(self.hotbar.first_key).saturating_add(self.hotbar.slots) > 10 {
            return Err(ConfigError::Invalid("hotbar keys must fit within 0-9".into()));
        }
        if !self.stats.threshold_step.is_finite() || self.stats.threshold_step <= 0.0 {
            return Err(ConfigError::Invalid("stats.threshold_step must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.inventory.size, 30);
        assert_eq!(config.hotbar.first_key, 3);
        assert_eq!(config.hotbar.slots, 4);
        assert!(config.content.infer_weapon_class_from_name);
        assert_eq!(config.consumables.default_heal, 50.0);
        assert_eq!(config.stats.threshold_step, 50.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = CoreConfig::from_toml_str(
            r#"
            [inventory]
            size = 40

            [content]
            infer_weapon_class_from_name = false
            "#,
        )
        .unwrap();

        assert_eq!(config.inventory.size, 40);
        assert!(!config.content.infer_weapon_class_from_name);
        assert_eq!(config.hotbar, HotbarConfig::default());
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(CoreConfig::from_toml_str("").unwrap(), CoreConfig::default());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = CoreConfig::from_toml_str("[inventory]\nslots = 12\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            CoreConfig::from_toml_str("[inventory]\nsize = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CoreConfig::from_toml_str("[hotbar]\nfirst_key = 8\nslots = 4\n"),
            Err(ConfigError::Invalid(_))
        ));
    }
}
