//! Game variant configuration.
//!
//! A variant is the card catalog (one list per category) plus the seat from which leftover
//! cards are dealt. The same YAML file drives the CLI and any embedding application.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::catalog::{Catalog, ROOMS, SUSPECTS, WEAPONS};
use crate::error::ConfigurationError;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid variant: {0}")]
    Invalid(#[from] ConfigurationError),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VariantConfig {
    /// Human-readable variant name.
    #[serde(default = "default_variant_name")]
    pub name: String,
    /// Suspect cards, in catalog order.
    pub suspects: Vec<String>,
    /// Weapon cards, in catalog order.
    pub weapons: Vec<String>,
    /// Room cards, in catalog order.
    pub rooms: Vec<String>,
    /// Seat (0 = local player) that receives the first leftover card when the deal
    /// does not split evenly. Later leftovers continue in turn order.
    #[serde(default)]
    pub extra_cards_from_seat: usize,
}

fn default_variant_name() -> String {
    "standard".to_string()
}

impl VariantConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string. The catalog is validated eagerly.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: VariantConfig = serde_yaml::from_str(yaml)?;
        config.catalog()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn catalog(&self) -> Result<Catalog, ConfigurationError> {
        Catalog::new(&self.suspects[..], &self.weapons[..], &self.rooms[..])
    }
}

impl Default for VariantConfig {
    fn default() -> Self {
        let owned = |names: &[&str]| -> Vec<String> { names.iter().map(|s| s.to_string()).collect() };
        Self {
            name: default_variant_name(),
            suspects: owned(&SUSPECTS),
            weapons: owned(&WEAPONS),
            rooms: owned(&ROOMS),
            extra_cards_from_seat: 0,
        }
    }
}
