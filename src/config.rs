//! Application configuration aggregating the simulation and evolution
//! sections of `config.toml`.

use crate::evolution::EvolutionConfig;
use aviary_core::SimConfig;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppConfig {
    /// Generation budget for one run.
    pub max_generations: u32,
    pub sim: SimConfig,
    pub evolution: EvolutionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_generations: 50,
            sim: SimConfig::default(),
            evolution: EvolutionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Validates all sections.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a
    /// description of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.sim.validate()?;
        self.evolution.validate()?;
        anyhow::ensure!(self.max_generations > 0, "Generation budget must be positive");
        Ok(())
    }

    /// Loads and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_generations_rejected() {
        let config = AppConfig {
            max_generations: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_section_propagates() {
        let mut config = AppConfig::default();
        config.sim.gap_size = -1.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.evolution.population_size = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_roundtrip() {
        let config = AppConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.max_generations, config.max_generations);
        assert_eq!(
            parsed.evolution.population_size,
            config.evolution.population_size
        );
        assert_eq!(parsed.sim.gap_size, config.sim.gap_size);
    }
}
