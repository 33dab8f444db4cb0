use serde::{Deserialize, Serialize};
use std::path::Path;

/// Game-wide tuning constants, loaded once from `defines.txt` and owned by
/// the [`Database`](crate::database::Database).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameDefines {
    /// Wealth cost of enacting a law before modifiers.
    pub base_law_cost: i64,
    /// Cost of a technology that does not declare its own.
    pub base_technology_cost: i64,
    /// Number of people represented by one population unit.
    pub population_unit_size: i64,
    /// Cap on any single commodity output modifier, in percent.
    pub max_output_modifier: i64,
}

impl Default for GameDefines {
    fn default() -> Self {
        Self {
            base_law_cost: 100,
            base_technology_cost: 200,
            population_unit_size: 10_000,
            max_output_modifier: 300,
        }
    }
}

impl GameDefines {
    pub fn load(path: &Path) -> Result<Self, gsml::ParseError> {
        let data = gsml::parse_file(path)?;
        gsml::from_data(&data)
    }
}

/// Per-playthrough configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seed for the game RNG (random scope effects).
    pub rng_seed: u64,
    /// Track modifier activations per owner and scope, and flag any
    /// apply without a matching remove (or the reverse).
    pub debug_validation: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rng_seed: 0,
            debug_validation: cfg!(debug_assertions),
        }
    }
}

impl GameConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defines_fill_missing_fields() {
        let data = gsml::parse_str("base_law_cost = 250").unwrap();
        let defines: GameDefines = gsml::from_data(&data).unwrap();
        assert_eq!(defines.base_law_cost, 250);
        assert_eq!(
            defines.base_technology_cost,
            GameDefines::default().base_technology_cost
        );
    }

    #[test]
    fn test_config_from_json() {
        let config = GameConfig::from_json(r#"{"rng_seed": 42, "debug_validation": false}"#).unwrap();
        assert_eq!(config.rng_seed, 42);
        assert!(!config.debug_validation);
    }
}
