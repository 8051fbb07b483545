//! Tunable game constants.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::encounter::EncounterPolicy;
use crate::error::ConfigError;

/// Game rules and balance knobs. Every field has a default, so a config
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Index of the island the player starts on.
    pub starting_island: usize,
    pub starting_gold: i32,
    /// Gold per crew member per day at sea.
    pub wage_modifier: f64,
    /// Gold cost of restoring one point of hull.
    pub repair_cost_per_point: i32,
    /// Sailor rescue reward, upper bound exclusive.
    pub sailor_reward: Range<i32>,
    /// Storm damage, upper bound exclusive.
    pub weather_damage: Range<i32>,
    /// Pirates leave you alive if your cargo is worth more than this.
    pub pirate_cargo_threshold: i32,
    pub min_days: u32,
    pub max_days: u32,
    pub min_name_len: usize,
    pub max_name_len: usize,
    /// Rounds after which a pirate battle is called a stalemate.
    pub max_combat_rounds: u32,
    pub encounter_policy: EncounterPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_island: 0,
            starting_gold: 250,
            wage_modifier: 0.5,
            repair_cost_per_point: 1,
            sailor_reward: 20..60,
            weather_damage: 10..40,
            pirate_cargo_threshold: 50,
            min_days: 20,
            max_days: 50,
            min_name_len: 3,
            max_name_len: 15,
            max_combat_rounds: 1000,
            encounter_policy: EncounterPolicy::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sailor_reward.is_empty() {
            return Err(ConfigError::EmptyRange("sailor_reward"));
        }
        if self.weather_damage.is_empty() {
            return Err(ConfigError::EmptyRange("weather_damage"));
        }
        if self.min_days > self.max_days {
            return Err(ConfigError::Inverted("min_days", "max_days"));
        }
        if self.min_name_len > self.max_name_len {
            return Err(ConfigError::Inverted("min_name_len", "max_name_len"));
        }
        if self.wage_modifier.is_nan() || self.wage_modifier < 0.0 {
            return Err(ConfigError::Negative("wage_modifier"));
        }
        if self.repair_cost_per_point < 0 {
            return Err(ConfigError::Negative("repair_cost_per_point"));
        }
        if self.max_combat_rounds == 0 {
            return Err(ConfigError::Zero("max_combat_rounds"));
        }
        Ok(())
    }
}
