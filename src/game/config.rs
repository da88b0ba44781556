use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A food value bracket that becomes available after a fixed elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodTier {
    /// Elapsed session time (ms) at which the tier becomes eligible
    pub unlock_ms: u64,
    /// Score awarded for eating food of this tier
    pub score: u32,
}

impl FoodTier {
    pub const fn new(unlock_ms: u64, score: u32) -> Self {
        Self { unlock_ms, score }
    }
}

/// Reasons a [`GameConfig`] is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid_size must be at least 1")]
    EmptyGrid,
    #[error("initial_snake_length must be at least 1")]
    EmptySnake,
    #[error("{name} must be positive")]
    ZeroInterval { name: &'static str },
    #[error("boost_divisor must be at least 1, got {0}")]
    InvalidBoost(u64),
    #[error("food_tiers must not be empty")]
    NoFoodTiers,
    #[error("food tier unlock times must be ascending and start at 0")]
    UnsortedTiers,
    #[error("ai_turn_chance must be in [0, 1], got {0}")]
    InvalidTurnChance(f64),
}

/// Immutable configuration for a game session
///
/// Every tunable the simulation reads lives here; the engine never consults
/// global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width and height of the square grid
    pub grid_size: usize,
    /// Length of every new or revived snake
    pub initial_snake_length: usize,
    /// Milliseconds between moves at normal speed
    pub base_speed_ms: u64,
    /// Boosted speed is `base_speed_ms / boost_divisor`
    pub boost_divisor: u64,
    /// Session length in milliseconds
    pub time_limit_ms: u64,
    /// Period of the food spawn timer
    pub food_spawn_interval_ms: u64,
    /// Elapsed times at which one extra AI snake joins
    pub ai_spawn_times_ms: Vec<u64>,
    /// AI snakes present when the session starts
    pub initial_ai_count: usize,
    /// Unlock schedule for spawned food, ascending by unlock time
    pub food_tiers: Vec<FoodTier>,
    /// Value of each food dropped by a dying snake
    pub death_drop_score: u32,
    /// Delay before a dead AI snake re-enters at its spawn cell
    pub ai_revive_delay_ms: u64,
    /// Per-tick probability that an AI snake picks a fresh direction
    pub ai_turn_chance: f64,
    /// Fixed RNG seed; entropy is used when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 25,
            initial_snake_length: 5,
            base_speed_ms: 200,
            boost_divisor: 2,
            time_limit_ms: 90_000,
            food_spawn_interval_ms: 5_000,
            ai_spawn_times_ms: vec![30_000, 60_000],
            initial_ai_count: 1,
            food_tiers: vec![
                FoodTier::new(0, 100),
                FoodTier::new(18_000, 150),
                FoodTier::new(36_000, 200),
                FoodTier::new(54_000, 250),
                FoodTier::new(72_000, 300),
            ],
            death_drop_score: 100,
            ai_revive_delay_ms: 3_000,
            ai_turn_chance: 0.1,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Small deterministic arena with no AI at start, for tests
    pub fn small() -> Self {
        Self {
            grid_size: 10,
            initial_ai_count: 0,
            seed: Some(7),
            ..Default::default()
        }
    }

    /// Speed in milliseconds while the player's boost is on
    pub fn boosted_speed_ms(&self) -> u64 {
        self.base_speed_ms / self.boost_divisor
    }

    /// Check that all parameters are usable by the engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.initial_snake_length == 0 {
            return Err(ConfigError::EmptySnake);
        }
        if self.base_speed_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "base_speed_ms",
            });
        }
        if self.food_spawn_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "food_spawn_interval_ms",
            });
        }
        if self.time_limit_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "time_limit_ms",
            });
        }
        if self.boost_divisor == 0 || self.boost_divisor > self.base_speed_ms {
            return Err(ConfigError::InvalidBoost(self.boost_divisor));
        }

        let Some(first) = self.food_tiers.first() else {
            return Err(ConfigError::NoFoodTiers);
        };
        // the first tier must be eligible from the start or the spawn timer has nothing to pick
        if first.unlock_ms != 0
            || self
                .food_tiers
                .windows(2)
                .any(|pair| pair[0].unlock_ms > pair[1].unlock_ms)
        {
            return Err(ConfigError::UnsortedTiers);
        }

        if !(0.0..=1.0).contains(&self.ai_turn_chance) {
            return Err(ConfigError::InvalidTurnChance(self.ai_turn_chance));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 25);
        assert_eq!(config.initial_snake_length, 5);
        assert_eq!(config.time_limit_ms, 90_000);
        assert_eq!(config.ai_spawn_times_ms, vec![30_000, 60_000]);
        assert_eq!(config.food_tiers.len(), 5);
        assert_eq!(config.boosted_speed_ms(), 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = GameConfig::default();
        config.grid_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::EmptyGrid));

        let mut config = GameConfig::default();
        config.food_tiers.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoFoodTiers));

        let mut config = GameConfig::default();
        config.food_tiers.swap(1, 2);
        assert_eq!(config.validate(), Err(ConfigError::UnsortedTiers));

        let mut config = GameConfig::default();
        config.food_tiers[0].unlock_ms = 10;
        assert_eq!(config.validate(), Err(ConfigError::UnsortedTiers));

        let mut config = GameConfig::default();
        config.ai_turn_chance = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTurnChance(1.5)));

        let mut config = GameConfig::default();
        config.boost_divisor = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBoost(0)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "grid_size": 12, "seed": 3 }"#).unwrap();
        assert_eq!(config.grid_size, 12);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.time_limit_ms, 90_000);
        assert_eq!(config.food_tiers, GameConfig::default().food_tiers);
    }
}
