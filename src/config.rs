// Configuration module for reading Snake.toml
// Every gameplay and bot constant lives here so the core never hardcodes them

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::{Direction, Point};

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub board: BoardConfig,
    pub timing: TimingConfig,
    pub scoring: ScoringConfig,
    pub food: FoodConfig,
    pub spawn: SpawnConfig,
    pub bot: BotConfig,
    pub debug: DebugConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    pub grid_size: i32,
}

/// Tick cadence. The interval shrinks per food eaten down to the floor.
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub initial_tick_ms: u64,
    pub tick_decrement_ms: u64,
    pub min_tick_ms: u64,
}

impl TimingConfig {
    /// Interval after one more food item, bounded by the floor
    pub fn next_interval(&self, current_ms: u64) -> u64 {
        current_ms
            .saturating_sub(self.tick_decrement_ms)
            .max(self.min_tick_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    pub food_reward: u32,
    pub high_score_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FoodConfig {
    pub spawn_attempts: u32,
    /// Used when the first spawn of a game cannot find a free cell
    pub fallback_position: Point,
}

/// Starting layout for both snakes
#[derive(Debug, Deserialize, Clone)]
pub struct SpawnConfig {
    pub player_one: Vec<Point>,
    pub player_two: Vec<Point>,
    pub initial_direction: Direction,
    pub player_one_name: String,
    pub player_two_name: String,
}

/// Bot engine tuning
#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    /// Probability that EASY ignores food and wanders
    pub easy_random_move_chance: f64,
    /// Flood fill cap used to validate the first step of a food path
    pub path_space_cap: usize,
    /// The path is taken only when the estimate exceeds this
    pub path_space_threshold: usize,
    /// Flood fill cap for the survival fallback
    pub survival_space_cap: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulationConfig {
    pub max_turns: u32,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            board: BoardConfig { grid_size: 30 },
            timing: TimingConfig {
                initial_tick_ms: 100,
                tick_decrement_ms: 1,
                min_tick_ms: 50,
            },
            scoring: ScoringConfig {
                food_reward: 10,
                high_score_key: "snake_highscore".to_string(),
            },
            food: FoodConfig {
                spawn_attempts: 100,
                fallback_position: Point { x: 10, y: 10 },
            },
            spawn: SpawnConfig {
                player_one: vec![
                    Point { x: 5, y: 15 },
                    Point { x: 4, y: 15 },
                    Point { x: 3, y: 15 },
                ],
                player_two: vec![
                    Point { x: 24, y: 15 },
                    Point { x: 25, y: 15 },
                    Point { x: 26, y: 15 },
                ],
                initial_direction: Direction::Up,
                player_one_name: "Player 1".to_string(),
                player_two_name: "Bot".to_string(),
            },
            bot: BotConfig {
                easy_random_move_chance: 0.3,
                path_space_cap: 10,
                path_space_threshold: 3,
                survival_space_cap: 100,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "neon_snake_debug.jsonl".to_string(),
            },
            simulation: SimulationConfig { max_turns: 5000 },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
