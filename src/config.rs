// Configuration module for reading Snake.toml

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::position::MAX_DEPTH;
use crate::types::Direction;

/// Deepest lookahead accepted from configuration. The search is exponential in
/// depth and a timed-out search keeps its worker busy until it finishes.
pub const MAX_CONFIGURED_DEPTH: u32 = 10;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub search: SearchConfig,
    pub timing: TimingConfig,
    pub appearance: AppearanceConfig,
}

/// How the first move is chosen once every candidate has been scored
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Sort candidates by ascending score and take the first
    LowestScore,
    /// Take the first candidate with the highest score
    HighestScore,
}

/// Lookahead search parameters
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub max_depth: u32,
    pub selection: Selection,
    /// Sent when no candidate move exists or the search runs out of time
    pub fallback_move: Direction,
}

/// Timing and performance constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }
}

/// Values reported on GET /
#[derive(Debug, Deserialize, Clone)]
pub struct AppearanceConfig {
    pub author: String,
    pub color: String,
    pub head: String,
    pub tail: String,
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

        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        let config: Config =
            toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks tunables that parse but would make the bot misbehave
    pub fn validate(&self) -> Result<(), String> {
        if self.search.max_depth > MAX_CONFIGURED_DEPTH {
            return Err(format!(
                "search.max_depth is {}, at most {} is supported",
                self.search.max_depth, MAX_CONFIGURED_DEPTH
            ));
        }
        Ok(())
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            search: SearchConfig {
                max_depth: MAX_DEPTH,
                selection: Selection::LowestScore,
                fallback_move: Direction::Up,
            },
            timing: TimingConfig {
                response_time_budget_ms: 400,
                network_overhead_ms: 50,
            },
            appearance: AppearanceConfig {
                author: "".to_string(),
                color: "#DFFF00".to_string(),
                head: "default".to_string(),
                tail: "default".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            eprintln!("Warning: Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
