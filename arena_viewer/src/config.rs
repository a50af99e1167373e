//! Viewer configuration management.
//!
//! Merges command line flags with environment variables and validates the
//! result before anything is spawned.

use arena_sim::{SimulationConfig, game::config::parse_env_or};

/// Complete viewer configuration
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Rounds to show before exiting; `None` runs until Ctrl-C
    pub rounds: Option<u32>,
    /// Seed for reproducible rounds; `None` draws from the OS
    pub seed: Option<u64>,
    /// Print one JSON snapshot per step instead of ticker lines
    pub json: bool,
    /// Pacing multiplier; 2.0 plays twice as fast
    pub speed: f64,
    /// Engine parameters, with pacing already scaled by `speed`
    pub simulation: SimulationConfig,
}

/// Flags given on the command line. Each one overrides its env var.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub rounds: Option<u32>,
    pub seed: Option<u64>,
    pub json: bool,
    pub speed: Option<f64>,
}

impl ViewerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if any value is invalid
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        let rounds = overrides.rounds.or_else(|| {
            std::env::var("ARENA_ROUNDS")
                .ok()
                .and_then(|v| v.parse().ok())
        });
        let seed = overrides.seed.or_else(|| {
            std::env::var("ARENA_SEED")
                .ok()
                .and_then(|v| v.parse().ok())
        });
        let speed = overrides
            .speed
            .unwrap_or_else(|| parse_env_or("ARENA_SPEED", 1.0));
        let json = overrides.json || parse_env_or("ARENA_JSON", false);

        let simulation = SimulationConfig::from_env()?;
        Self::new(rounds, seed, json, speed, simulation)
    }

    /// Build and validate a configuration, scaling pacing by `speed`.
    ///
    /// # Errors
    ///
    /// Returns error if `rounds` is zero or `speed` isn't a positive number
    pub fn new(
        rounds: Option<u32>,
        seed: Option<u64>,
        json: bool,
        speed: f64,
        mut simulation: SimulationConfig,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            rounds,
            seed,
            json,
            speed,
            simulation: simulation.clone(),
        };
        config.validate()?;

        simulation.pacing = simulation.pacing.scaled(speed);
        Ok(Self {
            simulation,
            ..config
        })
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds == Some(0) {
            return Err(ConfigError::Invalid {
                var: "ARENA_ROUNDS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ConfigError::Invalid {
                var: "ARENA_SPEED".to_string(),
                reason: format!("Must be a positive number, got {}", self.speed),
            });
        }

        self.simulation.validate()?;
        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error(transparent)]
    Simulation(#[from] arena_sim::ConfigError),
}
