//! Simulation configuration models.
//!
//! Every number here is a display parameter: pacing of the ticker and the
//! sizes of cosmetic wagers. None of it carries poker meaning.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::entities::{Chips, Street};

/// Default pool of agent names drawn for the active seats.
pub const DEFAULT_NAME_POOL: [&str; 8] = [
    "DeepStack",
    "AlphaFold",
    "NeuralBluff",
    "PokerBot9000",
    "ShadowCall",
    "QuantumFold",
    "Maverick",
    "BlazeFold",
];

/// Number of seats that receive cards each round.
pub const ACTIVE_SEATS: usize = 3;

/// Configuration errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

impl ConfigError {
    fn invalid(var: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var: var.to_string(),
            reason: reason.into(),
        }
    }
}

/// Half-open chip range `[min, max)` a wager is drawn from.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BetRange {
    pub min: Chips,
    pub max: Chips,
}

impl BetRange {
    #[must_use]
    pub const fn new(min: Chips, max: Chips) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn contains(&self, amount: Chips) -> bool {
        amount >= self.min && amount < self.max
    }
}

/// Delays between steps, in milliseconds.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Pacing {
    /// Delay before the first round after `start`
    pub start_delay_ms: u64,
    /// Delay after a regular deal or betting step
    pub step_delay_ms: u64,
    /// Delay between showdown and the payout
    pub showdown_delay_ms: u64,
    /// Pause after the payout so the result lingers on screen
    pub round_pause_ms: u64,
    /// Upper bound of a uniform random delay added to every step (0 = fixed pacing)
    pub jitter_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            start_delay_ms: 400,
            step_delay_ms: 1600,
            showdown_delay_ms: 1200,
            round_pause_ms: 3500,
            jitter_ms: 0,
        }
    }
}

impl Pacing {
    #[must_use]
    pub const fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    /// Speed pacing up (`factor > 1`) or down (`factor < 1`).
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |ms: u64| {
            if factor > 0.0 {
                (ms as f64 / factor).round() as u64
            } else {
                ms
            }
        };
        Self {
            start_delay_ms: scale(self.start_delay_ms),
            step_delay_ms: scale(self.step_delay_ms),
            showdown_delay_ms: scale(self.showdown_delay_ms),
            round_pause_ms: scale(self.round_pause_ms),
            jitter_ms: scale(self.jitter_ms),
        }
    }
}

/// Round simulation configuration
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SimulationConfig {
    /// Names drawn for the active seats (distinct per round)
    pub name_pool: Vec<String>,

    /// Pot at the start of every round
    pub blind: Chips,

    /// Stack every active seat starts the round with
    pub starting_chips: Chips,

    /// Fixed amount of a preflop call
    pub preflop_call: Chips,

    /// Preflop raise sizes
    pub preflop_raise: BetRange,

    /// Wager sizes on the flop
    pub flop_bet: BetRange,

    /// Wager sizes on the turn
    pub turn_bet: BetRange,

    /// Wager sizes on the river
    pub river_bet: BetRange,

    /// Chance the flop actor faces a wager (full menu instead of check/bet)
    pub flop_wager_probability: f64,

    /// Chance the turn actor faces a wager
    pub turn_wager_probability: f64,

    /// Chance the river actor faces a wager
    pub river_wager_probability: f64,

    /// Step pacing
    pub pacing: Pacing,

    /// Completed rounds kept for the results feed
    pub history_len: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            name_pool: DEFAULT_NAME_POOL.iter().map(|s| s.to_string()).collect(),
            blind: 30,
            starting_chips: 1000,
            preflop_call: 20,
            preflop_raise: BetRange::new(50, 150),
            flop_bet: BetRange::new(30, 180),
            turn_bet: BetRange::new(50, 250),
            river_bet: BetRange::new(100, 400),
            flop_wager_probability: 0.5,
            turn_wager_probability: 0.5,
            river_wager_probability: 0.7,
            pacing: Pacing::default(),
            history_len: 20,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from `ARENA_*` environment variables, falling back
    /// to the defaults for anything unset or unparsable.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let pacing = Pacing {
            start_delay_ms: parse_env_or("ARENA_START_DELAY_MS", defaults.pacing.start_delay_ms),
            step_delay_ms: parse_env_or("ARENA_STEP_DELAY_MS", defaults.pacing.step_delay_ms),
            showdown_delay_ms: parse_env_or(
                "ARENA_SHOWDOWN_DELAY_MS",
                defaults.pacing.showdown_delay_ms,
            ),
            round_pause_ms: parse_env_or("ARENA_ROUND_PAUSE_MS", defaults.pacing.round_pause_ms),
            jitter_ms: parse_env_or("ARENA_JITTER_MS", defaults.pacing.jitter_ms),
        };

        let config = Self {
            blind: parse_env_or("ARENA_BLIND", defaults.blind),
            starting_chips: parse_env_or("ARENA_STARTING_CHIPS", defaults.starting_chips),
            history_len: parse_env_or("ARENA_HISTORY_LEN", defaults.history_len),
            pacing,
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns the first inconsistent parameter found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name_pool.len() < ACTIVE_SEATS {
            return Err(ConfigError::invalid(
                "name_pool",
                format!("Must hold at least {ACTIVE_SEATS} names"),
            ));
        }

        let mut names: Vec<&str> = self.name_pool.iter().map(String::as_str).collect();
        names.sort_unstable();
        names.dedup();
        if names.len() != self.name_pool.len() {
            return Err(ConfigError::invalid("name_pool", "Names must be distinct"));
        }

        if self.starting_chips == 0 {
            return Err(ConfigError::invalid(
                "ARENA_STARTING_CHIPS",
                "Must be greater than 0",
            ));
        }

        for (var, range) in [
            ("preflop_raise", self.preflop_raise),
            ("flop_bet", self.flop_bet),
            ("turn_bet", self.turn_bet),
            ("river_bet", self.river_bet),
        ] {
            if range.min >= range.max {
                return Err(ConfigError::invalid(
                    var,
                    format!("Empty range {}..{}", range.min, range.max),
                ));
            }
        }

        for (var, p) in [
            ("flop_wager_probability", self.flop_wager_probability),
            ("turn_wager_probability", self.turn_wager_probability),
            ("river_wager_probability", self.river_wager_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::invalid(var, "Must be between 0 and 1"));
            }
        }

        if self.pacing.step_delay_ms == 0
            || self.pacing.showdown_delay_ms == 0
            || self.pacing.round_pause_ms == 0
        {
            return Err(ConfigError::invalid(
                "pacing",
                "Step delays must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Wager sizes for a street. Preflop uses the raise range.
    #[must_use]
    pub const fn bet_range(&self, street: Street) -> BetRange {
        match street {
            Street::Preflop => self.preflop_raise,
            Street::Flop => self.flop_bet,
            Street::Turn => self.turn_bet,
            Street::River => self.river_bet,
        }
    }

    /// Chance the actor faces an outstanding wager. Preflop always does.
    #[must_use]
    pub const fn wager_probability(&self, street: Street) -> f64 {
        match street {
            Street::Preflop => 1.0,
            Street::Flop => self.flop_wager_probability,
            Street::Turn => self.turn_wager_probability,
            Street::River => self.river_wager_probability,
        }
    }
}

/// Helper to parse environment variable with default fallback
pub fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
