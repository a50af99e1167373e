//! Round simulation engine - state machine, entities and decision sources.
//!
//! This module provides the presentation state machine behind the arena's
//! live table:
//! - Cards, seats, display actions and ticker events
//! - Tunable display parameters (pacing, wager sizes, name pool)
//! - Injectable decision sources (random or scripted)
//! - The round state machine with one step per scheduled callback

pub mod config;
pub mod entities;
pub mod source;
pub mod state_machine;
pub mod states;

pub use config::{BetRange, ConfigError, Pacing, SimulationConfig};
pub use source::{DecisionSource, Randomized, Scripted};
pub use state_machine::{
    Phase, RoundEngine, RoundSnapshot, RoundState, RoundSummary, Scheduled, Step, Transition,
};
