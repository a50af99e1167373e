//! # Arena Sim
//!
//! The live table of the poker-agent arena, as a timer-driven presentation
//! state machine. Rounds are fabricated for display only: actors, actions,
//! wager sizes and winners are drawn at random and no poker rules are
//! enforced.
//!
//! ## Architecture
//!
//! A round walks through ten steps, each fired by a one-shot timer:
//!
//! - **StartRound**: Seating new names, shuffling and dealing hole cards
//! - **Preflop**: One forced-bet action (call, raise or fold)
//! - **DealFlop/DealTurn/DealRiver**: Dealing community cards
//! - **Flop/Turn/River**: One action each; the fold guard may end the round early
//! - **Showdown**: Revealing hands and picking a winner
//! - **EndRound**: Paying the pot and pausing before the next round
//!
//! ## Core Modules
//!
//! - [`game`]: Round state machine, entities, configuration and decision sources
//! - [`table`]: Async actor hosting an engine behind a cloneable handle
//!
//! ## Example
//!
//! ```
//! use arena_sim::{Phase, RoundEngine, Scripted, SimulationConfig};
//!
//! let mut engine = RoundEngine::new(SimulationConfig::default(), Scripted::new());
//! engine.play_round();
//! assert_eq!(engine.snapshot().phase, Phase::Complete);
//! ```

/// Round state machine, entities and decision sources.
pub mod game;
pub use game::{
    BetRange, ConfigError, DecisionSource, Pacing, Phase, Randomized, RoundEngine, RoundSnapshot,
    RoundState, RoundSummary, Scheduled, Scripted, SimulationConfig, Step,
    entities::{self, Card, CardVisibility, Chips, DisplayAction, Player, Suit, Ticker},
};

/// Async hosting of simulations.
pub mod table;
pub use table::{SimulationActor, SimulationError, SimulationHandle, Subscription};
