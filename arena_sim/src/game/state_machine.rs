//! Round simulation state machine.
//!
//! A round is a fixed walk through [`Step`]s. Each step mutates the owned
//! [`RoundState`] in place and names the step that follows it, and the
//! [`RoundEngine`] turns that into a [`Scheduled`] step with a delay. Nothing
//! here knows about timers; the table actor does the waiting.

use chrono::{DateTime, Utc};
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, VecDeque},
    fmt,
    time::Duration,
};

use super::{
    config::SimulationConfig,
    entities::{Card, CardVisibility, Chips, DEALER_NAME, Deck, Player, SeatIndex, Ticker},
    source::DecisionSource,
    states::{
        DealFlop, DealRiver, DealTurn, EndRound, Flop, Preflop, River, Showdown, StartRound, Turn,
    },
};

/// Phase of the round being shown.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Nothing dealt yet
    Idle,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Complete,
}

impl Phase {
    /// Community cards on the table in this phase when the round ran its
    /// full course.
    #[must_use]
    pub const fn expected_community(self) -> usize {
        match self {
            Self::Idle | Self::Preflop => 0,
            Self::Flop => 3,
            Self::Turn => 4,
            Self::River | Self::Showdown | Self::Complete => 5,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Idle => "idle",
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
            Self::Complete => "complete",
        };
        write!(f, "{repr}")
    }
}

/// Result of a finished round, kept for the results feed.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RoundSummary {
    pub round_number: u32,
    pub winner: String,
    pub awarded: Chips,
    /// The fold guard ended the round before showdown.
    pub ended_early: bool,
    pub finished_at: DateTime<Utc>,
}

/// Mutable state of the round on display.
#[derive(Debug)]
pub struct RoundState {
    pub(crate) players: Vec<Player>,
    pub(crate) community: Vec<Card>,
    pub(crate) deck: Deck,
    pub(crate) pot: Chips,
    /// Chips each active seat put in this round. Keys are exactly the
    /// active seats.
    pub(crate) bets: BTreeMap<SeatIndex, Chips>,
    pub(crate) phase: Phase,
    pub(crate) action: Option<Ticker>,
    pub(crate) winner: Option<SeatIndex>,
    pub(crate) round_number: u32,
    /// Hole cards of non-folded seats are shown.
    pub(crate) showdown: bool,
    /// Newest first.
    pub(crate) history: VecDeque<RoundSummary>,
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            community: Vec::with_capacity(5),
            deck: Deck::ordered(),
            pot: 0,
            bets: BTreeMap::new(),
            phase: Phase::Idle,
            action: None,
            winner: None,
            round_number: 0,
            showdown: false,
            history: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    #[must_use]
    pub fn pot(&self) -> Chips {
        self.pot
    }

    /// Most recently completed round.
    #[must_use]
    pub fn last_result(&self) -> Option<&RoundSummary> {
        self.history.front()
    }

    /// Seats that are seated, non-folded and not the dealer marker.
    #[must_use]
    pub fn active_seats(&self) -> Vec<SeatIndex> {
        self.players
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.seat)
            .collect()
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    pub(crate) fn name_of(&self, seat: SeatIndex) -> String {
        self.players
            .get(seat)
            .map_or_else(|| DEALER_NAME.to_string(), |p| p.name.clone())
    }

    /// Move up to `amount` chips from a seat's stack into the pot. Returns
    /// what was actually paid.
    pub(crate) fn wager(&mut self, seat: SeatIndex, amount: Chips) -> Chips {
        let Some(stack) = self.players.get_mut(seat).and_then(|p| p.chips.as_mut()) else {
            return 0;
        };
        let paid = amount.min(*stack);
        *stack -= paid;
        self.pot += paid;
        *self.bets.entry(seat).or_insert(0) += paid;
        paid
    }

    /// Move the pot into the winner's stack. Returns the amount awarded.
    pub(crate) fn settle(&mut self, winner: SeatIndex) -> Chips {
        let awarded = self.pot;
        if let Some(stack) = self.players.get_mut(winner).and_then(|p| p.chips.as_mut()) {
            *stack += awarded;
        }
        self.pot = 0;
        awarded
    }

    pub(crate) fn record(&mut self, summary: RoundSummary, keep: usize) {
        self.history.push_front(summary);
        self.history.truncate(keep);
    }

    #[must_use]
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            round_number: self.round_number,
            phase: self.phase,
            players: self.players.clone(),
            community: self.community.clone(),
            deck: self.deck.iter().copied().collect(),
            pot: self.pot,
            bets: self.bets.clone(),
            action: self.action.clone(),
            winner: self.winner,
            showdown: self.showdown,
            history: self.history.iter().cloned().collect(),
        }
    }
}

/// Immutable copy of a [`RoundState`] for rendering.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RoundSnapshot {
    pub round_number: u32,
    pub phase: Phase,
    pub players: Vec<Player>,
    pub community: Vec<Card>,
    /// Undealt cards, front first.
    pub deck: Vec<Card>,
    pub pot: Chips,
    pub bets: BTreeMap<SeatIndex, Chips>,
    pub action: Option<Ticker>,
    pub winner: Option<SeatIndex>,
    pub showdown: bool,
    /// Completed rounds, newest first.
    pub history: Vec<RoundSummary>,
}

impl RoundSnapshot {
    #[must_use]
    pub fn card_visibility(&self, seat: SeatIndex) -> CardVisibility {
        self.players
            .get(seat)
            .map_or(CardVisibility::Empty, |p| p.card_visibility(self.showdown))
    }

    #[must_use]
    pub fn winner_name(&self) -> Option<&str> {
        self.winner
            .and_then(|seat| self.players.get(seat))
            .map(|p| p.name.as_str())
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    /// Every card of the round: hole cards, community cards, then the deck.
    pub fn all_cards(&self) -> impl Iterator<Item = &Card> {
        self.players
            .iter()
            .flat_map(|p| p.cards.iter())
            .chain(self.community.iter())
            .chain(self.deck.iter())
    }
}

/// What a step needs besides the round itself.
pub struct StepContext<'a> {
    pub config: &'a SimulationConfig,
    pub source: &'a mut dyn DecisionSource,
}

/// Trait implemented by every step of the round.
#[enum_dispatch]
pub trait Transition {
    /// Apply the step to the round and return the step that follows it.
    fn apply(&self, round: &mut RoundState, ctx: &mut StepContext<'_>) -> Step;
}

/// Steps of a round, in the order they normally run. The fold guard may
/// jump from a flop, turn or river step straight to `EndRound`.
#[enum_dispatch(Transition)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Step {
    StartRound,
    Preflop,
    DealFlop,
    Flop,
    DealTurn,
    Turn,
    DealRiver,
    River,
    Showdown,
    EndRound,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::StartRound(_) => "startRound",
            Self::Preflop(_) => "preflop",
            Self::DealFlop(_) => "dealFlop",
            Self::Flop(_) => "flop",
            Self::DealTurn(_) => "dealTurn",
            Self::Turn(_) => "turn",
            Self::DealRiver(_) => "dealRiver",
            Self::River(_) => "river",
            Self::Showdown(_) => "showdown",
            Self::EndRound(_) => "endRound",
        };
        write!(f, "{repr}")
    }
}

/// The next step to run and how long to wait before running it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Scheduled {
    pub step: Step,
    pub delay: Duration,
}

/// Upper bound on steps in one round; a full round takes ten.
const MAX_STEPS_PER_ROUND: usize = 16;

/// Owns one round and the decisions that drive it.
pub struct RoundEngine {
    round: RoundState,
    config: SimulationConfig,
    source: Box<dyn DecisionSource>,
}

impl fmt::Debug for RoundEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundEngine")
            .field("round", &self.round)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RoundEngine {
    pub fn new(config: SimulationConfig, source: impl DecisionSource + 'static) -> Self {
        Self {
            round: RoundState::new(),
            config,
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn round(&self) -> &RoundState {
        &self.round
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn snapshot(&self) -> RoundSnapshot {
        self.round.snapshot()
    }

    /// The step that begins a round, scheduled after the start delay.
    #[must_use]
    pub fn first_step(&self) -> Scheduled {
        Scheduled {
            step: StartRound.into(),
            delay: self.config.pacing.start_delay(),
        }
    }

    /// Run one step and return the step to schedule next.
    pub fn perform(&mut self, step: Step) -> Scheduled {
        let mut ctx = StepContext {
            config: &self.config,
            source: self.source.as_mut(),
        };
        let next = step.apply(&mut self.round, &mut ctx);

        log::debug!(
            "Round {}: {} -> {} (phase {}, pot {})",
            self.round.round_number,
            step,
            next,
            self.round.phase,
            self.round.pot
        );

        Scheduled {
            step: next,
            delay: self.delay_after(step),
        }
    }

    /// Run a whole round from `StartRound` through `EndRound`, returning the
    /// steps performed.
    pub fn play_round(&mut self) -> Vec<Step> {
        let mut trace = Vec::with_capacity(MAX_STEPS_PER_ROUND);
        let mut step: Step = StartRound.into();
        for _ in 0..MAX_STEPS_PER_ROUND {
            trace.push(step);
            let next = self.perform(step).step;
            if matches!(step, Step::EndRound(_)) {
                break;
            }
            step = next;
        }
        trace
    }

    fn delay_after(&mut self, performed: Step) -> Duration {
        let pacing = &self.config.pacing;
        let base = match performed {
            Step::EndRound(_) => pacing.round_pause_ms,
            Step::Showdown(_) => pacing.showdown_delay_ms,
            _ => pacing.step_delay_ms,
        };
        Duration::from_millis(base + self.source.jitter(pacing.jitter_ms))
    }
}
