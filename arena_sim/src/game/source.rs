//! Sources of the simulation's decisions.
//!
//! Every random choice the engine makes goes through [`DecisionSource`], so a
//! round can be driven by a real RNG ([`Randomized`]) or replayed from a
//! queue of fixed decisions ([`Scripted`]).

use rand::{
    Rng, SeedableRng,
    rngs::StdRng,
    seq::{IndexedRandom, SliceRandom},
};
use std::collections::VecDeque;

use super::{
    config::BetRange,
    entities::{Card, Chips, DisplayAction, Street},
};

pub trait DecisionSource: Send {
    /// Shuffle a fresh deck in place.
    fn shuffle(&mut self, cards: &mut [Card]);

    /// Pick `count` distinct names from the pool.
    fn pick_names(&mut self, pool: &[String], count: usize) -> Vec<String>;

    /// Pick the seat that acts this step. Returns an index into `candidates`.
    fn pick_actor(&mut self, candidates: &[usize]) -> usize;

    /// Whether the actor on `street` faces an outstanding wager.
    fn facing_wager(&mut self, street: Street, probability: f64) -> bool;

    /// Pick an action from a non-empty menu.
    fn pick_action(&mut self, street: Street, menu: &[DisplayAction]) -> DisplayAction;

    /// Draw a wager size.
    fn wager(&mut self, range: BetRange) -> Chips;

    /// Pick the winner. Returns an index into `candidates`.
    fn pick_winner(&mut self, candidates: &[usize]) -> usize;

    /// Extra delay in `[0, max_ms]` milliseconds.
    fn jitter(&mut self, max_ms: u64) -> u64;
}

impl<T: DecisionSource + ?Sized> DecisionSource for Box<T> {
    fn shuffle(&mut self, cards: &mut [Card]) {
        (**self).shuffle(cards);
    }

    fn pick_names(&mut self, pool: &[String], count: usize) -> Vec<String> {
        (**self).pick_names(pool, count)
    }

    fn pick_actor(&mut self, candidates: &[usize]) -> usize {
        (**self).pick_actor(candidates)
    }

    fn facing_wager(&mut self, street: Street, probability: f64) -> bool {
        (**self).facing_wager(street, probability)
    }

    fn pick_action(&mut self, street: Street, menu: &[DisplayAction]) -> DisplayAction {
        (**self).pick_action(street, menu)
    }

    fn wager(&mut self, range: BetRange) -> Chips {
        (**self).wager(range)
    }

    fn pick_winner(&mut self, candidates: &[usize]) -> usize {
        (**self).pick_winner(candidates)
    }

    fn jitter(&mut self, max_ms: u64) -> u64 {
        (**self).jitter(max_ms)
    }
}

/// Uniform random decisions from any `rand` generator.
#[derive(Debug)]
pub struct Randomized<R> {
    rng: R,
}

impl<R: Rng> Randomized<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Randomized<StdRng> {
    /// Reproducible decisions for a given seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl Default for Randomized<StdRng> {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

impl<R: Rng + Send> DecisionSource for Randomized<R> {
    fn shuffle(&mut self, cards: &mut [Card]) {
        cards.shuffle(&mut self.rng);
    }

    fn pick_names(&mut self, pool: &[String], count: usize) -> Vec<String> {
        let mut names = pool.to_vec();
        names.shuffle(&mut self.rng);
        names.truncate(count);
        names
    }

    fn pick_actor(&mut self, candidates: &[usize]) -> usize {
        self.index(candidates.len())
    }

    fn facing_wager(&mut self, _street: Street, probability: f64) -> bool {
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    fn pick_action(&mut self, _street: Street, menu: &[DisplayAction]) -> DisplayAction {
        menu.choose(&mut self.rng)
            .copied()
            .unwrap_or(DisplayAction::Check)
    }

    fn wager(&mut self, range: BetRange) -> Chips {
        if range.min >= range.max {
            return range.min;
        }
        self.rng.random_range(range.min..range.max)
    }

    fn pick_winner(&mut self, candidates: &[usize]) -> usize {
        self.index(candidates.len())
    }

    fn jitter(&mut self, max_ms: u64) -> u64 {
        if max_ms == 0 {
            return 0;
        }
        self.rng.random_range(0..=max_ms)
    }
}

impl<R: Rng> Randomized<R> {
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}

/// Replays queued decisions. Once a queue runs dry it falls back to the
/// first candidate, the first menu entry, the range minimum and no jitter.
/// Decks are left unshuffled and names are taken from the front of the pool.
#[derive(Clone, Debug, Default)]
pub struct Scripted {
    actors: VecDeque<usize>,
    facing: VecDeque<bool>,
    actions: VecDeque<DisplayAction>,
    wagers: VecDeque<Chips>,
    winners: VecDeque<usize>,
}

impl Scripted {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue actor picks, as indices into the active seats.
    #[must_use]
    pub fn actors(mut self, actors: impl IntoIterator<Item = usize>) -> Self {
        self.actors.extend(actors);
        self
    }

    /// Queue "facing a wager" outcomes for the flop, turn and river.
    #[must_use]
    pub fn facing(mut self, facing: impl IntoIterator<Item = bool>) -> Self {
        self.facing.extend(facing);
        self
    }

    /// Queue actions. An action missing from the offered menu is replaced
    /// by the menu's first entry.
    #[must_use]
    pub fn actions(mut self, actions: impl IntoIterator<Item = DisplayAction>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Queue wager sizes. Sizes are clamped into the requested range.
    #[must_use]
    pub fn wagers(mut self, wagers: impl IntoIterator<Item = Chips>) -> Self {
        self.wagers.extend(wagers);
        self
    }

    /// Queue winner picks, as indices into the remaining active seats.
    #[must_use]
    pub fn winners(mut self, winners: impl IntoIterator<Item = usize>) -> Self {
        self.winners.extend(winners);
        self
    }
}

impl DecisionSource for Scripted {
    fn shuffle(&mut self, _cards: &mut [Card]) {}

    fn pick_names(&mut self, pool: &[String], count: usize) -> Vec<String> {
        pool.iter().take(count).cloned().collect()
    }

    fn pick_actor(&mut self, _candidates: &[usize]) -> usize {
        self.actors.pop_front().unwrap_or(0)
    }

    fn facing_wager(&mut self, _street: Street, _probability: f64) -> bool {
        self.facing.pop_front().unwrap_or(false)
    }

    fn pick_action(&mut self, _street: Street, menu: &[DisplayAction]) -> DisplayAction {
        let first = menu.first().copied().unwrap_or(DisplayAction::Check);
        match self.actions.pop_front() {
            Some(action) if menu.contains(&action) => action,
            _ => first,
        }
    }

    fn wager(&mut self, range: BetRange) -> Chips {
        match self.wagers.pop_front() {
            Some(amount) if range.min < range.max => amount.clamp(range.min, range.max - 1),
            _ => range.min,
        }
    }

    fn pick_winner(&mut self, _candidates: &[usize]) -> usize {
        self.winners.pop_front().unwrap_or(0)
    }

    fn jitter(&mut self, _max_ms: u64) -> u64 {
        0
    }
}
