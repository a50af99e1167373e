//! Step definitions for the round state machine.
//!
//! Each step is a unit struct implementing [`Transition`]. Betting steps
//! share one action routine; deal steps only move cards.

use chrono::Utc;

use crate::game::{
    config::ACTIVE_SEATS,
    entities::{Deck, DisplayAction, Player, SeatIndex, SeatPosition, Street, TableEvent, Ticker},
    state_machine::{Phase, RoundState, RoundSummary, Step, StepContext, Transition},
};

/// Seats drawn for the active players, in dealing order.
const ACTIVE_POSITIONS: [SeatPosition; ACTIVE_SEATS] = [
    SeatPosition::Bottom,
    SeatPosition::Left,
    SeatPosition::Right,
];

/// Shuffle a fresh deck, seat new names, deal hole cards and post the blind
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StartRound;

/// Forced-bet action; checking isn't allowed
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Preflop;

/// Dealing the flop (3 community cards)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DealFlop;

/// Action on the flop
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Flop;

/// Dealing the turn (4th community card)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DealTurn;

/// Action on the turn
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Turn;

/// Dealing the river (5th community card)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DealRiver;

/// Action on the river
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct River;

/// Revealing hands and picking a winner
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Showdown;

/// Paying the winner and queueing the next round
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EndRound;

impl Transition for StartRound {
    fn apply(&self, round: &mut RoundState, ctx: &mut StepContext<'_>) -> Step {
        let names = ctx.source.pick_names(&ctx.config.name_pool, ACTIVE_SEATS);

        let mut deck = Deck::ordered();
        ctx.source.shuffle(deck.cards_mut());

        let mut players = Vec::with_capacity(ACTIVE_SEATS + 1);
        for (seat, position) in ACTIVE_POSITIONS.into_iter().enumerate() {
            let name = names
                .get(seat)
                .cloned()
                .unwrap_or_else(|| format!("Agent {}", seat + 1));
            let mut player = Player::new(seat, name, position, ctx.config.starting_chips);
            player.cards = deck.deal(2);
            players.push(player);
        }
        players.push(Player::dealer(ACTIVE_SEATS));

        round.players = players;
        round.community.clear();
        round.deck = deck;
        round.pot = ctx.config.blind;
        round.bets = (0..ACTIVE_SEATS).map(|seat| (seat, 0)).collect();
        round.phase = Phase::Preflop;
        round.action = Some(Ticker::dealer(TableEvent::Dealing));
        round.winner = None;
        round.showdown = false;
        round.round_number += 1;

        Preflop.into()
    }
}

impl Transition for Preflop {
    fn apply(&self, round: &mut RoundState, ctx: &mut StepContext<'_>) -> Step {
        take_action(Street::Preflop, round, ctx);
        round.phase = Phase::Preflop;
        DealFlop.into()
    }
}

impl Transition for DealFlop {
    fn apply(&self, round: &mut RoundState, _ctx: &mut StepContext<'_>) -> Step {
        round.community = round.deck.deal(3);
        round.phase = Phase::Flop;
        round.action = Some(Ticker::dealer(TableEvent::FlopDealt));
        Flop.into()
    }
}

impl Transition for Flop {
    fn apply(&self, round: &mut RoundState, ctx: &mut StepContext<'_>) -> Step {
        betting_street(Street::Flop, round, ctx, DealTurn.into())
    }
}

impl Transition for DealTurn {
    fn apply(&self, round: &mut RoundState, _ctx: &mut StepContext<'_>) -> Step {
        deal_one(round);
        round.phase = Phase::Turn;
        round.action = Some(Ticker::dealer(TableEvent::TurnDealt));
        Turn.into()
    }
}

impl Transition for Turn {
    fn apply(&self, round: &mut RoundState, ctx: &mut StepContext<'_>) -> Step {
        betting_street(Street::Turn, round, ctx, DealRiver.into())
    }
}

impl Transition for DealRiver {
    fn apply(&self, round: &mut RoundState, _ctx: &mut StepContext<'_>) -> Step {
        deal_one(round);
        round.phase = Phase::River;
        round.action = Some(Ticker::dealer(TableEvent::RiverDealt));
        River.into()
    }
}

impl Transition for River {
    fn apply(&self, round: &mut RoundState, ctx: &mut StepContext<'_>) -> Step {
        betting_street(Street::River, round, ctx, Showdown.into())
    }
}

impl Transition for Showdown {
    fn apply(&self, round: &mut RoundState, ctx: &mut StepContext<'_>) -> Step {
        round.winner = Some(pick_winner(round, ctx));
        round.showdown = true;
        round.phase = Phase::Showdown;
        round.action = Some(Ticker::dealer(TableEvent::Showdown));
        for bet in round.bets.values_mut() {
            *bet = 0;
        }
        EndRound.into()
    }
}

impl Transition for EndRound {
    fn apply(&self, round: &mut RoundState, ctx: &mut StepContext<'_>) -> Step {
        let winner = match round.winner {
            Some(seat) => seat,
            None => pick_winner(round, ctx),
        };
        let ended_early = round.phase != Phase::Showdown;
        let name = round.name_of(winner);
        let awarded = round.settle(winner);

        round.winner = Some(winner);
        round.showdown = true;
        round.phase = Phase::Complete;
        round.action = Some(Ticker {
            actor: name.clone(),
            event: TableEvent::Wins(awarded),
        });

        let summary = RoundSummary {
            round_number: round.round_number,
            winner: name,
            awarded,
            ended_early,
            finished_at: Utc::now(),
        };
        round.record(summary, ctx.config.history_len);

        StartRound.into()
    }
}

/// One betting step on a post-flop street. The fold guard sends the round
/// straight to `EndRound` once fewer than two seats remain active.
fn betting_street(
    street: Street,
    round: &mut RoundState,
    ctx: &mut StepContext<'_>,
    next: Step,
) -> Step {
    if round.active_count() < 2 {
        return EndRound.into();
    }

    take_action(street, round, ctx);

    if round.active_count() < 2 {
        EndRound.into()
    } else {
        next
    }
}

/// Pick one active seat and show it taking an action from the street's menu.
fn take_action(street: Street, round: &mut RoundState, ctx: &mut StepContext<'_>) {
    let active = round.active_seats();
    let picked = ctx.source.pick_actor(&active);
    let Some(seat) = active.get(picked).or(active.first()).copied() else {
        log::warn!(
            "Round {}: no active seat to act on the {street}",
            round.round_number
        );
        return;
    };

    let menu: &[DisplayAction] = if street == Street::Preflop {
        &DisplayAction::FORCED
    } else if ctx
        .source
        .facing_wager(street, ctx.config.wager_probability(street))
    {
        &DisplayAction::FACING
    } else {
        &DisplayAction::OPEN
    };
    let action = ctx.source.pick_action(street, menu);

    if let Some(player) = round.players.get_mut(seat) {
        player.folded |= action == DisplayAction::Fold;
    }

    // Preflop calls match the fixed call; every other wager is drawn
    let amount = action.is_wager().then(|| {
        let size = if street == Street::Preflop && action == DisplayAction::Call {
            ctx.config.preflop_call
        } else {
            ctx.source.wager(ctx.config.bet_range(street))
        };
        round.wager(seat, size)
    });

    round.action = Some(Ticker {
        actor: round.name_of(seat),
        event: TableEvent::Acted { action, amount },
    });
}

fn deal_one(round: &mut RoundState) {
    match round.deck.deal_card() {
        Some(card) => round.community.push(card),
        None => log::warn!("Round {}: deck exhausted", round.round_number),
    }
}

/// Winner among the active seats. Falls back to the first seat when nobody
/// is active, which only happens if fold bookkeeping went wrong.
fn pick_winner(round: &RoundState, ctx: &mut StepContext<'_>) -> SeatIndex {
    let active = round.active_seats();
    let picked = ctx.source.pick_winner(&active);
    match active.get(picked).or(active.first()) {
        Some(&seat) => seat,
        None => {
            log::warn!(
                "Round {}: no active seats left, awarding the first seat",
                round.round_number
            );
            0
        }
    }
}
