/// Property-based tests for round invariants using proptest
///
/// These tests drive seeded randomized rounds step by step and check that
/// the table stays consistent after every step.
use arena_sim::{
    Card, Phase, Randomized, RoundEngine, RoundSnapshot, SimulationConfig, Step,
    entities::DECK_SIZE,
};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};

// Walk one round, handing each (step performed, snapshot after it) to `check`
fn walk_round(engine: &mut RoundEngine, mut check: impl FnMut(Step, &RoundSnapshot)) {
    let mut step = engine.first_step().step;
    loop {
        let next = engine.perform(step).step;
        check(step, &engine.snapshot());
        if matches!(step, Step::EndRound(_)) {
            return;
        }
        step = next;
    }
}

fn seeded_engine(seed: u64) -> RoundEngine {
    RoundEngine::new(SimulationConfig::default(), Randomized::seeded(seed))
}

proptest! {
    #[test]
    fn test_every_card_accounted_for(seed in any::<u64>(), rounds in 1usize..4) {
        let mut engine = seeded_engine(seed);
        for _ in 0..rounds {
            let mut failures = Vec::new();
            walk_round(&mut engine, |step, snapshot| {
                let cards: Vec<&Card> = snapshot.all_cards().collect();
                let unique: HashSet<&Card> = cards.iter().copied().collect();
                if cards.len() != DECK_SIZE || unique.len() != DECK_SIZE {
                    failures.push(step.to_string());
                }
            });
            prop_assert!(failures.is_empty(), "closure broken after {:?}", failures);
        }
    }

    #[test]
    fn test_community_count_is_valid(seed in any::<u64>()) {
        let mut engine = seeded_engine(seed);
        let mut counts = Vec::new();
        walk_round(&mut engine, |_, snapshot| {
            counts.push((snapshot.phase, snapshot.community.len()));
        });

        for (phase, count) in counts {
            prop_assert!([0, 3, 4, 5].contains(&count));
            // The fold guard can stop the board short, never overfill it
            prop_assert!(count <= phase.expected_community());
            if phase != Phase::Complete {
                prop_assert_eq!(count, phase.expected_community());
            }
        }
    }

    #[test]
    fn test_folds_are_sticky(seed in any::<u64>()) {
        let mut engine = seeded_engine(seed);
        let mut folded_seen: BTreeSet<usize> = BTreeSet::new();
        let mut violations = 0;
        walk_round(&mut engine, |_, snapshot| {
            let folded: BTreeSet<usize> = snapshot
                .players
                .iter()
                .filter(|p| p.folded)
                .map(|p| p.seat)
                .collect();
            if !folded_seen.is_subset(&folded) {
                violations += 1;
            }
            folded_seen = folded;
        });
        prop_assert_eq!(violations, 0);
    }

    #[test]
    fn test_bets_cover_exactly_active_seats(seed in any::<u64>()) {
        let mut engine = seeded_engine(seed);
        let mut keys = Vec::new();
        walk_round(&mut engine, |_, snapshot| {
            keys.push(snapshot.bets.keys().copied().collect::<Vec<_>>());
        });
        for seats in keys {
            prop_assert_eq!(seats, vec![0, 1, 2]);
        }
    }

    #[test]
    fn test_pot_grows_until_payout(seed in any::<u64>()) {
        let blind = SimulationConfig::default().blind;
        let mut engine = seeded_engine(seed);
        let mut pots = Vec::new();
        walk_round(&mut engine, |step, snapshot| pots.push((step, snapshot.pot)));

        let (first_step, first_pot) = pots[0];
        prop_assert_eq!(first_step.to_string(), "startRound");
        prop_assert_eq!(first_pot, blind);

        let before_payout: Vec<u32> = pots
            .iter()
            .filter(|(step, _)| !matches!(step, Step::EndRound(_)))
            .map(|&(_, pot)| pot)
            .collect();
        prop_assert!(before_payout.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(pots.last().map(|&(_, pot)| pot), Some(0));

        // Next round posts the blind again
        engine.perform(engine.first_step().step);
        prop_assert_eq!(engine.snapshot().pot, blind);
    }

    #[test]
    fn test_fold_guard_skips_to_end(seed in any::<u64>()) {
        let mut engine = seeded_engine(seed);
        let mut transitions = Vec::new();
        let mut step = engine.first_step().step;
        loop {
            let next = engine.perform(step).step;
            transitions.push((step, next, engine.snapshot().active_count()));
            if matches!(step, Step::EndRound(_)) {
                break;
            }
            step = next;
        }

        for (step, next, active) in transitions {
            let betting = matches!(step, Step::Flop(_) | Step::Turn(_) | Step::River(_));
            if betting && active < 2 {
                prop_assert!(matches!(next, Step::EndRound(_)), "{} -> {}", step, next);
            }
            if matches!(step, Step::Showdown(_)) {
                prop_assert!(active >= 2);
            }
        }
    }

    #[test]
    fn test_winner_is_never_folded(seed in any::<u64>()) {
        let mut engine = seeded_engine(seed);
        engine.play_round();
        let snapshot = engine.snapshot();

        let winner = snapshot.winner.expect("winner after endRound");
        prop_assert!(!snapshot.players[winner].folded);
        prop_assert!(!snapshot.players[winner].is_dealer());
        prop_assert_eq!(snapshot.history.len(), 1);
    }

    #[test]
    fn test_chips_are_conserved(seed in any::<u64>(), rounds in 1usize..6) {
        let config = SimulationConfig::default();
        let total = config.starting_chips * 3;
        let mut engine = seeded_engine(seed);
        for _ in 0..rounds {
            let mut totals = Vec::new();
            walk_round(&mut engine, |_, snapshot| {
                let stacks: u32 = snapshot.players.iter().filter_map(|p| p.chips).sum();
                totals.push(stacks + snapshot.pot);
            });
            // The blind is posted from outside the stacks
            prop_assert!(totals.iter().all(|&t| t == total + config.blind), "{:?}", totals);
        }
    }
}
