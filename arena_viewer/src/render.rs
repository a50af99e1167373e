//! Plain-text rendering of round snapshots.

use arena_sim::{Card, CardVisibility, RoundSnapshot, RoundSummary, Step};

/// Card back shown for face-down hole cards.
const CARD_BACK: &str = "##";

/// Render a row of cards separated by spaces, or `-` when there are none.
pub fn cards(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "-".to_string();
    }
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// One seat as `name (chips) [cards]`, honoring card visibility.
pub fn seat(snapshot: &RoundSnapshot, seat: usize) -> Option<String> {
    let player = snapshot.players.get(seat)?;
    let hand = match snapshot.card_visibility(seat) {
        CardVisibility::FaceUp => cards(&player.cards),
        CardVisibility::FaceDown => vec![CARD_BACK; player.cards.len()].join(" "),
        CardVisibility::Folded => "folded".to_string(),
        CardVisibility::Empty => return Some(player.name.clone()),
    };
    let chips = player.chips.unwrap_or_default();
    Some(format!("{} ({chips}) [{hand}]", player.name))
}

/// Ticker line printed after each step.
pub fn step_line(step: Step, snapshot: &RoundSnapshot) -> String {
    let line = format!(
        "[round {} | {:<9} | pot {:>4}] {:<10}",
        snapshot.round_number,
        snapshot.phase.to_string(),
        snapshot.pot,
        step.to_string()
    );
    match &snapshot.action {
        Some(action) => format!("{line} {action}"),
        None => line,
    }
}

/// Table layout printed at showdown and when a round starts.
pub fn table(snapshot: &RoundSnapshot) -> String {
    let mut out = format!("  board: {}\n", cards(&snapshot.community));
    for player in snapshot.players.iter().filter(|p| !p.is_dealer()) {
        if let Some(line) = seat(snapshot, player.seat) {
            let marker = if snapshot.winner == Some(player.seat) {
                " *"
            } else {
                ""
            };
            out.push_str(&format!("  {line}{marker}\n"));
        }
    }
    out
}

pub fn summary_line(summary: &RoundSummary) -> String {
    let ending = if summary.ended_early {
        "everyone else folded"
    } else {
        "showdown"
    };
    format!(
        "Round {} won by {} for {} chips ({ending})",
        summary.round_number, summary.winner, summary.awarded
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_sim::{DisplayAction, RoundEngine, Scripted, SimulationConfig, Suit};

    fn engine_after(steps: usize, source: Scripted) -> RoundEngine {
        let mut engine = RoundEngine::new(SimulationConfig::default(), source);
        let mut step = engine.first_step().step;
        for _ in 0..steps {
            step = engine.perform(step).step;
        }
        engine
    }

    #[test]
    fn test_cards_render() {
        assert_eq!(cards(&[]), "-");
        assert_eq!(
            cards(&[Card(1, Suit::Heart), Card(10, Suit::Club)]),
            "A♥ 10♣"
        );
    }

    #[test]
    fn test_face_down_before_showdown() {
        let snapshot = engine_after(1, Scripted::new()).snapshot();
        let line = seat(&snapshot, 0).unwrap();
        assert_eq!(line, "DeepStack (1000) [## ##]");
        assert_eq!(seat(&snapshot, 3).as_deref(), Some("Dealer"));
        assert_eq!(seat(&snapshot, 9), None);
    }

    #[test]
    fn test_showdown_reveals_only_active_hands() {
        let source = Scripted::new().actors([1]).actions([DisplayAction::Fold]);
        let snapshot = engine_after(9, source).snapshot();
        assert!(snapshot.showdown);

        let rendered = table(&snapshot);
        assert!(rendered.contains("DeepStack (1000) [A♠ 2♠] *"));
        assert!(rendered.contains("AlphaFold (1000) [folded]"));
        assert!(!rendered.contains("Dealer"));
        assert!(!rendered.contains(CARD_BACK));
    }

    #[test]
    fn test_step_line_includes_ticker() {
        let engine = engine_after(1, Scripted::new());
        let line = step_line(
            arena_sim::game::states::StartRound.into(),
            &engine.snapshot(),
        );
        assert!(line.starts_with("[round 1 | preflop"));
        assert!(line.contains("pot   30"));
        assert!(line.ends_with("Dealer › Dealing cards..."));
    }

    #[test]
    fn test_summary_line_after_showdown() {
        // The unscripted preflop actor calls 20 into the 30 blind
        let mut engine = RoundEngine::new(SimulationConfig::default(), Scripted::new());
        engine.play_round();
        let snapshot = engine.snapshot();
        assert_eq!(
            summary_line(&snapshot.history[0]),
            "Round 1 won by DeepStack for 50 chips (showdown)"
        );
    }

    #[test]
    fn test_summary_line_after_folds() {
        let source = Scripted::new()
            .actors([0, 0])
            .facing([true])
            .actions([DisplayAction::Fold, DisplayAction::Fold]);
        let mut engine = RoundEngine::new(SimulationConfig::default(), source);
        engine.play_round();
        let snapshot = engine.snapshot();
        assert_eq!(
            summary_line(&snapshot.history[0]),
            "Round 1 won by NeuralBluff for 30 chips (everyone else folded)"
        );
    }

    #[test]
    fn test_step_line_without_action() {
        let engine = RoundEngine::new(SimulationConfig::default(), Scripted::new());
        let line = step_line(engine.first_step().step, &engine.snapshot());
        assert_eq!(line, "[round 0 | idle      | pot    0] startRound");
    }
}
