/// Integration tests for the simulation actor
///
/// These tests run the actor on a paused Tokio clock so every delay elapses
/// instantly, and check scheduling, cancellation and subscriptions.
use arena_sim::{
    Phase, Scripted, SimulationActor, SimulationConfig, SimulationError, Step,
    table::{StateChangeNotification, actor::SUBSCRIBER_CAPACITY},
};
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::{Instant, timeout};

const FULL_ROUND: [&str; 10] = [
    "startRound",
    "preflop",
    "dealFlop",
    "flop",
    "dealTurn",
    "turn",
    "dealRiver",
    "river",
    "showdown",
    "endRound",
];

fn spawn_scripted(id: u64) -> arena_sim::SimulationHandle {
    SimulationActor::spawn(id, SimulationConfig::default(), Scripted::new())
}

fn applied_step(notification: &StateChangeNotification) -> Option<String> {
    match notification {
        StateChangeNotification::StepApplied { step, .. } => Some(step.to_string()),
        StateChangeNotification::RoundCompleted(_) => None,
    }
}

#[tokio::test(start_paused = true)]
async fn test_round_notifications_arrive_in_order() {
    let handle = spawn_scripted(1);
    let mut changes = handle.on_change().await.unwrap();
    handle.start().await.unwrap();

    let mut steps = Vec::new();
    let summary = loop {
        match changes.recv().await.unwrap() {
            StateChangeNotification::RoundCompleted(summary) => break summary,
            notification => steps.push(applied_step(&notification).unwrap()),
        }
    };

    assert_eq!(steps, FULL_ROUND);
    assert_eq!(summary.round_number, 1);
    assert!(!summary.ended_early);

    let status = handle.status().await.unwrap();
    assert_eq!(status.steps_applied, 10);
    assert_eq!(status.rounds_completed, 1);
    assert_eq!(
        status.pending_step.map(|s| s.to_string()).as_deref(),
        Some("startRound")
    );
}

#[tokio::test(start_paused = true)]
async fn test_steps_respect_pacing() {
    let handle = spawn_scripted(2);
    let mut changes = handle.on_change().await.unwrap();

    let started = Instant::now();
    handle.start().await.unwrap();

    // First step waits for the start delay
    changes.recv().await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(400));

    let before = Instant::now();
    changes.recv().await.unwrap();
    assert!(before.elapsed() >= Duration::from_millis(1600));
}

#[tokio::test(start_paused = true)]
async fn test_notification_snapshot_matches_step() {
    let handle = spawn_scripted(3);
    let mut changes = handle.on_change().await.unwrap();
    handle.start().await.unwrap();

    let notification = changes.recv().await.unwrap();
    let snapshot = notification.snapshot().unwrap();
    assert_eq!(snapshot.phase, Phase::Preflop);
    assert_eq!(snapshot.round_number, 1);
    assert_eq!(snapshot.pot, 30);
    assert_eq!(snapshot.community.len(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_the_loop() {
    let handle = spawn_scripted(4);
    let mut changes = handle.on_change().await.unwrap();
    handle.start().await.unwrap();

    // Let a few steps run, then cancel mid-round
    for _ in 0..3 {
        changes.recv().await.unwrap();
    }
    assert!(handle.cancel().await.unwrap());

    let frozen = handle.snapshot().await.unwrap();
    assert_eq!(frozen.phase, Phase::Flop);

    assert!(
        timeout(Duration::from_secs(60), changes.recv())
            .await
            .is_err()
    );
    let status = handle.status().await.unwrap();
    assert_eq!(status.pending_step, None);
    assert!(!status.is_scheduled());
    assert_eq!(status.steps_applied, 3);
    assert_eq!(handle.snapshot().await.unwrap(), frozen);

    // Cancelling again is a no-op
    assert!(!handle.cancel().await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_start_is_noop() {
    let handle = spawn_scripted(5);
    assert!(!handle.cancel().await.unwrap());

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, Phase::Idle);
    assert_eq!(snapshot.round_number, 0);
}

#[tokio::test(start_paused = true)]
async fn test_restart_replaces_pending_step() {
    let handle = spawn_scripted(6);
    let mut changes = handle.on_change().await.unwrap();
    handle.start().await.unwrap();

    for _ in 0..4 {
        changes.recv().await.unwrap();
    }
    let status = handle.status().await.unwrap();
    assert_eq!(
        status.pending_step.map(|s| s.to_string()).as_deref(),
        Some("dealTurn")
    );

    handle.start().await.unwrap();
    let status = handle.status().await.unwrap();
    assert_eq!(
        status.pending_step.map(|s| s.to_string()).as_deref(),
        Some("startRound")
    );

    // The replaced dealTurn never runs; a fresh round begins instead
    let next = changes.recv().await.unwrap();
    assert_eq!(applied_step(&next).as_deref(), Some("startRound"));
    assert_eq!(next.snapshot().map(|s| s.round_number), Some(2));
    assert_eq!(next.snapshot().map(|s| s.community.len()), Some(0));
}

#[tokio::test(start_paused = true)]
async fn test_rounds_keep_looping() {
    let handle = spawn_scripted(7);
    let mut changes = handle.on_change().await.unwrap();
    handle.start().await.unwrap();

    let mut completed = Vec::new();
    while completed.len() < 3 {
        if let StateChangeNotification::RoundCompleted(summary) = changes.recv().await.unwrap() {
            completed.push(summary.round_number);
        }
    }
    assert_eq!(completed, vec![1, 2, 3]);

    let snapshot = handle.snapshot().await.unwrap();
    let rounds: Vec<u32> = snapshot.history.iter().map(|h| h.round_number).collect();
    assert_eq!(&rounds[..3], &[3, 2, 1]);
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_has_no_side_effects() {
    let handle = spawn_scripted(8);
    handle.start().await.unwrap();

    let before = handle.status().await.unwrap();
    for _ in 0..5 {
        handle.snapshot().await.unwrap();
    }
    let after = handle.status().await.unwrap();

    assert_eq!(before.steps_applied, after.steps_applied);
    assert_eq!(before.pending_step, after.pending_step);
    assert_eq!(
        after.pending_step,
        Some(Step::from(arena_sim::game::states::StartRound))
    );
}

#[tokio::test(start_paused = true)]
async fn test_unsubscribe_and_dropped_subscribers() {
    let handle = spawn_scripted(9);
    let kept = handle.on_change().await.unwrap();
    let dropped = handle.on_change().await.unwrap();
    let mut watcher = handle.on_change().await.unwrap();
    assert_ne!(kept.subscriber_id(), dropped.subscriber_id());
    assert_eq!(handle.status().await.unwrap().subscriber_count, 3);

    kept.unsubscribe().await.unwrap();
    drop(dropped);
    assert_eq!(handle.status().await.unwrap().subscriber_count, 2);

    // The closed channel is pruned on the next broadcast
    handle.start().await.unwrap();
    watcher.recv().await.unwrap();
    assert_eq!(handle.status().await.unwrap().subscriber_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_closes_handle() {
    let handle = spawn_scripted(10);
    let mut changes = handle.on_change().await.unwrap();
    handle.start().await.unwrap();
    changes.recv().await.unwrap();

    handle.shutdown().await.unwrap();

    // Subscribers see the end of the stream
    assert!(changes.recv().await.is_none());
    assert_eq!(
        handle.snapshot().await.unwrap_err(),
        SimulationError::Closed(10)
    );
    assert_eq!(
        handle.start().await.unwrap_err(),
        SimulationError::Closed(10)
    );
}

#[tokio::test(start_paused = true)]
async fn test_full_subscriber_stays_registered() {
    let handle = spawn_scripted(11);
    let mut slow = handle.on_change().await.unwrap();
    let mut watcher = handle.on_change().await.unwrap();
    handle.start().await.unwrap();

    // The slow listener never reads, so its buffer fills and later
    // notifications for it are dropped
    for _ in 0..SUBSCRIBER_CAPACITY + 16 {
        watcher.recv().await.unwrap();
    }
    assert_eq!(handle.status().await.unwrap().subscriber_count, 2);

    let mut buffered = 0;
    while slow.try_recv().is_ok() {
        buffered += 1;
    }
    assert_eq!(buffered, SUBSCRIBER_CAPACITY);
    assert_eq!(slow.try_recv().unwrap_err(), TryRecvError::Empty);

    // Once drained it receives again
    watcher.recv().await.unwrap();
    assert!(slow.try_recv().is_ok());
}
