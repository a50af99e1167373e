//! Headless arena viewer.
//!
//! Hosts one round simulation and prints its ticker (or JSON snapshots)
//! until enough rounds have completed or Ctrl-C is pressed, then tears the
//! simulation down.

mod config;
mod render;

use anyhow::Error;
use arena_sim::{
    Randomized, SimulationActor, SimulationHandle, Step, Subscription,
    table::StateChangeNotification,
};
use log::info;
use pico_args::Arguments;

use config::{Overrides, ViewerConfig};

const HELP: &str = "\
Watch the poker-agent arena's live table in the terminal

USAGE:
  arena_viewer [OPTIONS]

OPTIONS:
  --rounds     N           Rounds to show before exiting  [default: env ARENA_ROUNDS or run until Ctrl-C]
  --seed       S           Seed for reproducible rounds   [default: env ARENA_SEED or random]
  --speed      F           Pacing multiplier              [default: env ARENA_SPEED or 1.0]

FLAGS:
  --json                   Print one JSON snapshot per step
  -h, --help               Print help information

ENVIRONMENT:
  ARENA_STEP_DELAY_MS      Delay after a deal or betting step
  ARENA_SHOWDOWN_DELAY_MS  Delay between showdown and payout
  ARENA_ROUND_PAUSE_MS     Pause before the next round
  ARENA_START_DELAY_MS     Delay before the first round
  ARENA_JITTER_MS          Random extra delay per step
  ARENA_BLIND              Pot at the start of every round
  ARENA_STARTING_CHIPS     Stack each seat starts a round with
  ARENA_HISTORY_LEN        Completed rounds kept for the results feed
  ARENA_JSON               Set to true to behave as if --json was given
  (A .env file in the working directory is loaded first)
";

/// Simulation ID used in log lines; the viewer hosts a single table
const SIMULATION_ID: u64 = 1;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = Overrides {
        rounds: pargs.opt_value_from_str("--rounds")?,
        seed: pargs.opt_value_from_str("--seed")?,
        speed: pargs.opt_value_from_str("--speed")?,
        json: pargs.contains("--json"),
    };
    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("Unexpected arguments: {remaining:?}");
    }

    env_logger::builder().format_target(false).init();

    let config = ViewerConfig::from_env(overrides)?;
    info!(
        "Starting arena viewer (rounds: {}, speed: {}x, seed: {})",
        config
            .rounds
            .map_or_else(|| "unlimited".to_string(), |n| n.to_string()),
        config.speed,
        config
            .seed
            .map_or_else(|| "random".to_string(), |s| s.to_string()),
    );

    let source = match config.seed {
        Some(seed) => Randomized::seeded(seed),
        None => Randomized::from_os_rng(),
    };
    let handle = SimulationActor::spawn(SIMULATION_ID, config.simulation.clone(), source);
    let mut changes = handle.on_change().await?;
    handle.start().await?;

    tokio::select! {
        result = watch(&mut changes, &config) => result?,
        () = shutdown_signal() => info!("Interrupted, stopping simulation"),
    }

    teardown(&handle, changes).await?;
    Ok(())
}

/// Print notifications until the configured number of rounds completes.
async fn watch(changes: &mut Subscription, config: &ViewerConfig) -> Result<(), Error> {
    let mut completed = 0;
    while let Some(notification) = changes.recv().await {
        match notification {
            StateChangeNotification::StepApplied { step, snapshot } => {
                if config.json {
                    println!("{}", serde_json::to_string(&*snapshot)?);
                    continue;
                }
                println!("{}", render::step_line(step, &snapshot));
                if matches!(step, Step::StartRound(_) | Step::Showdown(_)) {
                    print!("{}", render::table(&snapshot));
                }
            }
            StateChangeNotification::RoundCompleted(summary) => {
                if !config.json {
                    println!("{}\n", render::summary_line(&summary));
                }
                completed += 1;
                if config.rounds.is_some_and(|rounds| completed >= rounds) {
                    info!("Showed {completed} round(s)");
                    return Ok(());
                }
            }
        }
    }
    anyhow::bail!("Simulation stopped unexpectedly")
}

/// Cancel the pending step and stop the actor.
async fn teardown(handle: &SimulationHandle, changes: Subscription) -> Result<(), Error> {
    if handle.cancel().await? {
        log::debug!("Cancelled pending step");
    }
    changes.unsubscribe().await?;
    handle.shutdown().await?;
    info!("Simulation stopped");
    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
}
