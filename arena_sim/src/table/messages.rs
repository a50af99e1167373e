//! Simulation actor message types.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use crate::game::{RoundSnapshot, RoundSummary, Step};

/// Simulation identifier, used in logs
pub type SimulationId = u64;

/// Subscriber identifier handed out by the actor
pub type SubscriberId = u64;

/// Messages that can be sent to a SimulationActor
#[derive(Debug)]
pub enum SimulationMessage {
    /// Cancel any pending step and begin a fresh round after the start delay
    Start { response: oneshot::Sender<()> },

    /// Cancel the pending step; replies whether one was pending
    Cancel { response: oneshot::Sender<bool> },

    /// Get a copy of the current round
    GetSnapshot {
        response: oneshot::Sender<RoundSnapshot>,
    },

    /// Get actor bookkeeping
    GetStatus {
        response: oneshot::Sender<SimulationStatus>,
    },

    /// Subscribe to state change notifications
    Subscribe {
        sender: mpsc::Sender<StateChangeNotification>,
        response: oneshot::Sender<SubscriberId>,
    },

    /// Unsubscribe from state change notifications
    Unsubscribe { subscriber_id: SubscriberId },

    /// Stop the actor
    Shutdown { response: oneshot::Sender<()> },
}

/// Notification sent when the round changes
#[derive(Debug, Clone)]
pub enum StateChangeNotification {
    /// A step ran and mutated the round
    StepApplied {
        step: Step,
        snapshot: Arc<RoundSnapshot>,
    },
    /// A round finished and was paid out
    RoundCompleted(RoundSummary),
}

impl StateChangeNotification {
    /// Snapshot carried by the notification, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<&RoundSnapshot> {
        match self {
            Self::StepApplied { snapshot, .. } => Some(&**snapshot),
            Self::RoundCompleted(_) => None,
        }
    }
}

/// Simulation status response
#[derive(Debug, Clone)]
pub struct SimulationStatus {
    /// Simulation ID
    pub simulation_id: SimulationId,

    /// Step waiting on the timer, if any
    pub pending_step: Option<Step>,

    /// Registered subscribers
    pub subscriber_count: usize,

    /// Steps run since the actor was created
    pub steps_applied: u64,

    /// Rounds paid out since the actor was created
    pub rounds_completed: u32,
}

impl SimulationStatus {
    /// Whether a step is waiting on the timer
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.pending_step.is_some()
    }
}
