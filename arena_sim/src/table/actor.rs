//! Simulation actor implementation with async message handling.

use super::{
    errors::{Result, SimulationError},
    messages::{
        SimulationId, SimulationMessage, SimulationStatus, StateChangeNotification, SubscriberId,
    },
    scheduler::Scheduler,
};
use crate::game::{DecisionSource, RoundEngine, RoundSnapshot, SimulationConfig, Step};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, mpsc::error::TryRecvError, oneshot};

/// Inbox size for each simulation actor
const INBOX_CAPACITY: usize = 100;

/// Buffered notifications per subscriber before new ones are dropped
pub const SUBSCRIBER_CAPACITY: usize = 64;

/// Simulation actor handle for sending messages
#[derive(Clone, Debug)]
pub struct SimulationHandle {
    sender: mpsc::Sender<SimulationMessage>,
    simulation_id: SimulationId,
}

impl SimulationHandle {
    /// Create a new simulation handle
    pub fn new(sender: mpsc::Sender<SimulationMessage>, simulation_id: SimulationId) -> Self {
        Self {
            sender,
            simulation_id,
        }
    }

    /// Get simulation ID
    pub fn simulation_id(&self) -> SimulationId {
        self.simulation_id
    }

    /// Send a message to the simulation
    pub async fn send(&self, message: SimulationMessage) -> Result<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| SimulationError::Closed(self.simulation_id))
    }

    async fn request<T>(
        &self,
        message: impl FnOnce(oneshot::Sender<T>) -> SimulationMessage,
    ) -> Result<T> {
        let (response, reply) = oneshot::channel();
        self.send(message(response)).await?;
        reply
            .await
            .map_err(|_| SimulationError::NoResponse(self.simulation_id))
    }

    /// Begin the loop. Any pending step is cancelled first, so calling this
    /// again replays from a fresh round.
    pub async fn start(&self) -> Result<()> {
        self.request(|response| SimulationMessage::Start { response })
            .await
    }

    /// Cancel the pending step. Returns whether one was pending; cancelling
    /// an idle simulation is a no-op.
    pub async fn cancel(&self) -> Result<bool> {
        self.request(|response| SimulationMessage::Cancel { response })
            .await
    }

    /// Copy of the current round
    pub async fn snapshot(&self) -> Result<RoundSnapshot> {
        self.request(|response| SimulationMessage::GetSnapshot { response })
            .await
    }

    /// Actor bookkeeping, including whether a step is pending
    pub async fn status(&self) -> Result<SimulationStatus> {
        self.request(|response| SimulationMessage::GetStatus { response })
            .await
    }

    /// Register for a notification after every mutation.
    pub async fn on_change(&self) -> Result<Subscription> {
        let (sender, receiver) = mpsc::channel(SUBSCRIBER_CAPACITY);
        let subscriber_id = self
            .request(|response| SimulationMessage::Subscribe { sender, response })
            .await?;
        Ok(Subscription {
            subscriber_id,
            receiver,
            handle: self.clone(),
        })
    }

    /// Stop the actor. Pending steps are dropped and later requests fail
    /// with [`SimulationError::Closed`].
    pub async fn shutdown(&self) -> Result<()> {
        self.request(|response| SimulationMessage::Shutdown { response })
            .await
    }
}

/// Registered listener. Dropping it also unsubscribes, on the next
/// notification.
#[derive(Debug)]
pub struct Subscription {
    subscriber_id: SubscriberId,
    receiver: mpsc::Receiver<StateChangeNotification>,
    handle: SimulationHandle,
}

impl Subscription {
    pub fn subscriber_id(&self) -> SubscriberId {
        self.subscriber_id
    }

    /// Wait for the next notification. `None` once the actor has stopped.
    pub async fn recv(&mut self) -> Option<StateChangeNotification> {
        self.receiver.recv().await
    }

    /// Take a buffered notification without waiting.
    pub fn try_recv(&mut self) -> std::result::Result<StateChangeNotification, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Remove the listener.
    pub async fn unsubscribe(self) -> Result<()> {
        self.handle
            .send(SimulationMessage::Unsubscribe {
                subscriber_id: self.subscriber_id,
            })
            .await
    }
}

/// Simulation actor owning one engine and its timer
pub struct SimulationActor {
    /// Simulation ID
    id: SimulationId,

    /// Round state machine
    engine: RoundEngine,

    /// The single pending step
    scheduler: Scheduler,

    /// Message inbox
    inbox: mpsc::Receiver<SimulationMessage>,

    /// Subscribers for state change notifications
    subscribers: HashMap<SubscriberId, mpsc::Sender<StateChangeNotification>>,

    /// Next subscriber ID to hand out
    next_subscriber_id: SubscriberId,

    /// Steps run so far
    steps_applied: u64,

    /// Rounds paid out so far
    rounds_completed: u32,

    /// Is actor closed
    is_closed: bool,
}

impl SimulationActor {
    /// Create a new simulation actor
    ///
    /// # Arguments
    ///
    /// * `id` - Simulation ID
    /// * `config` - Display parameters
    /// * `source` - Source of every random decision
    ///
    /// # Returns
    ///
    /// * `(SimulationActor, SimulationHandle)` - Actor and handle for sending messages
    pub fn new(
        id: SimulationId,
        config: SimulationConfig,
        source: impl DecisionSource + 'static,
    ) -> (Self, SimulationHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);

        let actor = Self {
            id,
            engine: RoundEngine::new(config, source),
            scheduler: Scheduler::new(),
            inbox,
            subscribers: HashMap::new(),
            next_subscriber_id: 1,
            steps_applied: 0,
            rounds_completed: 0,
            is_closed: false,
        };

        let handle = SimulationHandle::new(sender, id);

        (actor, handle)
    }

    /// Create an actor and spawn it on the current Tokio runtime.
    pub fn spawn(
        id: SimulationId,
        config: SimulationConfig,
        source: impl DecisionSource + 'static,
    ) -> SimulationHandle {
        let (actor, handle) = Self::new(id, config, source);
        tokio::spawn(actor.run());
        handle
    }

    /// Run the simulation actor event loop. Returns once every handle is
    /// dropped or a shutdown is requested.
    pub async fn run(mut self) {
        log::info!("Simulation {} ready", self.id);

        loop {
            tokio::select! {
                message = self.inbox.recv() => match message {
                    Some(message) => {
                        self.handle_message(message);
                        if self.is_closed {
                            break;
                        }
                    }
                    None => break,
                },

                step = self.scheduler.fired() => {
                    self.run_step(step);
                }
            }
        }

        self.scheduler.cancel();
        self.subscribers.clear();
        log::info!(
            "Simulation {} stopped after {} round(s)",
            self.id,
            self.rounds_completed
        );
    }

    /// Handle a simulation message
    fn handle_message(&mut self, message: SimulationMessage) {
        match message {
            SimulationMessage::Start { response } => {
                self.start();
                let _ = response.send(());
            }

            SimulationMessage::Cancel { response } => {
                let cancelled = self.cancel();
                let _ = response.send(cancelled);
            }

            SimulationMessage::GetSnapshot { response } => {
                let _ = response.send(self.engine.snapshot());
            }

            SimulationMessage::GetStatus { response } => {
                let _ = response.send(self.status());
            }

            SimulationMessage::Subscribe { sender, response } => {
                let subscriber_id = self.next_subscriber_id;
                self.next_subscriber_id += 1;
                self.subscribers.insert(subscriber_id, sender);
                log::debug!(
                    "Subscriber {} subscribed to simulation {}",
                    subscriber_id,
                    self.id
                );
                let _ = response.send(subscriber_id);
            }

            SimulationMessage::Unsubscribe { subscriber_id } => {
                self.subscribers.remove(&subscriber_id);
                log::debug!(
                    "Subscriber {} unsubscribed from simulation {}",
                    subscriber_id,
                    self.id
                );
            }

            SimulationMessage::Shutdown { response } => {
                self.scheduler.cancel();
                self.is_closed = true;
                let _ = response.send(());
            }
        }
    }

    fn start(&mut self) {
        let first = self.engine.first_step();
        if let Some(replaced) = self.scheduler.schedule(first) {
            log::debug!(
                "Simulation {}: restart replaced pending {}",
                self.id,
                replaced
            );
        }
        log::info!(
            "Simulation {} starting round {} ({}ms per step)",
            self.id,
            self.engine.round().round_number() + 1,
            self.engine.config().pacing.step_delay_ms
        );
    }

    fn cancel(&mut self) -> bool {
        match self.scheduler.cancel() {
            Some(step) => {
                log::info!("Simulation {}: cancelled pending {}", self.id, step);
                true
            }
            None => false,
        }
    }

    fn status(&self) -> SimulationStatus {
        SimulationStatus {
            simulation_id: self.id,
            pending_step: self.scheduler.pending(),
            subscriber_count: self.subscribers.len(),
            steps_applied: self.steps_applied,
            rounds_completed: self.rounds_completed,
        }
    }

    /// Run a due step, queue its successor and tell subscribers.
    fn run_step(&mut self, step: Step) {
        let next = self.engine.perform(step);
        self.steps_applied += 1;
        self.scheduler.schedule(next);

        let snapshot = Arc::new(self.engine.snapshot());
        self.notify_state_change(StateChangeNotification::StepApplied { step, snapshot });

        if matches!(step, Step::EndRound(_)) {
            self.rounds_completed += 1;
            if let Some(summary) = self.engine.round().last_result().cloned() {
                log::debug!(
                    "Simulation {} round {} won by {} ({} chips)",
                    self.id,
                    summary.round_number,
                    summary.winner,
                    summary.awarded
                );
                self.notify_state_change(StateChangeNotification::RoundCompleted(summary));
            }
        }
    }

    /// Broadcast state change notification to all subscribers
    fn notify_state_change(&mut self, notification: StateChangeNotification) {
        let id = self.id;
        self.subscribers.retain(|subscriber_id, sender| {
            match sender.try_send(notification.clone()) {
                Ok(_) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!(
                        "Simulation {}: subscriber {} channel full, dropping notification",
                        id,
                        subscriber_id
                    );
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!(
                        "Simulation {}: subscriber {} disconnected, removing",
                        id,
                        subscriber_id
                    );
                    false
                }
            }
        });
    }
}
