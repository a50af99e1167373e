//! Table module hosting round simulations in async actors.
//!
//! This module implements:
//! - SimulationActor: Async actor owning one engine and its single pending timer
//! - SimulationHandle: Cloneable handle exposing the start/snapshot/subscribe/cancel contract
//! - Scheduler: The one-step-at-a-time timer with cancel-before-schedule semantics
//! - Message-based communication with tokio channels
//!
//! ## Architecture
//!
//! Each hosted view owns its own simulation running in a separate Tokio task
//! with an mpsc message inbox. Nothing is shared between simulations.
//!
//! ## Example
//!
//! ```no_run
//! use arena_sim::{Randomized, SimulationConfig, table::SimulationActor};
//!
//! #[tokio::main]
//! async fn main() {
//!     let handle = SimulationActor::spawn(1, SimulationConfig::default(), Randomized::default());
//!     let mut changes = handle.on_change().await.unwrap();
//!     handle.start().await.unwrap();
//!
//!     while let Some(change) = changes.recv().await {
//!         if let Some(snapshot) = change.snapshot() {
//!             println!("{:?}", snapshot.action);
//!         }
//!     }
//! }
//! ```

pub mod actor;
pub mod errors;
pub mod messages;
pub mod scheduler;

pub use actor::{SimulationActor, SimulationHandle, Subscription};
pub use errors::SimulationError;
pub use messages::{
    SimulationId, SimulationMessage, SimulationStatus, StateChangeNotification, SubscriberId,
};
pub use scheduler::Scheduler;
