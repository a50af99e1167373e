//! Single pending-step timer.

use tokio::time::{Instant, sleep_until};

use crate::game::{Scheduled, Step};

#[derive(Clone, Copy, Debug)]
struct Pending {
    step: Step,
    deadline: Instant,
}

/// Holds at most one step waiting to run. Scheduling always replaces the
/// step already waiting, so two steps are never outstanding at once.
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: Option<Pending>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `scheduled.step` to fire after `scheduled.delay`. Returns the
    /// step it replaced, if any.
    pub fn schedule(&mut self, scheduled: Scheduled) -> Option<Step> {
        let replaced = self.cancel();
        self.pending = Some(Pending {
            step: scheduled.step,
            deadline: Instant::now() + scheduled.delay,
        });
        replaced
    }

    /// Drop the pending step. Cancelling with nothing pending is a no-op.
    pub fn cancel(&mut self) -> Option<Step> {
        self.pending.take().map(|pending| pending.step)
    }

    #[must_use]
    pub fn pending(&self) -> Option<Step> {
        self.pending.map(|pending| pending.step)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|pending| pending.deadline)
    }

    /// Wait until the pending step is due and take it. Never resolves while
    /// nothing is pending. Dropping the future before it resolves leaves the
    /// pending step in place.
    pub async fn fired(&mut self) -> Step {
        let Some(pending) = self.pending else {
            return std::future::pending().await;
        };
        sleep_until(pending.deadline).await;
        self.pending = None;
        pending.step
    }
}
