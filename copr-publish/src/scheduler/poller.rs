//! Build status poller
//!
//! Waits for a scheduled Copr build to reach a terminal status. The budget is
//! spent in fixed naps: a full interval while at least one is left, then
//! whatever remains. Copr is asked for the status after every nap.

use copr_client::{BuildService, ClientError};
use copr_core::domain::build::{BuildHandle, BuildStatus};
use tokio::time::{self, Duration};
use tracing::{debug, info};

use crate::workflow::LOG_PREFIX;

/// Time between two status queries
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// How waiting for a build ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Copr reported a terminal status
    Finished(BuildStatus),
    /// The budget ran out while the build was still in progress
    TimedOut { last: BuildStatus },
}

/// Polls the build service until a build finishes or the budget runs out
pub struct StatusPoller<'a> {
    service: &'a dyn BuildService,
}

impl<'a> StatusPoller<'a> {
    pub fn new(service: &'a dyn BuildService) -> Self {
        Self { service }
    }

    /// Waits for `handle` to finish, spending at most `budget` asleep
    ///
    /// A failed status query ends the wait immediately with that error.
    pub async fn wait(
        &self,
        handle: &BuildHandle,
        budget: Duration,
    ) -> Result<WaitOutcome, ClientError> {
        let mut remaining = budget;
        let mut status = BuildStatus::Pending;

        while status.is_in_progress() {
            let nap = if remaining >= POLL_INTERVAL {
                POLL_INTERVAL
            } else if !remaining.is_zero() {
                remaining
            } else {
                return Ok(WaitOutcome::TimedOut { last: status });
            };

            debug!("Sleeping {:?} before querying build {}", nap, handle);
            time::sleep(nap).await;
            remaining -= nap;

            status = self.service.status(handle).await?;
            info!("{}build status is {}", LOG_PREFIX, status);
        }

        Ok(WaitOutcome::Finished(status))
    }
}
