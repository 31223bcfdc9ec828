//! Periodic cycle loop with funding-goal, cycle-limit, and shutdown exits.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use nudge_core::config::SchedulerConfig;
use nudge_core::constants::SOURCE_SYSTEM;
use nudge_core::errors::NudgeResult;
use nudge_core::models::EventType;
use nudge_core::CancellationToken;

use crate::orchestrator::{CycleReport, NudgeOrchestrator};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RunOutcome {
    /// A cycle's projection reached the funding goal.
    GoalMet { cycles: u64, projected: u64 },
    /// Shutdown was requested; a `Terminated` event was recorded.
    Terminated { cycles: u64 },
    /// `max_cycles` cycles were attempted.
    CycleLimit { cycles: u64 },
}

pub struct CycleRunner {
    orchestrator: Arc<NudgeOrchestrator>,
    interval: Duration,
    funding_goal: u64,
    max_cycles: Option<u64>,
    cancel: CancellationToken,
}

impl CycleRunner {
    pub fn new(
        orchestrator: Arc<NudgeOrchestrator>,
        interval: Duration,
        funding_goal: u64,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            orchestrator,
            interval,
            funding_goal,
            max_cycles: None,
            cancel,
        }
    }

    pub fn from_config(
        orchestrator: Arc<NudgeOrchestrator>,
        config: &SchedulerConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self::new(orchestrator, config.interval(), config.funding_goal, cancel)
            .with_max_cycles(config.max_cycles)
    }

    pub fn with_max_cycles(mut self, max_cycles: Option<u64>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    /// Run until the goal is met, the cycle limit is hit, or shutdown.
    ///
    /// A failed cycle is logged once and the loop moves on to the next
    /// interval; only fatal errors end the loop early.
    pub async fn run(self) -> NudgeResult<RunOutcome> {
        let mut attempted = 0u64;
        loop {
            if self.cancel.is_cancelled() {
                return self.terminate(attempted).await;
            }

            attempted += 1;
            match self.cycle().await {
                Ok(report) if report.projected_donations >= self.funding_goal => {
                    let details = format!(
                        "Funding goal reached in cycle {}: projected ${} of ${}",
                        report.iteration, report.projected_donations, self.funding_goal
                    );
                    self.log(EventType::GoalMet, details).await?;
                    tracing::info!(
                        cycles = attempted,
                        projected = report.projected_donations,
                        "funding goal met"
                    );
                    return Ok(RunOutcome::GoalMet {
                        cycles: attempted,
                        projected: report.projected_donations,
                    });
                }
                Ok(_) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => tracing::error!(cycle = attempted, error = %e, "cycle failed"),
            }

            if self.max_cycles.is_some_and(|max| attempted >= max) {
                tracing::info!(cycles = attempted, "cycle limit reached");
                return Ok(RunOutcome::CycleLimit { cycles: attempted });
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.cancel.cancelled() => {
                    return self.terminate(attempted).await;
                }
            }
        }
    }

    async fn cycle(&self) -> NudgeResult<CycleReport> {
        let orchestrator = Arc::clone(&self.orchestrator);
        blocking(move || orchestrator.run_cycle()).await
    }

    async fn terminate(&self, cycles: u64) -> NudgeResult<RunOutcome> {
        self.log(
            EventType::Terminated,
            format!("Scheduler stopped by shutdown signal after {cycles} cycles"),
        )
        .await?;
        tracing::info!(cycles, "scheduler terminated");
        Ok(RunOutcome::Terminated { cycles })
    }

    async fn log(&self, event_type: EventType, details: String) -> NudgeResult<()> {
        let orchestrator = Arc::clone(&self.orchestrator);
        blocking(move || orchestrator.log_event(SOURCE_SYSTEM, event_type, details)).await
    }
}

/// Run storage-bound work off the async workers. Blocking tasks are never
/// aborted, so a join error can only be a panic; re-raise it.
async fn blocking<F, T>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(value) => value,
        Err(join) => std::panic::resume_unwind(join.into_panic()),
    }
}
