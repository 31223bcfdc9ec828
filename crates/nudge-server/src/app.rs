//! Bootstrap: open the durable stores and build the single orchestrator
//! every entry point shares.

use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinHandle;

use nudge_core::errors::NudgeResult;
use nudge_core::{CancellationToken, NudgeConfig};
use nudge_engine::{CycleRunner, NudgeOrchestrator, RunOutcome};
use nudge_storage::{JsonStateStore, SqliteAuditLog};

pub struct App {
    pub config: NudgeConfig,
    pub orchestrator: Arc<NudgeOrchestrator>,
}

impl App {
    /// Open the audit database and state file named in `config`. A state
    /// file that exists but cannot be loaded fails here, before anything
    /// else runs.
    pub fn open(config: NudgeConfig) -> NudgeResult<Self> {
        let audit = SqliteAuditLog::open(
            Path::new(&config.storage.audit_db_path),
            config.storage.read_pool_size,
        )?;
        let store = JsonStateStore::new(&config.storage.state_path);
        let orchestrator =
            NudgeOrchestrator::from_config(&config, Arc::new(audit), Arc::new(store))?;
        tracing::info!(
            audit_db = %config.storage.audit_db_path,
            state = %config.storage.state_path,
            "scheduler ready"
        );
        Ok(Self {
            config,
            orchestrator: Arc::new(orchestrator),
        })
    }

    /// Start the cycle loop in the background. A fatal loop error also
    /// cancels `cancel`, which takes the webhook listener down with it.
    pub fn spawn_cycle_loop(&self, cancel: CancellationToken) -> JoinHandle<NudgeResult<RunOutcome>> {
        let runner = CycleRunner::from_config(
            Arc::clone(&self.orchestrator),
            &self.config.scheduler,
            cancel.clone(),
        );
        tokio::spawn(async move {
            let result = runner.run().await;
            if let Err(e) = &result {
                tracing::error!(error = %e, "cycle loop failed, shutting down");
                cancel.cancel();
            }
            result
        })
    }
}
