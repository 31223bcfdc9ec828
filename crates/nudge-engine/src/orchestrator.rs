//! NudgeOrchestrator: the explicitly constructed coordinator shared (via
//! `Arc`) by the cycle runner, the webhook handlers, and the CLI.
//!
//! Lock order: `cycle` → `state` → selector. Audit appends and state
//! persistence happen outside `state` and the selector lock.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use nudge_core::config::NudgeConfig;
use nudge_core::constants::{FEEDBACK_DELTA, SOURCE_ENGINE, SOURCE_SCHEDULER};
use nudge_core::errors::NudgeResult;
use nudge_core::models::{
    AuditEvent, CumulativeState, EventType, Nudge, NudgeCategory, RosterEntry, Scenario,
    ScenarioReading, SimulationOutcome, WeightTable,
};
use nudge_core::traits::{AuditLog, MetricsSource, StateStore};
use nudge_core::{cycle_span, feedback_span, persist_span};

use crate::donor_model::DonorReinforcementModel;
use crate::metrics::UniformMetricsSource;
use crate::selector::WeightedSelector;
use crate::sync::lock;

/// Which category, if any, an external event reinforces.
pub fn feedback_policy(event_type: &EventType) -> Option<NudgeCategory> {
    match event_type {
        EventType::Donation => Some(NudgeCategory::Emotional),
        EventType::Contact => Some(NudgeCategory::Visionary),
        _ => None,
    }
}

/// Result of one completed cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub iteration: u64,
    pub nudge: Nudge,
    pub outcome: SimulationOutcome,
    pub reading: ScenarioReading,
    /// This cycle's above-threshold projection.
    pub projected_donations: u64,
    pub total_projected_donations: u64,
}

/// Result of `report_event`.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackOutcome {
    pub event: AuditEvent,
    /// Category adjusted and its new weight, when the policy matched.
    pub adjusted: Option<(NudgeCategory, f64)>,
}

/// Counters and scenario. The weight table lives in the selector.
struct Counters {
    revision: u64,
    iteration_count: u64,
    feedback_count: u64,
    total_projected_donations: u64,
    last_projected_donations: u64,
    scenario: Scenario,
}

impl Counters {
    fn from_state(state: &CumulativeState) -> Self {
        Self {
            revision: state.revision,
            iteration_count: state.iteration_count,
            feedback_count: state.feedback_count,
            total_projected_donations: state.total_projected_donations,
            last_projected_donations: state.last_projected_donations,
            scenario: state.scenario,
        }
    }

    fn to_state(&self, weights: WeightTable) -> CumulativeState {
        CumulativeState {
            revision: self.revision,
            iteration_count: self.iteration_count,
            feedback_count: self.feedback_count,
            total_projected_donations: self.total_projected_donations,
            last_projected_donations: self.last_projected_donations,
            weights,
            scenario: self.scenario,
        }
    }
}

pub struct NudgeOrchestrator {
    selector: WeightedSelector,
    donors: Mutex<DonorReinforcementModel>,
    roster: Vec<RosterEntry>,
    metrics: Box<dyn MetricsSource>,
    audit: Arc<dyn AuditLog>,
    store: Arc<dyn StateStore>,
    state: Mutex<Counters>,
    /// Revision of the last snapshot written to `store`.
    persisted: Mutex<u64>,
    /// Serializes cycles so iteration numbers match the audit trail.
    cycle: Mutex<()>,
    history: Mutex<VecDeque<Nudge>>,
    history_capacity: usize,
    recent_limit: usize,
    last_outcome: Mutex<Option<SimulationOutcome>>,
    last_reading: Mutex<Option<ScenarioReading>>,
}

impl NudgeOrchestrator {
    /// Build with the uniform metrics source, seeded from the config.
    pub fn from_config(
        config: &NudgeConfig,
        audit: Arc<dyn AuditLog>,
        store: Arc<dyn StateStore>,
    ) -> NudgeResult<Self> {
        let metrics = UniformMetricsSource::new(derive_seed(config.scheduler.seed, 2));
        Self::new(config, audit, store, Box::new(metrics))
    }

    /// Load durable state once and wire the collaborators.
    ///
    /// A missing state file starts fresh with the configured scenario. An
    /// existing one is authoritative, scenario included; a state file that
    /// cannot be understood is a configuration error.
    pub fn new(
        config: &NudgeConfig,
        audit: Arc<dyn AuditLog>,
        store: Arc<dyn StateStore>,
        metrics: Box<dyn MetricsSource>,
    ) -> NudgeResult<Self> {
        let configured = config.scenario.scenario()?;
        let state = match store.load()? {
            Some(state) => {
                state.weights.check_invariants()?;
                if state.scenario != configured {
                    tracing::info!(
                        persisted = %state.scenario,
                        configured = %configured,
                        "resuming with persisted scenario"
                    );
                }
                tracing::info!(
                    revision = state.revision,
                    iteration_count = state.iteration_count,
                    feedback_count = state.feedback_count,
                    "state restored"
                );
                state
            }
            None => {
                tracing::info!(scenario = %configured, "no persisted state, starting fresh");
                CumulativeState::new(configured)
            }
        };

        let seed = config.scheduler.seed;
        Ok(Self {
            selector: WeightedSelector::from_seed(state.weights.clone(), seed),
            donors: Mutex::new(DonorReinforcementModel::new(
                config.donors.clone(),
                derive_seed(seed, 1),
            )),
            roster: config.donors.roster.clone(),
            metrics,
            audit,
            store,
            persisted: Mutex::new(state.revision),
            state: Mutex::new(Counters::from_state(&state)),
            cycle: Mutex::new(()),
            history: Mutex::new(VecDeque::with_capacity(config.scheduler.history_capacity)),
            history_capacity: config.scheduler.history_capacity.max(1),
            recent_limit: config.scheduler.recent_limit,
            last_outcome: Mutex::new(None),
            last_reading: Mutex::new(None),
        })
    }

    /// One full cycle: simulate, evaluate the scenario, draw, log
    /// `SimulationRun` then `NudgeDeployed`, update counters, persist.
    ///
    /// If either append fails the cycle stops there and counters are left
    /// untouched.
    pub fn run_cycle(&self) -> NudgeResult<CycleReport> {
        let _cycle = lock(&self.cycle);
        let (iteration, scenario) = {
            let state = lock(&self.state);
            (state.iteration_count + 1, state.scenario)
        };
        let span = cycle_span!(iteration);
        let _guard = span.enter();

        let outcome = lock(&self.donors).simulate(&self.roster);
        let reading = scenario.read(self.metrics.sample());
        let category = self.selector.draw();
        let nudge = Nudge::new(category);

        let high = outcome.high_probability(outcome.success_threshold).len();
        let goals = reading
            .summary
            .iter()
            .map(|(s, g)| format!("{s}={g}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.audit.append(&AuditEvent::now(
            SOURCE_ENGINE,
            EventType::SimulationRun,
            format!(
                "Cycle {iteration}: {} donors simulated, {high} above {:.2}, projected ${}. \
                 Scenario '{}': {} ({}). Goals: {goals}",
                outcome.profiles.len(),
                outcome.success_threshold,
                outcome.total_above_threshold,
                reading.scenario,
                reading.goal,
                reading.tuning,
            ),
        ))?;
        self.audit.append(&AuditEvent {
            timestamp: nudge.timestamp,
            source: SOURCE_SCHEDULER.to_string(),
            event_type: EventType::NudgeDeployed,
            details: format!("Cycle {iteration}: [{}] {}", nudge.category, nudge.message),
        })?;

        self.push_history(nudge.clone());
        *lock(&self.last_outcome) = Some(outcome.clone());
        *lock(&self.last_reading) = Some(reading.clone());

        let projected = outcome.total_above_threshold;
        let snapshot = self.mutate(|c| {
            c.iteration_count = iteration;
            c.total_projected_donations = c.total_projected_donations.saturating_add(projected);
            c.last_projected_donations = projected;
        });
        self.persist(&snapshot)?;

        tracing::info!(
            %category,
            projected,
            total = snapshot.total_projected_donations,
            goal = %reading.goal,
            "cycle complete"
        );
        Ok(CycleReport {
            iteration,
            nudge,
            outcome,
            reading,
            projected_donations: projected,
            total_projected_donations: snapshot.total_projected_donations,
        })
    }

    /// External feedback. The event is appended first; only then does the
    /// policy table decide whether a weight moves. An append failure leaves
    /// the weights untouched and is returned to the caller.
    pub fn report_event(
        &self,
        source: &str,
        event_type: impl Into<EventType>,
        details: &str,
    ) -> NudgeResult<FeedbackOutcome> {
        let event = AuditEvent::now(source, event_type, details);
        let span = feedback_span!(source, event.event_type);
        let _guard = span.enter();

        self.audit.append(&event)?;

        let Some(category) = feedback_policy(&event.event_type) else {
            tracing::debug!("event recorded, no weight change");
            return Ok(FeedbackOutcome {
                event,
                adjusted: None,
            });
        };

        let mut weight = 0.0;
        let snapshot = self.mutate(|c| {
            weight = self.selector.apply_delta(category, FEEDBACK_DELTA);
            c.feedback_count += 1;
        });
        tracing::info!(%category, weight, feedback_count = snapshot.feedback_count, "feedback applied");
        self.persist(&snapshot)?;

        Ok(FeedbackOutcome {
            event,
            adjusted: Some((category, weight)),
        })
    }

    /// Append an event without consulting the feedback policy.
    pub fn log_event(
        &self,
        source: &str,
        event_type: impl Into<EventType>,
        details: impl Into<String>,
    ) -> NudgeResult<()> {
        self.audit.append(&AuditEvent::now(source, event_type, details))
    }

    /// The last `limit` nudges, most recent last.
    pub fn recent_nudges(&self, limit: usize) -> Vec<Nudge> {
        let history = lock(&self.history);
        let skip = history.len().saturating_sub(limit);
        history.iter().skip(skip).cloned().collect()
    }

    pub fn recent_nudges_default(&self) -> Vec<Nudge> {
        self.recent_nudges(self.recent_limit)
    }

    /// Consistent snapshot of counters and weights.
    pub fn state(&self) -> CumulativeState {
        let counters = lock(&self.state);
        counters.to_state(self.selector.snapshot())
    }

    pub fn weights(&self) -> WeightTable {
        self.selector.snapshot()
    }

    pub fn scenario(&self) -> Scenario {
        lock(&self.state).scenario
    }

    /// Switch scenario and persist.
    pub fn set_scenario(&self, scenario: Scenario) -> NudgeResult<()> {
        let snapshot = self.mutate(|c| c.scenario = scenario);
        tracing::info!(%scenario, "scenario changed");
        self.persist(&snapshot)
    }

    /// Outcome of the most recent cycle in this process.
    pub fn last_outcome(&self) -> Option<SimulationOutcome> {
        lock(&self.last_outcome).clone()
    }

    /// Scenario reading of the most recent cycle in this process.
    pub fn last_reading(&self) -> Option<ScenarioReading> {
        lock(&self.last_reading).clone()
    }

    pub fn audit(&self) -> &Arc<dyn AuditLog> {
        &self.audit
    }

    /// Apply `f` under the state lock, bump the revision, and return the
    /// snapshot to persist.
    fn mutate<F>(&self, f: F) -> CumulativeState
    where
        F: FnOnce(&mut Counters),
    {
        let mut counters = lock(&self.state);
        f(&mut counters);
        counters.revision += 1;
        counters.to_state(self.selector.snapshot())
    }

    /// Write `snapshot` unless a newer revision has already been written.
    fn persist(&self, snapshot: &CumulativeState) -> NudgeResult<()> {
        let span = persist_span!(snapshot.revision);
        let _guard = span.enter();

        let mut persisted = lock(&self.persisted);
        if snapshot.revision <= *persisted {
            tracing::debug!(persisted = *persisted, "newer state already persisted");
            return Ok(());
        }
        self.store.save(snapshot)?;
        *persisted = snapshot.revision;
        Ok(())
    }

    fn push_history(&self, nudge: Nudge) {
        let mut history = lock(&self.history);
        while history.len() >= self.history_capacity {
            history.pop_front();
        }
        history.push_back(nudge);
    }
}

/// Distinct, reproducible streams per random source from one configured seed.
fn derive_seed(seed: Option<u64>, stream: u64) -> Option<u64> {
    seed.map(|s| s.wrapping_add(stream))
}
