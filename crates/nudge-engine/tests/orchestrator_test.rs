use std::sync::Arc;
use std::thread;

use nudge_core::config::NudgeConfig;
use nudge_core::errors::{NudgeError, NudgeResult, StorageError};
use nudge_core::models::{
    AuditEvent, CumulativeState, EventType, MetricsSample, NudgeCategory, Scenario, WeightTable,
};
use nudge_core::traits::{AuditLog, MetricsSource, StateStore};
use nudge_engine::NudgeOrchestrator;
use nudge_storage::{InMemoryAuditLog, JsonStateStore, MemoryStateStore, SqliteAuditLog};

struct FixedMetrics;

impl MetricsSource for FixedMetrics {
    fn sample(&self) -> MetricsSample {
        MetricsSample {
            entanglement_density: 0.45,
            phase_alignment: 0.65,
            information_flow: [500, 503],
        }
    }
}

struct FailingAuditLog;

impl AuditLog for FailingAuditLog {
    fn append(&self, _event: &AuditEvent) -> NudgeResult<()> {
        Err(StorageError::Io {
            path: "audit".to_string(),
            message: "disk full".to_string(),
        }
        .into())
    }

    fn read_all(&self) -> NudgeResult<Vec<AuditEvent>> {
        Ok(Vec::new())
    }
}

struct FailingStateStore;

impl StateStore for FailingStateStore {
    fn load(&self) -> NudgeResult<Option<CumulativeState>> {
        Ok(None)
    }

    fn save(&self, _state: &CumulativeState) -> NudgeResult<()> {
        Err(StorageError::Io {
            path: "state".to_string(),
            message: "read-only filesystem".to_string(),
        }
        .into())
    }
}

fn config() -> NudgeConfig {
    let mut config = NudgeConfig::default();
    config.scheduler.seed = Some(7);
    config
}

fn build(
    audit: Arc<dyn AuditLog>,
    store: Arc<dyn StateStore>,
) -> NudgeOrchestrator {
    NudgeOrchestrator::new(&config(), audit, store, Box::new(FixedMetrics)).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn donation_raises_emotional_by_one_tenth_and_logs_once() {
    let audit = Arc::new(InMemoryAuditLog::new());
    let store = Arc::new(MemoryStateStore::new());
    let orch = build(audit.clone(), store.clone());

    let outcome = orch.report_event("PayPal", "Donation", "test").unwrap();

    assert_eq!(outcome.adjusted.map(|(c, _)| c), Some(NudgeCategory::Emotional));
    assert!(approx(orch.weights().get(NudgeCategory::Emotional), 1.1));
    let events = audit.read_all().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, EventType::Donation);
    assert_eq!(events[0].source, "PayPal");
    assert_eq!(events[0].details, "test");

    let state = orch.state();
    assert_eq!(state.feedback_count, 1);
    assert_eq!(store.load().unwrap(), Some(state));
}

#[test]
fn fifty_contacts_grow_visionary_without_a_ceiling() {
    let orch = build(
        Arc::new(InMemoryAuditLog::new()),
        Arc::new(MemoryStateStore::new()),
    );
    for i in 0..50 {
        orch.report_event("Microsite", EventType::Contact, &format!("hello {i}"))
            .unwrap();
    }
    let weights = orch.weights();
    assert!(weights.get(NudgeCategory::Visionary) >= 5.0);
    assert!(approx(weights.get(NudgeCategory::Visionary), 6.0));
    assert_eq!(weights.get(NudgeCategory::Emotional), 1.0);
    assert_eq!(orch.state().feedback_count, 50);
}

#[test]
fn unknown_event_type_is_logged_without_weight_change() {
    let audit = Arc::new(InMemoryAuditLog::new());
    let store = Arc::new(MemoryStateStore::new());
    let orch = build(audit.clone(), store.clone());

    let outcome = orch.report_event("Elsewhere", "Foo", "bar").unwrap();

    assert!(outcome.adjusted.is_none());
    assert_eq!(orch.weights(), WeightTable::new());
    assert_eq!(audit.count_by_type(&EventType::from("Foo")).unwrap(), 1);
    assert_eq!(orch.state().feedback_count, 0);
    assert_eq!(store.save_count(), 0);
}

#[test]
fn audit_failure_is_surfaced_and_weights_stay_put() {
    let store = Arc::new(MemoryStateStore::new());
    let orch = build(Arc::new(FailingAuditLog), store.clone());

    let err = orch.report_event("PayPal", "Donation", "test").unwrap_err();

    assert!(matches!(err, NudgeError::Storage(_)));
    assert!(!err.is_fatal());
    assert_eq!(orch.weights(), WeightTable::new());
    assert_eq!(store.save_count(), 0);
}

#[test]
fn audit_failure_aborts_cycle_without_counting_it() {
    let orch = build(Arc::new(FailingAuditLog), Arc::new(MemoryStateStore::new()));
    assert!(orch.run_cycle().is_err());
    assert_eq!(orch.state().iteration_count, 0);
    assert!(orch.recent_nudges(5).is_empty());
}

#[test]
fn persist_failure_is_surfaced_after_the_event_is_recorded() {
    let audit = Arc::new(InMemoryAuditLog::new());
    let orch = build(audit.clone(), Arc::new(FailingStateStore));

    let err = orch.report_event("PayPal", "Donation", "test").unwrap_err();

    assert!(matches!(err, NudgeError::Storage(StorageError::Io { .. })));
    assert_eq!(audit.count().unwrap(), 1);
}

#[test]
fn cycle_logs_simulation_then_nudge() {
    let audit = Arc::new(InMemoryAuditLog::new());
    let store = Arc::new(MemoryStateStore::new());
    let orch = build(audit.clone(), store.clone());

    let report = orch.run_cycle().unwrap();

    let events = audit.read_all().unwrap();
    let types: Vec<_> = events.iter().map(|e| e.event_type.clone()).collect();
    assert_eq!(types, vec![EventType::SimulationRun, EventType::NudgeDeployed]);
    assert!(events[0].details.starts_with("Cycle 1:"));
    assert!(events[0].details.contains("Prevent Ecological Collapse"));
    assert!(events[1].details.contains(report.nudge.message.as_str()));
    assert_eq!(events[1].timestamp, report.nudge.timestamp);

    assert_eq!(report.iteration, 1);
    assert_eq!(report.nudge.message, report.nudge.category.message());
    assert_eq!(report.reading.scenario, Scenario::PreventEcologicalCollapse);
    assert_eq!(report.projected_donations, report.outcome.total_above_threshold);

    let summary = &report.reading.summary;
    assert_eq!(
        summary.iter().map(|(s, _)| *s).collect::<Vec<_>>(),
        Scenario::ALL.to_vec()
    );
    assert_eq!(summary[0].1, report.reading.goal);
    for (scenario, goal) in summary {
        assert!(events[0].details.contains(&format!("{scenario}={goal}")));
    }
    assert_eq!(orch.last_reading(), Some(report.reading.clone()));

    let state = orch.state();
    assert_eq!(state.iteration_count, 1);
    assert_eq!(state.last_projected_donations, report.projected_donations);
    assert_eq!(store.load().unwrap(), Some(state));
}

#[test]
fn cycles_accumulate_projected_totals() {
    let orch = build(
        Arc::new(InMemoryAuditLog::new()),
        Arc::new(MemoryStateStore::new()),
    );
    let reports: Vec<_> = (0..4).map(|_| orch.run_cycle().unwrap()).collect();
    let sum: u64 = reports.iter().map(|r| r.projected_donations).sum();

    let state = orch.state();
    assert_eq!(state.iteration_count, 4);
    assert_eq!(state.total_projected_donations, sum);
    assert_eq!(state.last_projected_donations, reports[3].projected_donations);
    assert_eq!(
        reports.iter().map(|r| r.iteration).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
    assert!(orch.last_outcome().is_some());
}

#[test]
fn recent_nudges_are_most_recent_last_and_truncated() {
    let orch = build(
        Arc::new(InMemoryAuditLog::new()),
        Arc::new(MemoryStateStore::new()),
    );
    assert!(orch.recent_nudges(5).is_empty());

    let nudges: Vec<_> = (0..7).map(|_| orch.run_cycle().unwrap().nudge).collect();

    assert_eq!(orch.recent_nudges(5), nudges[2..].to_vec());
    assert_eq!(orch.recent_nudges_default(), nudges[2..].to_vec());
    assert_eq!(orch.recent_nudges(100), nudges);
    assert!(orch.recent_nudges(0).is_empty());
}

#[test]
fn same_seed_same_nudge_sequence() {
    let run = || {
        let orch = build(
            Arc::new(InMemoryAuditLog::new()),
            Arc::new(MemoryStateStore::new()),
        );
        (0..10)
            .map(|_| orch.run_cycle().unwrap().nudge.category)
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("audit.db");
    let state_path = dir.path().join("state.json");

    {
        let orch = build(
            Arc::new(SqliteAuditLog::open(&db, 2).unwrap()),
            Arc::new(JsonStateStore::new(&state_path)),
        );
        orch.report_event("PayPal", "Donation", "first").unwrap();
        orch.run_cycle().unwrap();
        orch.set_scenario(Scenario::MinimizeExistentialRisk).unwrap();
    }

    let audit = Arc::new(SqliteAuditLog::open(&db, 2).unwrap());
    let orch = build(audit.clone(), Arc::new(JsonStateStore::new(&state_path)));
    let state = orch.state();
    assert!(approx(state.weights.get(NudgeCategory::Emotional), 1.1));
    assert_eq!(state.feedback_count, 1);
    assert_eq!(state.iteration_count, 1);
    assert_eq!(state.scenario, Scenario::MinimizeExistentialRisk);
    assert_eq!(audit.count().unwrap(), 3);

    let report = orch.run_cycle().unwrap();
    assert_eq!(report.iteration, 2);
    assert_eq!(report.reading.scenario, Scenario::MinimizeExistentialRisk);
}

#[test]
fn restored_state_matches_file_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    let store = Arc::new(JsonStateStore::new(&state_path));
    {
        let orch = build(Arc::new(InMemoryAuditLog::new()), store.clone());
        orch.report_event("Microsite", "Contact", "hi").unwrap();
    }
    let before = std::fs::read(&state_path).unwrap();
    let orch = build(Arc::new(InMemoryAuditLog::new()), store.clone());
    store.save(&orch.state()).unwrap();
    assert_eq!(std::fs::read(&state_path).unwrap(), before);
}

#[test]
fn corrupt_state_file_refuses_to_start() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    std::fs::write(&state_path, "garbage").unwrap();

    let result = NudgeOrchestrator::new(
        &config(),
        Arc::new(InMemoryAuditLog::new()),
        Arc::new(JsonStateStore::new(&state_path)),
        Box::new(FixedMetrics),
    );
    let err = result.err().unwrap();
    assert!(err.is_fatal());
}

#[test]
fn concurrent_feedback_and_cycles_lose_nothing() {
    let audit = Arc::new(SqliteAuditLog::open_in_memory().unwrap());
    let store = Arc::new(MemoryStateStore::new());
    let orch = Arc::new(build(audit.clone(), store.clone()));

    let mut handles = Vec::new();
    for t in 0..4 {
        let orch = Arc::clone(&orch);
        handles.push(thread::spawn(move || {
            for i in 0..25 {
                orch.report_event("PayPal", "Donation", &format!("{t}-{i}"))
                    .unwrap();
            }
        }));
    }
    {
        let orch = Arc::clone(&orch);
        handles.push(thread::spawn(move || {
            for _ in 0..10 {
                orch.run_cycle().unwrap();
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    let state = orch.state();
    assert!(approx(state.weights.get(NudgeCategory::Emotional), 11.0));
    assert_eq!(state.feedback_count, 100);
    assert_eq!(state.iteration_count, 10);
    assert_eq!(audit.count_by_type(&EventType::Donation).unwrap(), 100);
    assert_eq!(audit.count_by_type(&EventType::SimulationRun).unwrap(), 10);
    assert_eq!(audit.count_by_type(&EventType::NudgeDeployed).unwrap(), 10);
    // The newest revision is always the one left on disk.
    assert_eq!(store.load().unwrap(), Some(state));
}
