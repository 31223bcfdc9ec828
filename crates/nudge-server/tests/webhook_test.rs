use std::sync::Arc;

use serde_json::json;
use tokio::net::TcpListener;

use nudge_core::errors::{InvariantViolation, NudgeResult};
use nudge_core::models::{AuditEvent, EventType, NudgeCategory};
use nudge_core::traits::AuditLog;
use nudge_core::{CancellationToken, NudgeConfig};
use nudge_engine::NudgeOrchestrator;
use nudge_storage::MemoryStateStore;
use nudge_server::api::{self, AppState};
use nudge_server::App;

fn config_in(dir: &std::path::Path) -> NudgeConfig {
    let mut config = NudgeConfig::default();
    config.storage.audit_db_path = dir.join("audit.db").display().to_string();
    config.storage.state_path = dir.join("state.json").display().to_string();
    config.scheduler.seed = Some(3);
    config
}

struct TestServer {
    base: String,
    client: reqwest::Client,
    cancel: CancellationToken,
}

impl TestServer {
    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.base))
            .send()
            .await
            .unwrap()
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.base))
            .json(&body)
            .send()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn spawn_server(app: &App) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    let router = api::router(AppState::new(Arc::clone(&app.orchestrator)));
    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .unwrap();
    });
    TestServer {
        base: format!("http://{addr}"),
        client: reqwest::Client::new(),
        cancel,
    }
}

#[tokio::test]
async fn webhooks_log_events_and_adjust_weights() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::open(config_in(dir.path())).unwrap();
    let server = spawn_server(&app).await;

    let res = server.get("/").await;
    assert_eq!(res.status(), 200);
    assert!(res.text().await.unwrap().contains("running"));

    let res = server
        .post("/webhook/donation", json!({"amount": 50, "donor": "Grace"}))
        .await;
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "logged");
    assert_eq!(body["detail"], "Live donation of $50 from Grace");

    let res = server.post("/webhook/contact", json!({"message": "hello"})).await;
    assert_eq!(res.status(), 200);

    let res = server
        .post(
            "/events",
            json!({"source": "Partner", "event_type": "Foo", "details": "bar"}),
        )
        .await;
    assert_eq!(res.status(), 200);

    let res = server.get("/state").await;
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["state"]["feedback_count"], 2);
    assert!(body["last_reading"].is_null());

    let weights = app.orchestrator.weights();
    assert!((weights.get(NudgeCategory::Emotional) - 1.1).abs() < 1e-9);
    assert!((weights.get(NudgeCategory::Visionary) - 1.1).abs() < 1e-9);

    let audit = app.orchestrator.audit();
    let events = audit.read_all().unwrap();
    let types: Vec<_> = events.iter().map(|e| e.event_type.clone()).collect();
    assert_eq!(
        types,
        vec![EventType::Donation, EventType::Contact, EventType::from("Foo")]
    );
    assert_eq!(events[1].details, "Message from Unknown: hello");
}

#[tokio::test]
async fn malformed_payload_is_rejected_without_logging() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::open(config_in(dir.path())).unwrap();
    let server = spawn_server(&app).await;

    let res = server
        .post("/webhook/donation", json!({"donor": "NoAmount"}))
        .await;
    assert!(res.status().is_client_error());
    assert_eq!(app.orchestrator.audit().count().unwrap(), 0);
}

#[tokio::test]
async fn recent_nudges_and_state_reflect_latest_cycles() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::open(config_in(dir.path())).unwrap();
    for _ in 0..4 {
        app.orchestrator.run_cycle().unwrap();
    }
    let server = spawn_server(&app).await;

    let res = server.get("/nudges/recent?limit=2").await;
    assert_eq!(res.status(), 200);
    let nudges: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(nudges.len(), 2);
    let expected = app.orchestrator.recent_nudges(2);
    assert_eq!(nudges[1]["message"], expected[1].message.as_str());

    let body: serde_json::Value = server.get("/state").await.json().await.unwrap();
    assert_eq!(body["state"]["iteration_count"], 4);
    let summary = body["last_reading"]["summary"].as_array().unwrap();
    assert_eq!(summary.len(), 4);
    assert_eq!(summary[0][0], "Prevent Ecological Collapse");
}

#[test]
fn state_persists_between_app_instances() {
    let dir = tempfile::tempdir().unwrap();
    {
        let app = App::open(config_in(dir.path())).unwrap();
        app.orchestrator
            .report_event("PayPal", EventType::Donation, "cli")
            .unwrap();
    }
    let app = App::open(config_in(dir.path())).unwrap();
    assert_eq!(app.orchestrator.state().feedback_count, 1);
    assert_eq!(app.orchestrator.audit().count().unwrap(), 1);
}

#[test]
fn corrupt_state_file_stops_startup() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    std::fs::write(&config.storage.state_path, "{\"schema_version\": 1}").unwrap();
    let err = App::open(config).err().unwrap();
    assert!(err.is_fatal());
}

struct PoisonedLog;

impl AuditLog for PoisonedLog {
    fn append(&self, _event: &AuditEvent) -> NudgeResult<()> {
        Err(InvariantViolation::EmptyWeightTable.into())
    }

    fn read_all(&self) -> NudgeResult<Vec<AuditEvent>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn fatal_cycle_error_cancels_the_listener() {
    let config = NudgeConfig::default();
    let orchestrator = NudgeOrchestrator::from_config(
        &config,
        Arc::new(PoisonedLog),
        Arc::new(MemoryStateStore::new()),
    )
    .unwrap();
    let app = App {
        config,
        orchestrator: Arc::new(orchestrator),
    };
    let cancel = CancellationToken::new();

    let err = app
        .spawn_cycle_loop(cancel.clone())
        .await
        .unwrap()
        .unwrap_err();

    assert!(err.is_fatal());
    assert!(cancel.is_cancelled());
}
