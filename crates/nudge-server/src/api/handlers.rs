//! Route handlers. Orchestrator calls touch SQLite and the state file, so
//! they run on the blocking pool.

use axum::extract::{Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use nudge_core::constants::VERSION;
use nudge_core::errors::NudgeResult;
use nudge_core::models::{CumulativeState, EventType, Nudge, ScenarioReading, SimulationOutcome};

use super::error::ApiError;
use super::AppState;

#[derive(Debug, Deserialize)]
pub struct DonationPayload {
    pub amount: f64,
    pub donor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContactPayload {
    pub name: Option<String>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventPayload {
    pub source: String,
    pub event_type: String,
    pub details: String,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggedResponse {
    pub status: String,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub state: CumulativeState,
    pub last_outcome: Option<SimulationOutcome>,
    pub last_reading: Option<ScenarioReading>,
}

pub async fn index() -> String {
    format!("Nudge scheduler {VERSION} is running")
}

/// `POST /webhook/donation`
pub async fn donation(
    State(state): State<AppState>,
    Json(payload): Json<DonationPayload>,
) -> Result<Json<LoggedResponse>, ApiError> {
    let donor = payload.donor.unwrap_or_else(|| "Anonymous".to_string());
    let details = format!("Live donation of ${} from {donor}", payload.amount);
    record(state, "PayPal", EventType::Donation, details).await
}

/// `POST /webhook/contact`
pub async fn contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactPayload>,
) -> Result<Json<LoggedResponse>, ApiError> {
    let name = payload.name.unwrap_or_else(|| "Unknown".to_string());
    let details = format!("Message from {name}: {}", payload.message);
    record(state, "Microsite", EventType::Contact, details).await
}

/// `POST /events`
pub async fn report_event(
    State(state): State<AppState>,
    Json(payload): Json<EventPayload>,
) -> Result<Json<LoggedResponse>, ApiError> {
    let event_type = EventType::from(payload.event_type);
    record(state, &payload.source, event_type, payload.details).await
}

/// `GET /nudges/recent?limit=N`
pub async fn recent_nudges(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Json<Vec<Nudge>> {
    let nudges = match query.limit {
        Some(limit) => state.orchestrator.recent_nudges(limit),
        None => state.orchestrator.recent_nudges_default(),
    };
    Json(nudges)
}

/// `GET /state`
pub async fn state(State(state): State<AppState>) -> Json<StateResponse> {
    Json(StateResponse {
        state: state.orchestrator.state(),
        last_outcome: state.orchestrator.last_outcome(),
        last_reading: state.orchestrator.last_reading(),
    })
}

async fn record(
    state: AppState,
    source: &str,
    event_type: EventType,
    details: String,
) -> Result<Json<LoggedResponse>, ApiError> {
    let source = source.to_string();
    let orchestrator = state.orchestrator;
    let outcome = blocking(move || orchestrator.report_event(&source, event_type, &details)).await?;
    Ok(Json(LoggedResponse {
        status: "logged".to_string(),
        detail: outcome.event.details,
    }))
}

async fn blocking<F, T>(f: F) -> NudgeResult<T>
where
    F: FnOnce() -> NudgeResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(join) => std::panic::resume_unwind(join.into_panic()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use nudge_core::models::NudgeCategory;
    use nudge_core::traits::AuditLog;
    use nudge_core::NudgeConfig;
    use nudge_engine::NudgeOrchestrator;
    use nudge_storage::{InMemoryAuditLog, MemoryStateStore};

    use super::*;

    fn app_state() -> (AppState, Arc<InMemoryAuditLog>) {
        let audit = Arc::new(InMemoryAuditLog::new());
        let orchestrator = NudgeOrchestrator::from_config(
            &NudgeConfig::default(),
            audit.clone(),
            Arc::new(MemoryStateStore::new()),
        )
        .unwrap();
        (AppState::new(Arc::new(orchestrator)), audit)
    }

    #[tokio::test]
    async fn donation_defaults_to_anonymous() {
        let (state, audit) = app_state();
        let Json(body) = donation(
            State(state.clone()),
            Json(DonationPayload {
                amount: 25.0,
                donor: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(body.status, "logged");
        assert_eq!(body.detail, "Live donation of $25 from Anonymous");
        let events = audit.read_all().unwrap();
        assert_eq!(events[0].source, "PayPal");
        assert_eq!(events[0].event_type, EventType::Donation);
        let emotional = state.orchestrator.weights().get(NudgeCategory::Emotional);
        assert!((emotional - 1.1).abs() < 1e-9);
    }

    #[tokio::test]
    async fn contact_formats_message() {
        let (state, audit) = app_state();
        let Json(body) = contact(
            State(state),
            Json(ContactPayload {
                name: Some("Ada".to_string()),
                message: "Tell me more".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(body.detail, "Message from Ada: Tell me more");
        assert_eq!(audit.read_all().unwrap()[0].source, "Microsite");
    }

    #[tokio::test]
    async fn generic_event_with_unknown_type_leaves_weights() {
        let (state, audit) = app_state();
        report_event(
            State(state.clone()),
            Json(EventPayload {
                source: "Partner".to_string(),
                event_type: "Foo".to_string(),
                details: "bar".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(audit.count().unwrap(), 1);
        assert_eq!(
            state.orchestrator.weights(),
            nudge_core::models::WeightTable::new()
        );
    }

    #[tokio::test]
    async fn recent_nudges_honours_limit() {
        let (state, _) = app_state();
        for _ in 0..3 {
            state.orchestrator.run_cycle().unwrap();
        }
        let Json(all) = recent_nudges(State(state.clone()), Query(RecentQuery { limit: None })).await;
        assert_eq!(all.len(), 3);
        let Json(one) = recent_nudges(State(state), Query(RecentQuery { limit: Some(1) })).await;
        assert_eq!(one, all[2..].to_vec());
    }

    #[test]
    fn storage_errors_map_to_service_unavailable() {
        let err = ApiError(
            nudge_core::errors::StorageError::SqliteError {
                message: "locked".to_string(),
            }
            .into(),
        );
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
