//! HTTP webhook listener.
//!
//! Routes:
//! - `GET  /`                 liveness text
//! - `POST /webhook/donation` `{amount, donor?}`
//! - `POST /webhook/contact`  `{name?, message}`
//! - `POST /events`           `{source, event_type, details}`
//! - `GET  /nudges/recent`    `?limit=N`
//! - `GET  /state`

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use nudge_engine::NudgeOrchestrator;

/// Shared handler state. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<NudgeOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<NudgeOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/webhook/donation", post(handlers::donation))
        .route("/webhook/contact", post(handlers::contact))
        .route("/events", post(handlers::report_event))
        .route("/nudges/recent", get(handlers::recent_nudges))
        .route("/state", get(handlers::state))
        .with_state(state)
}
