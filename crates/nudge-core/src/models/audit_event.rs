use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An entry in the append-only audit log. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    /// Free-text origin identifier ("PayPal", "Microsite", "NudgeScheduler", ...).
    pub source: String,
    pub event_type: EventType,
    pub details: String,
}

impl AuditEvent {
    /// Build an event stamped with the current wall-clock time.
    pub fn now(
        source: impl Into<String>,
        event_type: impl Into<EventType>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            source: source.into(),
            event_type: event_type.into(),
            details: details.into(),
        }
    }
}

/// Event type. Free text on the wire; the known variants are the ones the
/// scheduler itself emits or reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Donation,
    Contact,
    WebhookError,
    SimulationRun,
    NudgeDeployed,
    GoalMet,
    Terminated,
    Other(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Donation => "Donation",
            Self::Contact => "Contact",
            Self::WebhookError => "WebhookError",
            Self::SimulationRun => "SimulationRun",
            Self::NudgeDeployed => "NudgeDeployed",
            Self::GoalMet => "GoalMet",
            Self::Terminated => "Terminated",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s {
            "Donation" => Self::Donation,
            "Contact" => Self::Contact,
            "WebhookError" => Self::WebhookError,
            "SimulationRun" => Self::SimulationRun,
            "NudgeDeployed" => Self::NudgeDeployed,
            "GoalMet" => Self::GoalMet,
            "Terminated" => Self::Terminated,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<EventType> for String {
    fn from(t: EventType) -> Self {
        match t {
            EventType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
