//! Span definitions per operation: cycle, feedback, persistence.

/// Create a cycle span.
#[macro_export]
macro_rules! cycle_span {
    ($iteration:expr) => {
        tracing::info_span!("nudge.cycle", iteration = $iteration)
    };
}

/// Create a feedback span.
#[macro_export]
macro_rules! feedback_span {
    ($source:expr, $event_type:expr) => {
        tracing::info_span!("nudge.feedback", source = %$source, event_type = %$event_type)
    };
}

/// Create a persistence span.
#[macro_export]
macro_rules! persist_span {
    ($revision:expr) => {
        tracing::debug_span!("nudge.persist", revision = $revision)
    };
}

