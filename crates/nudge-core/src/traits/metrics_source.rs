use crate::models::MetricsSample;

/// Pluggable source of the decorative metrics fed to scenario evaluation.
pub trait MetricsSource: Send + Sync {
    fn sample(&self) -> MetricsSample;
}
