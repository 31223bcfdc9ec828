use serde::{Deserialize, Serialize};

/// One reading from a [`crate::traits::MetricsSource`]. Decorative input to
/// scenario goal evaluation; carries no signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSample {
    pub entanglement_density: f64,
    pub phase_alignment: f64,
    pub information_flow: [i64; 2],
}

impl MetricsSample {
    /// Absolute difference between the two flow channels.
    pub fn flow_divergence(&self) -> i64 {
        (self.information_flow[0] - self.information_flow[1]).abs()
    }
}
