//! Reference [`MetricsSource`]: uniform random readings.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nudge_core::models::MetricsSample;
use nudge_core::traits::MetricsSource;

use crate::sync::lock;

pub struct UniformMetricsSource {
    rng: Mutex<StdRng>,
}

impl UniformMetricsSource {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl MetricsSource for UniformMetricsSource {
    /// Density and phase in [0.4, 0.6] at four decimals; flows in [450, 550].
    fn sample(&self) -> MetricsSample {
        let mut rng = lock(&self.rng);
        MetricsSample {
            entanglement_density: round4(rng.gen_range(0.4..=0.6)),
            phase_alignment: round4(rng.gen_range(0.4..=0.6)),
            information_flow: [rng.gen_range(450..=550), rng.gen_range(450..=550)],
        }
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
