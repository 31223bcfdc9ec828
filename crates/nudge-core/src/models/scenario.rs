//! Scenario goal evaluation: a closed set of scenarios, each mapped to a
//! goal function and an adaptive tuning threshold.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::MetricsSample;
use crate::errors::ConfigError;

/// The scenario the scheduler is currently framed around.
///
/// Parsed from its display name at config/state load time; unknown names
/// are rejected there instead of at evaluation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Scenario {
    #[default]
    PreventEcologicalCollapse,
    StabilizeGlobalMarkets,
    EnhanceCognitiveEvolution,
    MinimizeExistentialRisk,
}

/// Goal-function output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Stable,
    EcologicalInstability,
    MarketImbalance,
    Progressing,
    Lagging,
    Safe,
    ThreatElevated,
}

/// Adaptive tuning output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TuningStatus {
    Aligned,
    Misaligned,
    WithinMarketTolerance,
    HighMarketDivergence,
}

/// Result of evaluating one metrics sample against a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReading {
    pub scenario: Scenario,
    pub sample: MetricsSample,
    pub goal: GoalStatus,
    pub tuning: TuningStatus,
    /// Every scenario's goal status on the same sample.
    pub summary: Vec<(Scenario, GoalStatus)>,
}

type GoalFn = fn(&MetricsSample) -> GoalStatus;

struct ScenarioEntry {
    name: &'static str,
    goal: GoalFn,
    tuning_threshold: f64,
}

/// Dispatch table, indexed by `Scenario as usize`.
const SCENARIO_TABLE: [ScenarioEntry; 4] = [
    ScenarioEntry {
        name: "Prevent Ecological Collapse",
        goal: ecological_collapse,
        tuning_threshold: 0.55,
    },
    ScenarioEntry {
        name: "Stabilize Global Markets",
        goal: market_stability,
        tuning_threshold: 15.0,
    },
    ScenarioEntry {
        name: "Enhance Cognitive Evolution",
        goal: cognitive_evolution,
        tuning_threshold: 0.52,
    },
    ScenarioEntry {
        name: "Minimize Existential Risk",
        goal: existential_risk,
        tuning_threshold: 0.48,
    },
];

fn ecological_collapse(m: &MetricsSample) -> GoalStatus {
    if m.entanglement_density < 0.5 && m.phase_alignment > 0.6 {
        GoalStatus::Stable
    } else {
        GoalStatus::EcologicalInstability
    }
}

fn market_stability(m: &MetricsSample) -> GoalStatus {
    if m.flow_divergence() < 10 {
        GoalStatus::Stable
    } else {
        GoalStatus::MarketImbalance
    }
}

fn cognitive_evolution(m: &MetricsSample) -> GoalStatus {
    if m.entanglement_density > 0.55 && m.phase_alignment > 0.55 {
        GoalStatus::Progressing
    } else {
        GoalStatus::Lagging
    }
}

fn existential_risk(m: &MetricsSample) -> GoalStatus {
    if m.entanglement_density > 0.45 && m.phase_alignment > 0.45 {
        GoalStatus::Safe
    } else {
        GoalStatus::ThreatElevated
    }
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::PreventEcologicalCollapse,
        Scenario::StabilizeGlobalMarkets,
        Scenario::EnhanceCognitiveEvolution,
        Scenario::MinimizeExistentialRisk,
    ];

    fn entry(self) -> &'static ScenarioEntry {
        &SCENARIO_TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|s| s.name() == name.trim())
            .ok_or_else(|| ConfigError::UnknownScenario {
                name: name.to_string(),
            })
    }

    pub fn tuning_threshold(self) -> f64 {
        self.entry().tuning_threshold
    }

    /// Run this scenario's goal function.
    pub fn evaluate(self, sample: &MetricsSample) -> GoalStatus {
        (self.entry().goal)(sample)
    }

    /// Markets compare flow divergence against the threshold; every other
    /// scenario compares entanglement density.
    pub fn tune(self, sample: &MetricsSample) -> TuningStatus {
        let threshold = self.tuning_threshold();
        match self {
            Self::StabilizeGlobalMarkets => {
                if (sample.flow_divergence() as f64) < threshold {
                    TuningStatus::WithinMarketTolerance
                } else {
                    TuningStatus::HighMarketDivergence
                }
            }
            _ => {
                if sample.entanglement_density > threshold {
                    TuningStatus::Aligned
                } else {
                    TuningStatus::Misaligned
                }
            }
        }
    }

    pub fn read(self, sample: MetricsSample) -> ScenarioReading {
        ScenarioReading {
            scenario: self,
            goal: self.evaluate(&sample),
            tuning: self.tune(&sample),
            summary: Self::multi_goal_summary(&sample),
            sample,
        }
    }

    /// Evaluate every scenario's goal function against one sample.
    pub fn multi_goal_summary(sample: &MetricsSample) -> Vec<(Scenario, GoalStatus)> {
        Self::ALL.into_iter().map(|s| (s, s.evaluate(sample))).collect()
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for Scenario {
    type Error = ConfigError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::from_name(&name)
    }
}

impl From<Scenario> for String {
    fn from(s: Scenario) -> Self {
        s.name().to_string()
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stable => "Stable",
            Self::EcologicalInstability => "Warning: Ecological instability",
            Self::MarketImbalance => "Market imbalance detected",
            Self::Progressing => "Progressing",
            Self::Lagging => "Lagging",
            Self::Safe => "Safe",
            Self::ThreatElevated => "Threat Level Elevated",
        })
    }
}

impl fmt::Display for TuningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Aligned => "Aligned",
            Self::Misaligned => "Misaligned",
            Self::WithinMarketTolerance => "Within Market Tolerance",
            Self::HighMarketDivergence => "High Market Divergence",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(density: f64, phase: f64, flow: [i64; 2]) -> MetricsSample {
        MetricsSample {
            entanglement_density: density,
            phase_alignment: phase,
            information_flow: flow,
        }
    }

    #[test]
    fn table_order_matches_enum_order() {
        for scenario in Scenario::ALL {
            assert_eq!(Scenario::from_name(scenario.name()).unwrap(), scenario);
        }
    }

    #[test]
    fn unknown_scenario_is_config_error() {
        let err = Scenario::from_name("Colonize Mars").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownScenario { .. }));
    }

    #[test]
    fn ecological_goal() {
        let s = Scenario::PreventEcologicalCollapse;
        assert_eq!(s.evaluate(&sample(0.45, 0.65, [500, 500])), GoalStatus::Stable);
        assert_eq!(
            s.evaluate(&sample(0.55, 0.65, [500, 500])),
            GoalStatus::EcologicalInstability
        );
    }

    #[test]
    fn market_goal_and_tuning_use_flow_divergence() {
        let s = Scenario::StabilizeGlobalMarkets;
        let close = sample(0.5, 0.5, [500, 505]);
        let far = sample(0.5, 0.5, [450, 540]);
        assert_eq!(s.evaluate(&close), GoalStatus::Stable);
        assert_eq!(s.evaluate(&far), GoalStatus::MarketImbalance);
        assert_eq!(s.tune(&close), TuningStatus::WithinMarketTolerance);
        assert_eq!(s.tune(&far), TuningStatus::HighMarketDivergence);
    }

    #[test]
    fn density_tuning_for_non_market_scenarios() {
        let m = sample(0.53, 0.5, [500, 500]);
        assert_eq!(Scenario::EnhanceCognitiveEvolution.tune(&m), TuningStatus::Aligned);
        assert_eq!(Scenario::PreventEcologicalCollapse.tune(&m), TuningStatus::Misaligned);
    }

    #[test]
    fn multi_goal_summary_covers_every_scenario() {
        let summary = Scenario::multi_goal_summary(&sample(0.5, 0.5, [500, 500]));
        assert_eq!(summary.len(), 4);
        assert_eq!(summary[3], (Scenario::MinimizeExistentialRisk, GoalStatus::Safe));
    }

    #[test]
    fn reading_carries_summary_for_the_same_sample() {
        let m = sample(0.45, 0.65, [450, 540]);
        let reading = Scenario::StabilizeGlobalMarkets.read(m);
        assert_eq!(reading.goal, GoalStatus::MarketImbalance);
        assert_eq!(reading.summary, Scenario::multi_goal_summary(&m));
        assert_eq!(
            reading.summary[0],
            (Scenario::PreventEcologicalCollapse, GoalStatus::Stable)
        );
    }

    #[test]
    fn serializes_as_display_name() {
        let json = serde_json::to_string(&Scenario::StabilizeGlobalMarkets).unwrap();
        assert_eq!(json, "\"Stabilize Global Markets\"");
        assert!(serde_json::from_str::<Scenario>("\"Nope\"").is_err());
    }
}
