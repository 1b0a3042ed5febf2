//! Player-vs-player comparison value objects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{CoreMetric, Significance};

/// Which side a metric comparison favors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonWinner {
    Player1,
    Player2,
    Tie,
}

impl std::fmt::Display for ComparisonWinner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonWinner::Player1 => write!(f, "player1"),
            ComparisonWinner::Player2 => write!(f, "player2"),
            ComparisonWinner::Tie => write!(f, "tie"),
        }
    }
}

/// Comparison of a single metric between two players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub metric: CoreMetric,
    pub value1: f64,
    pub value2: f64,
    pub winner: ComparisonWinner,
    pub difference: f64,
    pub significance: Significance,
}

/// Full pairwise comparison across the five core metrics. Built once per
/// request; immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Keyed by metric label for stable serialized ordering.
    pub metrics: BTreeMap<String, MetricComparison>,
    pub overall_winner: ComparisonWinner,
    /// Winning margin as a percentage of the metric count (0 to 100).
    pub winner_margin: f64,
}

impl ComparisonResult {
    /// Look up the comparison for one core metric.
    pub fn metric(&self, metric: CoreMetric) -> Option<&MetricComparison> {
        self.metrics.get(metric.label())
    }

    /// Metrics won by a given side.
    pub fn wins_for(&self, side: ComparisonWinner) -> usize {
        self.metrics.values().filter(|m| m.winner == side).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winner_serialization() {
        assert_eq!(
            serde_json::to_string(&ComparisonWinner::Player1).unwrap(),
            "\"player1\""
        );
        assert_eq!(
            serde_json::to_string(&ComparisonWinner::Tie).unwrap(),
            "\"tie\""
        );
    }

    #[test]
    fn test_wins_for() {
        let mut metrics = BTreeMap::new();
        metrics.insert(
            CoreMetric::Kda.label().to_string(),
            MetricComparison {
                metric: CoreMetric::Kda,
                value1: 3.0,
                value2: 2.0,
                winner: ComparisonWinner::Player1,
                difference: 1.0,
                significance: Significance::Major,
            },
        );
        let result = ComparisonResult {
            metrics,
            overall_winner: ComparisonWinner::Player1,
            winner_margin: 20.0,
        };

        assert_eq!(result.wins_for(ComparisonWinner::Player1), 1);
        assert_eq!(result.wins_for(ComparisonWinner::Player2), 0);
    }
}
