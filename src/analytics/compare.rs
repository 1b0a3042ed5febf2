//! Pairwise player comparison across the five core metrics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    ComparisonResult, ComparisonWinner, CoreMetric, MetricComparison, MetricSnapshot, Significance,
};

/// Tolerance and significance bands for metric comparison, relative to
/// player1's value.
///
/// The tolerance anchor on player1 is asymmetric: swapping the players can
/// flip a near-tie. Preserved from the observed behavior of the upstream
/// comparison code; see the comparator tests pinning the asymmetry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComparisonThresholds {
    /// Tie band: |difference| < tie * value1.
    #[serde(default = "default_tie")]
    pub tie: f64,

    /// Moderate significance: |difference| > moderate * value1.
    #[serde(default = "default_moderate")]
    pub moderate: f64,

    /// Major significance: |difference| > major * value1.
    #[serde(default = "default_major")]
    pub major: f64,
}

fn default_tie() -> f64 {
    0.05
}

fn default_moderate() -> f64 {
    0.10
}

fn default_major() -> f64 {
    0.20
}

impl Default for ComparisonThresholds {
    fn default() -> Self {
        Self {
            tie: default_tie(),
            moderate: default_moderate(),
            major: default_major(),
        }
    }
}

/// Compare one metric between two players.
pub fn compare_metric(
    metric: CoreMetric,
    value1: f64,
    value2: f64,
    thresholds: &ComparisonThresholds,
) -> MetricComparison {
    let difference = value1 - value2;
    let abs_diff = difference.abs();

    let winner = if abs_diff < thresholds.tie * value1 || difference == 0.0 {
        ComparisonWinner::Tie
    } else if difference > 0.0 {
        ComparisonWinner::Player1
    } else {
        ComparisonWinner::Player2
    };

    let significance = if abs_diff > thresholds.major * value1 {
        Significance::Major
    } else if abs_diff > thresholds.moderate * value1 {
        Significance::Moderate
    } else {
        Significance::Minor
    };

    MetricComparison {
        metric,
        value1,
        value2,
        winner,
        difference,
        significance,
    }
}

/// Compare two players' aggregate snapshots across all core metrics.
///
/// The overall winner takes a strict majority of the five per-metric wins;
/// the margin is the win difference as a percentage of the metric count.
/// Equal win counts are an overall tie with zero margin.
pub fn compare_players(
    snapshot1: &MetricSnapshot,
    snapshot2: &MetricSnapshot,
    thresholds: &ComparisonThresholds,
) -> ComparisonResult {
    let mut metrics = BTreeMap::new();
    let mut wins1 = 0usize;
    let mut wins2 = 0usize;

    for metric in CoreMetric::ALL {
        let comparison = compare_metric(
            metric,
            snapshot1.metric_value(metric),
            snapshot2.metric_value(metric),
            thresholds,
        );
        match comparison.winner {
            ComparisonWinner::Player1 => wins1 += 1,
            ComparisonWinner::Player2 => wins2 += 1,
            ComparisonWinner::Tie => {}
        }
        metrics.insert(metric.label().to_string(), comparison);
    }

    let metric_count = CoreMetric::ALL.len() as f64;
    let (overall_winner, winner_margin) = if wins1 > wins2 {
        (
            ComparisonWinner::Player1,
            (wins1 - wins2) as f64 / metric_count * 100.0,
        )
    } else if wins2 > wins1 {
        (
            ComparisonWinner::Player2,
            (wins2 - wins1) as f64 / metric_count * 100.0,
        )
    } else {
        (ComparisonWinner::Tie, 0.0)
    };

    debug!(wins1, wins2, winner = %overall_winner, "player comparison complete");

    ComparisonResult {
        metrics,
        overall_winner,
        winner_margin,
    }
}
