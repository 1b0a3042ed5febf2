//! Trend detection: early-half vs late-half metric movement.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    CoreMetric, MetricSnapshot, RawMatch, Significance, TrendDirection, TrendReport, TrendResult,
    TrendStrength,
};

use super::metrics::snapshot_for_player;
use super::window::{window_matches, TimeWindow};
use super::AnalyticsError;

/// Relative-change thresholds for direction and significance classification.
/// Passed explicitly so tests can pin them; defaults are the canonical 5%,
/// 10% and 15% bands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrendThresholds {
    /// Direction band: |change| <= direction * early is "stable".
    #[serde(default = "default_direction")]
    pub direction: f64,

    /// Moderate significance: |change| > moderate * early.
    #[serde(default = "default_moderate")]
    pub moderate: f64,

    /// Major significance: |change| > major * early.
    #[serde(default = "default_major")]
    pub major: f64,
}

fn default_direction() -> f64 {
    0.05
}

fn default_moderate() -> f64 {
    0.10
}

fn default_major() -> f64 {
    0.15
}

impl Default for TrendThresholds {
    fn default() -> Self {
        Self {
            direction: default_direction(),
            moderate: default_moderate(),
            major: default_major(),
        }
    }
}

/// Classify the movement of a single metric between two period values.
pub fn metric_trend(
    metric: CoreMetric,
    early: f64,
    late: f64,
    thresholds: &TrendThresholds,
) -> TrendResult {
    let change = late - early;
    let percent_change = if early != 0.0 {
        change / early * 100.0
    } else {
        0.0
    };

    let direction = if change > thresholds.direction * early {
        TrendDirection::Up
    } else if change < -thresholds.direction * early {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };

    let abs_change = change.abs();
    let significance = if abs_change > thresholds.major * early {
        Significance::Major
    } else if abs_change > thresholds.moderate * early {
        Significance::Moderate
    } else {
        Significance::Minor
    };

    TrendResult {
        metric,
        start_value: early,
        end_value: late,
        change,
        percent_change,
        direction,
        significance,
    }
}

/// Majority vote over the five core metric directions.
///
/// Four or more "up" is strongly positive, three is positive, and the same
/// symmetrically for "down"; anything else is stable. This exact vote is the
/// canonical aggregate-trend algorithm.
pub fn trend_strength(results: &[&TrendResult]) -> TrendStrength {
    let mut positive = 0usize;
    let mut negative = 0usize;

    for result in results {
        match result.direction {
            TrendDirection::Up => positive += 1,
            TrendDirection::Down => negative += 1,
            TrendDirection::Stable => {}
        }
    }

    if positive >= 4 {
        TrendStrength::StrongPositive
    } else if positive >= 3 {
        TrendStrength::Positive
    } else if negative >= 4 {
        TrendStrength::StrongNegative
    } else if negative >= 3 {
        TrendStrength::Negative
    } else {
        TrendStrength::Stable
    }
}

/// Compare early-half and late-half snapshots across all core metrics.
pub fn detect_trends(
    early: &MetricSnapshot,
    late: &MetricSnapshot,
    thresholds: &TrendThresholds,
) -> (BTreeMap<String, TrendResult>, TrendStrength) {
    let mut metrics = BTreeMap::new();
    for metric in CoreMetric::ALL {
        let result = metric_trend(
            metric,
            early.metric_value(metric),
            late.metric_value(metric),
            thresholds,
        );
        metrics.insert(metric.label().to_string(), result);
    }

    let refs: Vec<&TrendResult> = metrics.values().collect();
    let strength = trend_strength(&refs);
    (metrics, strength)
}

/// Full trend analysis for one player over one lookback window.
///
/// Windows the matches, computes a snapshot per half, then classifies each
/// core metric. Either half producing no records for the player surfaces as
/// `InsufficientSample`.
pub fn analyze_trend(
    matches: &[RawMatch],
    puuid: &str,
    window: TimeWindow,
    now: DateTime<Utc>,
    thresholds: &TrendThresholds,
) -> Result<TrendReport, AnalyticsError> {
    let windowed = window_matches(matches, window, now)?;
    let games_played = windowed.games_played() as u32;

    let early = snapshot_for_player(windowed.early.iter().copied(), puuid)?;
    let late = snapshot_for_player(windowed.late.iter().copied(), puuid)?;

    let (metrics, strength) = detect_trends(&early, &late, thresholds);

    debug!(
        player = %puuid,
        window = %window,
        games = games_played,
        strength = %strength,
        "trend analysis complete"
    );

    Ok(TrendReport {
        window_start: windowed.start,
        window_end: windowed.end,
        games_played,
        metrics,
        strength,
    })
}
