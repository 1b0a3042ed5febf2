//! Trend analysis value objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::CoreMetric;

/// Direction a metric moved between the early and late halves of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "up"),
            TrendDirection::Down => write!(f, "down"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

/// How large a change is relative to its starting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Significance {
    Minor,
    Moderate,
    Major,
}

impl std::fmt::Display for Significance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Significance::Minor => write!(f, "minor"),
            Significance::Moderate => write!(f, "moderate"),
            Significance::Major => write!(f, "major"),
        }
    }
}

/// Per-metric trend between the early and late halves of a time window.
/// Derived deterministically from two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub metric: CoreMetric,
    pub start_value: f64,
    pub end_value: f64,
    pub change: f64,
    pub percent_change: f64,
    pub direction: TrendDirection,
    pub significance: Significance,
}

/// Aggregate trend strength across the five core metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStrength {
    StrongPositive,
    Positive,
    Stable,
    Negative,
    StrongNegative,
}

impl std::fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TrendStrength::StrongPositive => "strong_positive",
            TrendStrength::Positive => "positive",
            TrendStrength::Stable => "stable",
            TrendStrength::Negative => "negative",
            TrendStrength::StrongNegative => "strong_negative",
        };
        write!(f, "{}", s)
    }
}

/// Full trend report for one player over one time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub games_played: u32,
    /// Keyed by metric for stable ordering in serialized output.
    pub metrics: BTreeMap<String, TrendResult>,
    pub strength: TrendStrength,
}

impl TrendReport {
    /// Look up the trend for one core metric.
    pub fn metric(&self, metric: CoreMetric) -> Option<&TrendResult> {
        self.metrics.get(metric.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        assert_eq!(
            serde_json::to_string(&TrendDirection::Up).unwrap(),
            "\"up\""
        );
        assert_eq!(
            serde_json::to_string(&TrendDirection::Stable).unwrap(),
            "\"stable\""
        );
    }

    #[test]
    fn test_strength_serialization() {
        assert_eq!(
            serde_json::to_string(&TrendStrength::StrongPositive).unwrap(),
            "\"strong_positive\""
        );
    }

    #[test]
    fn test_significance_ordering() {
        assert!(Significance::Major > Significance::Moderate);
        assert!(Significance::Moderate > Significance::Minor);
    }
}
