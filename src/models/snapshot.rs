//! Aggregate metric snapshots.

use serde::{Deserialize, Serialize};

/// Aggregate metrics over a set of match records. Value object: computed
/// once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// (total kills + total assists) / max(total deaths, 1).
    pub average_kda: f64,

    /// Total creep score over total in-game minutes.
    pub cs_per_minute: f64,

    /// Total gold earned over total in-game minutes.
    pub gold_per_minute: f64,

    /// Mean share of team damage to champions (0.0 to 1.0).
    pub damage_share: f64,

    /// Mean vision score per game.
    pub vision_score: f64,

    /// Wins over matches found (0.0 to 1.0).
    pub win_rate: f64,

    /// Number of matches the snapshot aggregates. Always >= 1.
    pub sample_size: u32,
}

impl MetricSnapshot {
    /// The value of one named core metric, scaled the way comparisons and
    /// benchmarks consume it (rates as percentages).
    pub fn metric_value(&self, metric: CoreMetric) -> f64 {
        match metric {
            CoreMetric::Kda => self.average_kda,
            CoreMetric::CsPerMinute => self.cs_per_minute,
            CoreMetric::VisionScore => self.vision_score,
            CoreMetric::WinRate => self.win_rate * 100.0,
            CoreMetric::DamageShare => self.damage_share * 100.0,
        }
    }
}

/// The five core metrics tracked by trend detection and player comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreMetric {
    WinRate,
    Kda,
    CsPerMinute,
    VisionScore,
    DamageShare,
}

impl CoreMetric {
    /// All core metrics, in canonical order.
    pub const ALL: [CoreMetric; 5] = [
        CoreMetric::WinRate,
        CoreMetric::Kda,
        CoreMetric::CsPerMinute,
        CoreMetric::VisionScore,
        CoreMetric::DamageShare,
    ];

    /// Human-readable metric label.
    pub fn label(&self) -> &'static str {
        match self {
            CoreMetric::WinRate => "Win Rate",
            CoreMetric::Kda => "KDA",
            CoreMetric::CsPerMinute => "CS/min",
            CoreMetric::VisionScore => "Vision",
            CoreMetric::DamageShare => "Damage Share",
        }
    }
}

impl std::fmt::Display for CoreMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
