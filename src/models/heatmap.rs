//! Spatial (map-zone) aggregation value objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A positional event in world-space coordinates, e.g. a ward placement.
/// Read-only input to the heatmap aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionalEvent {
    /// World-space x in the 14870x14870 unit square.
    pub x: f64,
    /// World-space y in the 14870x14870 unit square.
    pub y: f64,
    pub timestamp: DateTime<Utc>,
    pub kind: WardKind,
}

/// Ward categories. Control wards weigh heavier in intensity because they
/// deny enemy vision rather than only granting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WardKind {
    Stealth,
    Control,
    FarsightTrinket,
}

impl WardKind {
    /// Intensity weight contributed by one event of this kind.
    pub fn weight(&self) -> f64 {
        match self {
            WardKind::Stealth => 1.0,
            WardKind::Control => 1.5,
            WardKind::FarsightTrinket => 0.75,
        }
    }
}

/// One aggregated cell on the output canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPoint {
    /// Canvas-space x (0 to canvas size).
    pub x: f64,
    /// Canvas-space y (0 to canvas size).
    pub y: f64,
    /// Number of events that landed on this cell.
    pub frequency: u32,
    /// Summed ward-kind weights for this cell.
    pub weight: f64,
    /// Zone the cell falls in, or "unzoned".
    pub zone: String,
}

/// Aggregated counts and score for one named zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneIntensity {
    pub count: u32,
    pub score: f64,
}

/// Full heatmap aggregation output. Value object; never mutated after
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapResult {
    pub points: Vec<HeatmapPoint>,
    /// Zone name to intensity, including "unzoned".
    pub zone_intensity: BTreeMap<String, ZoneIntensity>,
    /// Distinct strategic zones hit over total strategic zones, 0 to 100.
    pub coverage_percent: f64,
    /// Canvas edge length the points are normalized to.
    pub canvas_size: u32,
}

impl HeatmapResult {
    /// An empty result for zero input events.
    pub fn empty(canvas_size: u32) -> Self {
        Self {
            points: Vec::new(),
            zone_intensity: BTreeMap::new(),
            coverage_percent: 0.0,
            canvas_size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ward_weights() {
        assert!(WardKind::Control.weight() > WardKind::Stealth.weight());
        assert!(WardKind::FarsightTrinket.weight() < WardKind::Stealth.weight());
    }

    #[test]
    fn test_empty_result() {
        let r = HeatmapResult::empty(512);
        assert!(r.is_empty());
        assert_eq!(r.coverage_percent, 0.0);
        assert_eq!(r.canvas_size, 512);
    }

    #[test]
    fn test_ward_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&WardKind::FarsightTrinket).unwrap(),
            "\"farsight_trinket\""
        );
    }
}
