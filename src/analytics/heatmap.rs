//! Heatmap aggregation: positional events to canvas-space zone intensity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{HeatmapPoint, HeatmapResult, PositionalEvent, ZoneIntensity};

/// Edge length of the world coordinate space (Summoner's Rift units).
pub const WORLD_SIZE: f64 = 14870.0;

/// Default canvas edge length points are normalized to.
pub const DEFAULT_CANVAS_SIZE: u32 = 512;

/// Heatmap configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HeatmapConfig {
    /// Canvas edge length. World coordinates scale onto [0, canvas_size].
    #[serde(default = "default_canvas_size")]
    pub canvas_size: u32,
}

fn default_canvas_size() -> u32 {
    DEFAULT_CANVAS_SIZE
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            canvas_size: default_canvas_size(),
        }
    }
}

/// A named map zone with polygon bounds in world coordinates.
#[derive(Debug, Clone)]
pub struct MapZone {
    pub name: &'static str,
    /// Polygon vertices, world space.
    pub polygon: &'static [(f64, f64)],
    /// High-value zone for vision control.
    pub strategic: bool,
}

/// Static table of named map regions. Zone assignment scans this table in
/// order and the first containing polygon wins, so the table order is part
/// of the deterministic contract.
pub const MAP_ZONES: &[MapZone] = &[
    MapZone {
        name: "Dragon Pit",
        polygon: &[
            (9800.0, 4200.0),
            (10200.0, 4200.0),
            (10200.0, 4600.0),
            (9800.0, 4600.0),
        ],
        strategic: true,
    },
    MapZone {
        name: "Baron Pit",
        polygon: &[
            (4800.0, 10200.0),
            (5200.0, 10200.0),
            (5200.0, 10600.0),
            (4800.0, 10600.0),
        ],
        strategic: true,
    },
    MapZone {
        name: "Blue Side Blue Buff",
        polygon: &[
            (3800.0, 8000.0),
            (4200.0, 8000.0),
            (4200.0, 8400.0),
            (3800.0, 8400.0),
        ],
        strategic: true,
    },
    MapZone {
        name: "Red Side Red Buff",
        polygon: &[
            (10800.0, 6600.0),
            (11200.0, 6600.0),
            (11200.0, 7000.0),
            (10800.0, 7000.0),
        ],
        strategic: true,
    },
    MapZone {
        name: "River Bushes",
        polygon: &[
            (6000.0, 6000.0),
            (9000.0, 6000.0),
            (9000.0, 9000.0),
            (6000.0, 9000.0),
        ],
        strategic: true,
    },
    MapZone {
        name: "Top Lane Tri-Bush",
        polygon: &[
            (2300.0, 10800.0),
            (2700.0, 10800.0),
            (2700.0, 11200.0),
            (2300.0, 11200.0),
        ],
        strategic: false,
    },
    MapZone {
        name: "Bot Lane Tri-Bush",
        polygon: &[
            (12000.0, 3800.0),
            (12400.0, 3800.0),
            (12400.0, 4200.0),
            (12000.0, 4200.0),
        ],
        strategic: false,
    },
];

/// Zone label for points outside every polygon.
pub const UNZONED: &str = "unzoned";

/// Normalize a world-space coordinate onto the canvas.
pub fn to_canvas(world: f64, canvas_size: u32) -> f64 {
    world / WORLD_SIZE * canvas_size as f64
}

/// Ray-casting point-in-polygon test.
fn point_in_polygon(x: f64, y: f64, polygon: &[(f64, f64)]) -> bool {
    let n = polygon.len();
    let mut inside = false;

    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// The zone a world-space point belongs to: first matching polygon in the
/// static table, else [`UNZONED`].
pub fn zone_for_point(x: f64, y: f64) -> &'static str {
    for zone in MAP_ZONES {
        if point_in_polygon(x, y, zone.polygon) {
            return zone.name;
        }
    }
    UNZONED
}

/// Aggregate positional events into a canvas heatmap with per-zone
/// intensity and strategic coverage.
///
/// Events landing on the same canvas cell merge into one point whose
/// frequency and weight accumulate. Coverage is the share of strategic
/// zones with at least one event. Zero events produce an empty result, not
/// an error. Input events are not mutated.
pub fn aggregate_heatmap(events: &[PositionalEvent], config: &HeatmapConfig) -> HeatmapResult {
    if events.is_empty() {
        return HeatmapResult::empty(config.canvas_size);
    }

    // Cell key -> (canvas x, canvas y, frequency, weight, zone)
    let mut cells: BTreeMap<(u32, u32), HeatmapPoint> = BTreeMap::new();
    let mut zone_intensity: BTreeMap<String, ZoneIntensity> = BTreeMap::new();

    for event in events {
        let canvas_x = to_canvas(event.x, config.canvas_size);
        let canvas_y = to_canvas(event.y, config.canvas_size);
        let zone = zone_for_point(event.x, event.y);
        let weight = event.kind.weight();

        let key = (canvas_x.floor() as u32, canvas_y.floor() as u32);
        cells
            .entry(key)
            .and_modify(|p| {
                p.frequency += 1;
                p.weight += weight;
            })
            .or_insert_with(|| HeatmapPoint {
                x: canvas_x,
                y: canvas_y,
                frequency: 1,
                weight,
                zone: zone.to_string(),
            });

        let intensity = zone_intensity.entry(zone.to_string()).or_default();
        intensity.count += 1;
        intensity.score += weight;
    }

    let strategic_total = MAP_ZONES.iter().filter(|z| z.strategic).count();
    let strategic_hit = MAP_ZONES
        .iter()
        .filter(|z| z.strategic && zone_intensity.contains_key(z.name))
        .count();
    let coverage_percent = strategic_hit as f64 / strategic_total as f64 * 100.0;

    debug!(
        events = events.len(),
        cells = cells.len(),
        zones_hit = zone_intensity.len(),
        coverage_percent,
        "heatmap aggregation complete"
    );

    HeatmapResult {
        points: cells.into_values().collect(),
        zone_intensity,
        coverage_percent,
        canvas_size: config.canvas_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WardKind;
    use chrono::{TimeZone, Utc};

    fn event(x: f64, y: f64, kind: WardKind) -> PositionalEvent {
        PositionalEvent {
            x,
            y,
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            kind,
        }
    }

    #[test]
    fn test_normalization_corners() {
        assert_eq!(to_canvas(0.0, 512), 0.0);
        assert_eq!(to_canvas(14870.0, 512), 512.0);
        assert!((to_canvas(7435.0, 512) - 256.0).abs() < 1e-9);
    }

    #[test]
    fn test_zone_assignment() {
        assert_eq!(zone_for_point(10_000.0, 4_400.0), "Dragon Pit");
        assert_eq!(zone_for_point(5_000.0, 10_400.0), "Baron Pit");
        assert_eq!(zone_for_point(7_500.0, 7_500.0), "River Bushes");
        assert_eq!(zone_for_point(100.0, 100.0), UNZONED);
    }

    #[test]
    fn test_zone_assignment_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(zone_for_point(4_000.0, 8_200.0), "Blue Side Blue Buff");
        }
    }

    #[test]
    fn test_empty_events() {
        let result = aggregate_heatmap(&[], &HeatmapConfig::default());
        assert!(result.is_empty());
        assert_eq!(result.coverage_percent, 0.0);
    }

    #[test]
    fn test_same_cell_accumulates() {
        let events = vec![
            event(10_000.0, 4_400.0, WardKind::Stealth),
            event(10_000.0, 4_400.0, WardKind::Control),
        ];
        let result = aggregate_heatmap(&events, &HeatmapConfig::default());

        assert_eq!(result.points.len(), 1);
        assert_eq!(result.points[0].frequency, 2);
        assert!((result.points[0].weight - 2.5).abs() < 1e-9);
        assert_eq!(result.points[0].zone, "Dragon Pit");
    }

    #[test]
    fn test_zone_intensity_and_coverage() {
        let events = vec![
            event(10_000.0, 4_400.0, WardKind::Stealth), // Dragon Pit
            event(5_000.0, 10_400.0, WardKind::Control), // Baron Pit
            event(7_500.0, 7_500.0, WardKind::Stealth),  // River Bushes
            event(100.0, 100.0, WardKind::Stealth),      // unzoned
        ];
        let result = aggregate_heatmap(&events, &HeatmapConfig::default());

        assert_eq!(result.zone_intensity["Dragon Pit"].count, 1);
        assert!((result.zone_intensity["Baron Pit"].score - 1.5).abs() < 1e-9);
        assert_eq!(result.zone_intensity[UNZONED].count, 1);

        // 3 of 5 strategic zones hit
        assert!((result.coverage_percent - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_strategic_zones_do_not_count_toward_coverage() {
        let events = vec![event(2_500.0, 11_000.0, WardKind::Stealth)]; // Top Tri-Bush
        let result = aggregate_heatmap(&events, &HeatmapConfig::default());

        assert_eq!(result.zone_intensity["Top Lane Tri-Bush"].count, 1);
        assert_eq!(result.coverage_percent, 0.0);
    }

    #[test]
    fn test_input_not_mutated() {
        let events = vec![event(10_000.0, 4_400.0, WardKind::Stealth)];
        let before = events.clone();
        let _ = aggregate_heatmap(&events, &HeatmapConfig::default());
        assert_eq!(events, before);
    }

    #[test]
    fn test_full_coverage() {
        let events = vec![
            event(10_000.0, 4_400.0, WardKind::Stealth), // Dragon Pit
            event(5_000.0, 10_400.0, WardKind::Stealth), // Baron Pit
            event(4_000.0, 8_200.0, WardKind::Stealth),  // Blue Buff
            event(11_000.0, 6_800.0, WardKind::Stealth), // Red Buff
            event(7_500.0, 7_500.0, WardKind::Stealth),  // River Bushes
        ];
        let result = aggregate_heatmap(&events, &HeatmapConfig::default());
        assert!((result.coverage_percent - 100.0).abs() < 1e-9);
    }
}
