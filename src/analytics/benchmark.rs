//! Percentile benchmarking against population cohorts.

use tracing::debug;

use crate::models::{BenchmarkRating, BenchmarkRecord, BenchmarkResult};

use super::AnalyticsError;

/// Rank a metric value against a cohort distribution.
///
/// Percentile rank comes from linear interpolation across the cohort's known
/// points (p10/p25/median/p75/p90), extrapolated along the first and last
/// segments and clamped to [0, 100]. Monotone: a larger value never ranks
/// lower. Pure function; fails only on a malformed record.
pub fn benchmark_value(value: f64, record: &BenchmarkRecord) -> Result<BenchmarkResult, AnalyticsError> {
    if !record.is_monotonic() {
        return Err(AnalyticsError::InvalidBenchmark {
            cohort: format!("{}/{}", record.cohort.cohort_type, record.cohort.filter_value),
            reason: "percentile points are not monotonically non-decreasing".to_string(),
        });
    }

    let percentile = percentile_rank(value, record);
    let rating = rating_for(value, record);

    debug!(
        value,
        percentile,
        cohort = %record.cohort.cohort_type,
        filter = %record.cohort.filter_value,
        "benchmarked metric value"
    );

    Ok(BenchmarkResult {
        cohort: record.cohort.clone(),
        value,
        percentile,
        rating,
    })
}

fn percentile_rank(value: f64, record: &BenchmarkRecord) -> f64 {
    let points = record.percentile_points();

    // Find the segment the value falls in; extrapolate past the ends using
    // the nearest segment with a nonzero value span.
    let first = points[0];
    let last = points[points.len() - 1];

    let raw = if value <= first.1 {
        match first_sloped_segment(&points) {
            Some((a, b)) => interpolate(value, a, b),
            // Degenerate distribution: every point equal. Below-or-at sits
            // at the bottom percentile point.
            None => first.0,
        }
    } else if value >= last.1 {
        match last_sloped_segment(&points) {
            Some((a, b)) => interpolate(value, a, b),
            None => last.0,
        }
    } else {
        let mut rank = last.0;
        for segment in points.windows(2) {
            let (a, b) = (segment[0], segment[1]);
            if value >= a.1 && value <= b.1 {
                // Zero-width segments were excluded by the outer branches
                // only at the extremes; guard the interior too.
                if b.1 > a.1 {
                    rank = interpolate(value, a, b);
                } else {
                    rank = b.0;
                }
                break;
            }
        }
        rank
    };

    raw.clamp(0.0, 100.0)
}

/// Linear interpolation of `value` between points (percentile, value).
fn interpolate(value: f64, a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 + (value - a.1) / (b.1 - a.1) * (b.0 - a.0)
}

fn first_sloped_segment(points: &[(f64, f64)]) -> Option<((f64, f64), (f64, f64))> {
    points
        .windows(2)
        .map(|w| (w[0], w[1]))
        .find(|(a, b)| b.1 > a.1)
}

fn last_sloped_segment(points: &[(f64, f64)]) -> Option<((f64, f64), (f64, f64))> {
    points
        .windows(2)
        .map(|w| (w[0], w[1]))
        .rev()
        .find(|(a, b)| b.1 > a.1)
}

fn rating_for(value: f64, record: &BenchmarkRecord) -> BenchmarkRating {
    if value >= record.p90 {
        BenchmarkRating::Excellent
    } else if value >= record.p75 {
        BenchmarkRating::Good
    } else if value >= record.p25 {
        BenchmarkRating::Average
    } else {
        BenchmarkRating::Poor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cohort, CohortType};

    fn record() -> BenchmarkRecord {
        BenchmarkRecord {
            cohort: Cohort::new(CohortType::Role, "jungle", "euw"),
            mean: 5.0,
            median: 5.0,
            p10: 2.0,
            p25: 3.5,
            p75: 6.5,
            p90: 8.0,
        }
    }

    #[test]
    fn test_known_points_map_to_their_percentiles() {
        let r = record();
        assert!((benchmark_value(2.0, &r).unwrap().percentile - 10.0).abs() < 1e-9);
        assert!((benchmark_value(3.5, &r).unwrap().percentile - 25.0).abs() < 1e-9);
        assert!((benchmark_value(5.0, &r).unwrap().percentile - 50.0).abs() < 1e-9);
        assert!((benchmark_value(6.5, &r).unwrap().percentile - 75.0).abs() < 1e-9);
        assert!((benchmark_value(8.0, &r).unwrap().percentile - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_interpolation_between_points() {
        let r = record();
        // Halfway between median (5.0) and p75 (6.5)
        let result = benchmark_value(5.75, &r).unwrap();
        assert!((result.percentile - 62.5).abs() < 1e-9);
    }

    #[test]
    fn test_clamped_outside_known_range() {
        let r = record();
        assert_eq!(benchmark_value(-10.0, &r).unwrap().percentile, 0.0);
        assert_eq!(benchmark_value(100.0, &r).unwrap().percentile, 100.0);
    }

    #[test]
    fn test_monotonic_in_value() {
        let r = record();
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 15.0];
        let mut last = -1.0;
        for v in values {
            let p = benchmark_value(v, &r).unwrap().percentile;
            assert!(p >= last, "percentile dropped at value {v}: {p} < {last}");
            assert!((0.0..=100.0).contains(&p));
            last = p;
        }
    }

    #[test]
    fn test_ratings() {
        let r = record();
        assert_eq!(benchmark_value(8.5, &r).unwrap().rating, BenchmarkRating::Excellent);
        assert_eq!(benchmark_value(7.0, &r).unwrap().rating, BenchmarkRating::Good);
        assert_eq!(benchmark_value(4.0, &r).unwrap().rating, BenchmarkRating::Average);
        assert_eq!(benchmark_value(1.0, &r).unwrap().rating, BenchmarkRating::Poor);
    }

    #[test]
    fn test_non_monotonic_record_rejected() {
        let mut r = record();
        r.median = 1.0;
        let err = benchmark_value(5.0, &r).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidBenchmark { .. }));
    }

    #[test]
    fn test_flat_distribution() {
        let r = BenchmarkRecord {
            cohort: Cohort::global("euw"),
            mean: 5.0,
            median: 5.0,
            p10: 5.0,
            p25: 5.0,
            p75: 5.0,
            p90: 5.0,
        };

        // Every point equal: below sits at p10's rank, above at p90's.
        assert_eq!(benchmark_value(4.0, &r).unwrap().percentile, 10.0);
        assert_eq!(benchmark_value(6.0, &r).unwrap().percentile, 90.0);
    }

    #[test]
    fn test_partially_flat_distribution_stays_monotonic() {
        let r = BenchmarkRecord {
            cohort: Cohort::global("euw"),
            mean: 4.0,
            median: 3.0,
            p10: 3.0,
            p25: 3.0,
            p75: 6.0,
            p90: 8.0,
        };

        let below = benchmark_value(2.0, &r).unwrap().percentile;
        let at = benchmark_value(3.0, &r).unwrap().percentile;
        let above = benchmark_value(4.0, &r).unwrap().percentile;
        assert!(below <= at && at <= above);
    }
}
