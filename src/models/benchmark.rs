//! Population benchmark reference data.

use serde::{Deserialize, Serialize};

/// The population slice a benchmark describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CohortType {
    Role,
    Rank,
    Global,
    Champion,
}

impl std::fmt::Display for CohortType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CohortType::Role => write!(f, "role"),
            CohortType::Rank => write!(f, "rank"),
            CohortType::Global => write!(f, "global"),
            CohortType::Champion => write!(f, "champion"),
        }
    }
}

/// A cohort descriptor: which population slice to benchmark against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cohort {
    pub cohort_type: CohortType,

    /// Slice value, e.g. "jungle" for a role cohort or "gold" for a rank
    /// cohort. Empty for global cohorts.
    pub filter_value: String,

    pub region: String,
}

impl Cohort {
    pub fn new(cohort_type: CohortType, filter_value: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            cohort_type,
            filter_value: filter_value.into(),
            region: region.into(),
        }
    }

    /// Global cohort for a region.
    pub fn global(region: impl Into<String>) -> Self {
        Self::new(CohortType::Global, "", region)
    }
}

/// Distribution summary for a cohort. Read-only reference data supplied by
/// the benchmark store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub cohort: Cohort,
    pub mean: f64,
    pub median: f64,
    pub p10: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
}

impl BenchmarkRecord {
    /// The known percentile points in ascending percentile order.
    pub fn percentile_points(&self) -> [(f64, f64); 5] {
        [
            (10.0, self.p10),
            (25.0, self.p25),
            (50.0, self.median),
            (75.0, self.p75),
            (90.0, self.p90),
        ]
    }

    /// Whether the percentile points are monotonically non-decreasing.
    /// A violation indicates malformed upstream cohort data.
    pub fn is_monotonic(&self) -> bool {
        let points = self.percentile_points();
        points.windows(2).all(|w| w[0].1 <= w[1].1)
    }
}

/// Qualitative rating of a metric value against a cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkRating {
    Excellent,
    Good,
    Average,
    Poor,
}

impl std::fmt::Display for BenchmarkRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BenchmarkRating::Excellent => write!(f, "excellent"),
            BenchmarkRating::Good => write!(f, "good"),
            BenchmarkRating::Average => write!(f, "average"),
            BenchmarkRating::Poor => write!(f, "poor"),
        }
    }
}

/// Result of benchmarking one metric value against a cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub cohort: Cohort,
    pub value: f64,
    /// Percentile rank in [0, 100].
    pub percentile: f64,
    pub rating: BenchmarkRating,
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_monotonic_record() {
        assert!(record().is_monotonic());
    }

    #[test]
    fn test_non_monotonic_record() {
        let mut r = record();
        r.p25 = 7.0;
        assert!(!r.is_monotonic());
    }

    #[test]
    fn test_equal_points_are_monotonic() {
        let mut r = record();
        r.p25 = r.p10;
        assert!(r.is_monotonic());
    }

    #[test]
    fn test_cohort_serialization() {
        let c = Cohort::global("kr");
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"global\""));
    }
}
