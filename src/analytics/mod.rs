//! Pure analytics computations.
//!
//! Every component here is a synchronous, side-effect-free function over
//! immutable inputs:
//! - **metrics**: raw matches to per-player metric snapshots
//! - **window**: time-window filtering and early/late splitting
//! - **trend**: direction and significance of metric movement
//! - **benchmark**: percentile ranking against cohort distributions
//! - **compare**: pairwise player comparison
//! - **heatmap**: map-zone aggregation of positional events

pub mod benchmark;
pub mod compare;
pub mod heatmap;
pub mod metrics;
pub mod trend;
pub mod window;

use thiserror::Error;

/// Errors from analytics computations.
///
/// Single-match problems are absorbed with skip-and-continue inside the
/// components; only errors that make a whole analysis meaningless surface
/// through this type. None of these trigger retries.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Fewer valid matches than an analysis requires.
    #[error("insufficient sample: found {found} matches, need at least {required}")]
    InsufficientSample { found: usize, required: usize },

    /// Malformed cohort distribution (non-monotonic percentile points).
    /// Indicates an upstream data problem.
    #[error("invalid benchmark for cohort {cohort}: {reason}")]
    InvalidBenchmark { cohort: String, reason: String },

    /// No benchmark record exists for the requested cohort.
    #[error("no benchmark found for cohort {cohort}")]
    BenchmarkNotFound { cohort: String },
}

impl AnalyticsError {
    /// Whether the error means "not enough data" rather than bad data.
    pub fn is_insufficient_sample(&self) -> bool {
        matches!(self, AnalyticsError::InsufficientSample { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalyticsError::InsufficientSample {
            found: 2,
            required: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient sample: found 2 matches, need at least 5"
        );
        assert!(err.is_insufficient_sample());
    }
}
