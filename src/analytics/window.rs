//! Time windowing: lookback filtering and early/late splitting.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::RawMatch;

use super::AnalyticsError;

/// Minimum matches required inside a window before trend analysis is
/// meaningful. Fixed design constant, deliberately not configurable.
pub const MIN_TREND_SAMPLE: usize = 5;

/// Named lookback windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    #[serde(rename = "7d")]
    Days7,
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "90d")]
    Days90,
    Season,
}

impl TimeWindow {
    /// Parse a window label ("7d", "30d", "90d", "season").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "7d" => Some(TimeWindow::Days7),
            "30d" => Some(TimeWindow::Days30),
            "90d" => Some(TimeWindow::Days90),
            "season" => Some(TimeWindow::Season),
            _ => None,
        }
    }

    /// The lookback duration. A season is approximated as six months.
    pub fn lookback(&self) -> Duration {
        match self {
            TimeWindow::Days7 => Duration::days(7),
            TimeWindow::Days30 => Duration::days(30),
            TimeWindow::Days90 => Duration::days(90),
            TimeWindow::Season => Duration::days(182),
        }
    }

    /// Window start for a given "now".
    pub fn start_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.lookback()
    }

    /// Canonical label, also used in fingerprints.
    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::Days7 => "7d",
            TimeWindow::Days30 => "30d",
            TimeWindow::Days90 => "90d",
            TimeWindow::Season => "season",
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Matches falling inside one window, split at its wall-clock midpoint.
///
/// Both halves borrow from the caller's match slice; nothing is copied.
#[derive(Debug)]
pub struct WindowedMatches<'a> {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub early: Vec<&'a RawMatch>,
    pub late: Vec<&'a RawMatch>,
}

impl WindowedMatches<'_> {
    pub fn games_played(&self) -> usize {
        self.early.len() + self.late.len()
    }
}

/// Filter matches into a lookback window and split them at the midpoint.
///
/// Keeps matches strictly after the window start. The provider contract says
/// matches arrive ascending by game start, but the split sorts defensively
/// rather than trusting it. Fewer than [`MIN_TREND_SAMPLE`] remaining
/// matches is an `InsufficientSample` error.
pub fn window_matches<'a>(
    matches: &'a [RawMatch],
    window: TimeWindow,
    now: DateTime<Utc>,
) -> Result<WindowedMatches<'a>, AnalyticsError> {
    let start = window.start_time(now);

    let mut in_window: Vec<&RawMatch> = matches.iter().filter(|m| m.game_start > start).collect();

    if in_window.len() < MIN_TREND_SAMPLE {
        return Err(AnalyticsError::InsufficientSample {
            found: in_window.len(),
            required: MIN_TREND_SAMPLE,
        });
    }

    in_window.sort_by_key(|m| m.game_start);

    // Split at the wall-clock midpoint of the window, not the median match.
    let midpoint = start + (now - start) / 2;
    let (early, late): (Vec<_>, Vec<_>) = in_window.into_iter().partition(|m| m.game_start < midpoint);

    Ok(WindowedMatches {
        start,
        end: now,
        early,
        late,
    })
}
