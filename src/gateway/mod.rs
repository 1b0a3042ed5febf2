//! Analysis cache gateway.
//!
//! Fronts the pure analytics components with a fingerprint-keyed result
//! cache and single-flight deduplication: at most one computation runs per
//! fingerprint, concurrent callers share its result, and cache failures
//! degrade to a miss instead of failing the request.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, warn};

use crate::analytics::benchmark::benchmark_value;
use crate::analytics::compare::compare_players;
use crate::analytics::heatmap::aggregate_heatmap;
use crate::analytics::metrics::snapshot_for_player;
use crate::analytics::trend::analyze_trend;
use crate::analytics::window::TimeWindow;
use crate::analytics::AnalyticsError;
use crate::config::AppConfig;
use crate::models::{
    BenchmarkResult, Cohort, ComparisonResult, CoreMetric, Fingerprint, HeatmapResult,
    MetricSnapshot, PositionalEvent, TrendReport,
};
use crate::providers::{BenchmarkStore, CacheStore, MatchHistoryProvider, ProviderError, TimeRange};

/// The closed set of supported analyses. Dispatch is an exhaustive match,
/// so adding a kind without a handler fails to compile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisKind {
    /// Aggregate metric snapshot over the window.
    Snapshot,
    /// Early-vs-late trend detection over the window.
    Trend,
    /// Percentile rank of one metric against a cohort.
    Benchmark { cohort: Cohort, metric: CoreMetric },
    /// Pairwise comparison against another player.
    Comparison { opponent: String },
    /// Ward-placement heatmap over the window.
    Heatmap,
}

impl AnalysisKind {
    /// Stable tag used in fingerprints.
    fn fingerprint_tag(&self) -> String {
        match self {
            AnalysisKind::Snapshot => "snapshot".to_string(),
            AnalysisKind::Trend => "trend".to_string(),
            AnalysisKind::Benchmark { cohort, metric } => format!(
                "benchmark:{}:{}:{}:{:?}",
                cohort.cohort_type, cohort.filter_value, cohort.region, metric
            ),
            AnalysisKind::Comparison { opponent } => format!("comparison:{opponent}"),
            AnalysisKind::Heatmap => "heatmap".to_string(),
        }
    }
}

/// One analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub player_id: String,
    pub window: TimeWindow,
    /// Defaults to the configured region when absent.
    pub region: Option<String>,
    #[serde(flatten)]
    pub kind: AnalysisKind,
}

impl AnalysisRequest {
    /// Deterministic cache fingerprint from the normalized request fields.
    pub fn fingerprint(&self, default_region: &str) -> Fingerprint {
        let region = self.region.as_deref().unwrap_or(default_region);
        Fingerprint::generate(&[
            &self.player_id,
            &self.kind.fingerprint_tag(),
            self.window.label(),
            region,
        ])
    }
}

/// Analysis result payload, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisResponse {
    Snapshot(MetricSnapshot),
    Trend(TrendReport),
    Benchmark(BenchmarkResult),
    Comparison(ComparisonResult),
    Heatmap(HeatmapResult),
}

/// Gateway errors surfaced to callers. Cache problems never appear here.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("failed to encode analysis payload: {0}")]
    Encode(#[from] serde_json::Error),
}

type InflightCell = Arc<OnceCell<AnalysisResponse>>;

/// Memoizing, single-flight front for the analytics components.
pub struct AnalysisGateway {
    matches: Arc<dyn MatchHistoryProvider>,
    benchmarks: Arc<dyn BenchmarkStore>,
    cache: Arc<dyn CacheStore>,
    config: AppConfig,
    inflight: Mutex<HashMap<String, InflightCell>>,
}

impl AnalysisGateway {
    pub fn new(
        matches: Arc<dyn MatchHistoryProvider>,
        benchmarks: Arc<dyn BenchmarkStore>,
        cache: Arc<dyn CacheStore>,
        config: AppConfig,
    ) -> Self {
        Self {
            matches,
            benchmarks,
            cache,
            config,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Run one analysis, serving from cache when possible.
    ///
    /// Concurrent calls with the same fingerprint share one computation.
    /// If the caller is cancelled mid-computation nothing is cached; a
    /// waiting follower takes over the computation instead.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, GatewayError> {
        let fingerprint = request.fingerprint(&self.config.default_region);
        let key = fingerprint.as_str().to_string();

        if let Some(hit) = self.cache_lookup(&key).await {
            debug!(%fingerprint, "analysis cache hit");
            return Ok(hit);
        }

        let cell = {
            let mut inflight = self.inflight.lock().await;
            inflight.entry(key.clone()).or_default().clone()
        };

        // The first caller to reach the cell computes and caches; everyone
        // else waits on it. The cache write happens inside the initializer
        // so it runs at most once per flight.
        let result = cell
            .get_or_try_init(|| async {
                let response = self.compute(request).await?;
                self.cache_store(&key, &response).await;
                Ok::<_, GatewayError>(response)
            })
            .await
            .cloned();

        // Drop the in-flight entry so a later request (after TTL expiry or
        // a failure) starts a fresh flight. Only remove our own cell in
        // case a concurrent cleanup already replaced it.
        {
            let mut inflight = self.inflight.lock().await;
            if inflight.get(&key).is_some_and(|c| Arc::ptr_eq(c, &cell)) {
                inflight.remove(&key);
            }
        }

        result
    }

    async fn cache_lookup(&self, key: &str) -> Option<AnalysisResponse> {
        match self.cache.get(key).await {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(response) => Some(response),
                Err(err) => {
                    warn!(key, %err, "cached payload unreadable, treating as miss");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                // Cache trouble degrades to a miss, never to a failure.
                warn!(key, %err, "cache read failed, treating as miss");
                None
            }
        }
    }

    async fn cache_store(&self, key: &str, response: &AnalysisResponse) {
        let payload = match serde_json::to_string(response) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(key, %err, "failed to encode payload for cache");
                return;
            }
        };

        if let Err(err) = self.cache.set(key, payload, self.config.cache.ttl()).await {
            warn!(key, %err, "cache write failed, result served uncached");
        }
    }

    async fn compute(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, GatewayError> {
        let now = Utc::now();
        let range = TimeRange {
            start: request.window.start_time(now),
            end: now,
        };
        let matches = self
            .matches
            .get_matches(&request.player_id, Some(range))
            .await?;

        debug!(
            player = %request.player_id,
            window = %request.window,
            matches = matches.len(),
            "computing analysis"
        );

        let response = match &request.kind {
            AnalysisKind::Snapshot => {
                let snapshot = snapshot_for_player(&matches, &request.player_id)?;
                AnalysisResponse::Snapshot(snapshot)
            }
            AnalysisKind::Trend => {
                let report = analyze_trend(
                    &matches,
                    &request.player_id,
                    request.window,
                    now,
                    &self.config.trend,
                )?;
                AnalysisResponse::Trend(report)
            }
            AnalysisKind::Benchmark { cohort, metric } => {
                let snapshot = snapshot_for_player(&matches, &request.player_id)?;
                let record = self
                    .benchmarks
                    .get_benchmark(cohort)
                    .await?
                    .ok_or_else(|| AnalyticsError::BenchmarkNotFound {
                        cohort: format!("{}/{}", cohort.cohort_type, cohort.filter_value),
                    })?;
                let result = benchmark_value(snapshot.metric_value(*metric), &record)?;
                AnalysisResponse::Benchmark(result)
            }
            AnalysisKind::Comparison { opponent } => {
                let opponent_matches = self.matches.get_matches(opponent, Some(range)).await?;

                let snapshot1 = snapshot_for_player(&matches, &request.player_id)?;
                let snapshot2 = snapshot_for_player(&opponent_matches, opponent)?;

                let result = compare_players(&snapshot1, &snapshot2, &self.config.comparison);
                AnalysisResponse::Comparison(result)
            }
            AnalysisKind::Heatmap => {
                let events = ward_events(&matches, &request.player_id);
                let result = aggregate_heatmap(&events, &self.config.heatmap);
                AnalysisResponse::Heatmap(result)
            }
        };

        Ok(response)
    }
}

/// Collect one player's ward placements across a batch of matches. Matches
/// the player did not take part in contribute nothing.
fn ward_events(matches: &[crate::models::RawMatch], puuid: &str) -> Vec<PositionalEvent> {
    matches
        .iter()
        .filter_map(|m| m.participant(puuid))
        .flat_map(|p| p.ward_events.iter().cloned())
        .collect()
}
