//! Collaborator contracts and in-memory implementations.
//!
//! The analytics core talks to three upstreams:
//! - a match-history provider (ordered raw matches for a player)
//! - a benchmark store (cohort distribution summaries)
//! - a cache store (fingerprint-keyed payloads with TTL)
//!
//! Each is a trait so the core stays testable without network or storage.
//! The in-memory implementations back the CLI and tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{BenchmarkRecord, Cohort, RawMatch};

/// Errors from upstream collaborators.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("player not found: {0}")]
    PlayerNotFound(String),

    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    #[error("malformed upstream data: {0}")]
    MalformedData(String),
}

/// Cache store errors. Always downgraded to a miss by the gateway; never
/// surfaced to callers.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    #[error("cache payload unreadable: {0}")]
    Corrupt(String),
}

/// Optional time bounds for a match-history fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Supplies raw match records for a player, ascending by game start time.
/// The windower sorts defensively, so a provider that cannot guarantee
/// ordering still works.
#[async_trait]
pub trait MatchHistoryProvider: Send + Sync {
    async fn get_matches(
        &self,
        player_id: &str,
        range: Option<TimeRange>,
    ) -> Result<Vec<RawMatch>, ProviderError>;
}

/// Supplies cohort distribution summaries.
#[async_trait]
pub trait BenchmarkStore: Send + Sync {
    /// `Ok(None)` means no benchmark exists for the cohort.
    async fn get_benchmark(&self, cohort: &Cohort) -> Result<Option<BenchmarkRecord>, ProviderError>;
}

/// Fingerprint-keyed payload store with TTL. Both calls must be safe to
/// invoke concurrently.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set(&self, key: &str, payload: String, ttl: Duration) -> Result<(), CacheError>;
}

/// In-memory match provider over a fixed per-player match table.
#[derive(Default)]
pub struct StaticMatchProvider {
    matches: HashMap<String, Vec<RawMatch>>,
}

impl StaticMatchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register matches for a player. Stored sorted ascending by game start
    /// to honor the provider ordering contract.
    pub fn with_matches(mut self, player_id: impl Into<String>, mut matches: Vec<RawMatch>) -> Self {
        matches.sort_by_key(|m| m.game_start);
        self.matches.insert(player_id.into(), matches);
        self
    }
}

#[async_trait]
impl MatchHistoryProvider for StaticMatchProvider {
    async fn get_matches(
        &self,
        player_id: &str,
        range: Option<TimeRange>,
    ) -> Result<Vec<RawMatch>, ProviderError> {
        let all = self
            .matches
            .get(player_id)
            .ok_or_else(|| ProviderError::PlayerNotFound(player_id.to_string()))?;

        let matches = match range {
            Some(r) => all
                .iter()
                .filter(|m| m.game_start > r.start && m.game_start <= r.end)
                .cloned()
                .collect(),
            None => all.clone(),
        };

        Ok(matches)
    }
}

/// In-memory benchmark store over a fixed cohort table.
#[derive(Default)]
pub struct StaticBenchmarkStore {
    records: HashMap<Cohort, BenchmarkRecord>,
}

impl StaticBenchmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, record: BenchmarkRecord) -> Self {
        self.records.insert(record.cohort.clone(), record);
        self
    }
}

#[async_trait]
impl BenchmarkStore for StaticBenchmarkStore {
    async fn get_benchmark(&self, cohort: &Cohort) -> Result<Option<BenchmarkRecord>, ProviderError> {
        Ok(self.records.get(cohort).cloned())
    }
}

struct MemoryCacheEntry {
    payload: String,
    expires_at: DateTime<Utc>,
}

/// In-memory TTL cache. Expired entries read as absent and are dropped
/// lazily on the next read.
#[derive(Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, MemoryCacheEntry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub async fn len(&self) -> usize {
        let now = Utc::now();
        let entries = self.entries.read().await;
        entries.values().filter(|e| e.expires_at > now).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Utc::now();

        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => {
                    return Ok(Some(entry.payload.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Entry existed but expired: drop it.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.expires_at <= now) {
            entries.remove(key);
            debug!(key, "evicted expired cache entry");
        }
        Ok(None)
    }

    async fn set(&self, key: &str, payload: String, ttl: Duration) -> Result<(), CacheError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| CacheError::Unavailable(format!("ttl out of range: {e}")))?;
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            MemoryCacheEntry {
                payload,
                expires_at: Utc::now() + ttl,
            },
        );
        Ok(())
    }
}
