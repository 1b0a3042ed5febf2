//! # Rift Insights
//!
//! Post-match telemetry analytics for competitive online matches.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (matches, snapshots, trends, cohorts)
//! - **analytics**: Pure computation (metrics, windowing, trends, benchmarks,
//!   comparison, heatmaps)
//! - **providers**: Collaborator contracts plus in-memory implementations
//! - **gateway**: Fingerprint-keyed result cache with single-flight dedup
//! - **config**: Configuration loading and validation

pub mod analytics;
pub mod config;
pub mod gateway;
pub mod models;
pub mod providers;

pub use models::*;
