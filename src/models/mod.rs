//! Core data models for the analytics engine.

mod benchmark;
mod comparison;
mod heatmap;
mod ids;
mod match_record;
mod snapshot;
mod trend;

pub use benchmark::*;
pub use comparison::*;
pub use heatmap::*;
pub use ids::*;
pub use match_record::*;
pub use snapshot::*;
pub use trend::*;
