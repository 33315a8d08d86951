//! Decaying daily score computation.
//!
//! Turns the sparse (date, value) observations extracted from accepted
//! records into a dense, gap-free daily series via a half-life decay
//! recurrence.

pub mod engine;
pub mod types;

pub use engine::build_series;
pub use types::{Observation, ScoreSeries};
