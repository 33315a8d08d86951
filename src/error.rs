//! Error types for the publish pipeline.
//!
//! Per-record date parse failures are handled locally (see `record`) and
//! never appear here; these variants are the conditions that abort a run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A filter rule names a field that a record does not have. Silently
    /// skipping the rule would corrupt the published output, so the run stops.
    #[error("filter references field {key:?} missing from row {row}")]
    MissingFilterField { key: String, row: usize },

    /// An observation value that cannot be read as an integer. Coercing to 0
    /// would corrupt the decay series irrecoverably.
    #[error("observation on {date:?} has non-integer value {value:?}")]
    NonIntegerValue { date: String, value: String },

    /// The first observation's date string does not parse, so the score
    /// series cannot be anchored.
    #[error("cannot parse score series anchor date {date:?}")]
    UnparseableAnchor { date: String },
}
