//! Engine error taxonomy.
//!
//! Every failure in this crate is a deterministic function of input shape,
//! so nothing here is retryable: callers must change the inputs (different
//! cut points, more transition periods) to resolve an error. The one
//! locally recovered condition — a degenerate bucket — is not an error at
//! all; it is logged and recorded on the bucket matrix (see
//! [`crate::bucket`]).

use thiserror::Error;

/// Errors produced by the distribution engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Mismatched vector lengths or malformed cut points.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A bucket or the whole population carries zero total weight.
    #[error("division by zero: {0}")]
    DivisionByZero(String),

    /// More forecast periods requested than transition matrices supplied.
    #[error(
        "horizon out of range: {requested} period(s) requested, {supplied} transition matrices supplied"
    )]
    HorizonOutOfRange { requested: usize, supplied: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;
