//! Error types for productivity assessment.

use agrofuzz_fis::FisError;
use thiserror::Error;

/// Errors raised by the productivity model and batch evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgroError {
    /// Error from the inference engine.
    #[error("Inference error: {0}")]
    Fis(#[from] FisError),

    /// Column-oriented input with columns of different lengths.
    #[error("Column length mismatch: {column} has {actual} values, expected {expected}")]
    ColumnLengthMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A row failed while the batch was configured to abort.
    #[error("Row {index} failed: {source}")]
    RowFailed {
        index: usize,
        #[source]
        source: FisError,
    },

    /// Batch worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Tracing subscriber initialization failed.
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Result type for productivity operations.
pub type AgroResult<T> = Result<T, AgroError>;
