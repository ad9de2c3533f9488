//! Error types for fuzzy inference.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FisError {
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),
    #[error("Variable '{name}' not found in registry")]
    UnknownVariable { name: String },
    #[error("Term '{term}' not defined on variable '{variable}'")]
    UnknownTerm { variable: String, term: String },
    #[error("No input value supplied for variable '{name}'")]
    MissingInput { name: String },
    #[error("Expected {expected} values, got {actual}")]
    InputArity { expected: usize, actual: usize },
    #[error("Firing strength {value} of rule {rule} is outside [0, 1]")]
    InvalidStrength { rule: usize, value: f64 },
    #[error("No rule fired: aggregated output membership is zero everywhere")]
    NoRuleFired,
}

impl FisError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        FisError::InvalidDefinition(reason.into())
    }
}

/// Result type for fuzzy inference operations.
pub type FisResult<T> = Result<T, FisError>;
