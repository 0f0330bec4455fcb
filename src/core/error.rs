//! Error types for expression evaluation
//!
//! The engine uses a single failure taxonomy: every grammar or evaluation
//! violation surfaces as [`ExpressionError::InvalidExpression`], with
//! [`ExpressionError::InvalidObjectPath`] as the one refinement raised while
//! resolving dotted variable paths.

use thiserror::Error;

/// Error produced by tokenizing, parsing, or evaluating a formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    /// The formula violates the grammar or references something the
    /// environment does not expose
    #[error("invalid expression: {0}")]
    InvalidExpression(String),

    /// A dotted variable path hit a missing key or a non-traversable value
    #[error("invalid object path: {0}")]
    InvalidObjectPath(String),
}

impl ExpressionError {
    /// Create an invalid expression error
    pub fn invalid_expression(message: impl Into<String>) -> Self {
        ExpressionError::InvalidExpression(message.into())
    }

    /// Create an invalid object path error
    pub fn invalid_object_path(path: impl Into<String>) -> Self {
        ExpressionError::InvalidObjectPath(path.into())
    }

    /// Create a type error
    pub fn type_error(expected: impl Into<String>, found: impl Into<String>) -> Self {
        ExpressionError::InvalidExpression(format!(
            "expected {}, found {}",
            expected.into(),
            found.into()
        ))
    }

    /// Create an invalid argument error for a function call
    pub fn invalid_argument(function: &str, message: impl Into<String>) -> Self {
        ExpressionError::InvalidExpression(format!("{}: {}", function, message.into()))
    }

    /// Create an error for an identifier that is in none of
    /// variables/functions/operators
    pub fn unknown_identifier(name: &str) -> Self {
        ExpressionError::InvalidExpression(format!("unknown identifier '{name}'"))
    }
}

/// Result type for expression operations
pub type ExpressionResult<T> = Result<T, ExpressionError>;
