//! Error types for scale and length parsing.

use thiserror::Error;

/// Reasons a scale or length string is rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScaleError {
    /// Nothing but whitespace was entered.
    #[error("empty input")]
    Empty,

    /// A ratio side is not a plain number.
    #[error("not a number: {0:?}")]
    InvalidNumber(String),

    /// A side of a scale equation is not a length expression.
    #[error("not a length: {0:?}")]
    InvalidLength(String),

    /// Neither `A:B` nor `length = length`.
    #[error("expected `A:B` or `length = length`, got {0:?}")]
    Malformed(String),

    /// The resulting factor is zero, negative or not finite.
    #[error("scale factor must be positive, got {0}")]
    NonPositive(f64),
}

/// Result type for scale operations.
pub type Result<T> = std::result::Result<T, ScaleError>;
