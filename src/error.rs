//! Error types for palette clustering.
//!
//! The algorithm itself never fails once its inputs are accepted; errors
//! are raised only at the boundary, before any centroid is computed.

use thiserror::Error;

/// Main error type for palette operations.
///
/// # Examples
///
/// ```
/// use aprender_palette::error::PaletteError;
///
/// let err = PaletteError::invalid_k(0, 10);
/// assert!(err.to_string().contains("Invalid argument"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// A parameter is outside its accepted range.
    #[error("Invalid argument: {param} = {value}, expected {constraint}")]
    InvalidArgument {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// An accessor that needs fitted centroids was called before `fit`.
    #[error("Model not fitted. Call fit() first.")]
    NotFitted,
}

impl PaletteError {
    /// Create the error for a cluster count outside `[1, len]`.
    #[must_use]
    pub fn invalid_k(k: usize, len: usize) -> Self {
        Self::InvalidArgument {
            param: "k".to_string(),
            value: k.to_string(),
            constraint: format!("1 <= k <= dataset length ({len})"),
        }
    }

    /// Create the error for an empty dataset.
    #[must_use]
    pub fn empty_dataset() -> Self {
        Self::InvalidArgument {
            param: "dataset.len()".to_string(),
            value: "0".to_string(),
            constraint: "at least one color".to_string(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, PaletteError>;
