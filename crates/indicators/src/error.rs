//! Indicator error types.

use thiserror::Error;

/// Errors that can occur during evaluator construction or registry operations.
///
/// Data-driven numeric edge cases never raise these; they surface as NaN in
/// the output tuple. Errors mark contract violations at the API boundary.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// Unknown indicator name requested from registry
    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    /// Invalid parameters for the indicator
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Parameter out of valid range
    #[error("parameter out of range: {param} = {value} (valid: {min}..{max})")]
    ParamOutOfRange {
        /// Parameter name.
        param: String,
        /// Parameter value.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Evaluator used before its comparative symbols were bound
    #[error("comparative symbol not bound for indicator: {0}")]
    UnboundSymbol(String),

    /// Evaluator used before `init` created its derived series
    #[error("indicator not initialized: {0}")]
    NotInitialized(String),

    /// Series store error
    #[error("series error: {0}")]
    Series(#[from] tape_series::SeriesError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IndicatorError {
    /// Creates an `InvalidParams` error with a message.
    #[must_use]
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        IndicatorError::InvalidParams(msg.into())
    }

    /// Creates a `ParamOutOfRange` error.
    #[must_use]
    pub fn param_out_of_range(param: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        IndicatorError::ParamOutOfRange {
            param: param.into(),
            value,
            min,
            max,
        }
    }
}
