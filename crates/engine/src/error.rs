//! Engine error types.

use thiserror::Error;

/// Errors raised by the chart session driver.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Fewer bars preloaded than the active indicators require
    #[error("insufficient history: need {required} bars, got {available}")]
    InsufficientHistory {
        /// Required number of bars.
        required: usize,
        /// Bars actually recorded.
        available: usize,
    },

    /// Series store error
    #[error("series error: {0}")]
    Series(#[from] tape_series::SeriesError),

    /// Indicator error
    #[error("indicator error: {0}")]
    Indicator(#[from] tape_indicators::IndicatorError),
}
