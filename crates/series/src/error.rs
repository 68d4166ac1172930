//! Series store error types.

use thiserror::Error;

/// Errors raised by the bar series store.
#[derive(Debug, Error)]
pub enum SeriesError {
    /// Appended bar does not advance the timeline
    #[error("out-of-order bar: last open time {last_ms} ms, appended {bar_ms} ms")]
    OutOfOrder {
        /// Open time of the last stored bar.
        last_ms: i64,
        /// Open time of the rejected bar.
        bar_ms: i64,
    },

    /// Symbol handle does not resolve to a registered instrument
    #[error("unknown symbol handle: {0}")]
    UnknownSymbol(usize),
}
