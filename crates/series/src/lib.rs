//! Tape Series
//!
//! Bar series store for the tape indicator engine.
//! Each tracked instrument owns an append-only, time-indexed bar timeline
//! plus any derived scalar series created against it. All reads are
//! recency-indexed: offset 0 is the current bar, offset `k` is `k` bars
//! earlier. Reads beyond recorded history yield NaN, never an error.

#![deny(clippy::all)]

pub mod bar_store;
pub mod context;
pub mod derived;
pub mod error;
pub mod view;

pub use bar_store::{BarField, BarStore, FieldView, TimestampView};
pub use context::{InstrumentContext, SeriesHandle, SymbolId, SymbolTable};
pub use derived::DerivedSeries;
pub use error::SeriesError;
pub use view::SeriesRead;
