//! Tape Indicators
//!
//! Incremental technical-indicator evaluation for the tape engine.
//! Provides the rolling statistics, the multi-instrument time aligner,
//! and the per-bar indicator evaluators driven by the chart session.
//!
//! # Components
//! - Rolling statistics over recency-indexed series (SMA, EMA, extrema,
//!   dispersion, momentum)
//! - Timestamp-based adoption of comparative-instrument values onto the
//!   primary timeline (continuous and precise modes)
//! - Evaluator state machines producing one fixed-arity output tuple per
//!   bar, with NaN as the "no signal" sentinel
//! - Declarative metadata (inputs, plots) and a registry for creating
//!   evaluators by name from JSON parameters
//!
//! # Available indicators
//! - `market_cycle`: running above/below-trend cycle counter
//! - `relative_strength`: aligned return ratio vs a comparative symbol
//! - `extension`: relative measure of extension oscillator (±100 band)
//! - `range_volatility`: blended multi-window range measure (0-100 band)
//! - `volume`: pocket-pivot volume classifier with period-aware average
//! - `inside_bar`: two-bar containment pattern flag

pub mod align;
pub mod context;
pub mod error;
pub mod impl_;
pub mod meta;
pub mod registry;
pub mod stats;
pub mod traits;

// Re-export main types
pub use align::{AdoptCursor, AdoptMode, adopt};
pub use context::EvalContext;
pub use error::IndicatorError;
pub use meta::{IndicatorMeta, InputDef, InputKind, PlotDef, PlotKind};
pub use registry::IndicatorRegistry;
pub use stats::{EmaState, MaKind};
pub use traits::{Evaluator, SymbolRequest};

// Re-export evaluator implementations
pub use impl_::{
    extension::Extension, inside_bar::InsideBar, market_cycle::MarketCycle,
    relative_strength::RelativeStrength, volatility::RangeVolatility,
    volume_classifier::VolumeClassifier,
};
