//! Tape Types
//!
//! Core data structures for the tape indicator engine.
//! This crate provides the bar, resolution, and plot color types shared
//! by the series store, the indicator evaluators, and the evaluation
//! driver. Each layer above defines its own error type; the shared NaN
//! sentinel convention carries "no signal" through output tuples.

#![deny(clippy::all)]

pub mod bar;
pub mod color;
pub mod resolution;

// Re-export main types for convenience
pub use bar::Bar;
pub use color::ColorCode;
pub use resolution::{ParseResolutionError, Resolution};
