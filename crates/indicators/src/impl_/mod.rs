//! Indicator evaluator implementations.

pub mod extension;
pub mod inside_bar;
pub mod market_cycle;
pub mod relative_strength;
pub mod volatility;
pub mod volume_classifier;
