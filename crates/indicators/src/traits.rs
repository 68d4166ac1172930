//! Evaluator trait and symbol requirements.

use tape_series::SymbolId;
use tape_types::Resolution;

use crate::context::EvalContext;
use crate::error::IndicatorError;
use crate::meta::IndicatorMeta;

/// Request for a comparative instrument feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRequest {
    /// Instrument ticker.
    pub ticker: String,
    /// Feed resolution.
    pub resolution: Resolution,
}

impl SymbolRequest {
    /// Creates a feed request.
    #[must_use]
    pub fn new(ticker: impl Into<String>, resolution: Resolution) -> Self {
        Self {
            ticker: ticker.into(),
            resolution,
        }
    }
}

/// Trait for indicator evaluators.
///
/// An evaluator is constructed from validated parameters, bound to its
/// comparative feeds, initialized once against the symbol table, then
/// called once per primary bar. Per-bar state lives in explicit state
/// fields on the implementing struct, mutated exactly once per pass.
///
/// # Evaluation contract
/// `evaluate` returns one value per declared plot, in declaration order,
/// with NaN meaning "no signal this bar". Numeric edge cases (division by
/// zero, short history) must surface as NaN in the tuple, never as an
/// error; an `Err` marks a wiring defect (unbound symbol, stale handle)
/// and makes the driver emit a NaN row for the bar without aborting the
/// pass.
pub trait Evaluator: Send {
    /// Declarative metadata consumed by the host UI.
    fn meta(&self) -> IndicatorMeta;

    /// Minimum bars of history to preload before the first evaluation.
    fn min_depth(&self) -> usize;

    /// Comparative feeds this evaluator needs, in binding order.
    fn required_symbols(&self) -> Vec<SymbolRequest> {
        Vec::new()
    }

    /// Receives the handles for [`Evaluator::required_symbols`], same order.
    ///
    /// # Errors
    /// Returns [`IndicatorError::InvalidParams`] when the handle count
    /// does not match the request count.
    fn bind_symbols(&mut self, ids: &[SymbolId]) -> Result<(), IndicatorError> {
        let _ = ids;
        Ok(())
    }

    /// One-time setup: create derived series against instrument contexts.
    ///
    /// # Errors
    /// Returns an error when a bound handle does not resolve.
    fn init(&mut self, ctx: &mut EvalContext<'_>) -> Result<(), IndicatorError> {
        let _ = ctx;
        Ok(())
    }

    /// Computes the output tuple for the current primary bar.
    ///
    /// # Errors
    /// See the evaluation contract above.
    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> Result<Vec<f64>, IndicatorError>;
}
