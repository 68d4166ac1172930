//! Inside-bar pattern flag.

use crate::context::EvalContext;
use crate::error::IndicatorError;
use crate::meta::{IndicatorMeta, PlotDef};
use crate::traits::Evaluator;
use tape_series::BarField;

/// Flags bars whose high holds under the previous high while the low
/// holds strictly above the previous low.
#[derive(Debug, Default)]
pub struct InsideBar;

impl InsideBar {
    /// Creates the evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Creates the evaluator from JSON parameters (none are defined).
    ///
    /// # Errors
    /// Never fails; present for registry-factory uniformity.
    pub fn from_params(_params: &serde_json::Value) -> Result<Self, IndicatorError> {
        Ok(Self)
    }
}

impl Evaluator for InsideBar {
    fn meta(&self) -> IndicatorMeta {
        IndicatorMeta::new(
            "inside_bar",
            "Inside Bar",
            vec![],
            vec![PlotDef::shape("signal")],
        )
    }

    fn min_depth(&self) -> usize {
        2
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> Result<Vec<f64>, IndicatorError> {
        let bars = ctx.primary()?.bars();
        if bars.len() < 2 {
            return Ok(vec![f64::NAN]);
        }

        let contained = bars.value(BarField::High, 0) <= bars.value(BarField::High, 1)
            && bars.value(BarField::Low, 0) > bars.value(BarField::Low, 1);
        Ok(vec![if contained { 1.0 } else { 0.0 }])
    }
}
