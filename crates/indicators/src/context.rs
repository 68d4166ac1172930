//! Evaluation context.
//!
//! One `EvalContext` is built by the driver per evaluator call. It hands
//! out instrument contexts by explicit handle; there is no ambient
//! "selected instrument" to restore, so one evaluator's reads can never
//! leak into the next one's.

use tape_series::{InstrumentContext, SymbolId, SymbolTable};

use crate::error::IndicatorError;

/// Per-call access to the symbol table for one evaluator.
pub struct EvalContext<'a> {
    symbols: &'a mut SymbolTable,
    primary: SymbolId,
}

impl<'a> EvalContext<'a> {
    /// Creates a context rooted at the primary instrument.
    pub fn new(symbols: &'a mut SymbolTable, primary: SymbolId) -> Self {
        Self { symbols, primary }
    }

    /// Handle of the primary instrument.
    #[must_use]
    pub fn primary_id(&self) -> SymbolId {
        self.primary
    }

    /// Primary instrument context.
    ///
    /// # Errors
    /// Returns [`IndicatorError::Series`] if the handle no longer resolves.
    pub fn primary(&self) -> Result<&InstrumentContext, IndicatorError> {
        self.instrument(self.primary)
    }

    /// Primary instrument context, mutable.
    ///
    /// # Errors
    /// Returns [`IndicatorError::Series`] if the handle no longer resolves.
    pub fn primary_mut(&mut self) -> Result<&mut InstrumentContext, IndicatorError> {
        self.instrument_mut(self.primary)
    }

    /// Resolves any instrument by handle.
    ///
    /// # Errors
    /// Returns [`IndicatorError::Series`] if the handle no longer resolves.
    pub fn instrument(&self, id: SymbolId) -> Result<&InstrumentContext, IndicatorError> {
        Ok(self.symbols.context(id)?)
    }

    /// Resolves any instrument by handle, mutable.
    ///
    /// # Errors
    /// Returns [`IndicatorError::Series`] if the handle no longer resolves.
    pub fn instrument_mut(
        &mut self,
        id: SymbolId,
    ) -> Result<&mut InstrumentContext, IndicatorError> {
        Ok(self.symbols.context_mut(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tape_types::Resolution;

    #[test]
    fn test_context_resolves_primary() {
        let mut table = SymbolTable::new();
        let primary = table.register("SPY", Resolution::Daily);
        let other = table.register("QQQ", Resolution::Daily);

        let ctx = EvalContext::new(&mut table, primary);
        assert_eq!(ctx.primary_id(), primary);
        assert_eq!(ctx.primary().unwrap().ticker(), "SPY");
        assert_eq!(ctx.instrument(other).unwrap().ticker(), "QQQ");
    }
}
