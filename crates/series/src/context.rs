//! Instrument contexts and symbol handles.
//!
//! Every series operation names its instrument through an explicit
//! [`SymbolId`] resolved against the [`SymbolTable`]; there is no ambient
//! "selected instrument" state, so a read can never target the wrong
//! timeline by omission.

use tape_types::{Bar, Resolution};

use crate::bar_store::{BarField, BarStore, FieldView};
use crate::derived::DerivedSeries;
use crate::error::SeriesError;

/// Handle to a registered instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(usize);

impl SymbolId {
    /// Raw table index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Handle to a derived series within one instrument context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeriesHandle(usize);

/// One tracked symbol: its bar timeline plus derived series.
#[derive(Debug)]
pub struct InstrumentContext {
    ticker: String,
    resolution: Resolution,
    bars: BarStore,
    derived: Vec<DerivedSeries>,
}

impl InstrumentContext {
    fn new(ticker: String, resolution: Resolution) -> Self {
        Self {
            ticker,
            resolution,
            bars: BarStore::new(),
            derived: Vec::new(),
        }
    }

    /// Instrument ticker.
    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Feed resolution.
    #[must_use]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Bar timeline.
    #[must_use]
    pub fn bars(&self) -> &BarStore {
        &self.bars
    }

    /// Recency view over one bar field.
    #[must_use]
    pub fn field(&self, field: BarField) -> FieldView<'_> {
        self.bars.field(field)
    }

    /// Appends a bar and advances every derived series in lockstep.
    ///
    /// # Errors
    /// Returns [`SeriesError::OutOfOrder`] when the bar does not advance
    /// the timeline; derived series are left untouched in that case.
    pub fn append(&mut self, bar: Bar) -> Result<(), SeriesError> {
        self.bars.append(bar)?;
        for series in &mut self.derived {
            series.advance();
        }
        Ok(())
    }

    /// Allocates a derived series against this instrument.
    ///
    /// Bounded series fix their retention depth here; it never shrinks
    /// afterwards. The handle is only valid for this context.
    pub fn create_series(
        &mut self,
        initial: Option<f64>,
        bounded: bool,
        depth: usize,
    ) -> SeriesHandle {
        let series = if bounded {
            DerivedSeries::bounded(initial, depth)
        } else {
            DerivedSeries::unbounded(initial)
        };
        self.derived.push(series);
        SeriesHandle(self.derived.len() - 1)
    }

    /// Resolves a derived-series handle for reading.
    #[must_use]
    pub fn series(&self, handle: SeriesHandle) -> Option<&DerivedSeries> {
        self.derived.get(handle.0)
    }

    /// Resolves a derived-series handle for the current-bar write.
    pub fn series_mut(&mut self, handle: SeriesHandle) -> Option<&mut DerivedSeries> {
        self.derived.get_mut(handle.0)
    }
}

/// Registry of instrument contexts, addressed by [`SymbolId`].
#[derive(Debug, Default)]
pub struct SymbolTable {
    contexts: Vec<InstrumentContext>,
}

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            contexts: Vec::new(),
        }
    }

    /// Registers an instrument feed and returns its handle.
    pub fn register(&mut self, ticker: impl Into<String>, resolution: Resolution) -> SymbolId {
        self.contexts
            .push(InstrumentContext::new(ticker.into(), resolution));
        SymbolId(self.contexts.len() - 1)
    }

    /// Resolves a symbol handle.
    ///
    /// # Errors
    /// Returns [`SeriesError::UnknownSymbol`] for a stale or foreign handle.
    pub fn context(&self, id: SymbolId) -> Result<&InstrumentContext, SeriesError> {
        self.contexts
            .get(id.0)
            .ok_or(SeriesError::UnknownSymbol(id.0))
    }

    /// Resolves a symbol handle mutably.
    ///
    /// # Errors
    /// Returns [`SeriesError::UnknownSymbol`] for a stale or foreign handle.
    pub fn context_mut(&mut self, id: SymbolId) -> Result<&mut InstrumentContext, SeriesError> {
        self.contexts
            .get_mut(id.0)
            .ok_or(SeriesError::UnknownSymbol(id.0))
    }

    /// Finds an already-registered instrument by ticker and resolution.
    #[must_use]
    pub fn find(&self, ticker: &str, resolution: Resolution) -> Option<SymbolId> {
        self.contexts
            .iter()
            .position(|ctx| ctx.ticker == ticker && ctx.resolution == resolution)
            .map(SymbolId)
    }

    /// Number of registered instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// True when no instrument is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::SeriesRead;

    fn make_bar(ts: i64, close: f64) -> Bar {
        Bar {
            timestamp_ms: ts,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut table = SymbolTable::new();
        let spy = table.register("SPY", Resolution::Daily);
        let qqq = table.register("QQQ", Resolution::Daily);

        assert_eq!(table.len(), 2);
        assert_eq!(table.context(spy).unwrap().ticker(), "SPY");
        assert_eq!(table.context(qqq).unwrap().ticker(), "QQQ");
    }

    #[test]
    fn test_derived_series_advance_with_bars() {
        let mut table = SymbolTable::new();
        let id = table.register("SPY", Resolution::Daily);

        let ctx = table.context_mut(id).unwrap();
        let handle = ctx.create_series(None, false, 0);

        ctx.append(make_bar(1000, 10.0)).unwrap();
        ctx.series_mut(handle).unwrap().set(1.0);
        ctx.append(make_bar(2000, 11.0)).unwrap();
        ctx.series_mut(handle).unwrap().set(2.0);

        let series = ctx.series(handle).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.get(0), 2.0);
        assert_eq!(series.get(1), 1.0);
    }

    #[test]
    fn test_find_matches_ticker_and_resolution() {
        let mut table = SymbolTable::new();
        let daily = table.register("SPY", Resolution::Daily);
        let weekly = table.register("SPY", Resolution::Weekly);

        assert_eq!(table.find("SPY", Resolution::Daily), Some(daily));
        assert_eq!(table.find("SPY", Resolution::Weekly), Some(weekly));
        assert_eq!(table.find("QQQ", Resolution::Daily), None);
    }

    #[test]
    fn test_contexts_are_independent() {
        let mut table = SymbolTable::new();
        let a = table.register("AAA", Resolution::Daily);
        let b = table.register("BBB", Resolution::Daily);

        table
            .context_mut(a)
            .unwrap()
            .append(make_bar(1000, 1.0))
            .unwrap();

        assert_eq!(table.context(a).unwrap().bars().len(), 1);
        assert_eq!(table.context(b).unwrap().bars().len(), 0);
    }
}
