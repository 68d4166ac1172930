//! Chart session orchestration.

use tape_indicators::{EvalContext, Evaluator};
use tape_series::{SymbolId, SymbolTable};
use tape_types::{Bar, Resolution};

use crate::error::EngineError;

/// One indicator's output tuple for the current bar.
///
/// `values` carries one entry per declared plot, in declaration order;
/// NaN entries mean "no signal this bar".
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorOutput {
    /// Registry id of the indicator.
    pub indicator: String,
    /// Positional plot values.
    pub values: Vec<f64>,
}

struct ActiveIndicator {
    id: String,
    plot_count: usize,
    min_depth: usize,
    evaluator: Box<dyn Evaluator>,
}

/// Chart session: instrument feeds, active indicators, per-bar pass.
///
/// The host pushes comparative bars with [`ChartSession::push_bar`] and
/// drives evaluation with [`ChartSession::on_bar`]; evaluators run in
/// registration order, each completing before the next starts.
pub struct ChartSession {
    symbols: SymbolTable,
    primary: SymbolId,
    indicators: Vec<ActiveIndicator>,
}

impl ChartSession {
    /// Creates a session for the given primary instrument.
    pub fn new(ticker: impl Into<String>, resolution: Resolution) -> Self {
        let mut symbols = SymbolTable::new();
        let ticker = ticker.into();
        tracing::info!(
            "Chart session opened: {} @ {}",
            ticker,
            resolution.as_str()
        );
        let primary = symbols.register(ticker, resolution);
        Self {
            symbols,
            primary,
            indicators: Vec::new(),
        }
    }

    /// Handle of the primary instrument.
    #[must_use]
    pub fn primary(&self) -> SymbolId {
        self.primary
    }

    /// Registered instrument table.
    #[must_use]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Registers a comparative instrument feed, reusing an existing
    /// context when the same ticker and resolution are already tracked.
    pub fn add_symbol(&mut self, ticker: &str, resolution: Resolution) -> SymbolId {
        if let Some(id) = self.symbols.find(ticker, resolution) {
            return id;
        }
        tracing::info!("Comparative feed added: {} @ {}", ticker, resolution.as_str());
        self.symbols.register(ticker, resolution)
    }

    /// Activates an indicator on this chart.
    ///
    /// Resolves the evaluator's comparative feeds, binds the handles,
    /// and runs its one-time init against the symbol table.
    ///
    /// # Errors
    /// Returns [`EngineError::Indicator`] when binding or init fails.
    pub fn add_indicator(&mut self, mut evaluator: Box<dyn Evaluator>) -> Result<(), EngineError> {
        let meta = evaluator.meta();

        let requests = evaluator.required_symbols();
        let ids: Vec<SymbolId> = requests
            .iter()
            .map(|req| self.add_symbol(&req.ticker, req.resolution))
            .collect();
        evaluator.bind_symbols(&ids)?;

        let mut ctx = EvalContext::new(&mut self.symbols, self.primary);
        evaluator.init(&mut ctx)?;

        let min_depth = evaluator.min_depth();
        tracing::info!(
            "Indicator registered: {} ({} plots, depth {})",
            meta.title,
            meta.plot_count(),
            min_depth
        );
        self.indicators.push(ActiveIndicator {
            id: meta.id.clone(),
            plot_count: meta.plot_count(),
            min_depth,
            evaluator,
        });
        Ok(())
    }

    /// Appends a bar to a comparative feed.
    ///
    /// # Errors
    /// Returns [`EngineError::Series`] for unknown handles or
    /// out-of-order bars.
    pub fn push_bar(&mut self, id: SymbolId, bar: Bar) -> Result<(), EngineError> {
        self.symbols.context_mut(id)?.append(bar)?;
        Ok(())
    }

    /// Appends the primary bar and evaluates every active indicator.
    ///
    /// Comparative bars for the same period must be pushed before this
    /// call so all reads within the pass observe one consistent bar
    /// index per instrument. An evaluator that fails is reported as a
    /// NaN row; the pass never aborts mid-bar.
    ///
    /// # Errors
    /// Returns [`EngineError::Series`] when the primary bar is rejected.
    pub fn on_bar(&mut self, bar: Bar) -> Result<Vec<IndicatorOutput>, EngineError> {
        self.symbols.context_mut(self.primary)?.append(bar)?;

        let mut rows = Vec::with_capacity(self.indicators.len());
        for active in &mut self.indicators {
            let mut ctx = EvalContext::new(&mut self.symbols, self.primary);
            let values = match active.evaluator.evaluate(&mut ctx) {
                Ok(values) => {
                    debug_assert_eq!(values.len(), active.plot_count, "{}", active.id);
                    values
                }
                Err(err) => {
                    tracing::warn!(
                        "Indicator {} failed, emitting NaN outputs: {}",
                        active.id,
                        err
                    );
                    vec![f64::NAN; active.plot_count]
                }
            };
            rows.push(IndicatorOutput {
                indicator: active.id.clone(),
                values,
            });
        }
        Ok(rows)
    }

    /// Minimum bars of history the active indicators need preloaded.
    ///
    /// The host preloads at least this many bars before first
    /// evaluation; see [`crate::warmup::validate_history`].
    #[must_use]
    pub fn min_depth(&self) -> usize {
        self.indicators
            .iter()
            .map(|active| active.min_depth)
            .max()
            .unwrap_or(0)
    }
}
