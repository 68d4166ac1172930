//! Market-cycle counter.
//!
//! Counts consecutive bars a comparative instrument's daily close spends
//! above or below its own moving average. Staying on one side steps the
//! counter away from zero; crossing resets it to +1 or -1.

use serde::Deserialize;
use tape_series::{BarField, SymbolId};
use tape_types::{ColorCode, Resolution};

use crate::align::{AdoptCursor, AdoptMode, adopt};
use crate::context::EvalContext;
use crate::error::IndicatorError;
use crate::meta::{IndicatorMeta, InputDef, PlotDef};
use crate::stats::{MaKind, moving_average};
use crate::traits::{Evaluator, SymbolRequest};

fn default_symbol() -> String {
    "SPY".to_string()
}

fn default_ma_length() -> usize {
    21
}

fn default_ma_kind() -> MaKind {
    MaKind::Sma
}

/// Market-cycle parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketCycleParams {
    /// Comparative instrument ticker.
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Trend moving-average length.
    #[serde(default = "default_ma_length")]
    pub ma_length: usize,
    /// Trend moving-average kind.
    #[serde(default = "default_ma_kind")]
    pub ma_kind: MaKind,
}

/// Counter state carried across bars.
#[derive(Debug, Default)]
struct CycleState {
    count: i64,
    above: Option<bool>,
    cursor: AdoptCursor,
}

/// Named output, serialized positionally at the boundary.
#[derive(Debug, Clone, Copy)]
struct CycleOutput {
    count: f64,
    color: Option<ColorCode>,
}

impl CycleOutput {
    fn into_values(self) -> Vec<f64> {
        vec![self.count, ColorCode::value_or_nan(self.color)]
    }
}

/// Market-cycle counter evaluator.
#[derive(Debug)]
pub struct MarketCycle {
    params: MarketCycleParams,
    comparative: Option<SymbolId>,
    state: CycleState,
}

impl MarketCycle {
    /// Creates the evaluator from validated parameters.
    ///
    /// # Errors
    /// Returns [`IndicatorError::ParamOutOfRange`] for a zero or oversized
    /// moving-average length.
    pub fn new(params: MarketCycleParams) -> Result<Self, IndicatorError> {
        if params.ma_length == 0 || params.ma_length > 500 {
            return Err(IndicatorError::param_out_of_range(
                "ma_length",
                params.ma_length as f64,
                1.0,
                500.0,
            ));
        }
        Ok(Self {
            params,
            comparative: None,
            state: CycleState::default(),
        })
    }

    /// Creates the evaluator from JSON parameters.
    ///
    /// # Errors
    /// Returns [`IndicatorError::Json`] on malformed input and the
    /// validation errors of [`MarketCycle::new`].
    pub fn from_params(params: &serde_json::Value) -> Result<Self, IndicatorError> {
        let params: MarketCycleParams = serde_json::from_value(params.clone())?;
        Self::new(params)
    }
}

impl Evaluator for MarketCycle {
    fn meta(&self) -> IndicatorMeta {
        IndicatorMeta::new(
            "market_cycle",
            "Market Cycle",
            vec![
                InputDef::symbol("symbol", "Comparative Symbol", "SPY"),
                InputDef::integer("ma_length", "MA Length", 21, 1, 500),
                InputDef::text("ma_kind", "MA Kind", "SMA"),
            ],
            vec![
                PlotDef::histogram("count"),
                PlotDef::colorer("count_color"),
            ],
        )
    }

    fn min_depth(&self) -> usize {
        self.params.ma_length
    }

    fn required_symbols(&self) -> Vec<SymbolRequest> {
        vec![SymbolRequest::new(
            self.params.symbol.clone(),
            Resolution::Daily,
        )]
    }

    fn bind_symbols(&mut self, ids: &[SymbolId]) -> Result<(), IndicatorError> {
        self.comparative = ids.first().copied();
        if self.comparative.is_none() {
            return Err(IndicatorError::UnboundSymbol("market_cycle".to_string()));
        }
        Ok(())
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> Result<Vec<f64>, IndicatorError> {
        let comparative = self
            .comparative
            .ok_or_else(|| IndicatorError::UnboundSymbol("market_cycle".to_string()))?;

        let Some(dest_ts) = ctx.primary()?.bars().timestamp(0) else {
            return Ok(CycleOutput {
                count: f64::NAN,
                color: None,
            }
            .into_values());
        };

        let comp = ctx.instrument(comparative)?;
        let closes = comp.field(BarField::Close);
        let times = comp.bars().timestamps();
        let adopted = adopt(
            &closes,
            &times,
            dest_ts,
            AdoptMode::Precise,
            &mut self.state.cursor,
        );

        // One counter step per comparative bar; held bars re-emit.
        if adopted.is_finite() {
            let ma = moving_average(self.params.ma_kind, &closes, self.params.ma_length);
            if ma.is_finite() {
                let above = adopted >= ma;
                self.state.count = match self.state.above {
                    Some(prev) if prev == above => {
                        if above {
                            self.state.count + 1
                        } else {
                            self.state.count - 1
                        }
                    }
                    _ => {
                        if above {
                            1
                        } else {
                            -1
                        }
                    }
                };
                self.state.above = Some(above);
            }
        }

        let output = match self.state.above {
            Some(above) => CycleOutput {
                count: self.state.count as f64,
                color: Some(if above { ColorCode::Up } else { ColorCode::Down }),
            },
            None => CycleOutput {
                count: f64::NAN,
                color: None,
            },
        };
        Ok(output.into_values())
    }
}
