//! Relative strength vs a comparative instrument.
//!
//! Ratio of the primary's lookback return to the comparative's, minus
//! one. The comparative leg is adopted in precise mode and mirrored into
//! a derived series on the primary timeline, so the lookback reads
//! aligned history. Positive values mean the primary outperformed the
//! comparative over the window.

use serde::Deserialize;
use tape_series::{BarField, SeriesHandle, SeriesRead, SymbolId};
use tape_types::{ColorCode, Resolution};

use crate::align::{AdoptCursor, AdoptMode, adopt};
use crate::context::EvalContext;
use crate::error::IndicatorError;
use crate::meta::{IndicatorMeta, InputDef, PlotDef};
use crate::stats::{falling, rising, sma};
use crate::traits::{Evaluator, SymbolRequest};

fn default_symbol() -> String {
    "SPY".to_string()
}

fn default_lookback() -> usize {
    50
}

fn default_trend_length() -> usize {
    10
}

fn default_confirm_length() -> usize {
    10
}

/// Relative-strength parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct RelativeStrengthParams {
    /// Comparative instrument ticker.
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Return lookback in bars.
    #[serde(default = "default_lookback")]
    pub lookback: usize,
    /// SMA length of the trend line over the ratio.
    #[serde(default = "default_trend_length")]
    pub trend_length: usize,
    /// Short SMA length for price confirmation.
    #[serde(default = "default_confirm_length")]
    pub confirm_length: usize,
}

/// Alignment and series state carried across bars.
#[derive(Debug, Default)]
struct RsState {
    cursor: AdoptCursor,
    comp_mirror: Option<SeriesHandle>,
    ratio: Option<SeriesHandle>,
    confirm_ma: Option<SeriesHandle>,
}

/// Named output, serialized positionally at the boundary.
#[derive(Debug, Clone, Copy)]
struct RsOutput {
    ratio: f64,
    trend: f64,
    color: Option<ColorCode>,
}

impl RsOutput {
    fn nan() -> Self {
        Self {
            ratio: f64::NAN,
            trend: f64::NAN,
            color: None,
        }
    }

    fn into_values(self) -> Vec<f64> {
        vec![self.ratio, self.trend, ColorCode::value_or_nan(self.color)]
    }
}

/// Relative-strength evaluator.
#[derive(Debug)]
pub struct RelativeStrength {
    params: RelativeStrengthParams,
    comparative: Option<SymbolId>,
    state: RsState,
}

impl RelativeStrength {
    /// Creates the evaluator from validated parameters.
    ///
    /// # Errors
    /// Returns [`IndicatorError::ParamOutOfRange`] for zero or oversized
    /// window lengths.
    pub fn new(params: RelativeStrengthParams) -> Result<Self, IndicatorError> {
        for (name, value, max) in [
            ("lookback", params.lookback, 500),
            ("trend_length", params.trend_length, 500),
            ("confirm_length", params.confirm_length, 100),
        ] {
            if value == 0 || value > max {
                return Err(IndicatorError::param_out_of_range(
                    name,
                    value as f64,
                    1.0,
                    max as f64,
                ));
            }
        }
        Ok(Self {
            params,
            comparative: None,
            state: RsState::default(),
        })
    }

    /// Creates the evaluator from JSON parameters.
    ///
    /// # Errors
    /// Returns [`IndicatorError::Json`] on malformed input and the
    /// validation errors of [`RelativeStrength::new`].
    pub fn from_params(params: &serde_json::Value) -> Result<Self, IndicatorError> {
        let params: RelativeStrengthParams = serde_json::from_value(params.clone())?;
        Self::new(params)
    }

    fn handles(&self) -> Result<(SeriesHandle, SeriesHandle, SeriesHandle), IndicatorError> {
        match (
            self.state.comp_mirror,
            self.state.ratio,
            self.state.confirm_ma,
        ) {
            (Some(mirror), Some(ratio), Some(confirm)) => Ok((mirror, ratio, confirm)),
            _ => Err(IndicatorError::NotInitialized(
                "relative_strength".to_string(),
            )),
        }
    }
}

impl Evaluator for RelativeStrength {
    fn meta(&self) -> IndicatorMeta {
        IndicatorMeta::new(
            "relative_strength",
            "Relative Strength",
            vec![
                InputDef::symbol("symbol", "Comparative Symbol", "SPY"),
                InputDef::integer("lookback", "Lookback", 50, 1, 500),
                InputDef::integer("trend_length", "Trend Length", 10, 1, 500),
                InputDef::integer("confirm_length", "Confirmation Length", 10, 1, 100),
            ],
            vec![
                PlotDef::line("ratio"),
                PlotDef::line("trend"),
                PlotDef::colorer("ratio_color"),
            ],
        )
    }

    fn min_depth(&self) -> usize {
        self.params.lookback + 1
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
            return Err(IndicatorError::UnboundSymbol(
                "relative_strength".to_string(),
            ));
        }
        Ok(())
    }

    fn init(&mut self, ctx: &mut EvalContext<'_>) -> Result<(), IndicatorError> {
        let primary = ctx.primary_mut()?;
        self.state.comp_mirror =
            Some(primary.create_series(None, true, self.params.lookback + 1));
        self.state.ratio = Some(primary.create_series(None, true, self.params.trend_length));
        self.state.confirm_ma = Some(primary.create_series(None, true, 2));
        Ok(())
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> Result<Vec<f64>, IndicatorError> {
        let comparative = self
            .comparative
            .ok_or_else(|| IndicatorError::UnboundSymbol("relative_strength".to_string()))?;
        let (mirror, ratio_handle, confirm_handle) = self.handles()?;

        let Some(dest_ts) = ctx.primary()?.bars().timestamp(0) else {
            return Ok(RsOutput::nan().into_values());
        };

        let adopted = {
            let comp = ctx.instrument(comparative)?;
            adopt(
                &comp.field(BarField::Close),
                &comp.bars().timestamps(),
                dest_ts,
                AdoptMode::Precise,
                &mut self.state.cursor,
            )
        };
        let fresh = adopted.is_finite();

        let primary = ctx.primary_mut()?;
        let lookback = self.params.lookback;

        {
            let series = primary
                .series_mut(mirror)
                .ok_or_else(|| IndicatorError::NotInitialized("relative_strength".to_string()))?;
            // Held bars carry the last adopted value so the lookback
            // window stays aligned to the primary timeline.
            let value = if fresh { adopted } else { series.get(1) };
            series.set(value);
        }

        let ratio = {
            let closes = primary.field(BarField::Close);
            let comp_series = primary
                .series(mirror)
                .ok_or_else(|| IndicatorError::NotInitialized("relative_strength".to_string()))?;
            let p0 = closes.get(0);
            let pl = closes.get(lookback);
            let c0 = comp_series.get(0);
            let cl = comp_series.get(lookback);
            let comp_return = c0 / cl;
            if fresh
                && p0.is_finite()
                && pl.is_finite()
                && pl != 0.0
                && cl != 0.0
                && comp_return.is_finite()
                && comp_return != 0.0
            {
                (p0 / pl) / comp_return - 1.0
            } else {
                f64::NAN
            }
        };

        primary
            .series_mut(ratio_handle)
            .ok_or_else(|| IndicatorError::NotInitialized("relative_strength".to_string()))?
            .set(ratio);
        let trend = sma(
            primary
                .series(ratio_handle)
                .ok_or_else(|| IndicatorError::NotInitialized("relative_strength".to_string()))?,
            self.params.trend_length,
        );

        let confirm = sma(&primary.field(BarField::Close), self.params.confirm_length);
        primary
            .series_mut(confirm_handle)
            .ok_or_else(|| IndicatorError::NotInitialized("relative_strength".to_string()))?
            .set(confirm);

        let color = {
            let confirm_series = primary
                .series(confirm_handle)
                .ok_or_else(|| IndicatorError::NotInitialized("relative_strength".to_string()))?;
            let close = primary.bars().value(BarField::Close, 0);
            if !ratio.is_finite() {
                None
            } else if rising(confirm_series, 1) && close > confirm {
                Some(ColorCode::Up)
            } else if falling(confirm_series, 1) && close < confirm {
                Some(ColorCode::Down)
            } else {
                None
            }
        };

        Ok(RsOutput {
            ratio,
            trend,
            color,
        }
        .into_values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tape_series::SymbolTable;
    use tape_types::Bar;

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

    fn make_evaluator(lookback: usize) -> RelativeStrength {
        RelativeStrength::new(RelativeStrengthParams {
            symbol: "SPY".to_string(),
            lookback,
            trend_length: 5,
            confirm_length: 3,
        })
        .unwrap()
    }

    fn run(
        evaluator: &mut RelativeStrength,
        primary_closes: &[f64],
        comp_closes: &[f64],
    ) -> Vec<Vec<f64>> {
        assert_eq!(primary_closes.len(), comp_closes.len());
        let mut table = SymbolTable::new();
        let primary = table.register("AAPL", Resolution::Daily);
        let comp = table.register("SPY", Resolution::Daily);
        evaluator.bind_symbols(&[comp]).unwrap();
        {
            let mut ctx = EvalContext::new(&mut table, primary);
            evaluator.init(&mut ctx).unwrap();
        }

        let mut outputs = Vec::new();
        for (i, (&p, &c)) in primary_closes.iter().zip(comp_closes).enumerate() {
            let ts = (i as i64 + 1) * 86_400_000;
            table
                .context_mut(comp)
                .unwrap()
                .append(make_bar(ts, c))
                .unwrap();
            table
                .context_mut(primary)
                .unwrap()
                .append(make_bar(ts, p))
                .unwrap();
            let mut ctx = EvalContext::new(&mut table, primary);
            outputs.push(evaluator.evaluate(&mut ctx).unwrap());
        }
        outputs
    }

    #[test]
    fn test_identical_series_ratio_is_zero() {
        let closes: Vec<f64> = (0..12).map(|i| 100.0 + i as f64).collect();
        let mut evaluator = make_evaluator(4);
        let outputs = run(&mut evaluator, &closes, &closes);

        // Warm-up: lookback reads need lookback+1 aligned samples.
        for output in outputs.iter().take(4) {
            assert!(output[0].is_nan());
        }
        for output in outputs.iter().skip(4) {
            assert!(output[0].abs() < 1e-10, "ratio {}", output[0]);
        }
    }

    #[test]
    fn test_outperformance_is_positive() {
        // Primary doubles while the comparative is flat.
        let primary: Vec<f64> = (0..8).map(|i| 100.0 * (1.0 + 0.1 * i as f64)).collect();
        let comp = vec![50.0; 8];
        let mut evaluator = make_evaluator(4);
        let outputs = run(&mut evaluator, &primary, &comp);

        let last = outputs.last().unwrap();
        assert!(last[0] > 0.0);
    }

    #[test]
    fn test_zero_lookback_value_yields_no_signal() {
        let primary = vec![1.0, 2.0, 3.0, 4.0];
        let comp = vec![0.0, 1.0, 1.0, 1.0];
        let mut evaluator = make_evaluator(3);
        let outputs = run(&mut evaluator, &primary, &comp);

        // Comparative lookback value is exactly 0: NaN ratio, no color.
        let last = outputs.last().unwrap();
        assert!(last[0].is_nan());
        assert!(last[2].is_nan());
    }

    #[test]
    fn test_confirmation_color_on_rising_price() {
        // Steadily rising primary above its short SMA, flat comparative
        // ticking upward keeps the ratio finite.
        let primary: Vec<f64> = (0..10).map(|i| 10.0 + i as f64).collect();
        let comp: Vec<f64> = (0..10).map(|i| 100.0 + 0.1 * i as f64).collect();
        let mut evaluator = make_evaluator(3);
        let outputs = run(&mut evaluator, &primary, &comp);

        let last = outputs.last().unwrap();
        assert!(last[0].is_finite());
        assert_eq!(last[2], ColorCode::Up.to_value());
    }

    #[test]
    fn test_params_validation() {
        let err = RelativeStrength::from_params(&serde_json::json!({"lookback": 0}));
        assert!(matches!(err, Err(IndicatorError::ParamOutOfRange { .. })));

        let evaluator = RelativeStrength::from_params(&serde_json::json!({})).unwrap();
        assert_eq!(evaluator.params.lookback, 50);
    }
}
