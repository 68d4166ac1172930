//! Range-volatility measure.
//!
//! Blends short-window range measures of highs, closes, and lows taken
//! over 2-bar and 3-bar windows, then rescales the blend to a 0-100 band
//! against its own trailing extremes.

use serde::Deserialize;
use tape_series::{BarField, SeriesHandle};

use crate::context::EvalContext;
use crate::error::IndicatorError;
use crate::meta::{IndicatorMeta, InputDef, PlotDef};
use crate::stats::{highest, lowest};
use crate::traits::Evaluator;

fn default_lookback() -> usize {
    15
}

/// Range-volatility parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct RangeVolatilityParams {
    /// Normalization window for the 0-100 rescale.
    #[serde(default = "default_lookback")]
    pub lookback: usize,
}

/// Range-volatility evaluator.
#[derive(Debug)]
pub struct RangeVolatility {
    params: RangeVolatilityParams,
    blend: Option<SeriesHandle>,
}

impl RangeVolatility {
    /// Creates the evaluator from validated parameters.
    ///
    /// # Errors
    /// Returns [`IndicatorError::ParamOutOfRange`] for a degenerate
    /// normalization window.
    pub fn new(params: RangeVolatilityParams) -> Result<Self, IndicatorError> {
        if params.lookback < 2 || params.lookback > 500 {
            return Err(IndicatorError::param_out_of_range(
                "lookback",
                params.lookback as f64,
                2.0,
                500.0,
            ));
        }
        Ok(Self {
            params,
            blend: None,
        })
    }

    /// Creates the evaluator from JSON parameters.
    ///
    /// # Errors
    /// Returns [`IndicatorError::Json`] on malformed input and the
    /// validation errors of [`RangeVolatility::new`].
    pub fn from_params(params: &serde_json::Value) -> Result<Self, IndicatorError> {
        let params: RangeVolatilityParams = serde_json::from_value(params.clone())?;
        Self::new(params)
    }
}

impl Evaluator for RangeVolatility {
    fn meta(&self) -> IndicatorMeta {
        IndicatorMeta::new(
            "range_volatility",
            "Range Volatility",
            vec![InputDef::integer(
                "lookback",
                "Normalization Lookback",
                15,
                2,
                500,
            )],
            vec![PlotDef::line("volatility")],
        )
    }

    fn min_depth(&self) -> usize {
        self.params.lookback + 3
    }

    fn init(&mut self, ctx: &mut EvalContext<'_>) -> Result<(), IndicatorError> {
        let primary = ctx.primary_mut()?;
        self.blend = Some(primary.create_series(None, true, self.params.lookback));
        Ok(())
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> Result<Vec<f64>, IndicatorError> {
        let blend_handle = self
            .blend
            .ok_or_else(|| IndicatorError::NotInitialized("range_volatility".to_string()))?;
        let primary = ctx.primary_mut()?;

        if primary.bars().len() < 3 {
            return Ok(vec![f64::NAN]);
        }

        let combined = {
            let highs = primary.field(BarField::High);
            let lows = primary.field(BarField::Low);
            let closes = primary.field(BarField::Close);

            // Percent spans of highs, closes, and lows over one window.
            let spans = |window: usize| -> (f64, f64, f64) {
                let close_floor = lowest(&closes, window);
                let low_floor = lowest(&lows, window);
                let t1 = if close_floor != 0.0 {
                    (highest(&highs, window) - lowest(&highs, window)) / close_floor * 100.0
                } else {
                    f64::NAN
                };
                let t2 = if close_floor != 0.0 {
                    (highest(&closes, window) - close_floor) / close_floor * 100.0
                } else {
                    f64::NAN
                };
                let t3 = if low_floor != 0.0 {
                    (highest(&lows, window) - low_floor) / low_floor * 100.0
                } else {
                    f64::NAN
                };
                (t1, t2, t3)
            };

            let (a1, a2, a3) = spans(2);
            let (b1, b2, _) = spans(3);
            let short = (a1 + 1.5 * a2 + a3) / 3.5;
            let long = (b1 + 1.5 * b2) / 2.5;
            (3.0 * short + long) / 4.0
        };

        primary
            .series_mut(blend_handle)
            .ok_or_else(|| IndicatorError::NotInitialized("range_volatility".to_string()))?
            .set(combined);

        let series = primary
            .series(blend_handle)
            .ok_or_else(|| IndicatorError::NotInitialized("range_volatility".to_string()))?;
        let hi = highest(series, self.params.lookback);
        let lo = lowest(series, self.params.lookback);

        let value = if !combined.is_finite() || !hi.is_finite() || !lo.is_finite() {
            f64::NAN
        } else if hi == lo {
            // Flat normalization window: sign decides the band edge.
            if combined > 0.0 { 100.0 } else { 0.0 }
        } else {
            100.0 * (combined - lo) / (hi - lo)
        };

        Ok(vec![value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tape_series::SymbolTable;
    use tape_types::{Bar, Resolution};

    fn make_bar(ts: i64, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            timestamp_ms: ts,
            open,
            high,
            low,
            close,
            volume: 0.0,
        }
    }

    fn run(lookback: usize, bars: &[Bar]) -> Vec<f64> {
        let mut evaluator =
            RangeVolatility::new(RangeVolatilityParams { lookback }).unwrap();
        let mut table = SymbolTable::new();
        let primary = table.register("AAPL", Resolution::Daily);
        {
            let mut ctx = EvalContext::new(&mut table, primary);
            evaluator.init(&mut ctx).unwrap();
        }

        let mut outputs = Vec::new();
        for bar in bars {
            table.context_mut(primary).unwrap().append(*bar).unwrap();
            let mut ctx = EvalContext::new(&mut table, primary);
            outputs.push(evaluator.evaluate(&mut ctx).unwrap()[0]);
        }
        outputs
    }

    #[test]
    fn test_warmup_needs_three_bars() {
        let bars = vec![
            make_bar(1000, 10.0, 11.0, 9.0, 10.5),
            make_bar(2000, 10.5, 12.0, 10.0, 11.0),
            make_bar(3000, 11.0, 12.5, 10.5, 12.0),
        ];
        let outputs = run(5, &bars);
        assert!(outputs[0].is_nan());
        assert!(outputs[1].is_nan());
        assert!(outputs[2].is_finite());
    }

    #[test]
    fn test_output_stays_in_band() {
        let mut bars = Vec::new();
        let mut price = 100.0;
        for i in 0..40 {
            // Alternating expansion and contraction of the bar range.
            let spread = if i % 3 == 0 { 4.0 } else { 1.0 };
            let open = price;
            price += if i % 2 == 0 { 1.5 } else { -1.0 };
            bars.push(make_bar(
                (i as i64 + 1) * 1000,
                open,
                open.max(price) + spread,
                open.min(price) - spread,
                price,
            ));
        }
        let outputs = run(10, &bars);

        for (i, value) in outputs.iter().enumerate().skip(2) {
            assert!(value.is_finite(), "bar {i}");
            assert!((0.0..=100.0).contains(value), "bar {i}: {value}");
        }
    }

    #[test]
    fn test_flat_window_uses_signed_fallback() {
        // Two alternating bars: every 2- and 3-bar window sees the same
        // spans, so the blend is a positive constant and the trailing
        // extremes collapse.
        let bars: Vec<Bar> = (0..8)
            .map(|i| {
                if i % 2 == 0 {
                    make_bar((i as i64 + 1) * 1000, 100.0, 101.0, 99.0, 100.0)
                } else {
                    make_bar((i as i64 + 1) * 1000, 102.0, 103.0, 101.0, 102.0)
                }
            })
            .collect();
        let outputs = run(5, &bars);

        assert_eq!(*outputs.last().unwrap(), 100.0);
    }

    #[test]
    fn test_expansion_reads_high_contraction_reads_low() {
        let mut bars: Vec<Bar> = (0..12)
            .map(|i| make_bar((i as i64 + 1) * 1000, 100.0, 101.0, 99.0, 100.0))
            .collect();
        // Range expansion at the end.
        bars.push(make_bar(13_000, 100.0, 112.0, 95.0, 108.0));
        let outputs = run(10, &bars);

        let last = *outputs.last().unwrap();
        assert!((last - 100.0).abs() < 1e-9, "expansion should top the band: {last}");
    }

    #[test]
    fn test_params_validation() {
        assert!(matches!(
            RangeVolatility::from_params(&serde_json::json!({"lookback": 1})),
            Err(IndicatorError::ParamOutOfRange { .. })
        ));
        let evaluator = RangeVolatility::from_params(&serde_json::json!({})).unwrap();
        assert_eq!(evaluator.params.lookback, 15);
    }
}
