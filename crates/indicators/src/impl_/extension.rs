//! Relative measure of extension.
//!
//! Measures how far the bar has stretched from its own moving average,
//! in units of typical bar range, then rescales the raw reading into a
//! fixed ±100 band against its own trailing extremes.

use serde::Deserialize;
use tape_series::{BarField, SeriesHandle};

use crate::context::EvalContext;
use crate::error::IndicatorError;
use crate::meta::{IndicatorMeta, InputDef, PlotDef};
use crate::stats::{EmaState, highest, lowest, sma};
use crate::traits::Evaluator;

fn default_length() -> usize {
    21
}

fn default_smooth() -> usize {
    10
}

fn default_lookback() -> usize {
    50
}

/// Extension-oscillator parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionParams {
    /// Moving-average length for the anchor.
    #[serde(default = "default_length")]
    pub length: usize,
    /// EMA length smoothing the bar-range percent.
    #[serde(default = "default_smooth")]
    pub smooth: usize,
    /// Normalization window for the ±100 rescale.
    #[serde(default = "default_lookback")]
    pub lookback: usize,
}

/// Smoothing and normalization state carried across bars.
#[derive(Debug)]
struct ExtensionState {
    range_ema: EmaState,
    raw: Option<SeriesHandle>,
}

/// Relative-measure-of-extension evaluator.
#[derive(Debug)]
pub struct Extension {
    params: ExtensionParams,
    state: ExtensionState,
}

impl Extension {
    /// Creates the evaluator from validated parameters.
    ///
    /// # Errors
    /// Returns [`IndicatorError::ParamOutOfRange`] for zero or oversized
    /// window lengths.
    pub fn new(params: ExtensionParams) -> Result<Self, IndicatorError> {
        for (name, value) in [
            ("length", params.length),
            ("smooth", params.smooth),
            ("lookback", params.lookback),
        ] {
            if value == 0 || value > 500 {
                return Err(IndicatorError::param_out_of_range(
                    name,
                    value as f64,
                    1.0,
                    500.0,
                ));
            }
        }
        let range_ema = EmaState::new(params.smooth);
        Ok(Self {
            params,
            state: ExtensionState {
                range_ema,
                raw: None,
            },
        })
    }

    /// Creates the evaluator from JSON parameters.
    ///
    /// # Errors
    /// Returns [`IndicatorError::Json`] on malformed input and the
    /// validation errors of [`Extension::new`].
    pub fn from_params(params: &serde_json::Value) -> Result<Self, IndicatorError> {
        let params: ExtensionParams = serde_json::from_value(params.clone())?;
        Self::new(params)
    }
}

impl Evaluator for Extension {
    fn meta(&self) -> IndicatorMeta {
        IndicatorMeta::new(
            "extension",
            "Relative Measure of Extension",
            vec![
                InputDef::integer("length", "MA Length", 21, 1, 500),
                InputDef::integer("smooth", "Range Smoothing", 10, 1, 500),
                InputDef::integer("lookback", "Normalization Lookback", 50, 1, 500),
            ],
            vec![PlotDef::line("extension")],
        )
    }

    fn min_depth(&self) -> usize {
        self.params.length.max(self.params.lookback)
    }

    fn init(&mut self, ctx: &mut EvalContext<'_>) -> Result<(), IndicatorError> {
        let primary = ctx.primary_mut()?;
        self.state.raw = Some(primary.create_series(None, true, self.params.lookback));
        Ok(())
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> Result<Vec<f64>, IndicatorError> {
        let raw_handle = self
            .state
            .raw
            .ok_or_else(|| IndicatorError::NotInitialized("extension".to_string()))?;
        let primary = ctx.primary_mut()?;

        let (close, high, low) = {
            let bars = primary.bars();
            (
                bars.value(BarField::Close, 0),
                bars.value(BarField::High, 0),
                bars.value(BarField::Low, 0),
            )
        };
        if !close.is_finite() {
            return Ok(vec![f64::NAN]);
        }

        let ma = sma(&primary.field(BarField::Close), self.params.length);
        let range_pct = if close != 0.0 {
            (high - low) / close * 100.0
        } else {
            f64::NAN
        };
        let avg_range = self.state.range_ema.update(range_pct);

        let raw = if ma.is_finite() && ma != 0.0 && avg_range.is_finite() && avg_range != 0.0 {
            // Above trend the high measures the stretch, below it the low.
            let pivot = if close >= ma { high } else { low };
            ((pivot - ma) / ma * 100.0) / avg_range
        } else {
            f64::NAN
        };

        primary
            .series_mut(raw_handle)
            .ok_or_else(|| IndicatorError::NotInitialized("extension".to_string()))?
            .set(raw);

        let series = primary
            .series(raw_handle)
            .ok_or_else(|| IndicatorError::NotInitialized("extension".to_string()))?;
        let hi = highest(series, self.params.lookback);
        let lo = lowest(series, self.params.lookback);

        let value = if !raw.is_finite() || !hi.is_finite() || !lo.is_finite() {
            f64::NAN
        } else if hi == lo {
            // Degenerate window: sign decides the band edge.
            if raw > 0.0 {
                100.0
            } else if raw < 0.0 {
                -100.0
            } else {
                0.0
            }
        } else {
            -100.0 + 200.0 * (raw - lo) / (hi - lo)
        };

        Ok(vec![value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use tape_series::SymbolTable;
    use tape_types::{Bar, Resolution};

    fn make_evaluator() -> Extension {
        Extension::new(ExtensionParams {
            length: 5,
            smooth: 4,
            lookback: 8,
        })
        .unwrap()
    }

    fn run(evaluator: &mut Extension, bars: &[Bar]) -> Vec<f64> {
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

    fn random_walk_bars(count: usize, seed: u64) -> Vec<Bar> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut close: f64 = 100.0;
        (0..count)
            .map(|i| {
                let open = close;
                close *= 1.0 + rng.gen_range(-0.02..0.02);
                let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
                let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
                Bar {
                    timestamp_ms: (i as i64 + 1) * 86_400_000,
                    open,
                    high,
                    low,
                    close,
                    volume: 1000.0,
                }
            })
            .collect()
    }

    #[test]
    fn test_output_stays_in_band() {
        let bars = random_walk_bars(200, 7);
        let mut evaluator = make_evaluator();
        let outputs = run(&mut evaluator, &bars);

        for (i, value) in outputs.iter().enumerate() {
            if value.is_finite() {
                assert!((-100.0..=100.0).contains(value), "bar {i}: {value}");
            }
        }
        // A varied series produces signals after warm-up.
        assert!(outputs.iter().skip(10).all(|v| v.is_finite()));
    }

    #[test]
    fn test_zero_range_yields_no_signal() {
        // Fully flat bars have zero range, so the range normalization is
        // undefined and every output stays NaN.
        let bars: Vec<Bar> = (0..6)
            .map(|i| Bar {
                timestamp_ms: (i as i64 + 1) * 86_400_000,
                open: 50.0,
                high: 50.0,
                low: 50.0,
                close: 50.0,
                volume: 0.0,
            })
            .collect();
        let mut evaluator = make_evaluator();
        let outputs = run(&mut evaluator, &bars);

        assert!(outputs.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_degenerate_window_falls_back_by_sign() {
        // Identical non-flat bars: the raw extension is a positive
        // constant, so highest == lowest over the window and the signed
        // fallback pins the band edge.
        let bars: Vec<Bar> = (0..6)
            .map(|i| Bar {
                timestamp_ms: (i as i64 + 1) * 86_400_000,
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0,
                volume: 0.0,
            })
            .collect();
        let mut evaluator = make_evaluator();
        let outputs = run(&mut evaluator, &bars);

        assert!(outputs.iter().all(|v| (*v - 100.0).abs() < 1e-10));
    }

    #[test]
    fn test_stretch_above_average_reads_high_in_band() {
        // Flat history then a strong up-bar: raw jumps to the top of its
        // own window, so the rescaled value sits at the +100 edge.
        let mut bars: Vec<Bar> = (0..10)
            .map(|i| Bar {
                timestamp_ms: (i as i64 + 1) * 86_400_000,
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0,
                volume: 0.0,
            })
            .collect();
        bars.push(Bar {
            timestamp_ms: 11 * 86_400_000,
            open: 100.0,
            high: 112.0,
            low: 100.0,
            close: 111.0,
            volume: 0.0,
        });

        let mut evaluator = make_evaluator();
        let outputs = run(&mut evaluator, &bars);
        let last = *outputs.last().unwrap();
        assert!((last - 100.0).abs() < 1e-9, "last = {last}");
    }

    #[test]
    fn test_params_validation() {
        let err = Extension::from_params(&serde_json::json!({"lookback": 0}));
        assert!(matches!(err, Err(IndicatorError::ParamOutOfRange { .. })));
    }
}
