//! Volume classifier.
//!
//! Classifies each bar against the lowest down-day volume of the recent
//! window. An up day closing in the top half of its range on volume
//! above that floor is a pocket pivot; a down day at or below the floor
//! is a reverse pocket pivot. Also emits a period-aware volume average.

use serde::Deserialize;
use tape_series::{BarField, SeriesHandle};
use tape_types::ColorCode;

use crate::context::EvalContext;
use crate::error::IndicatorError;
use crate::meta::{IndicatorMeta, InputDef, PlotDef};
use crate::stats::{lowest, sma};
use crate::traits::Evaluator;

fn default_floor_window() -> usize {
    10
}

fn default_daily_ma_length() -> usize {
    50
}

fn default_weekly_ma_length() -> usize {
    10
}

/// Volume-classifier parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeClassifierParams {
    /// Window for the down-day volume floor.
    #[serde(default = "default_floor_window")]
    pub floor_window: usize,
    /// Volume-average length on daily and intraday charts.
    #[serde(default = "default_daily_ma_length")]
    pub daily_ma_length: usize,
    /// Volume-average length on weekly charts.
    #[serde(default = "default_weekly_ma_length")]
    pub weekly_ma_length: usize,
}

/// Named output, serialized positionally at the boundary.
#[derive(Debug, Clone, Copy)]
struct VolumeOutput {
    volume: f64,
    color: Option<ColorCode>,
    volume_ma: f64,
}

impl VolumeOutput {
    fn nan() -> Self {
        Self {
            volume: f64::NAN,
            color: None,
            volume_ma: f64::NAN,
        }
    }

    fn into_values(self) -> Vec<f64> {
        vec![
            self.volume,
            ColorCode::value_or_nan(self.color),
            self.volume_ma,
        ]
    }
}

/// Volume-classifier evaluator.
#[derive(Debug)]
pub struct VolumeClassifier {
    params: VolumeClassifierParams,
    down_volume: Option<SeriesHandle>,
    ma_length: usize,
}

impl VolumeClassifier {
    /// Creates the evaluator from validated parameters.
    ///
    /// # Errors
    /// Returns [`IndicatorError::ParamOutOfRange`] for zero or oversized
    /// window lengths.
    pub fn new(params: VolumeClassifierParams) -> Result<Self, IndicatorError> {
        for (name, value, max) in [
            ("floor_window", params.floor_window, 100),
            ("daily_ma_length", params.daily_ma_length, 500),
            ("weekly_ma_length", params.weekly_ma_length, 500),
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
        let ma_length = params.daily_ma_length;
        Ok(Self {
            params,
            down_volume: None,
            ma_length,
        })
    }

    /// Creates the evaluator from JSON parameters.
    ///
    /// # Errors
    /// Returns [`IndicatorError::Json`] on malformed input and the
    /// validation errors of [`VolumeClassifier::new`].
    pub fn from_params(params: &serde_json::Value) -> Result<Self, IndicatorError> {
        let params: VolumeClassifierParams = serde_json::from_value(params.clone())?;
        Self::new(params)
    }
}

impl Evaluator for VolumeClassifier {
    fn meta(&self) -> IndicatorMeta {
        IndicatorMeta::new(
            "volume",
            "Volume Classifier",
            vec![
                InputDef::integer("floor_window", "Floor Window", 10, 1, 100),
                InputDef::integer("daily_ma_length", "Daily MA Length", 50, 1, 500),
                InputDef::integer("weekly_ma_length", "Weekly MA Length", 10, 1, 500),
            ],
            vec![
                PlotDef::histogram("volume"),
                PlotDef::colorer("volume_color"),
                PlotDef::line("volume_ma"),
            ],
        )
    }

    fn min_depth(&self) -> usize {
        self.ma_length.max(self.params.floor_window)
    }

    fn init(&mut self, ctx: &mut EvalContext<'_>) -> Result<(), IndicatorError> {
        let primary = ctx.primary_mut()?;
        // Average length follows the chart period.
        self.ma_length = if primary.resolution().is_weekly() {
            self.params.weekly_ma_length
        } else {
            self.params.daily_ma_length
        };
        self.down_volume = Some(primary.create_series(None, true, self.params.floor_window));
        Ok(())
    }

    fn evaluate(&mut self, ctx: &mut EvalContext<'_>) -> Result<Vec<f64>, IndicatorError> {
        let floor_handle = self
            .down_volume
            .ok_or_else(|| IndicatorError::NotInitialized("volume".to_string()))?;
        let primary = ctx.primary_mut()?;

        let Some(bar) = primary.bars().bar(0).copied() else {
            return Ok(VolumeOutput::nan().into_values());
        };

        primary
            .series_mut(floor_handle)
            .ok_or_else(|| IndicatorError::NotInitialized("volume".to_string()))?
            .set(if bar.is_down() { bar.volume } else { f64::NAN });

        let floor = lowest(
            primary
                .series(floor_handle)
                .ok_or_else(|| IndicatorError::NotInitialized("volume".to_string()))?,
            self.params.floor_window,
        );

        let top_half = bar.close > (bar.high + bar.low) / 2.0;
        let pocket_pivot = bar.is_up() && top_half && floor.is_finite() && bar.volume > floor;
        let reverse_pivot = bar.is_down() && floor.is_finite() && bar.volume <= floor;

        let color = if pocket_pivot {
            Some(ColorCode::Up)
        } else if reverse_pivot {
            Some(ColorCode::Down)
        } else {
            None
        };

        let volume_ma = sma(&primary.field(BarField::Volume), self.ma_length);

        Ok(VolumeOutput {
            volume: bar.volume,
            color,
            volume_ma,
        }
        .into_values())
    }
}
