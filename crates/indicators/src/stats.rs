//! Rolling statistics over recency-indexed series.
//!
//! Each function reads a trailing window ending at the current bar and
//! returns one scalar. Windows degrade gracefully: fewer samples than
//! `length` means the effective window is whatever is retained, and an
//! empty or all-NaN window yields NaN. Non-finite samples are skipped by
//! the mean/extrema/dispersion functions and carried through by the
//! exponential average. Nothing here panics or errors for data-driven
//! reasons.

use serde::{Deserialize, Serialize};
use tape_series::SeriesRead;

/// Moving-average flavor, resolved once at indicator init.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MaKind {
    /// Simple moving average
    Sma,
    /// Exponential moving average
    Ema,
}

/// Dispatches to [`sma`] or [`ema`] by kind.
#[must_use]
pub fn moving_average(kind: MaKind, series: &impl SeriesRead, length: usize) -> f64 {
    match kind {
        MaKind::Sma => sma(series, length),
        MaKind::Ema => ema(series, length),
    }
}

/// Arithmetic mean of the last `length` values, current bar included.
///
/// Computes over however many finite samples the window retains; NaN when
/// none exist or `length` is 0.
#[must_use]
pub fn sma(series: &impl SeriesRead, length: usize) -> f64 {
    if length == 0 {
        return f64::NAN;
    }
    let window = length.min(series.len());
    let mut sum = 0.0;
    let mut count = 0usize;
    for offset in 0..window {
        let value = series.get(offset);
        if value.is_finite() {
            sum += value;
            count += 1;
        }
    }
    if count == 0 { f64::NAN } else { sum / count as f64 }
}

/// Recursive exponential average over the retained history.
///
/// Seeded with the oldest available finite value; smoothing factor
/// `2 / (length + 1)`. Non-finite samples carry the previous average
/// forward.
#[must_use]
pub fn ema(series: &impl SeriesRead, length: usize) -> f64 {
    if length == 0 || series.is_empty() {
        return f64::NAN;
    }
    let alpha = 2.0 / (length as f64 + 1.0);
    let mut prev = f64::NAN;
    for offset in (0..series.len()).rev() {
        let value = series.get(offset);
        if !value.is_finite() {
            continue;
        }
        prev = if prev.is_finite() {
            alpha * value + (1.0 - alpha) * prev
        } else {
            value
        };
    }
    prev
}

/// Maximum over the trailing window, skipping NaN.
#[must_use]
pub fn highest(series: &impl SeriesRead, length: usize) -> f64 {
    extreme(series, length, f64::gt).0
}

/// Minimum over the trailing window, skipping NaN.
#[must_use]
pub fn lowest(series: &impl SeriesRead, length: usize) -> f64 {
    extreme(series, length, f64::lt).0
}

/// 0-based offset of the window maximum; the most recent wins ties.
/// NaN when the window holds no finite sample.
#[must_use]
pub fn highest_bars(series: &impl SeriesRead, length: usize) -> f64 {
    extreme(series, length, f64::gt).1
}

/// 0-based offset of the window minimum; the most recent wins ties.
/// NaN when the window holds no finite sample.
#[must_use]
pub fn lowest_bars(series: &impl SeriesRead, length: usize) -> f64 {
    extreme(series, length, f64::lt).1
}

/// Scans the trailing window for the extreme under `better`.
/// Most recent offsets are visited first, so ties keep the smaller offset.
fn extreme(series: &impl SeriesRead, length: usize, better: fn(&f64, &f64) -> bool) -> (f64, f64) {
    if length == 0 {
        return (f64::NAN, f64::NAN);
    }
    let window = length.min(series.len());
    let mut best = f64::NAN;
    let mut best_offset = f64::NAN;
    for offset in 0..window {
        let value = series.get(offset);
        if !value.is_finite() {
            continue;
        }
        if !best.is_finite() || better(&value, &best) {
            best = value;
            best_offset = offset as f64;
        }
    }
    (best, best_offset)
}

/// Population (biased) standard deviation over the trailing window.
#[must_use]
pub fn stdev(series: &impl SeriesRead, length: usize) -> f64 {
    if length == 0 {
        return f64::NAN;
    }
    let window = length.min(series.len());
    let mean = sma(series, length);
    if !mean.is_finite() {
        return f64::NAN;
    }
    let mut sum_sq = 0.0;
    let mut count = 0usize;
    for offset in 0..window {
        let value = series.get(offset);
        if value.is_finite() {
            sum_sq += (value - mean).powi(2);
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        (sum_sq / count as f64).sqrt()
    }
}

/// True iff each of the last `length` values strictly exceeds its
/// predecessor. Requires `length + 1` retained samples; false otherwise.
#[must_use]
pub fn rising(series: &impl SeriesRead, length: usize) -> bool {
    if length == 0 || series.len() < length + 1 {
        return false;
    }
    (0..length).all(|offset| series.get(offset) > series.get(offset + 1))
}

/// True iff each of the last `length` values is strictly below its
/// predecessor. Requires `length + 1` retained samples; false otherwise.
#[must_use]
pub fn falling(series: &impl SeriesRead, length: usize) -> bool {
    if length == 0 || series.len() < length + 1 {
        return false;
    }
    (0..length).all(|offset| series.get(offset) < series.get(offset + 1))
}

/// `current - previous`; NaN with fewer than two samples.
#[must_use]
pub fn change(series: &impl SeriesRead) -> f64 {
    series.get(0) - series.get(1)
}

/// `(current - value[length]) / value[length]`.
///
/// NaN when the historical value is 0, missing, or non-finite.
#[must_use]
pub fn rate_of_change(series: &impl SeriesRead, length: usize) -> f64 {
    let base = series.get(length);
    let current = series.get(0);
    if base == 0.0 || !base.is_finite() || !current.is_finite() {
        return f64::NAN;
    }
    (current - base) / base
}

/// Incremental exponential average carried across bars.
///
/// The per-bar recurrence form of [`ema`], held in evaluator state:
/// seeded by the first finite update, smoothing factor `2 / (length + 1)`,
/// non-finite updates carry the previous value.
#[derive(Debug, Clone)]
pub struct EmaState {
    alpha: f64,
    prev: f64,
}

impl EmaState {
    /// Creates an unseeded state for the given length.
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self {
            alpha: 2.0 / (length as f64 + 1.0),
            prev: f64::NAN,
        }
    }

    /// Folds one sample in and returns the running average.
    pub fn update(&mut self, value: f64) -> f64 {
        if value.is_finite() {
            self.prev = if self.prev.is_finite() {
                self.alpha * value + (1.0 - self.alpha) * self.prev
            } else {
                value
            };
        }
        self.prev
    }

    /// Running average without folding a new sample.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.prev
    }
}
