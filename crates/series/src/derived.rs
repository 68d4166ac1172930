//! Derived scalar series.
//!
//! A derived series advances in lockstep with its instrument's bar
//! timeline: one `advance()` per appended bar opens a fresh current slot,
//! which the owning evaluator writes at most once per evaluation pass.

use std::collections::VecDeque;

use crate::view::SeriesRead;

/// Append-only scalar sequence owned by an instrument context.
///
/// Bounded series retain a fixed number of slots and evict the oldest
/// once the depth is exceeded; the depth is fixed at creation and never
/// shrinks. Unbounded series retain the instrument's full history.
#[derive(Debug)]
pub struct DerivedSeries {
    values: VecDeque<f64>,
    depth: Option<usize>,
    initial: Option<f64>,
}

impl DerivedSeries {
    /// Creates a bounded series retaining `depth` slots.
    #[must_use]
    pub fn bounded(initial: Option<f64>, depth: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(depth.max(1)),
            depth: Some(depth.max(1)),
            initial,
        }
    }

    /// Creates an unbounded series retaining full history.
    #[must_use]
    pub fn unbounded(initial: Option<f64>) -> Self {
        Self {
            values: VecDeque::new(),
            depth: None,
            initial,
        }
    }

    /// Retention depth; `None` for unbounded series.
    #[must_use]
    pub fn depth(&self) -> Option<usize> {
        self.depth
    }

    /// Opens a fresh current-bar slot.
    ///
    /// The first slot starts at the configured initial value; later slots
    /// start unset (NaN) until the evaluator writes them.
    pub fn advance(&mut self) {
        let seed = if self.values.is_empty() {
            self.initial.unwrap_or(f64::NAN)
        } else {
            f64::NAN
        };
        self.values.push_back(seed);
        if let Some(depth) = self.depth
            && self.values.len() > depth
        {
            self.values.pop_front();
        }
    }

    /// Writes the current-bar slot.
    ///
    /// At most one logical write per evaluation pass; a repeated write
    /// silently overwrites and must not be relied upon to undo the first.
    pub fn set(&mut self, value: f64) {
        if let Some(slot) = self.values.back_mut() {
            *slot = value;
        }
    }
}

impl SeriesRead for DerivedSeries {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn get(&self, offset: usize) -> f64 {
        let len = self.values.len();
        if offset < len {
            self.values[len - 1 - offset]
        } else {
            f64::NAN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_and_set() {
        let mut series = DerivedSeries::unbounded(None);
        series.advance();
        series.set(1.0);
        series.advance();
        series.set(2.0);
        series.advance();

        assert_eq!(series.len(), 3);
        assert!(series.get(0).is_nan()); // current slot unset
        assert_eq!(series.get(1), 2.0);
        assert_eq!(series.get(2), 1.0);
        assert!(series.get(3).is_nan());
    }

    #[test]
    fn test_initial_value_seeds_first_slot() {
        let mut series = DerivedSeries::unbounded(Some(0.0));
        series.advance();
        assert_eq!(series.get(0), 0.0);

        series.advance();
        assert!(series.get(0).is_nan());
        assert_eq!(series.get(1), 0.0);
    }

    #[test]
    fn test_bounded_eviction() {
        let mut series = DerivedSeries::bounded(None, 3);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            series.advance();
            series.set(v);
        }

        assert_eq!(series.len(), 3);
        assert_eq!(series.get(0), 5.0);
        assert_eq!(series.get(2), 3.0);
        // Evicted beyond the fixed depth
        assert!(series.get(3).is_nan());
    }

    #[test]
    fn test_overwrite_is_silent() {
        let mut series = DerivedSeries::unbounded(None);
        series.advance();
        series.set(1.0);
        series.set(7.0);
        assert_eq!(series.get(0), 7.0);
    }
}
