//! Recency-indexed read access.
//!
//! The uniform read interface consumed by the rolling statistics: offset 0
//! is the most recent value, offset `k` the value `k` bars before it.
//! Out-of-range reads yield NaN so warm-up periods degrade to "no signal"
//! instead of erroring.

/// Read-only view over a time-ordered scalar sequence.
pub trait SeriesRead {
    /// Number of retained values.
    fn len(&self) -> usize;

    /// Value at `offset` bars before the most recent one.
    /// Returns NaN when `offset` exceeds retained history.
    fn get(&self, offset: usize) -> f64;

    /// True when no values are retained.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Slices read newest-last, matching chronological test fixtures.
impl SeriesRead for [f64] {
    fn len(&self) -> usize {
        <[f64]>::len(self)
    }

    fn get(&self, offset: usize) -> f64 {
        let len = <[f64]>::len(self);
        if offset < len { self[len - 1 - offset] } else { f64::NAN }
    }
}

impl SeriesRead for Vec<f64> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, offset: usize) -> f64 {
        SeriesRead::get(self.as_slice(), offset)
    }
}
