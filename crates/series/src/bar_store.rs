//! Append-only bar storage with recency-indexed reads.

use tape_types::Bar;

use crate::error::SeriesError;
use crate::view::SeriesRead;

/// Scalar field of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarField {
    /// Open price
    Open,
    /// High price
    High,
    /// Low price
    Low,
    /// Close price
    Close,
    /// Volume
    Volume,
}

impl BarField {
    /// Extracts this field from a bar.
    #[must_use]
    pub fn of(&self, bar: &Bar) -> f64 {
        match self {
            BarField::Open => bar.open,
            BarField::High => bar.high,
            BarField::Low => bar.low,
            BarField::Close => bar.close,
            BarField::Volume => bar.volume,
        }
    }
}

/// Append-only, time-indexed sequence of bars for one instrument.
///
/// Bars are immutable once appended and must arrive in strictly
/// increasing open-time order.
#[derive(Debug, Default)]
pub struct BarStore {
    bars: Vec<Bar>,
}

impl BarStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { bars: Vec::new() }
    }

    /// Appends a bar to the timeline.
    ///
    /// # Errors
    /// Returns [`SeriesError::OutOfOrder`] when the bar's open time does not
    /// advance past the last stored bar.
    pub fn append(&mut self, bar: Bar) -> Result<(), SeriesError> {
        if let Some(last) = self.bars.last()
            && bar.timestamp_ms <= last.timestamp_ms
        {
            return Err(SeriesError::OutOfOrder {
                last_ms: last.timestamp_ms,
                bar_ms: bar.timestamp_ms,
            });
        }
        self.bars.push(bar);
        Ok(())
    }

    /// Number of recorded bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// True when no bars are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bar at `offset` bars before the most recent, if recorded.
    #[must_use]
    pub fn bar(&self, offset: usize) -> Option<&Bar> {
        let len = self.bars.len();
        if offset < len {
            Some(&self.bars[len - 1 - offset])
        } else {
            None
        }
    }

    /// Open time at `offset` bars before the most recent, if recorded.
    #[must_use]
    pub fn timestamp(&self, offset: usize) -> Option<i64> {
        self.bar(offset).map(|b| b.timestamp_ms)
    }

    /// Scalar field value at `offset`; NaN beyond recorded history.
    #[must_use]
    pub fn value(&self, field: BarField, offset: usize) -> f64 {
        self.bar(offset).map_or(f64::NAN, |b| field.of(b))
    }

    /// Recency-indexed view over one scalar field.
    #[must_use]
    pub fn field(&self, field: BarField) -> FieldView<'_> {
        FieldView { store: self, field }
    }

    /// Recency-indexed view over bar open times.
    #[must_use]
    pub fn timestamps(&self) -> TimestampView<'_> {
        TimestampView { store: self }
    }
}

/// Projection of one bar field as a readable series.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    store: &'a BarStore,
    field: BarField,
}

impl SeriesRead for FieldView<'_> {
    fn len(&self) -> usize {
        self.store.len()
    }

    fn get(&self, offset: usize) -> f64 {
        self.store.value(self.field, offset)
    }
}

/// Recency-indexed view over bar open times.
#[derive(Debug, Clone, Copy)]
pub struct TimestampView<'a> {
    store: &'a BarStore,
}

impl TimestampView<'_> {
    /// Number of recorded bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True when no bars are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Open time at `offset`, if recorded.
    #[must_use]
    pub fn get(&self, offset: usize) -> Option<i64> {
        self.store.timestamp(offset)
    }
}
