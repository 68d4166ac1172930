//! Multi-instrument time alignment.
//!
//! Maps a comparative instrument's value timeline onto the primary
//! timeline being evaluated. For the destination bar, the adopted sample
//! is the most recent source sample whose open time is at or before the
//! destination's open time; a source bar is never read before it exists
//! on the destination clock.

use tape_series::{SeriesRead, TimestampView};

/// How repeated destination bars treat an already-seen source sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdoptMode {
    /// Hold the last source value across destination bars with no new
    /// source sample (daily comparative onto an intraday primary).
    Continuous,
    /// Consume each source sample at most once; destination bars between
    /// source samples read NaN. Prevents double-counting a comparative
    /// bar across faster-resolution destination bars.
    Precise,
}

/// Per-indicator alignment state: the absolute source index last handed
/// out. Persisted in evaluator state across bars.
#[derive(Debug, Clone, Default)]
pub struct AdoptCursor {
    consumed: Option<usize>,
}

impl AdoptCursor {
    /// Creates a fresh cursor with nothing consumed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the last adoption handed out a new source sample.
    #[must_use]
    pub fn has_consumed(&self) -> bool {
        self.consumed.is_some()
    }
}

/// Adopts a comparative value for the destination bar at `dest_ts`.
///
/// `values` and `timestamps` index the same source timeline (a bar-field
/// or derived series and its instrument's open times, advancing in
/// lockstep). Returns NaN during warm-up (no source sample at or before
/// `dest_ts`) and, in [`AdoptMode::Precise`], on destination bars whose
/// newest eligible sample was already consumed.
#[must_use]
pub fn adopt(
    values: &impl SeriesRead,
    timestamps: &TimestampView<'_>,
    dest_ts: i64,
    mode: AdoptMode,
    cursor: &mut AdoptCursor,
) -> f64 {
    debug_assert_eq!(values.len(), timestamps.len());

    let len = timestamps.len();
    // Newest-first scan: the first sample at or before dest_ts wins.
    let mut adopted: Option<usize> = None;
    for offset in 0..len {
        if let Some(ts) = timestamps.get(offset)
            && ts <= dest_ts
        {
            adopted = Some(offset);
            break;
        }
    }
    let Some(offset) = adopted else {
        return f64::NAN;
    };

    let absolute = len - 1 - offset;
    match mode {
        AdoptMode::Continuous => {
            cursor.consumed = Some(absolute);
            values.get(offset)
        }
        AdoptMode::Precise => {
            if cursor.consumed.is_some_and(|seen| seen >= absolute) {
                f64::NAN
            } else {
                cursor.consumed = Some(absolute);
                values.get(offset)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tape_series::BarStore;
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

    fn source_store(samples: &[(i64, f64)]) -> BarStore {
        let mut store = BarStore::new();
        for &(ts, close) in samples {
            store.append(make_bar(ts, close)).unwrap();
        }
        store
    }

    #[test]
    fn test_continuous_holds_last_value() {
        // Source sampled every 3rd destination bar.
        let store = source_store(&[(0, 10.0), (3000, 20.0)]);
        let closes = store.field(tape_series::BarField::Close);
        let times = store.timestamps();
        let mut cursor = AdoptCursor::new();

        let adopted: Vec<f64> = (0..6)
            .map(|i| adopt(&closes, &times, i * 1000, AdoptMode::Continuous, &mut cursor))
            .collect();

        assert_eq!(adopted[0], 10.0);
        assert_eq!(adopted[1], 10.0);
        assert_eq!(adopted[2], 10.0);
        assert_eq!(adopted[3], 20.0);
        assert_eq!(adopted[4], 20.0);
        assert_eq!(adopted[5], 20.0);
    }

    #[test]
    fn test_precise_consumes_each_sample_once() {
        let store = source_store(&[(0, 10.0), (3000, 20.0)]);
        let closes = store.field(tape_series::BarField::Close);
        let times = store.timestamps();
        let mut cursor = AdoptCursor::new();

        let adopted: Vec<f64> = (0..6)
            .map(|i| adopt(&closes, &times, i * 1000, AdoptMode::Precise, &mut cursor))
            .collect();

        assert_eq!(adopted[0], 10.0);
        assert!(adopted[1].is_nan());
        assert!(adopted[2].is_nan());
        assert_eq!(adopted[3], 20.0);
        assert!(adopted[4].is_nan());
        assert!(adopted[5].is_nan());
    }

    #[test]
    fn test_warmup_returns_nan() {
        let store = source_store(&[(5000, 10.0)]);
        let closes = store.field(tape_series::BarField::Close);
        let times = store.timestamps();
        let mut cursor = AdoptCursor::new();

        assert!(adopt(&closes, &times, 1000, AdoptMode::Continuous, &mut cursor).is_nan());
        assert!(adopt(&closes, &times, 4999, AdoptMode::Precise, &mut cursor).is_nan());
        assert!(!cursor.has_consumed());
    }

    #[test]
    fn test_no_lookahead_past_destination() {
        // Source has a future sample; only the past one is eligible.
        let store = source_store(&[(1000, 10.0), (9000, 99.0)]);
        let closes = store.field(tape_series::BarField::Close);
        let times = store.timestamps();
        let mut cursor = AdoptCursor::new();

        let value = adopt(&closes, &times, 5000, AdoptMode::Continuous, &mut cursor);
        assert_eq!(value, 10.0);
    }

    #[test]
    fn test_precise_skips_missed_intermediate_samples() {
        // Two source samples land between destination bars; only the
        // newest eligible one is handed out.
        let store = source_store(&[(1000, 10.0), (2000, 20.0), (3000, 30.0)]);
        let closes = store.field(tape_series::BarField::Close);
        let times = store.timestamps();
        let mut cursor = AdoptCursor::new();

        assert_eq!(
            adopt(&closes, &times, 1000, AdoptMode::Precise, &mut cursor),
            10.0
        );
        assert_eq!(
            adopt(&closes, &times, 3500, AdoptMode::Precise, &mut cursor),
            30.0
        );
        assert!(adopt(&closes, &times, 4000, AdoptMode::Precise, &mut cursor).is_nan());
    }
}
