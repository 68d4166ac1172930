/// One OHLCV sample for a fixed time interval.
/// `timestamp_ms` is the **open time** (not close time).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bar {
    /// Unix epoch milliseconds UTC (open time)
    pub timestamp_ms: i64,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Volume
    pub volume: f64,
}

impl Bar {
    /// True when the bar closed above its open.
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.close > self.open
    }

    /// True when the bar closed below its open.
    #[must_use]
    pub fn is_down(&self) -> bool {
        self.close < self.open
    }

    /// High minus low.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}
