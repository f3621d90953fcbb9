use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq)]
pub enum BarDirection {
    Bullish,
    Bearish,
}

/// One trading interval. Immutable once built for a given timestamp.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub timestamp_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(timestamp_ms: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        PriceBar {
            timestamp_ms,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn direction(&self) -> BarDirection {
        if self.close >= self.open {
            BarDirection::Bullish
        } else {
            BarDirection::Bearish
        }
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// (high + low + close) / 3 — the price VWAP accumulates
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    // Returns the low and high of the candle body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        match self.direction() {
            BarDirection::Bullish => (self.open, self.close),
            BarDirection::Bearish => (self.close, self.open),
        }
    }
}
