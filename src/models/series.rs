use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::domain::bar::PriceBar;
use crate::utils::maths_utils::{get_max, get_min};

// ============================================================================
// PriceSeries: daily OHLCV history for one symbol, oldest to newest
// ============================================================================

/// Struct-of-vectors layout: per-field access stays cheap for indicator math
/// and the chart; `bar(idx)` materializes a row view on demand.
///
/// Daily bars skip weekends and holidays, so every bar carries its own
/// timestamp rather than deriving positions from a fixed stride.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PriceSeries {
    pub symbol: String,
    pub interval_ms: i64,

    pub timestamps_ms: Vec<i64>,

    // Prices
    pub opens: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub closes: Vec<f64>,

    // Volumes
    pub volumes: Vec<f64>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, interval_ms: i64) -> Self {
        PriceSeries {
            symbol: symbol.into(),
            interval_ms,
            ..Default::default()
        }
    }

    /// Append a bar, maintaining the oldest-to-newest / unique-timestamp
    /// invariant.
    pub fn push_bar(&mut self, bar: PriceBar) -> Result<()> {
        if let Some(&last_ts) = self.timestamps_ms.last() {
            if bar.timestamp_ms <= last_ts {
                bail!(
                    "bar timestamp {} is not after the previous bar at {}",
                    bar.timestamp_ms,
                    last_ts
                );
            }
        }

        self.timestamps_ms.push(bar.timestamp_ms);
        self.opens.push(bar.open);
        self.highs.push(bar.high);
        self.lows.push(bar.low);
        self.closes.push(bar.close);
        self.volumes.push(bar.volume);
        Ok(())
    }

    pub fn bar(&self, idx: usize) -> PriceBar {
        PriceBar::new(
            self.timestamps_ms[idx],
            self.opens[idx],
            self.highs[idx],
            self.lows[idx],
            self.closes[idx],
            self.volumes[idx],
        )
    }

    pub fn len(&self) -> usize {
        self.timestamps_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps_ms.is_empty()
    }

    pub fn last_bar(&self) -> Option<PriceBar> {
        if self.is_empty() {
            None
        } else {
            Some(self.bar(self.len() - 1))
        }
    }

    pub fn last_close(&self) -> Option<f64> {
        self.closes.last().copied()
    }

    pub fn highest_high(&self) -> Option<f64> {
        if self.highs.is_empty() {
            None
        } else {
            Some(get_max(&self.highs))
        }
    }

    pub fn lowest_low(&self) -> Option<f64> {
        if self.lows.is_empty() {
            None
        } else {
            Some(get_min(&self.lows))
        }
    }

    pub fn first_timestamp_ms(&self) -> Option<i64> {
        self.timestamps_ms.first().copied()
    }

    pub fn last_timestamp_ms(&self) -> Option<i64> {
        self.timestamps_ms.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::TimeUtils;

    fn bar(ts: i64, high: f64, low: f64, close: f64) -> PriceBar {
        PriceBar::new(ts, close, high, low, close, 1000.0)
    }

    fn day(n: i64) -> i64 {
        n * TimeUtils::MS_IN_D
    }

    #[test]
    fn test_push_preserves_order() {
        let mut series = PriceSeries::new("SPY", TimeUtils::MS_IN_D);
        series.push_bar(bar(day(1), 410.0, 400.0, 405.0)).unwrap();
        series.push_bar(bar(day(2), 412.0, 404.0, 411.0)).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.last_close(), Some(411.0));
        assert_eq!(series.bar(0).high, 410.0);
    }

    #[test]
    fn test_push_rejects_stale_timestamp() {
        let mut series = PriceSeries::new("SPY", TimeUtils::MS_IN_D);
        series.push_bar(bar(day(2), 410.0, 400.0, 405.0)).unwrap();

        assert!(series.push_bar(bar(day(2), 411.0, 401.0, 406.0)).is_err());
        assert!(series.push_bar(bar(day(1), 411.0, 401.0, 406.0)).is_err());
        assert_eq!(series.len(), 1, "rejected bars must not be appended");
    }

    #[test]
    fn test_extremes_over_whole_series() {
        let mut series = PriceSeries::new("SPY", TimeUtils::MS_IN_D);
        series.push_bar(bar(day(1), 408.0, 400.0, 404.0)).unwrap();
        series.push_bar(bar(day(2), 410.0, 401.0, 409.0)).unwrap();
        series.push_bar(bar(day(3), 407.0, 399.5, 405.0)).unwrap();

        assert_eq!(series.highest_high(), Some(410.0));
        assert_eq!(series.lowest_low(), Some(399.5));
    }

    #[test]
    fn test_empty_series_accessors() {
        let series = PriceSeries::new("SPY", TimeUtils::MS_IN_D);
        assert!(series.is_empty());
        assert_eq!(series.highest_high(), None);
        assert_eq!(series.lowest_low(), None);
        assert_eq!(series.last_close(), None);
        assert_eq!(series.last_bar(), None);
    }
}
