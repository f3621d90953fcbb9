use crate::config::ANALYSIS;
use crate::models::series::PriceSeries;
use crate::utils::maths_utils::mean;

// ============================================================================
// IndicatorSet: derived per-bar decoration of a PriceSeries
// ============================================================================

/// Vectors are aligned with the series bars; a slot is `None` until its
/// window has filled. The scalar fields describe the last bar only, which is
/// all the level math and the overview panel consume.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    pub sma_short: Vec<Option<f64>>,
    pub sma_long: Vec<Option<f64>>,
    pub band_upper: Vec<Option<f64>>,
    pub band_lower: Vec<Option<f64>>,
    pub vwap: Vec<Option<f64>>,
    pub volume_ma: Vec<Option<f64>>,

    // Last-bar scalars
    pub rsi_last: Option<f64>,
    pub macd_last: Option<f64>,
    pub pct_change_last: Option<f64>,
}

impl IndicatorSet {
    pub fn compute(series: &PriceSeries) -> Self {
        let cfg = &ANALYSIS.indicators;
        if series.len() < ANALYSIS.window.min_bars_for_indicators {
            // Not enough bars for any window; leave everything undefined
            return IndicatorSet::default();
        }

        let closes = &series.closes;
        let (band_upper, band_lower) = volatility_bands(closes, cfg.band_window, cfg.band_sigma);

        IndicatorSet {
            sma_short: sma(closes, cfg.sma_short),
            sma_long: sma(closes, cfg.sma_long),
            band_upper,
            band_lower,
            vwap: running_vwap(series),
            volume_ma: sma(&series.volumes, cfg.volume_ma),
            rsi_last: wilder_rsi(closes, cfg.rsi_period),
            macd_last: macd_last(closes, cfg.macd_fast, cfg.macd_slow),
            pct_change_last: pct_change_last(closes),
        }
    }

    pub fn last_sma_short(&self) -> Option<f64> {
        self.sma_short.last().copied().flatten()
    }

    pub fn last_sma_long(&self) -> Option<f64> {
        self.sma_long.last().copied().flatten()
    }

    pub fn last_band_upper(&self) -> Option<f64> {
        self.band_upper.last().copied().flatten()
    }

    pub fn last_band_lower(&self) -> Option<f64> {
        self.band_lower.last().copied().flatten()
    }

    pub fn last_vwap(&self) -> Option<f64> {
        self.vwap.last().copied().flatten()
    }
}

/// Simple moving average; `None` until the window has filled.
fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = Some(sum / window as f64);
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out[i] = Some(sum / window as f64);
    }
    out
}

/// Midline SMA +/- `sigma` standard deviations over the same window.
fn volatility_bands(
    values: &[f64],
    window: usize,
    sigma: f64,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let mut upper = vec![None; values.len()];
    let mut lower = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return (upper, lower);
    }

    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        let mid = mean(slice);
        let variance = slice.iter().map(|v| (v - mid) * (v - mid)).sum::<f64>() / window as f64;
        let sd = variance.sqrt();
        upper[i] = Some(mid + sigma * sd);
        lower[i] = Some(mid - sigma * sd);
    }
    (upper, lower)
}

/// Cumulative volume-weighted average of the typical price.
/// `None` while the cumulative volume is still zero (e.g. index data with no
/// published volume).
fn running_vwap(series: &PriceSeries) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(series.len());
    let mut cum_pv = 0.0;
    let mut cum_volume = 0.0;

    for idx in 0..series.len() {
        let bar = series.bar(idx);
        cum_pv += bar.typical_price() * bar.volume;
        cum_volume += bar.volume;
        out.push(if cum_volume > 0.0 {
            Some(cum_pv / cum_volume)
        } else {
            None
        });
    }
    out
}

/// Wilder-smoothed relative strength index for the last bar.
fn wilder_rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() <= period {
        return None;
    }

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for i in 1..=period {
        let delta = closes[i] - closes[i - 1];
        if delta >= 0.0 {
            gain_sum += delta;
        } else {
            loss_sum -= delta;
        }
    }

    let period_f = period as f64;
    let mut avg_gain = gain_sum / period_f;
    let mut avg_loss = loss_sum / period_f;

    for i in (period + 1)..closes.len() {
        let delta = closes[i] - closes[i - 1];
        let (gain, loss) = if delta >= 0.0 { (delta, 0.0) } else { (0.0, -delta) };
        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;
    }

    if avg_loss == 0.0 {
        return Some(100.0);
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Final value of an exponential moving average seeded with the first
/// `period` bars' SMA.
fn ema_last(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema: f64 = values[..period].iter().sum::<f64>() / period as f64;
    for value in &values[period..] {
        ema = value * k + ema * (1.0 - k);
    }
    Some(ema)
}

/// MACD-style oscillator: fast EMA minus slow EMA, last bar only.
fn macd_last(values: &[f64], fast: usize, slow: usize) -> Option<f64> {
    Some(ema_last(values, fast)? - ema_last(values, slow)?)
}

/// Percent change of the last close versus the one before it.
fn pct_change_last(closes: &[f64]) -> Option<f64> {
    if closes.len() < 2 {
        return None;
    }
    let prev = closes[closes.len() - 2];
    if prev == 0.0 {
        return None;
    }
    Some((closes[closes.len() - 1] - prev) / prev * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::PriceBar;
    use crate::utils::TimeUtils;

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let mut series = PriceSeries::new("TEST", TimeUtils::MS_IN_D);
        for (i, &close) in closes.iter().enumerate() {
            let ts = (i as i64 + 1) * TimeUtils::MS_IN_D;
            series
                .push_bar(PriceBar::new(ts, close, close + 1.0, close - 1.0, close, 100.0))
                .unwrap();
        }
        series
    }

    #[test]
    fn test_sma_window() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let out = sma(&values, 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_eq!(out[2], Some(2.0));
        assert_eq!(out[4], Some(4.0));
    }

    #[test]
    fn test_sma_window_larger_than_input() {
        assert!(sma(&[1.0, 2.0], 5).iter().all(Option::is_none));
    }

    #[test]
    fn test_bands_straddle_midline() {
        let values = [10.0, 12.0, 11.0, 13.0, 12.0, 14.0];
        let (upper, lower) = volatility_bands(&values, 3, 2.0);
        for i in 2..values.len() {
            let up = upper[i].unwrap();
            let low = lower[i].unwrap();
            let mid = mean(&values[i - 2..=i]);
            assert!(up >= mid, "upper band below midline at {}", i);
            assert!(low <= mid, "lower band above midline at {}", i);
        }
    }

    #[test]
    fn test_vwap_equal_volumes_is_mean_of_typical_prices() {
        let series = series_from_closes(&[100.0, 102.0]);
        let vwap = running_vwap(&series);
        // typical price == close here (high = close+1, low = close-1)
        assert!((vwap[0].unwrap() - 100.0).abs() < 1e-9);
        assert!((vwap[1].unwrap() - 101.0).abs() < 1e-9);
    }

    #[test]
    fn test_vwap_undefined_without_volume() {
        let mut series = PriceSeries::new("IDX", TimeUtils::MS_IN_D);
        series
            .push_bar(PriceBar::new(TimeUtils::MS_IN_D, 100.0, 101.0, 99.0, 100.0, 0.0))
            .unwrap();
        assert_eq!(running_vwap(&series)[0], None);
    }

    #[test]
    fn test_rsi_saturates_on_monotonic_rise() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        assert_eq!(wilder_rsi(&closes, 14), Some(100.0));
    }

    #[test]
    fn test_rsi_needs_more_bars_than_period() {
        let closes = [100.0, 101.0, 102.0];
        assert_eq!(wilder_rsi(&closes, 14), None);
    }

    #[test]
    fn test_pct_change_last() {
        let change = pct_change_last(&[400.0, 410.0]).unwrap();
        assert!((change - 2.5).abs() < 1e-9);
        assert_eq!(pct_change_last(&[400.0]), None);
    }

    #[test]
    fn test_compute_on_short_series_is_all_none() {
        let series = series_from_closes(&[100.0]);
        let ind = IndicatorSet::compute(&series);
        assert_eq!(ind.last_sma_short(), None);
        assert_eq!(ind.last_vwap(), None);
        assert_eq!(ind.rsi_last, None);
    }
}
