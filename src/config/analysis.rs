//! Analysis and computation configuration

/// Retracement fractions applied between the period high and low
pub struct RetracementConfig {
    pub ratios: [f64; 3],
    /// Decimal places for rounding and deduplicating level prices
    pub round_dp: u32,
}

/// Windows for the derived per-bar indicators
pub struct IndicatorSettings {
    pub sma_short: usize,
    pub sma_long: usize,
    pub band_window: usize,
    /// Standard deviations above/below the band midline
    pub band_sigma: f64,
    pub volume_ma: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
}

/// How much history to request and when it is worth decorating
pub struct DataWindow {
    pub lookback_days_default: u32,
    // Below this the indicator columns are all-None anyway
    pub min_bars_for_indicators: usize,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    pub retracement: RetracementConfig,
    pub indicators: IndicatorSettings,
    pub window: DataWindow,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    retracement: RetracementConfig {
        ratios: [0.236, 0.382, 0.618],
        round_dp: 2,
    },

    indicators: IndicatorSettings {
        sma_short: 20,
        sma_long: 50,
        band_window: 20,
        band_sigma: 2.0,
        volume_ma: 20,
        rsi_period: 14,
        macd_fast: 12,
        macd_slow: 26,
    },

    window: DataWindow {
        // ~62 trading bars, enough to fill the 50-bar long SMA
        lookback_days_default: 90,
        min_bars_for_indicators: 2,
    },
};
