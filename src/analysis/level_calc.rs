use std::cmp::Ordering;

use itertools::Itertools;

use crate::config::ANALYSIS;
use crate::models::indicators::IndicatorSet;
use crate::models::series::PriceSeries;
use crate::utils::maths_utils::round_to_dp;

// ============================================================================
// Level derivation: retracement candidates + magnet price
// ============================================================================

/// Result of `compute_levels`. Both sequences are canonically ascending and
/// deduplicated at 2 decimal places; display layers may reverse resistances.
///
/// Empty sequences with a zero magnet mean "insufficient data" (empty or
/// flat series), which callers treat as a state, not a failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelSet {
    pub resistances: Vec<f64>,
    pub supports: Vec<f64>,
    pub magnet: f64,
}

impl LevelSet {
    pub fn is_empty(&self) -> bool {
        self.resistances.is_empty() && self.supports.is_empty()
    }
}

/// Derive candidate resistance/support prices and a magnet price from a
/// price series.
///
/// Baseline candidates interpolate the configured retracement fractions
/// between the period high and low. When last-bar indicators are available
/// they are folded in: upper band / VWAP / short SMA strengthen the
/// resistance side, lower band / long SMA / VWAP the support side, and the
/// magnet becomes the VWAP-close midpoint instead of the HLC mean.
///
/// Pure and deterministic; missing indicator values are skipped, never an
/// error.
pub fn compute_levels(series: &PriceSeries, indicators: Option<&IndicatorSet>) -> LevelSet {
    let (Some(high), Some(low), Some(close)) = (
        series.highest_high(),
        series.lowest_low(),
        series.last_close(),
    ) else {
        return LevelSet::default();
    };

    if high == low {
        // Degenerate flat series: nothing to interpolate
        return LevelSet::default();
    }

    let range = high - low;
    let mut resistances = vec![high];
    let mut supports = vec![low];
    for ratio in ANALYSIS.retracement.ratios {
        resistances.push(high - range * ratio);
        supports.push(low + range * ratio);
    }

    let last_vwap = indicators.and_then(IndicatorSet::last_vwap);
    if let Some(ind) = indicators {
        resistances.extend(
            [ind.last_band_upper(), last_vwap, ind.last_sma_short()]
                .into_iter()
                .flatten(),
        );
        supports.extend(
            [ind.last_band_lower(), ind.last_sma_long(), last_vwap]
                .into_iter()
                .flatten(),
        );
    }

    #[cfg(debug_assertions)]
    if crate::config::DEBUG_FLAGS.print_level_math {
        log::info!(
            "[{}] H={high:.2} L={low:.2} C={close:.2} raw candidates: R {resistances:?} S {supports:?}",
            series.symbol
        );
    }

    let magnet = match last_vwap {
        Some(vwap) => (vwap + close) / 2.0,
        None => (high + low + close) / 3.0,
    };

    LevelSet {
        resistances: normalize(resistances),
        supports: normalize(supports),
        magnet: round_to_dp(magnet, ANALYSIS.retracement.round_dp),
    }
}

/// Round to the canonical precision, sort ascending, drop exact duplicates.
fn normalize(candidates: Vec<f64>) -> Vec<f64> {
    candidates
        .into_iter()
        .map(|price| round_to_dp(price, ANALYSIS.retracement.round_dp))
        .sorted_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .dedup()
        .collect()
}
