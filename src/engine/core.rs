use std::sync::Arc;

use crate::analysis::level_calc::{LevelSet, compute_levels};
use crate::data::news::{CalendarEvent, Headline};
use crate::domain::level::LevelKind;
use crate::models::indicators::IndicatorSet;
use crate::models::series::PriceSeries;
use crate::narrative::NarrativeService;
use crate::store::level_store::{LevelStore, StoreError};
use crate::store::snapshot::SnapshotStore;

/// Market posture derived from the last close versus the curated levels:
/// above the second resistance is bullish, below the second support bearish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketStatus {
    Bullish,
    Bearish,
    Neutral,
    Unknown,
}

impl MarketStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MarketStatus::Bullish => "Bullish",
            MarketStatus::Bearish => "Bearish",
            MarketStatus::Neutral => "Neutral",
            MarketStatus::Unknown => "Unknown",
        }
    }
}

/// Everything one dashboard session owns. Constructed once at startup and
/// handed to the UI; every operation runs to completion synchronously within
/// the user interaction that triggered it.
pub struct ScoutEngine {
    pub symbol: String,
    pub series: PriceSeries,
    pub indicators: IndicatorSet,
    /// Levels as computed from the series; never mutated by the user
    pub computed: LevelSet,
    /// The user-curated working copy the UI edits
    pub store: LevelStore,
    pub headlines: Vec<Headline>,
    pub calendar: Vec<CalendarEvent>,
    pub narrative: Arc<dyn NarrativeService>,
    /// Where the series came from (cache / api / unavailable), for the status bar
    pub data_source: &'static str,

    snapshots: Box<dyn SnapshotStore>,
    /// Last rejected operation, rendered in the status bar until the next success
    pub last_error: Option<String>,
}

impl ScoutEngine {
    pub fn new(
        symbol: String,
        series: PriceSeries,
        data_source: &'static str,
        headlines: Vec<Headline>,
        calendar: Vec<CalendarEvent>,
        narrative: Arc<dyn NarrativeService>,
        snapshots: Box<dyn SnapshotStore>,
    ) -> Self {
        let indicators = IndicatorSet::compute(&series);
        let computed = compute_levels(&series, Some(&indicators));
        if computed.is_empty() {
            log::warn!("[{}] insufficient data for level computation", symbol);
        }
        let store = LevelStore::seeded_from(&computed);

        Self {
            symbol,
            series,
            indicators,
            computed,
            store,
            headlines,
            calendar,
            narrative,
            data_source,
            snapshots,
            last_error: None,
        }
    }

    pub fn last_close(&self) -> Option<f64> {
        self.series.last_close()
    }

    pub fn market_status(&self) -> MarketStatus {
        let Some(close) = self.last_close() else {
            return MarketStatus::Unknown;
        };
        let resistance = self.store.levels(LevelKind::Resistance);
        let support = self.store.levels(LevelKind::Support);
        if resistance.len() < 2 || support.len() < 2 {
            return MarketStatus::Unknown;
        }

        // Second resistance from the top, second support from the bottom
        let r2 = resistance[resistance.len() - 2].price;
        let s2 = support[1].price;
        if close > r2 {
            MarketStatus::Bullish
        } else if close < s2 {
            MarketStatus::Bearish
        } else {
            MarketStatus::Neutral
        }
    }

    /// The curated state expressed as a `LevelSet`, which is what the
    /// narrative service phrases (user overrides included).
    pub fn curated_levels(&self) -> LevelSet {
        LevelSet {
            resistances: self
                .store
                .levels(LevelKind::Resistance)
                .iter()
                .map(|l| l.price)
                .collect(),
            supports: self
                .store
                .levels(LevelKind::Support)
                .iter()
                .map(|l| l.price)
                .collect(),
            magnet: self.store.magnet(),
        }
    }

    // --- USER ACTIONS ---
    // Each wrapper stashes the rejection (if any) for the status bar and
    // reports success, which is all the panels need.

    pub fn add_level(&mut self, kind: LevelKind, price: f64, major: bool) -> bool {
        let result = self.store.add_level(kind, price, major);
        self.stash(result)
    }

    pub fn remove_levels(&mut self, removals: &[(LevelKind, usize)]) {
        // Apply bottom-up so earlier removals cannot shift later indices
        let mut ordered = removals.to_vec();
        ordered.sort_by(|a, b| b.1.cmp(&a.1));
        for (kind, index) in ordered {
            let result = self.store.remove_level(kind, index);
            self.stash(result);
        }
    }

    pub fn set_dynamic_zone(&mut self, top: f64, bottom: f64) -> bool {
        let result = self.store.set_dynamic_zone(top, bottom);
        self.stash(result)
    }

    pub fn set_magnet_price(&mut self, price: f64) {
        self.store.set_magnet_price(price);
        self.last_error = None;
    }

    /// Throw away user edits and reseed from the computed levels.
    pub fn reset_to_computed(&mut self) {
        self.store = LevelStore::seeded_from(&self.computed);
        self.last_error = None;
    }

    // --- SNAPSHOTS ---

    pub fn save_snapshot(&mut self, name: &str) -> bool {
        let result = self.store.save_snapshot(self.snapshots.as_ref(), name);
        self.stash(result)
    }

    pub fn load_snapshot(&mut self, name: &str) -> bool {
        let result = self.store.load_snapshot(self.snapshots.as_ref(), name);
        self.stash(result)
    }

    pub fn snapshot_names(&mut self) -> Vec<String> {
        match self.snapshots.list() {
            Ok(names) => names,
            Err(e) => {
                self.last_error = Some(e.to_string());
                Vec::new()
            }
        }
    }

    fn stash<T>(&mut self, result: Result<T, StoreError>) -> bool {
        match result {
            Ok(_) => {
                self.last_error = None;
                true
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    use crate::domain::bar::PriceBar;
    use crate::narrative::TemplateNarrative;
    use crate::store::level_store::LevelSetSnapshot;
    use crate::utils::TimeUtils;

    /// Swap the flat-file backend for a map; the engine cannot tell.
    #[derive(Default)]
    struct MemSnapshotStore {
        snapshots: RefCell<HashMap<String, LevelSetSnapshot>>,
    }

    impl SnapshotStore for MemSnapshotStore {
        fn save(&self, name: &str, snapshot: &LevelSetSnapshot) -> Result<(), StoreError> {
            self.snapshots
                .borrow_mut()
                .insert(name.to_string(), snapshot.clone());
            Ok(())
        }

        fn load(&self, name: &str) -> Result<LevelSetSnapshot, StoreError> {
            self.snapshots
                .borrow()
                .get(name)
                .cloned()
                .ok_or_else(|| StoreError::SnapshotNotFound(name.to_string()))
        }

        fn list(&self) -> Result<Vec<String>, StoreError> {
            let mut names: Vec<String> = self.snapshots.borrow().keys().cloned().collect();
            names.sort();
            Ok(names)
        }
    }

    fn series_from_bars(bars: &[(f64, f64, f64)]) -> PriceSeries {
        let mut series = PriceSeries::new("SPY", TimeUtils::MS_IN_D);
        for (i, &(high, low, close)) in bars.iter().enumerate() {
            let ts = (i as i64 + 1) * TimeUtils::MS_IN_D;
            series
                .push_bar(PriceBar::new(ts, close, high, low, close, 1_000.0))
                .unwrap();
        }
        series
    }

    fn engine_with_close(close: f64) -> ScoutEngine {
        // H=410, L=400 -> display r2 = 407.64, s2 = 402.36
        let series = series_from_bars(&[(410.0, 400.0, 404.0), (409.0, 401.0, close)]);
        ScoutEngine::new(
            "SPY".to_string(),
            series,
            "test",
            Vec::new(),
            Vec::new(),
            Arc::new(TemplateNarrative),
            Box::new(MemSnapshotStore::default()),
        )
    }

    #[test]
    fn test_market_status_classification() {
        assert_eq!(engine_with_close(409.0).market_status(), MarketStatus::Bullish);
        assert_eq!(engine_with_close(401.0).market_status(), MarketStatus::Bearish);
        assert_eq!(engine_with_close(405.0).market_status(), MarketStatus::Neutral);
    }

    #[test]
    fn test_market_status_without_data_is_unknown() {
        let engine = ScoutEngine::new(
            "SPY".to_string(),
            PriceSeries::new("SPY", TimeUtils::MS_IN_D),
            "test",
            Vec::new(),
            Vec::new(),
            Arc::new(TemplateNarrative),
            Box::new(MemSnapshotStore::default()),
        );
        assert_eq!(engine.market_status(), MarketStatus::Unknown);
    }

    #[test]
    fn test_batched_removals_survive_index_shifts() {
        let mut engine = engine_with_close(405.0);
        let before = engine.store.levels(LevelKind::Support).len();
        assert!(before >= 3);

        // Indices as seen during one render pass; ascending order would
        // invalidate the later one
        engine.remove_levels(&[(LevelKind::Support, 0), (LevelKind::Support, 2)]);
        assert_eq!(engine.store.levels(LevelKind::Support).len(), before - 2);
        assert!(engine.last_error.is_none());
    }

    #[test]
    fn test_failed_action_surfaces_error_and_reports_false() {
        let mut engine = engine_with_close(405.0);
        assert!(!engine.set_dynamic_zone(100.0, 150.0));
        assert!(engine.last_error.is_some());

        // A following success clears it
        assert!(engine.set_dynamic_zone(408.0, 402.0));
        assert!(engine.last_error.is_none());
    }

    #[test]
    fn test_snapshot_round_trip_through_engine() {
        let mut engine = engine_with_close(405.0);
        engine.store.set_magnet_price(404.5);
        assert!(engine.save_snapshot("session"));

        engine.reset_to_computed();
        assert_ne!(engine.store.magnet(), 404.5);

        assert!(engine.load_snapshot("session"));
        assert_eq!(engine.store.magnet(), 404.5);
        assert_eq!(engine.snapshot_names(), vec!["session"]);
    }

    #[test]
    fn test_curated_levels_reflect_user_edits() {
        let mut engine = engine_with_close(405.0);
        assert!(engine.add_level(LevelKind::Resistance, 412.0, true));

        let curated = engine.curated_levels();
        assert!(curated.resistances.contains(&412.0));
        assert_eq!(curated.magnet, engine.store.magnet());
    }
}
