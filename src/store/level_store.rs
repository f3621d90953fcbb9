use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::level_calc::LevelSet;
use crate::config::ANALYSIS;
use crate::domain::level::{DynamicZone, Level, LevelKind};
use crate::store::snapshot::SnapshotStore;
use crate::utils::maths_utils::round_to_dp;

// ============================================================================
// Errors
// ============================================================================

/// Everything that can go wrong while curating levels or touching snapshots.
/// All variants are recoverable conditions for the caller to surface; none
/// should escape to the presentation layer as a fault.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("level price must be positive, got {price}")]
    InvalidLevel { price: f64 },

    #[error("{kind} level {price:.2} already exists")]
    DuplicateLevel { kind: LevelKind, price: f64 },

    #[error("zone top {top:.2} must be above bottom {bottom:.2}")]
    InvalidZone { top: f64, bottom: f64 },

    #[error("no {kind} level at index {index} (collection holds {len})")]
    IndexOutOfRange {
        kind: LevelKind,
        index: usize,
        len: usize,
    },

    #[error("snapshot '{0}' not found")]
    SnapshotNotFound(String),

    #[error("snapshot '{name}' is malformed: {reason}")]
    MalformedSnapshot { name: String, reason: String },

    #[error("'{0}' is not usable as a snapshot name")]
    InvalidName(String),

    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Snapshot document
// ============================================================================

/// The persisted unit: the full store state under a user-chosen name.
/// Field names match the on-disk JSON document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LevelSetSnapshot {
    pub support: Vec<Level>,
    pub resistance: Vec<Level>,
    pub dynamic_zone: DynamicZone,
    pub magnet_price: f64,
}

impl LevelSetSnapshot {
    /// Semantic validation beyond what serde guarantees structurally.
    /// A snapshot must pass wholesale before any field is applied.
    pub fn validate(&self) -> Result<(), String> {
        for level in self.support.iter().chain(&self.resistance) {
            if !level.price.is_finite() {
                return Err(format!("non-finite level price {}", level.price));
            }
            if level.price <= 0.0 {
                return Err(format!("non-positive level price {}", level.price));
            }
        }

        let zone = &self.dynamic_zone;
        if !zone.top.is_finite() || !zone.bottom.is_finite() {
            return Err("non-finite dynamic zone bound".to_string());
        }
        if zone.is_set() && !zone.is_valid() {
            return Err(format!(
                "zone top {} is not above bottom {}",
                zone.top, zone.bottom
            ));
        }

        if !self.magnet_price.is_finite() {
            return Err("non-finite magnet price".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// LevelStore
// ============================================================================

/// Curated support/resistance collections plus the dynamic zone and magnet
/// price. One instance per user session, owned and passed explicitly by the
/// caller; there is no ambient singleton.
///
/// Invariants held after every successful operation: both collections sorted
/// ascending by price with no duplicate rounded prices, and any set zone has
/// `top > bottom`. Operations reject before mutating.
#[derive(Debug, Clone, Default)]
pub struct LevelStore {
    support: Vec<Level>,
    resistance: Vec<Level>,
    zone: DynamicZone,
    magnet: f64,
}

impl LevelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate a store with computed levels as editable defaults, the way
    /// the dashboard seeds its sidebar: period extremes are flagged major,
    /// the second retracement pair frames the default dynamic zone.
    pub fn seeded_from(computed: &LevelSet) -> Self {
        let mut store = Self::new();

        let highest_resistance = computed.resistances.last().copied();
        for &price in &computed.resistances {
            let major = Some(price) == highest_resistance;
            // Computed sets are already positive and deduplicated
            let _ = store.add_level(LevelKind::Resistance, price, major);
        }

        let lowest_support = computed.supports.first().copied();
        for &price in &computed.supports {
            let major = Some(price) == lowest_support;
            let _ = store.add_level(LevelKind::Support, price, major);
        }

        if computed.resistances.len() >= 2 && computed.supports.len() >= 2 {
            let top = computed.resistances[computed.resistances.len() - 2];
            let bottom = computed.supports[1];
            if top > bottom {
                let _ = store.set_dynamic_zone(top, bottom);
            }
        }

        store.magnet = computed.magnet;
        store
    }

    pub fn levels(&self, kind: LevelKind) -> &[Level] {
        match kind {
            LevelKind::Support => &self.support,
            LevelKind::Resistance => &self.resistance,
        }
    }

    fn levels_mut(&mut self, kind: LevelKind) -> &mut Vec<Level> {
        match kind {
            LevelKind::Support => &mut self.support,
            LevelKind::Resistance => &mut self.resistance,
        }
    }

    pub fn zone(&self) -> DynamicZone {
        self.zone
    }

    pub fn magnet(&self) -> f64 {
        self.magnet
    }

    /// Insert a level into the given collection, keeping it sorted ascending.
    /// Duplicates (same rounded price) are reported, not silently ignored;
    /// the caller decides whether that is worth a warning.
    pub fn add_level(&mut self, kind: LevelKind, price: f64, major: bool) -> Result<(), StoreError> {
        if !(price > 0.0) {
            return Err(StoreError::InvalidLevel { price });
        }

        let rounded = round_to_dp(price, ANALYSIS.retracement.round_dp);
        let collection = self.levels_mut(kind);
        if collection.iter().any(|level| level.price == rounded) {
            return Err(StoreError::DuplicateLevel {
                kind,
                price: rounded,
            });
        }

        collection.push(Level::new(rounded, major));
        sort_ascending(collection);
        Ok(())
    }

    /// Remove and return the level at `index` within its collection.
    pub fn remove_level(&mut self, kind: LevelKind, index: usize) -> Result<Level, StoreError> {
        let collection = self.levels_mut(kind);
        if index >= collection.len() {
            return Err(StoreError::IndexOutOfRange {
                kind,
                index,
                len: collection.len(),
            });
        }
        Ok(collection.remove(index))
    }

    pub fn set_dynamic_zone(&mut self, top: f64, bottom: f64) -> Result<(), StoreError> {
        if top <= bottom {
            return Err(StoreError::InvalidZone { top, bottom });
        }
        self.zone = DynamicZone::new(top, bottom);
        Ok(())
    }

    pub fn set_magnet_price(&mut self, price: f64) {
        self.magnet = price;
    }

    pub fn to_snapshot(&self) -> LevelSetSnapshot {
        LevelSetSnapshot {
            support: self.support.clone(),
            resistance: self.resistance.clone(),
            dynamic_zone: self.zone,
            magnet_price: self.magnet,
        }
    }

    /// Replace the whole state from a validated snapshot. Foreign documents
    /// may be unsorted or carry unrounded prices, so both collections are
    /// normalized on the way in.
    fn apply_snapshot(&mut self, snapshot: LevelSetSnapshot) {
        self.support = normalized(snapshot.support);
        self.resistance = normalized(snapshot.resistance);
        self.zone = snapshot.dynamic_zone;
        self.magnet = snapshot.magnet_price;
    }

    /// Persist the current state under `name`, overwriting any existing
    /// snapshot of that name (last write wins).
    pub fn save_snapshot(
        &self,
        backend: &dyn SnapshotStore,
        name: &str,
    ) -> Result<(), StoreError> {
        backend.save(name, &self.to_snapshot())
    }

    /// Replace the in-memory state from the named snapshot. Validation runs
    /// against the whole document first; on any error the current state is
    /// left untouched.
    pub fn load_snapshot(
        &mut self,
        backend: &dyn SnapshotStore,
        name: &str,
    ) -> Result<(), StoreError> {
        let snapshot = backend.load(name)?;
        snapshot
            .validate()
            .map_err(|reason| StoreError::MalformedSnapshot {
                name: name.to_string(),
                reason,
            })?;
        self.apply_snapshot(snapshot);
        Ok(())
    }
}

fn sort_ascending(levels: &mut [Level]) {
    levels.sort_by(|a, b| {
        a.price
            .partial_cmp(&b.price)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

fn normalized(mut levels: Vec<Level>) -> Vec<Level> {
    for level in &mut levels {
        level.price = round_to_dp(level.price, ANALYSIS.retracement.round_dp);
    }
    sort_ascending(&mut levels);
    levels.dedup_by(|a, b| a.price == b.price);
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_store() -> LevelStore {
        let mut store = LevelStore::new();
        store.add_level(LevelKind::Support, 400.0, true).unwrap();
        store.add_level(LevelKind::Support, 402.36, false).unwrap();
        store
            .add_level(LevelKind::Resistance, 410.0, true)
            .unwrap();
        store
            .add_level(LevelKind::Resistance, 407.64, false)
            .unwrap();
        store.set_dynamic_zone(407.64, 402.36).unwrap();
        store.set_magnet_price(405.0);
        store
    }

    #[test]
    fn test_add_keeps_collection_sorted() {
        let mut store = LevelStore::new();
        store.add_level(LevelKind::Support, 405.0, false).unwrap();
        store.add_level(LevelKind::Support, 400.0, false).unwrap();
        store.add_level(LevelKind::Support, 402.5, false).unwrap();

        let prices: Vec<f64> = store
            .levels(LevelKind::Support)
            .iter()
            .map(|l| l.price)
            .collect();
        assert_eq!(prices, vec![400.0, 402.5, 405.0]);
    }

    #[test]
    fn test_duplicate_add_is_reported_and_idempotent() {
        let mut store = LevelStore::new();
        store.add_level(LevelKind::Resistance, 410.0, true).unwrap();

        // Same rounded price, different raw input and flag
        let err = store
            .add_level(LevelKind::Resistance, 410.0009, false)
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateLevel { .. }));
        assert_eq!(store.levels(LevelKind::Resistance).len(), 1);
        assert!(
            store.levels(LevelKind::Resistance)[0].major,
            "existing level must be left untouched"
        );
    }

    #[test]
    fn test_same_price_allowed_across_collections() {
        let mut store = LevelStore::new();
        store.add_level(LevelKind::Support, 405.0, false).unwrap();
        // Uniqueness is per collection only
        store
            .add_level(LevelKind::Resistance, 405.0, false)
            .unwrap();
    }

    #[test]
    fn test_non_positive_prices_rejected() {
        let mut store = LevelStore::new();
        for bad in [0.0, -5.0, f64::NAN] {
            let err = store.add_level(LevelKind::Support, bad, false).unwrap_err();
            assert!(matches!(err, StoreError::InvalidLevel { .. }));
        }
        assert!(store.levels(LevelKind::Support).is_empty());
    }

    #[test]
    fn test_remove_by_index() {
        let mut store = populated_store();
        let removed = store.remove_level(LevelKind::Support, 0).unwrap();
        assert_eq!(removed.price, 400.0);
        assert_eq!(store.levels(LevelKind::Support).len(), 1);

        let err = store.remove_level(LevelKind::Support, 5).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { .. }));
    }

    #[test]
    fn test_inverted_zone_rejected_without_mutation() {
        let mut store = populated_store();
        let before = store.zone();

        let err = store.set_dynamic_zone(100.0, 150.0).unwrap_err();
        assert!(matches!(err, StoreError::InvalidZone { .. }));
        assert_eq!(store.zone(), before);
    }

    #[test]
    fn test_seeded_from_computed_levels() {
        let computed = LevelSet {
            resistances: vec![403.82, 406.18, 407.64, 410.0],
            supports: vec![400.0, 402.36, 403.82, 406.18],
            magnet: 405.0,
        };
        let store = LevelStore::seeded_from(&computed);

        assert_eq!(store.levels(LevelKind::Resistance).len(), 4);
        assert_eq!(store.levels(LevelKind::Support).len(), 4);
        assert_eq!(store.magnet(), 405.0);
        assert_eq!(store.zone(), DynamicZone::new(407.64, 402.36));

        // Extremes carry the major flag, interior retracements do not
        let resistance = store.levels(LevelKind::Resistance);
        assert!(resistance.last().unwrap().major);
        assert!(!resistance.first().unwrap().major);
        let support = store.levels(LevelKind::Support);
        assert!(support.first().unwrap().major);
        assert!(!support.last().unwrap().major);
    }

    #[test]
    fn test_seeded_from_empty_levelset_is_empty_store() {
        let store = LevelStore::seeded_from(&LevelSet::default());
        assert!(store.levels(LevelKind::Support).is_empty());
        assert!(store.levels(LevelKind::Resistance).is_empty());
        assert!(!store.zone().is_set());
        assert_eq!(store.magnet(), 0.0);
    }

    #[test]
    fn test_snapshot_validation_rejects_bad_documents() {
        let mut snapshot = populated_store().to_snapshot();
        assert!(snapshot.validate().is_ok());

        snapshot.dynamic_zone = DynamicZone::new(100.0, 150.0);
        assert!(snapshot.validate().is_err());

        let mut snapshot = populated_store().to_snapshot();
        snapshot.support.push(Level::new(-4.0, false));
        assert!(snapshot.validate().is_err());

        let mut snapshot = populated_store().to_snapshot();
        snapshot.magnet_price = f64::INFINITY;
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_apply_normalizes_foreign_snapshots() {
        let mut store = LevelStore::new();
        store.apply_snapshot(LevelSetSnapshot {
            support: vec![
                Level::new(405.004, false),
                Level::new(400.0, true),
                Level::new(405.0, false),
            ],
            resistance: Vec::new(),
            dynamic_zone: DynamicZone::default(),
            magnet_price: 402.0,
        });

        let prices: Vec<f64> = store
            .levels(LevelKind::Support)
            .iter()
            .map(|l| l.price)
            .collect();
        assert_eq!(prices, vec![400.0, 405.0], "sorted and deduplicated");
    }
}
