use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Which curated collection a level belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum LevelKind {
    Support,
    Resistance,
}

/// A labeled price with an importance flag.
/// `major` is opaque metadata: carried and persisted verbatim, never
/// consumed by any calculation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Level {
    pub price: f64,
    pub major: bool,
}

impl Level {
    pub fn new(price: f64, major: bool) -> Self {
        Level { price, major }
    }
}

/// User-adjustable price band overlaid on the chart.
/// `top > bottom` is enforced at the store boundary; `top == bottom == 0.0`
/// denotes an unset zone on a fresh store.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct DynamicZone {
    pub top: f64,
    pub bottom: f64,
}

impl DynamicZone {
    pub fn new(top: f64, bottom: f64) -> Self {
        DynamicZone { top, bottom }
    }

    pub fn is_set(&self) -> bool {
        self.top != 0.0 || self.bottom != 0.0
    }

    pub fn is_valid(&self) -> bool {
        self.top > self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_validity() {
        assert!(DynamicZone::new(407.64, 402.36).is_valid());
        assert!(!DynamicZone::new(100.0, 150.0).is_valid());
        assert!(!DynamicZone::new(100.0, 100.0).is_valid());
    }

    #[test]
    fn test_zone_unset_default() {
        let zone = DynamicZone::default();
        assert!(!zone.is_set());
        assert!(!zone.is_valid());
    }
}
