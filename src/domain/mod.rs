// Domain types and value objects
pub mod bar;
pub mod level;

// Re-export commonly used types
pub use bar::{BarDirection, PriceBar};
pub use level::{DynamicZone, Level, LevelKind};
