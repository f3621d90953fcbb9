// Level derivation from price history
pub mod level_calc;

pub use level_calc::{LevelSet, compute_levels};
