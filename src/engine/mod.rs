// Session state and user-action handling
pub mod core;

pub use core::{MarketStatus, ScoutEngine};
