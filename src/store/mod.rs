// Curated level state and snapshot persistence
pub mod level_store;
pub mod snapshot;

// Re-export commonly used types
pub use level_store::{LevelSetSnapshot, LevelStore, StoreError};
pub use snapshot::{FsSnapshotStore, SnapshotStore};
