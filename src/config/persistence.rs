//! File persistence and serialization configuration

/// Where user-curated level snapshots live (one JSON file per name)
pub struct SnapshotFiles {
    pub directory: &'static str,
    pub extension: &'static str,
}

/// Versioned bincode cache of the fetched daily series
pub struct SeriesCacheFiles {
    pub directory: &'static str,
    pub filename_without_ext: &'static str,
    /// Bump when the serialized `PriceSeries` layout changes
    pub version: f64,
    /// Maximum age before a cached series is refetched (seconds)
    pub acceptable_age_sec: i64,
}

pub struct PersistenceConfig {
    pub snapshots: SnapshotFiles,
    pub series_cache: SeriesCacheFiles,
    /// Path for saving/loading application UI state
    pub app_state_path: &'static str,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    snapshots: SnapshotFiles {
        directory: "level_snapshots",
        extension: "json",
    },
    series_cache: SeriesCacheFiles {
        directory: "series_cache",
        filename_without_ext: "daily",
        version: 1.0,
        // One trading day; stale quotes make stale levels
        acceptable_age_sec: 86_400,
    },
    app_state_path: ".levelscout.json",
};

/// Generate the symbol-specific cache filename
/// Example: "daily_spy_v1.bin"
pub fn series_cache_filename(symbol: &str) -> String {
    format!(
        "{}_{}_v{}.bin",
        PERSISTENCE.series_cache.filename_without_ext,
        symbol.to_ascii_lowercase(),
        PERSISTENCE.series_cache.version
    )
}

/// Filename for a named snapshot ("morning plan" -> "morning plan.json")
pub fn snapshot_filename(name: &str) -> String {
    format!("{}.{}", name, PERSISTENCE.snapshots.extension)
}
