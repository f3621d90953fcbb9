use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::config::{PERSISTENCE, snapshot_filename};
use crate::store::level_store::{LevelSetSnapshot, StoreError};

// ============================================================================
// SnapshotStore: persistence port for named level snapshots
// ============================================================================

/// The name is the identity. Saving an existing name overwrites it wholesale
/// (last write wins); listing is deterministic (alphabetical) and snapshots
/// are never deleted by the core.
///
/// The flat-file implementation below is fine for a single-operator tool;
/// multi-writer setups need an external lock or an atomic-rename variant
/// behind this same trait.
pub trait SnapshotStore {
    fn save(&self, name: &str, snapshot: &LevelSetSnapshot) -> Result<(), StoreError>;
    fn load(&self, name: &str) -> Result<LevelSetSnapshot, StoreError>;
    fn list(&self) -> Result<Vec<String>, StoreError>;
}

// ============================================================================
// FsSnapshotStore: one JSON document per name in a flat directory
// ============================================================================

pub struct FsSnapshotStore {
    dir: PathBuf,
}

impl FsSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn default_location() -> Self {
        Self::new(PERSISTENCE.snapshots.directory)
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.dir.join(snapshot_filename(name)))
    }
}

/// Snapshot names become filename stems, so keep them to a conservative
/// character set instead of trusting the filesystem.
fn validate_name(name: &str) -> Result<(), StoreError> {
    let usable = !name.trim().is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'));
    if usable {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn save(&self, name: &str, snapshot: &LevelSetSnapshot) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;
        fs::write(&path, json)?;

        #[cfg(debug_assertions)]
        if crate::config::DEBUG_FLAGS.print_serde {
            log::info!("Saved snapshot '{}' to {:?}", name, path);
        }
        Ok(())
    }

    fn load(&self, name: &str) -> Result<LevelSetSnapshot, StoreError> {
        let path = self.path_for(name)?;

        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::SnapshotNotFound(name.to_string()));
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        serde_json::from_str(&json).map_err(|e| StoreError::MalformedSnapshot {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            // No directory yet simply means nothing has been saved
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_snapshot = path
                .extension()
                .is_some_and(|ext| ext == PERSISTENCE.snapshots.extension);
            if !is_snapshot {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::level::{DynamicZone, Level, LevelKind};
    use crate::store::level_store::LevelStore;

    fn sample_store() -> LevelStore {
        let mut store = LevelStore::new();
        store.add_level(LevelKind::Support, 400.0, true).unwrap();
        store.add_level(LevelKind::Support, 402.36, false).unwrap();
        store.add_level(LevelKind::Resistance, 410.0, true).unwrap();
        store.set_dynamic_zone(407.64, 402.36).unwrap();
        store.set_magnet_price(405.0);
        store
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsSnapshotStore::new(dir.path());
        let store = sample_store();

        store.save_snapshot(&backend, "monday").unwrap();

        let mut restored = LevelStore::new();
        restored.load_snapshot(&backend, "monday").unwrap();

        assert_eq!(restored.to_snapshot(), store.to_snapshot());
    }

    #[test]
    fn test_save_overwrites_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsSnapshotStore::new(dir.path());

        sample_store().save_snapshot(&backend, "plan").unwrap();

        let mut smaller = LevelStore::new();
        smaller.add_level(LevelKind::Support, 399.0, false).unwrap();
        smaller.save_snapshot(&backend, "plan").unwrap();

        let mut restored = LevelStore::new();
        restored.load_snapshot(&backend, "plan").unwrap();
        assert_eq!(restored.levels(LevelKind::Support).len(), 1);
        assert!(restored.levels(LevelKind::Resistance).is_empty());
    }

    #[test]
    fn test_load_missing_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsSnapshotStore::new(dir.path());

        let mut store = sample_store();
        let before = store.to_snapshot();

        let err = store.load_snapshot(&backend, "never-saved").unwrap_err();
        assert!(matches!(err, StoreError::SnapshotNotFound(_)));
        assert_eq!(store.to_snapshot(), before);
    }

    #[test]
    fn test_malformed_document_rejected_without_partial_apply() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsSnapshotStore::new(dir.path());
        std::fs::write(dir.path().join("broken.json"), "{\"support\": [{").unwrap();

        let mut store = sample_store();
        let before = store.to_snapshot();

        let err = store.load_snapshot(&backend, "broken").unwrap_err();
        assert!(matches!(err, StoreError::MalformedSnapshot { .. }));
        assert_eq!(store.to_snapshot(), before);
    }

    #[test]
    fn test_semantically_invalid_document_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsSnapshotStore::new(dir.path());

        // Structurally fine, semantically inverted zone
        let bad = LevelSetSnapshot {
            support: vec![Level::new(400.0, false)],
            resistance: Vec::new(),
            dynamic_zone: DynamicZone::new(100.0, 150.0),
            magnet_price: 405.0,
        };
        backend.save("inverted", &bad).unwrap();

        let mut store = sample_store();
        let before = store.to_snapshot();
        let err = store.load_snapshot(&backend, "inverted").unwrap_err();
        assert!(matches!(err, StoreError::MalformedSnapshot { .. }));
        assert_eq!(store.to_snapshot(), before);
    }

    #[test]
    fn test_list_is_sorted_and_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsSnapshotStore::new(dir.path());

        sample_store().save_snapshot(&backend, "zeta").unwrap();
        sample_store().save_snapshot(&backend, "alpha").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a snapshot").unwrap();

        assert_eq!(backend.list().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_list_without_directory_is_empty() {
        let backend = FsSnapshotStore::new("does/not/exist/anywhere");
        assert!(backend.list().unwrap().is_empty());
    }

    #[test]
    fn test_path_like_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsSnapshotStore::new(dir.path());

        for bad in ["", "   ", "../escape", "a/b", "name\0"] {
            let err = sample_store().save_snapshot(&backend, bad).unwrap_err();
            assert!(matches!(err, StoreError::InvalidName(_)), "accepted {bad:?}");
        }
    }
}
