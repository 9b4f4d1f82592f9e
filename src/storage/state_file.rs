//! JSON document backed state store with in-memory caching.
//!
//! The whole snapshot lives in one file. Every write goes to a sibling temp file
//! first and is renamed over the original, so readers after a crash see either the
//! previous or the new snapshot.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::snapshot::StateSnapshot;
use super::traits::StateStore;
use crate::domain::Occasion;
use crate::error::{GrocerError, Result};
use crate::id::ItemId;
use crate::scheduler::SchedulerState;

/// File name used when the store is opened on a directory.
pub const STATE_FILE_NAME: &str = "scheduler_state.json";

pub struct JsonStateStore {
    path: PathBuf,
    cache: RwLock<StateSnapshot>,
}

impl std::fmt::Debug for JsonStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonStateStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl JsonStateStore {
    /// Open or create the state document at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let snapshot = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                StateSnapshot::default()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            StateSnapshot::default()
        };
        snapshot.validate()?;

        log::debug!("Opened state store at {} with {} item(s)", path.display(), snapshot.items.len());

        Ok(Self {
            path,
            cache: RwLock::new(snapshot),
        })
    }

    /// Open `scheduler_state.json` inside `dir`.
    pub fn open_in(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open(dir.as_ref().join(STATE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, snapshot: &StateSnapshot) -> Result<()> {
        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(serde_json::to_string_pretty(snapshot)?.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Apply `f` to a copy of the snapshot, write it out, then publish it to the cache.
    fn mutate<R>(&self, f: impl FnOnce(&mut StateSnapshot) -> R) -> Result<R> {
        let mut cache = self.cache.write().map_err(|e| GrocerError::Storage(e.to_string()))?;
        let mut next = cache.clone();
        let result = f(&mut next);
        self.write_file(&next)?;
        *cache = next;
        Ok(result)
    }
}

impl StateStore for JsonStateStore {
    fn get(&self, id: &ItemId) -> Result<Option<SchedulerState>> {
        let cache = self.cache.read().map_err(|e| GrocerError::Storage(e.to_string()))?;
        Ok(cache.items.get(id).copied())
    }

    fn put(&self, id: &ItemId, state: SchedulerState) -> Result<()> {
        state.validate()?;
        self.mutate(|snapshot| {
            snapshot.items.insert(id.clone(), state);
        })
    }

    fn remove(&self, id: &ItemId) -> Result<bool> {
        if self.get(id)?.is_none() {
            return Ok(false);
        }
        self.mutate(|snapshot| snapshot.items.remove(id).is_some())
    }

    fn entries(&self) -> Result<BTreeMap<ItemId, SchedulerState>> {
        let cache = self.cache.read().map_err(|e| GrocerError::Storage(e.to_string()))?;
        Ok(cache.items.clone())
    }

    fn last_occasion(&self) -> Result<Option<Occasion>> {
        let cache = self.cache.read().map_err(|e| GrocerError::Storage(e.to_string()))?;
        Ok(cache.last_occasion.clone())
    }

    fn commit_occasion(&self, occasion: Occasion, batch: &[(ItemId, SchedulerState)]) -> Result<()> {
        for (_, state) in batch {
            state.validate()?;
        }
        let date = occasion.date;
        self.mutate(|snapshot| snapshot.commit(occasion, batch))?;
        log::info!("Committed {} state(s) for occasion {}", batch.len(), date);
        Ok(())
    }

    fn clear(&self) -> Result<usize> {
        let removed = self.mutate(|snapshot| snapshot.clear())?;
        log::info!("Cleared {} state(s) from {}", removed, self.path.display());
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotient::FrequencyQuotient;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn state(steps: u32) -> SchedulerState {
        SchedulerState::initial(FrequencyQuotient::from_steps(steps))
    }

    fn create_test_store() -> (JsonStateStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStateStore::open_in(temp_dir.path()).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_put_and_get() {
        let (store, _temp) = create_test_store();
        let id = ItemId::new("milk");
        store.put(&id, state(9)).unwrap();
        assert_eq!(store.get(&id).unwrap(), Some(state(9)));
    }

    #[test]
    fn test_open_without_file_is_empty() {
        let (store, _temp) = create_test_store();
        assert!(store.entries().unwrap().is_empty());
        assert!(store.last_occasion().unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_persistence_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let id = ItemId::new("bread");
        let occasion = Occasion {
            date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            included: vec![(id.clone(), 1)],
        };

        {
            let store = JsonStateStore::open_in(temp_dir.path()).unwrap();
            store.commit_occasion(occasion.clone(), &[(id.clone(), state(7))]).unwrap();
        }

        {
            let store = JsonStateStore::open_in(temp_dir.path()).unwrap();
            assert_eq!(store.get(&id).unwrap(), Some(state(7)));
            assert_eq!(store.last_occasion().unwrap(), Some(occasion));
        }
    }

    #[test]
    fn test_remove() {
        let (store, _temp) = create_test_store();
        let id = ItemId::new("eggs");
        store.put(&id, state(4)).unwrap();
        assert!(store.remove(&id).unwrap());
        assert!(!store.remove(&id).unwrap());

        let reopened = JsonStateStore::open(store.path()).unwrap();
        assert!(reopened.get(&id).unwrap().is_none());
    }

    #[test]
    fn test_clear_persists() {
        let (store, _temp) = create_test_store();
        let id = ItemId::new("a");
        let occasion = Occasion {
            date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            included: vec![(id.clone(), 1)],
        };
        store.commit_occasion(occasion, &[(id.clone(), state(2))]).unwrap();

        assert_eq!(store.clear().unwrap(), 1);

        let reopened = JsonStateStore::open(store.path()).unwrap();
        assert!(reopened.entries().unwrap().is_empty());
        assert!(reopened.last_occasion().unwrap().is_none());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let (store, temp) = create_test_store();
        store.put(&ItemId::new("a"), state(1)).unwrap();
        let names: Vec<String> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![STATE_FILE_NAME.to_string()]);
    }

    #[test]
    fn test_document_format() {
        let (store, _temp) = create_test_store();
        store.put(&ItemId::new("a"), state(10)).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["items"]["a"]["quotient"], 0.5);
        assert_eq!(value["items"]["a"]["accumulator"], 0.5);
        assert!(value["last_occasion"].is_null());
    }

    #[test]
    fn test_corrupt_accumulator_is_invalid_state() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(STATE_FILE_NAME);
        fs::write(&path, r#"{"items": {"a": {"quotient": 0.5, "accumulator": -0.25}}}"#).unwrap();

        let err = JsonStateStore::open(&path).unwrap_err();
        assert!(matches!(err, GrocerError::InvalidState(_)));
    }

    #[test]
    fn test_negative_quotient_rejected_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(STATE_FILE_NAME);
        fs::write(&path, r#"{"items": {"a": {"quotient": -0.5, "accumulator": 0.25}}}"#).unwrap();

        assert!(JsonStateStore::open(&path).is_err());
    }

    #[test]
    fn test_empty_file_opens_as_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(STATE_FILE_NAME);
        fs::write(&path, "").unwrap();

        let store = JsonStateStore::open(&path).unwrap();
        assert!(store.entries().unwrap().is_empty());
    }
}
