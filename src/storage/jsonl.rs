//! JSONL-based item storage with in-memory caching.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::traits::ItemStore;
use crate::domain::FoodItem;
use crate::error::{GrocerError, Result};
use crate::id::ItemId;

/// File name of the item collection.
pub const ITEMS_FILE_NAME: &str = "items.jsonl";

/// JSONL-based item storage with in-memory caching.
pub struct JsonlItemStore {
    path: PathBuf,
    cache: RwLock<Vec<FoodItem>>,
}

impl JsonlItemStore {
    /// Create a new JsonlItemStore in the given directory, loading any existing items.
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref();
        fs::create_dir_all(base_path)?;
        let path = base_path.join(ITEMS_FILE_NAME);

        let items = if path.exists() {
            let file = File::open(&path)?;
            let reader = BufReader::new(file);
            let mut items = Vec::new();
            for line in reader.lines() {
                let line = line?;
                if !line.trim().is_empty() {
                    let item: FoodItem = serde_json::from_str(&line)?;
                    items.push(item);
                }
            }
            items
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            cache: RwLock::new(items),
        })
    }

    /// Append an item to the JSONL file.
    fn append_to_file(&self, item: &FoodItem) -> Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(item)?)?;
        Ok(())
    }

    /// Rewrite the entire file from the given items.
    fn rewrite_file(&self, items: &[FoodItem]) -> Result<()> {
        let tmp_path = self.path.with_extension("jsonl.tmp");
        {
            let mut file = File::create(&tmp_path)?;
            for item in items {
                writeln!(file, "{}", serde_json::to_string(item)?)?;
            }
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl ItemStore for JsonlItemStore {
    fn create(&self, item: &FoodItem) -> Result<()> {
        let mut cache = self.cache.write().map_err(|e| GrocerError::Storage(e.to_string()))?;
        if cache.iter().any(|i| i.id == item.id) {
            return Err(GrocerError::Storage(format!("Item already exists: {}", item.id)));
        }

        // Append to file first (source of truth)
        self.append_to_file(item)?;
        cache.push(item.clone());
        Ok(())
    }

    fn get(&self, id: &ItemId) -> Result<Option<FoodItem>> {
        let cache = self.cache.read().map_err(|e| GrocerError::Storage(e.to_string()))?;
        Ok(cache.iter().find(|i| &i.id == id).cloned())
    }

    fn update(&self, item: &FoodItem) -> Result<()> {
        let mut cache = self.cache.write().map_err(|e| GrocerError::Storage(e.to_string()))?;
        let mut next = cache.clone();
        let slot = next
            .iter_mut()
            .find(|i| i.id == item.id)
            .ok_or_else(|| GrocerError::ItemNotFound(item.id.to_string()))?;
        *slot = item.clone();

        self.rewrite_file(&next)?;
        *cache = next;
        Ok(())
    }

    fn delete(&self, id: &ItemId) -> Result<()> {
        let mut cache = self.cache.write().map_err(|e| GrocerError::Storage(e.to_string()))?;
        let mut next = cache.clone();
        let original_len = next.len();
        next.retain(|i| &i.id != id);

        if next.len() == original_len {
            return Err(GrocerError::ItemNotFound(id.to_string()));
        }

        self.rewrite_file(&next)?;
        *cache = next;
        Ok(())
    }

    fn list(&self) -> Result<Vec<FoodItem>> {
        let cache = self.cache.read().map_err(|e| GrocerError::Storage(e.to_string()))?;
        Ok(cache.clone())
    }

    fn clear(&self) -> Result<usize> {
        let mut cache = self.cache.write().map_err(|e| GrocerError::Storage(e.to_string()))?;
        self.rewrite_file(&[])?;
        let removed = cache.len();
        cache.clear();
        Ok(removed)
    }
}
