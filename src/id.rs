//! ID generation utilities for Grocer
//!
//! Items are keyed by an opaque surrogate so that edits to an item's fields never
//! change the key its scheduler state is stored under.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Stable identity of a configured food item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap an existing identifier (e.g. one read back from storage or the CLI).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh item ID.
    ///
    /// Format: `{timestamp_ms}-{random_hex}`
    /// Example: `1738300800123-a1b2`
    pub fn generate() -> Self {
        let timestamp = now_ms();
        let random: u16 = rand::rng().random();
        Self(format!("{}-{:04x}", timestamp, random))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms_returns_reasonable_timestamp() {
        let ts = now_ms();
        // Should be after 2020-01-01 and before 2100-01-01
        assert!(ts > 1577836800000);
        assert!(ts < 4102444800000);
    }

    #[test]
    fn test_generate_item_id_format() {
        let id = ItemId::generate();
        let parts: Vec<&str> = id.as_str().split('-').collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[1].len(), 4);
        assert!(parts[1].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_item_id_uniqueness() {
        let id1 = ItemId::generate();
        let id2 = ItemId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_item_id_serializes_as_plain_string() {
        let id = ItemId::new("milk-001");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"milk-001\"");
        let back: ItemId = serde_json::from_str("\"milk-001\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_item_id_display() {
        assert_eq!(ItemId::from("abc").to_string(), "abc");
    }
}
