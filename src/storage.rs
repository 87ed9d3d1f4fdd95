/// Storage serialization utilities for chrome.storage.local

use crate::constants::{ACCESS_TIMES_KEY, LAST_CLEAN_KEY};
use crate::error::Result;
use crate::host::KeyValueStore;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// Mapping from tab id to last-access time (epoch ms)
///
/// Keys are kept as strings because that is how the table is laid out in
/// chrome.storage.local (a plain JS object keyed by tab id).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AccessTimeTable {
    entries: BTreeMap<String, f64>,
}

impl AccessTimeTable {
    pub fn new() -> Self {
        AccessTimeTable {
            entries: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, tab_id: i32) -> Option<f64> {
        self.entries.get(&tab_id.to_string()).copied()
    }

    pub fn contains(&self, tab_id: i32) -> bool {
        self.entries.contains_key(&tab_id.to_string())
    }

    /// Set or overwrite the access time for a tab
    pub fn record(&mut self, tab_id: i32, now: f64) {
        self.entries.insert(tab_id.to_string(), now);
    }

    /// Set the access time only if the tab has no entry yet.
    /// Returns true if an entry was added.
    pub fn record_if_missing(&mut self, tab_id: i32, now: f64) -> bool {
        let key = tab_id.to_string();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, now);
        true
    }

    pub fn remove(&mut self, tab_id: i32) -> bool {
        self.entries.remove(&tab_id.to_string()).is_some()
    }

    /// Drop every entry whose tab is not in `live_ids`. Returns the number removed.
    ///
    /// Keys that don't parse as a tab id can never match a live tab and are dropped too.
    pub fn retain_live(&mut self, live_ids: &HashSet<i32>) -> usize {
        let original_len = self.entries.len();
        self.entries.retain(|key, _| {
            key.parse::<i32>()
                .map_or(false, |id| live_ids.contains(&id))
        });
        original_len - self.entries.len()
    }
}

/// Read the access-time table; a missing key is an empty table
///
/// Entries whose value isn't a number are dropped one by one, so a single
/// corrupt entry doesn't make the whole table unreadable.
pub async fn load_access_times<S: KeyValueStore>(store: &S) -> Result<AccessTimeTable> {
    let raw = match store.get(ACCESS_TIMES_KEY).await? {
        Some(Value::Object(raw)) => raw,
        None | Some(Value::Null) => return Ok(AccessTimeTable::new()),
        Some(other) => {
            warn!("Ignoring malformed {}: {}", ACCESS_TIMES_KEY, other);
            return Ok(AccessTimeTable::new());
        }
    };

    let mut table = AccessTimeTable::new();
    for (key, value) in raw {
        match value.as_f64() {
            Some(time) => {
                table.entries.insert(key, time);
            }
            None => warn!("Dropping access time for tab {}: {}", key, value),
        }
    }
    Ok(table)
}

pub async fn save_access_times<S: KeyValueStore>(store: &S, table: &AccessTimeTable) -> Result<()> {
    store.set(ACCESS_TIMES_KEY, serde_json::to_value(table)?).await
}

pub async fn load_last_clean_time<S: KeyValueStore>(store: &S) -> Result<Option<f64>> {
    Ok(store
        .get(LAST_CLEAN_KEY)
        .await?
        .and_then(|value| value.as_f64()))
}

pub async fn save_last_clean_time<S: KeyValueStore>(store: &S, now: f64) -> Result<()> {
    store.set(LAST_CLEAN_KEY, serde_json::Value::from(now)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryStore;
    use futures::executor::block_on;

    #[test]
    fn test_table_new() {
        let table = AccessTimeTable::new();
        assert!(table.is_empty());
        assert_eq!(table.get(1), None);
    }

    #[test]
    fn test_record_overwrites() {
        let mut table = AccessTimeTable::new();
        table.record(5, 100.0);
        table.record(5, 200.0);

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(5), Some(200.0));
    }

    #[test]
    fn test_record_if_missing_keeps_first_write() {
        let mut table = AccessTimeTable::new();
        assert!(table.record_if_missing(1, 100.0));
        assert!(!table.record_if_missing(1, 500.0));

        assert_eq!(table.get(1), Some(100.0));
    }

    #[test]
    fn test_remove() {
        let mut table = AccessTimeTable::new();
        table.record(5, 100.0);

        assert!(table.remove(5));
        assert!(!table.remove(5));
        assert!(!table.contains(5));
    }

    #[test]
    fn test_retain_live() {
        let mut table = AccessTimeTable::new();
        table.record(1, 100.0);
        table.record(2, 100.0);
        table.record(3, 100.0);

        let live: HashSet<i32> = [1, 3].into_iter().collect();
        let removed = table.retain_live(&live);

        assert_eq!(removed, 1);
        assert!(table.contains(1));
        assert!(!table.contains(2));
        assert!(table.contains(3));
    }

    #[test]
    fn test_storage_layout() {
        let mut table = AccessTimeTable::new();
        table.record(12, 1698508200000.0);

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json, serde_json::json!({ "12": 1698508200000.0 }));

        let parsed: AccessTimeTable =
            serde_json::from_value(serde_json::json!({ "7": 5.0, "junk": 1.0 })).unwrap();
        assert_eq!(parsed.get(7), Some(5.0));
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_retain_live_drops_unparseable_keys() {
        let mut table: AccessTimeTable =
            serde_json::from_value(serde_json::json!({ "7": 5.0, "junk": 1.0 })).unwrap();

        let live: HashSet<i32> = [7].into_iter().collect();
        assert_eq!(table.retain_live(&live), 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_load_missing_table_is_empty() {
        let store = MemoryStore::new();
        let table = block_on(load_access_times(&store)).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_save_then_load_table() {
        let store = MemoryStore::new();
        let mut table = AccessTimeTable::new();
        table.record(3, 42.0);

        block_on(save_access_times(&store, &table)).unwrap();

        assert_eq!(store.raw(ACCESS_TIMES_KEY), Some(serde_json::json!({ "3": 42.0 })));
        assert_eq!(block_on(load_access_times(&store)).unwrap(), table);
    }

    #[test]
    fn test_load_table_drops_bad_entries() {
        let store = MemoryStore::new();
        store.put(
            ACCESS_TIMES_KEY,
            serde_json::json!({ "5": 1.0, "6": null, "7": "yesterday", "8": 20 }),
        );

        let table = block_on(load_access_times(&store)).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(5), Some(1.0));
        assert_eq!(table.get(8), Some(20.0));
        assert!(!table.contains(6));
    }

    #[test]
    fn test_load_table_not_an_object() {
        let store = MemoryStore::new();
        store.put(ACCESS_TIMES_KEY, serde_json::json!([1, 2, 3]));

        assert!(block_on(load_access_times(&store)).unwrap().is_empty());
    }

    #[test]
    fn test_load_table_storage_failure() {
        let store = MemoryStore::new();
        store.fail_reads(true);
        assert!(block_on(load_access_times(&store)).is_err());
    }

    #[test]
    fn test_last_clean_time() {
        let store = MemoryStore::new();
        assert_eq!(block_on(load_last_clean_time(&store)).unwrap(), None);

        block_on(save_last_clean_time(&store, 1234.0)).unwrap();
        assert_eq!(block_on(load_last_clean_time(&store)).unwrap(), Some(1234.0));
    }
}
