/// In-memory stand-ins for the browser used across test modules

use crate::error::{Error, Result};
use crate::host::{Clock, KeyValueStore, TabHost};
use crate::tab_data::TabInfo;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

pub const DAY_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// chrome.storage.local backed by a HashMap
#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, Value>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    pub fn put(&self, key: &str, value: Value) {
        self.values.borrow_mut().insert(key.to_string(), value);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        if self.fail_reads.get() {
            return Err(Error::Storage("read failed".to_string()));
        }
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        if self.fail_writes.get() {
            return Err(Error::Storage("write failed".to_string()));
        }
        self.writes.set(self.writes.get() + 1);
        self.put(key, value);
        Ok(())
    }
}

/// A browser with a fixed set of windows and tabs
pub struct FakeHost {
    tabs: RefCell<Vec<TabInfo>>,
    current_window: i32,
    unclosable: RefCell<HashSet<i32>>,
    closed: RefCell<Vec<i32>>,
    fail_queries: Cell<bool>,
    unreadable_windows: RefCell<HashSet<i32>>,
}

impl FakeHost {
    pub fn new(tabs: Vec<TabInfo>) -> Self {
        let current_window = tabs.first().map_or(1, |t| t.window_id);
        FakeHost {
            tabs: RefCell::new(tabs),
            current_window,
            unclosable: RefCell::new(HashSet::new()),
            closed: RefCell::new(Vec::new()),
            fail_queries: Cell::new(false),
            unreadable_windows: RefCell::new(HashSet::new()),
        }
    }

    pub fn with_current_window(mut self, window_id: i32) -> Self {
        self.current_window = window_id;
        self
    }

    /// Make `remove_tab` fail for this id (e.g. permission denied)
    pub fn refuse_close(&self, tab_id: i32) {
        self.unclosable.borrow_mut().insert(tab_id);
    }

    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.set(fail);
    }

    /// Make `query_tabs(Some(window_id))` fail for this window only
    pub fn fail_window(&self, window_id: i32) {
        self.unreadable_windows.borrow_mut().insert(window_id);
    }

    pub fn closed(&self) -> Vec<i32> {
        self.closed.borrow().clone()
    }

    pub fn open_ids(&self) -> Vec<i32> {
        self.tabs.borrow().iter().map(|t| t.id).collect()
    }
}

impl TabHost for FakeHost {
    async fn query_tabs(&self, window_id: Option<i32>) -> Result<Vec<TabInfo>> {
        if self.fail_queries.get() {
            return Err(Error::Host("tabs.query failed".to_string()));
        }
        if let Some(w) = window_id.filter(|w| self.unreadable_windows.borrow().contains(w)) {
            return Err(Error::Host(format!("No window with id: {}", w)));
        }
        Ok(self
            .tabs
            .borrow()
            .iter()
            .filter(|t| window_id.map_or(true, |w| t.window_id == w))
            .cloned()
            .collect())
    }

    async fn window_ids(&self) -> Result<Vec<i32>> {
        if self.fail_queries.get() {
            return Err(Error::Host("windows.getAll failed".to_string()));
        }
        let mut ids: Vec<i32> = Vec::new();
        for tab in self.tabs.borrow().iter() {
            if !ids.contains(&tab.window_id) {
                ids.push(tab.window_id);
            }
        }
        Ok(ids)
    }

    async fn current_window_id(&self) -> Result<i32> {
        if self.fail_queries.get() {
            return Err(Error::Host("windows.getCurrent failed".to_string()));
        }
        Ok(self.current_window)
    }

    async fn remove_tab(&self, tab_id: i32) -> Result<()> {
        if self.unclosable.borrow().contains(&tab_id) {
            return Err(Error::CloseTab {
                tab_id,
                reason: "permission denied".to_string(),
            });
        }
        let mut tabs = self.tabs.borrow_mut();
        let before = tabs.len();
        tabs.retain(|t| t.id != tab_id);
        if tabs.len() == before {
            return Err(Error::CloseTab {
                tab_id,
                reason: format!("No tab with id: {}", tab_id),
            });
        }
        self.closed.borrow_mut().push(tab_id);
        Ok(())
    }
}

/// A clock the test moves by hand
pub struct FixedClock(Cell<f64>);

impl FixedClock {
    pub fn at(now: f64) -> Self {
        FixedClock(Cell::new(now))
    }

    pub fn advance(&self, ms: f64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> f64 {
        self.0.get()
    }
}

pub fn tab(id: i32, window_id: i32, url: &str) -> TabInfo {
    TabInfo::new(id, window_id, url.to_string())
}
