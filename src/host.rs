/// The browser capabilities Tab Sweeper depends on. Production code uses the
/// chrome.* backed implementations in `chrome.rs`; tests substitute in-memory fakes.

use crate::error::Result;
use crate::tab_data::TabInfo;
use serde_json::Value;

/// Tab and window enumeration plus tab removal
#[allow(async_fn_in_trait)]
pub trait TabHost {
    /// All tabs, or only those in `window_id`, in the browser's tab order
    async fn query_tabs(&self, window_id: Option<i32>) -> Result<Vec<TabInfo>>;

    async fn window_ids(&self) -> Result<Vec<i32>>;

    async fn current_window_id(&self) -> Result<i32>;

    async fn remove_tab(&self, tab_id: i32) -> Result<()>;
}

/// Extension-scoped persistent key-value storage
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// Wall clock in epoch milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}
