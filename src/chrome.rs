/// chrome.* implementations of the host traits, via the JS bridge

use crate::error::Error;
use crate::host::{Clock, KeyValueStore, TabHost};
use crate::tab_data::TabInfo;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

// Import JS bridge functions
#[wasm_bindgen(module = "/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryTabs(window_id: Option<i32>) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getWindowIds() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getCurrentWindowId() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeTab(tab_id: i32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    /// setInterval; returns the interval id
    pub(crate) fn every(ms: i32, callback: &js_sys::Function) -> i32;
}

/// Best-effort message out of a rejected promise
pub(crate) fn js_error_message(e: &JsValue) -> String {
    if let Some(err) = e.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> crate::error::Result<T> {
    serde_wasm_bindgen::from_value(value).map_err(|e| Error::Host(format!("Failed to parse: {}", e)))
}

/// chrome.tabs / chrome.windows
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeTabs;

impl TabHost for ChromeTabs {
    async fn query_tabs(&self, window_id: Option<i32>) -> crate::error::Result<Vec<TabInfo>> {
        let tabs_js = queryTabs(window_id)
            .await
            .map_err(|e| Error::Host(js_error_message(&e)))?;
        from_js(tabs_js)
    }

    async fn window_ids(&self) -> crate::error::Result<Vec<i32>> {
        let ids_js = getWindowIds()
            .await
            .map_err(|e| Error::Host(js_error_message(&e)))?;
        from_js(ids_js)
    }

    async fn current_window_id(&self) -> crate::error::Result<i32> {
        let id_js = getCurrentWindowId()
            .await
            .map_err(|e| Error::Host(js_error_message(&e)))?;
        from_js(id_js)
    }

    async fn remove_tab(&self, tab_id: i32) -> crate::error::Result<()> {
        removeTab(tab_id).await.map_err(|e| Error::CloseTab {
            tab_id,
            reason: js_error_message(&e),
        })
    }
}

/// chrome.storage.local
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeStorage;

impl KeyValueStore for ChromeStorage {
    async fn get(&self, key: &str) -> crate::error::Result<Option<Value>> {
        let value_js = getStorage(key)
            .await
            .map_err(|e| Error::Storage(js_error_message(&e)))?;

        if value_js.is_null() || value_js.is_undefined() {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(value_js)
            .map(Some)
            .map_err(|e| Error::Storage(format!("Failed to parse '{}': {}", key, e)))
    }

    async fn set(&self, key: &str, value: Value) -> crate::error::Result<()> {
        // json_compatible so maps become plain objects, not JS Maps
        let value_js = value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| Error::Storage(format!("Failed to serialize '{}': {}", key, e)))?;

        setStorage(key, value_js)
            .await
            .map_err(|e| Error::Storage(js_error_message(&e)))
    }
}

/// Date.now()
#[derive(Debug, Clone, Copy, Default)]
pub struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// Short local date for timestamps older than a week, e.g. "Oct 18, 14:05"
pub fn format_short_date(timestamp: f64) -> String {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    let date = js_sys::Date::new(&JsValue::from_f64(timestamp));
    format!(
        "{} {}, {:02}:{:02}",
        MONTHS[(date.get_month() as usize) % 12],
        date.get_date(),
        date.get_hours(),
        date.get_minutes()
    )
}
