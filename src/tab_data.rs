/// Data structures for Tab Sweeper
use serde::{Deserialize, Serialize};

/// Information about a browser tab, as reported by chrome.tabs.query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: i32,
    pub window_id: i32,
    #[serde(default)]
    pub index: i32,
    // Tabs without the "tabs" permission grant or still loading may omit the url
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub audible: bool,
}

impl TabInfo {
    pub fn new(id: i32, window_id: i32, url: String) -> TabInfo {
        TabInfo {
            id,
            window_id,
            index: 0,
            url,
            title: String::new(),
            pinned: false,
            audible: false,
        }
    }
}

/// The subset of chrome.tabs.onUpdated changeInfo we care about
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TabChange {
    #[serde(default)]
    pub url: Option<String>,
}
