/// Tab Sweeper - Chrome Extension that closes duplicate and stale tabs
/// Built with Rust + WASM + Yew

pub mod actions;
mod background;
pub mod chrome;
pub mod constants;
pub mod dedupe;
pub mod error;
pub mod host;
pub mod operations;
pub mod stale;
pub mod storage;
pub mod tab_data;
pub mod tracker;
pub mod url_key;
pub mod ui;

#[cfg(test)]
mod test_utils;

pub use background::{on_installed, on_tab_activated, on_tab_created, on_tab_removed, on_tab_updated};

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export URL normalization for JavaScript access
#[wasm_bindgen]
pub fn normalize_url(url: &str) -> Option<String> {
    url_key::normalize_url(url).ok()
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the service worker's periodic sweep; false if it was already running
#[wasm_bindgen]
pub fn start_background() -> bool {
    background::start()
}
