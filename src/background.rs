/// Service worker side: lifecycle events feed the access tracker

use crate::chrome::{every, ChromeStorage, ChromeTabs, JsClock};
use crate::constants::SWEEP_INTERVAL_MS;
use crate::tab_data::TabChange;
use crate::tracker::AccessTracker;
use log::{error, info};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

type ChromeTracker = AccessTracker<ChromeStorage, ChromeTabs, JsClock>;

thread_local! {
    static TRACKER: Rc<ChromeTracker> = Rc::new(AccessTracker::new(ChromeStorage, ChromeTabs, JsClock));
    static SWEEP_SCHEDULED: Cell<bool> = const { Cell::new(false) };
}

fn tracker() -> Rc<ChromeTracker> {
    TRACKER.with(Rc::clone)
}

/// Schedule the hourly sweep. Safe to call more than once; returns true
/// only for the call that actually scheduled it.
pub fn start() -> bool {
    if SWEEP_SCHEDULED.with(|scheduled| scheduled.replace(true)) {
        return false;
    }

    let sweep = Closure::<dyn FnMut()>::new(|| spawn_local(sweep_closed_tabs()));
    every(SWEEP_INTERVAL_MS, sweep.as_ref().unchecked_ref());
    // The interval lives as long as the worker
    sweep.forget();

    info!("Background started, sweeping every {} ms", SWEEP_INTERVAL_MS);
    true
}

#[wasm_bindgen]
pub async fn on_installed() {
    if let Err(e) = tracker().on_install().await {
        error!("Failed to initialize tab access times: {}", e);
    }
}

#[wasm_bindgen]
pub async fn on_tab_created(tab_id: i32) {
    if let Err(e) = tracker().on_tab_created(tab_id).await {
        error!("Failed to record access time for tab {}: {}", tab_id, e);
    }
}

#[wasm_bindgen]
pub async fn on_tab_activated(tab_id: i32) {
    if let Err(e) = tracker().on_tab_activated(tab_id).await {
        error!("Failed to record access time for tab {}: {}", tab_id, e);
    }
}

/// chrome.tabs.onUpdated; `change_info` is the raw changeInfo object
#[wasm_bindgen]
pub async fn on_tab_updated(tab_id: i32, change_info: JsValue) {
    let change: TabChange = match serde_wasm_bindgen::from_value(change_info) {
        Ok(change) => change,
        Err(e) => {
            error!("Unreadable changeInfo for tab {}: {}", tab_id, e);
            return;
        }
    };
    if let Err(e) = tracker().on_tab_updated(tab_id, &change).await {
        error!("Failed to record access time for tab {}: {}", tab_id, e);
    }
}

#[wasm_bindgen]
pub async fn on_tab_removed(tab_id: i32) {
    if let Err(e) = tracker().on_tab_closed(tab_id).await {
        error!("Failed to remove access time for tab {}: {}", tab_id, e);
    }
}

async fn sweep_closed_tabs() {
    if let Err(e) = tracker().periodic_sweep().await {
        error!("Failed to sweep access times: {}", e);
    }
}
