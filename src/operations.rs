/// Tab operations shared by the duplicate and stale cleaners

use crate::host::TabHost;
use crate::tab_data::TabInfo;
use crate::url_key::is_internal_url;
use log::warn;

/// Pinned tabs, tabs playing audio and browser-internal pages are never closed
pub fn is_exempt(tab: &TabInfo) -> bool {
    tab.pinned || tab.audible || is_internal_url(&tab.url)
}

/// Close tabs one at a time, in order. A tab that can't be closed is logged
/// and skipped. Returns how many were actually closed.
pub async fn close_tabs<H: TabHost>(host: &H, tab_ids: &[i32]) -> usize {
    let mut closed = 0;
    for &tab_id in tab_ids {
        match host.remove_tab(tab_id).await {
            Ok(()) => closed += 1,
            Err(e) => warn!("Could not close tab {}: {}", tab_id, e),
        }
    }
    closed
}
