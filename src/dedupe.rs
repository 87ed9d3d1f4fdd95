/// Duplicate tab detection and cleanup
///
/// Within a window, tabs whose normalized URLs match are duplicates. The
/// first tab the browser reports (the leftmost) is kept; later ones close.

use crate::error::Result;
use crate::host::TabHost;
use crate::operations::{close_tabs, is_exempt};
use crate::tab_data::TabInfo;
use crate::url_key::normalize_url;
use log::{debug, info, warn};
use std::collections::HashSet;

/// Result of grouping a window's tabs by normalized URL
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DuplicateScan {
    /// Normalized URL -> id of the tab kept for it, in first-seen order
    pub kept: Vec<(String, i32)>,
    /// Tabs sharing a URL with an earlier tab
    pub close_ids: Vec<i32>,
}

impl DuplicateScan {
    pub fn duplicate_count(&self) -> usize {
        self.close_ids.len()
    }
}

/// Find duplicate tabs, keeping the first occurrence of each normalized URL
///
/// Exempt tabs are skipped, as are tabs whose URL doesn't parse: those are
/// neither kept nor closed.
pub fn scan_duplicates(tabs: &[TabInfo]) -> DuplicateScan {
    let mut seen_urls = HashSet::new();
    let mut scan = DuplicateScan::default();

    for tab in tabs.iter().filter(|tab| !is_exempt(tab)) {
        let key = match normalize_url(&tab.url) {
            Ok(key) => key,
            Err(e) => {
                debug!("Skipping tab {}: {}", tab.id, e);
                continue;
            }
        };

        if seen_urls.contains(&key) {
            scan.close_ids.push(tab.id);
        } else {
            seen_urls.insert(key.clone());
            scan.kept.push((key, tab.id));
        }
    }

    scan
}

/// Count duplicates without closing anything (popup stats line)
pub fn count_duplicates(tabs: &[TabInfo]) -> usize {
    scan_duplicates(tabs).duplicate_count()
}

pub(crate) fn tab_noun(count: usize) -> &'static str {
    if count == 1 { "tab" } else { "tabs" }
}

/// Outcome of cleaning one window
#[derive(Debug, Clone, PartialEq)]
pub struct WindowCleanResult {
    pub window_id: i32,
    pub duplicates_found: usize,
    pub tabs_closed: usize,
    pub message: String,
}

/// Outcome of cleaning every window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanSummary {
    pub windows: usize,
    /// Windows whose tabs couldn't be enumerated; skipped
    pub failed_windows: usize,
    pub duplicates_found: usize,
    pub tabs_closed: usize,
}

impl CleanSummary {
    pub fn add(&mut self, result: &WindowCleanResult) {
        self.windows += 1;
        self.duplicates_found += result.duplicates_found;
        self.tabs_closed += result.tabs_closed;
    }
}

/// Close the duplicate tabs in one window
pub async fn clean_window<H: TabHost>(host: &H, window_id: i32) -> Result<WindowCleanResult> {
    let tabs = host.query_tabs(Some(window_id)).await?;
    let scan = scan_duplicates(&tabs);
    let duplicates_found = scan.duplicate_count();
    let tabs_closed = close_tabs(host, &scan.close_ids).await;

    let message = if duplicates_found > 0 {
        format!("Closed {} duplicate {}", tabs_closed, tab_noun(tabs_closed))
    } else {
        "No duplicate tabs found".to_string()
    };

    info!(
        "Window {}: {} duplicates found, {} closed",
        window_id, duplicates_found, tabs_closed
    );

    Ok(WindowCleanResult {
        window_id,
        duplicates_found,
        tabs_closed,
        message,
    })
}

/// Close the duplicate tabs in every window. Windows are cleaned independently:
/// a window that fails is logged and skipped. Only failing to list the
/// windows themselves is an error.
pub async fn clean_all_windows<H: TabHost>(host: &H) -> Result<CleanSummary> {
    let mut summary = CleanSummary::default();
    for window_id in host.window_ids().await? {
        match clean_window(host, window_id).await {
            Ok(result) => summary.add(&result),
            Err(e) => {
                warn!("Skipping window {}: {}", window_id, e);
                summary.failed_windows += 1;
            }
        }
    }
    Ok(summary)
}
