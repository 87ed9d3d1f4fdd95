/// Actions triggered from the popup, and the text it displays

use crate::constants::{MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE};
use crate::dedupe::{clean_all_windows, clean_window, count_duplicates, tab_noun, WindowCleanResult};
use crate::error::{Error, Result};
use crate::host::{Clock, KeyValueStore, TabHost};
use crate::stale::clean_stale_tabs;
use crate::storage::save_last_clean_time;
use log::{error, warn};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// At least one tab was closed
    Success,
    /// Nothing matched, nothing closed
    NoOp,
    /// The action as a whole failed (e.g. tab enumeration), or nothing it matched could be closed
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub status: ActionStatus,
    pub message: String,
}

impl ActionOutcome {
    /// Success if anything closed, NoOp if nothing matched. Matches that
    /// all failed to close are reported as an error.
    fn closed(found: usize, tabs_closed: usize, message: String) -> Self {
        if tabs_closed > 0 {
            ActionOutcome {
                status: ActionStatus::Success,
                message,
            }
        } else if found > 0 {
            warn!("{} tabs matched but none could be closed", found);
            ActionOutcome {
                status: ActionStatus::Error,
                message: format!("Found {} {} but none could be closed", found, tab_noun(found)),
            }
        } else {
            ActionOutcome {
                status: ActionStatus::NoOp,
                message,
            }
        }
    }

    fn failed(action: &str, e: Error) -> Self {
        error!("{} failed: {}", action, e);
        ActionOutcome {
            status: ActionStatus::Error,
            message: format!("Something went wrong: {}", e),
        }
    }

    pub fn closed_tabs(&self) -> bool {
        self.status == ActionStatus::Success
    }
}

/// Close duplicate tabs in the window the popup belongs to
pub async fn clean_current_window<H, S, C>(host: &H, store: &S, clock: &C) -> ActionOutcome
where
    H: TabHost,
    S: KeyValueStore,
    C: Clock,
{
    match clean_popup_window(host).await {
        Ok(result) => {
            record_cleanup(store, clock, result.tabs_closed).await;
            ActionOutcome::closed(result.duplicates_found, result.tabs_closed, result.message)
        }
        Err(e) => ActionOutcome::failed("Cleaning current window", e),
    }
}

async fn clean_popup_window<H: TabHost>(host: &H) -> Result<WindowCleanResult> {
    let window_id = host.current_window_id().await?;
    clean_window(host, window_id).await
}

/// Close duplicate tabs in every window
pub async fn clean_every_window<H, S, C>(host: &H, store: &S, clock: &C) -> ActionOutcome
where
    H: TabHost,
    S: KeyValueStore,
    C: Clock,
{
    match clean_all_windows(host).await {
        Ok(summary) => {
            record_cleanup(store, clock, summary.tabs_closed).await;
            let message = if summary.duplicates_found > 0 {
                format!(
                    "Closed {} duplicate {} across all windows",
                    summary.tabs_closed,
                    tab_noun(summary.tabs_closed)
                )
            } else {
                "No duplicate tabs in any window".to_string()
            };
            ActionOutcome::closed(summary.duplicates_found, summary.tabs_closed, message)
        }
        Err(e) => ActionOutcome::failed("Cleaning all windows", e),
    }
}

/// Close tabs nobody has looked at in seven days
pub async fn clean_stale<H, S, C>(host: &H, store: &S, clock: &C) -> ActionOutcome
where
    H: TabHost,
    S: KeyValueStore,
    C: Clock,
{
    match clean_stale_tabs(host, store, clock).await {
        Ok(result) => {
            record_cleanup(store, clock, result.tabs_closed).await;
            let message = if result.stale_found > 0 {
                format!(
                    "Closed {} {} unvisited for 7 days",
                    result.tabs_closed,
                    tab_noun(result.tabs_closed)
                )
            } else {
                "No tabs unvisited for 7 days".to_string()
            };
            ActionOutcome::closed(result.stale_found, result.tabs_closed, message)
        }
        Err(e) => ActionOutcome::failed("Cleaning stale tabs", e),
    }
}

// The timestamp is display-only, so a failed write is just logged
async fn record_cleanup<S: KeyValueStore, C: Clock>(store: &S, clock: &C, tabs_closed: usize) {
    if tabs_closed == 0 {
        return;
    }
    if let Err(e) = save_last_clean_time(store, clock.now_ms()).await {
        warn!("Could not save cleanup time: {}", e);
    }
}

/// Tab and duplicate counts for the popup's window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStats {
    pub tab_count: usize,
    pub duplicate_count: usize,
}

impl fmt::Display for WindowStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Current window: {} {}, {} duplicate{}",
            self.tab_count,
            tab_noun(self.tab_count),
            self.duplicate_count,
            if self.duplicate_count == 1 { "" } else { "s" }
        )
    }
}

pub async fn window_stats<H: TabHost>(host: &H) -> Result<WindowStats> {
    let window_id = host.current_window_id().await?;
    let tabs = host.query_tabs(Some(window_id)).await?;
    Ok(WindowStats {
        tab_count: tabs.len(),
        duplicate_count: count_duplicates(&tabs),
    })
}

/// How long ago something happened, bucketed for display
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RelativeTime {
    JustNow,
    Minutes(u64),
    Hours(u64),
    Days(u64),
    /// A week or more ago; shown as an absolute date
    Date(f64),
}

impl RelativeTime {
    pub fn since(timestamp: f64, now: f64) -> RelativeTime {
        let elapsed = (now - timestamp).max(0.0);
        let minutes = (elapsed / MS_PER_MINUTE).floor() as u64;
        let hours = (elapsed / MS_PER_HOUR).floor() as u64;
        let days = (elapsed / MS_PER_DAY).floor() as u64;

        if minutes < 1 {
            RelativeTime::JustNow
        } else if minutes < 60 {
            RelativeTime::Minutes(minutes)
        } else if hours < 24 {
            RelativeTime::Hours(hours)
        } else if days < 7 {
            RelativeTime::Days(days)
        } else {
            RelativeTime::Date(timestamp)
        }
    }

    /// Render for display; `absolute` formats timestamps older than a week
    pub fn describe(&self, absolute: impl FnOnce(f64) -> String) -> String {
        let ago = |n: u64, unit: &str| {
            format!("{} {}{} ago", n, unit, if n == 1 { "" } else { "s" })
        };
        match *self {
            RelativeTime::JustNow => "just now".to_string(),
            RelativeTime::Minutes(n) => ago(n, "minute"),
            RelativeTime::Hours(n) => ago(n, "hour"),
            RelativeTime::Days(n) => ago(n, "day"),
            RelativeTime::Date(timestamp) => absolute(timestamp),
        }
    }
}

/// The popup's "last cleanup" line
pub fn last_clean_label(
    last_clean: Option<f64>,
    now: f64,
    absolute: impl FnOnce(f64) -> String,
) -> String {
    match last_clean {
        Some(timestamp) => format!(
            "Last cleanup: {}",
            RelativeTime::since(timestamp, now).describe(absolute)
        ),
        None => "No cleanup yet".to_string(),
    }
}
