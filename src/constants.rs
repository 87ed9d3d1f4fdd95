/// Fixed thresholds and storage keys for Tab Sweeper

/// Milliseconds in one minute
pub const MS_PER_MINUTE: f64 = 60.0 * 1000.0;

/// Milliseconds in one hour
pub const MS_PER_HOUR: f64 = 60.0 * MS_PER_MINUTE;

/// Milliseconds in one day
pub const MS_PER_DAY: f64 = 24.0 * MS_PER_HOUR;

/// A tab unvisited for longer than this is stale (7 days)
pub const STALE_THRESHOLD_MS: f64 = 7.0 * MS_PER_DAY;

/// Interval between sweeps of the access-time table (1 hour)
pub const SWEEP_INTERVAL_MS: i32 = 60 * 60 * 1000;

/// Delay before the popup closes itself after a cleanup
pub const POPUP_CLOSE_DELAY_MS: i32 = 2000;

/// chrome.storage.local key holding the tab id -> last access map
pub const ACCESS_TIMES_KEY: &str = "tabAccessTimes";

/// chrome.storage.local key holding the last cleanup timestamp
pub const LAST_CLEAN_KEY: &str = "lastCleanTime";

/// URL prefixes of browser-internal pages that are never closed
pub const INTERNAL_URL_PREFIXES: &[&str] = &["chrome://", "edge://"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_threshold_is_seven_days() {
        assert_eq!(STALE_THRESHOLD_MS, 604_800_000.0);
    }

    #[test]
    fn test_sweep_interval_is_one_hour() {
        assert_eq!(SWEEP_INTERVAL_MS as f64, MS_PER_HOUR);
    }
}
