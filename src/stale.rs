/// Closing tabs that haven't been visited in a week

use crate::constants::STALE_THRESHOLD_MS;
use crate::error::Result;
use crate::host::{Clock, KeyValueStore, TabHost};
use crate::operations::{close_tabs, is_exempt};
use crate::storage::{load_access_times, AccessTimeTable};
use crate::tab_data::TabInfo;
use log::{debug, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaleCleanResult {
    pub stale_found: usize,
    pub tabs_closed: usize,
}

/// Ids of non-exempt tabs last accessed more than the threshold ago.
/// A tab with no recorded access time is never stale.
pub fn find_stale_tabs(tabs: &[TabInfo], table: &AccessTimeTable, now: f64) -> Vec<i32> {
    tabs.iter()
        .filter(|tab| !is_exempt(tab))
        .filter_map(|tab| {
            let last_access = table.get(tab.id)?;
            (now - last_access > STALE_THRESHOLD_MS).then_some(tab.id)
        })
        .collect()
}

/// Close every stale tab across all windows
pub async fn clean_stale_tabs<H, S, C>(host: &H, store: &S, clock: &C) -> Result<StaleCleanResult>
where
    H: TabHost,
    S: KeyValueStore,
    C: Clock,
{
    let tabs = host.query_tabs(None).await?;
    let table = load_access_times(store).await?;
    let stale = find_stale_tabs(&tabs, &table, clock.now_ms());
    debug!("Stale tabs: {:?}", stale);

    let tabs_closed = close_tabs(host, &stale).await;
    info!("{} stale tabs found, {} closed", stale.len(), tabs_closed);

    Ok(StaleCleanResult {
        stale_found: stale.len(),
        tabs_closed,
    })
}
