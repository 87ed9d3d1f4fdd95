/// Last-access bookkeeping driven by tab lifecycle events

use crate::error::Result;
use crate::host::{Clock, KeyValueStore, TabHost};
use crate::storage::{load_access_times, save_access_times, AccessTimeTable};
use crate::tab_data::TabChange;
use futures::lock::Mutex;
use log::{debug, info};
use std::collections::HashSet;

/// Keeps the persisted access-time table in sync with tab lifecycle
///
/// Storage is the only source of truth: every operation re-reads the whole
/// table, changes it and writes it back. The gate serializes those
/// read-modify-write cycles so that interleaved event handlers in the same
/// worker can't overwrite each other's updates.
pub struct AccessTracker<S, H, C> {
    store: S,
    host: H,
    clock: C,
    gate: Mutex<()>,
}

impl<S: KeyValueStore, H: TabHost, C: Clock> AccessTracker<S, H, C> {
    pub fn new(store: S, host: H, clock: C) -> Self {
        AccessTracker {
            store,
            host,
            clock,
            gate: Mutex::new(()),
        }
    }

    /// Seed an access time for every open tab that has none.
    /// Existing entries are left alone, so repeated installs keep the earliest time.
    pub async fn on_install(&self) -> Result<usize> {
        let _guard = self.gate.lock().await;

        let tabs = self.host.query_tabs(None).await?;
        let now = self.clock.now_ms();
        let mut table = load_access_times(&self.store).await?;

        let seeded = tabs
            .iter()
            .filter(|tab| table.record_if_missing(tab.id, now))
            .count();

        save_access_times(&self.store, &table).await?;
        info!("Initialized access times for {} of {} open tabs", seeded, tabs.len());
        Ok(seeded)
    }

    pub async fn on_tab_created(&self, tab_id: i32) -> Result<()> {
        debug!("Tab created: {}", tab_id);
        self.touch(tab_id).await
    }

    pub async fn on_tab_activated(&self, tab_id: i32) -> Result<()> {
        debug!("Tab activated: {}", tab_id);
        self.touch(tab_id).await
    }

    /// Record a visit when the tab navigated to a new URL.
    /// Other updates (loading status, title, audio) are ignored.
    pub async fn on_tab_updated(&self, tab_id: i32, change: &TabChange) -> Result<bool> {
        if change.url.is_none() {
            return Ok(false);
        }
        debug!("Tab navigated: {}", tab_id);
        self.touch(tab_id).await?;
        Ok(true)
    }

    pub async fn on_tab_closed(&self, tab_id: i32) -> Result<bool> {
        let _guard = self.gate.lock().await;

        let mut table = load_access_times(&self.store).await?;
        let removed = table.remove(tab_id);
        save_access_times(&self.store, &table).await?;

        debug!("Tab closed: {}", tab_id);
        Ok(removed)
    }

    /// Drop entries for tabs that no longer exist. Returns the number removed.
    pub async fn periodic_sweep(&self) -> Result<usize> {
        let _guard = self.gate.lock().await;

        let mut table = load_access_times(&self.store).await?;
        let live: HashSet<i32> = self
            .host
            .query_tabs(None)
            .await?
            .iter()
            .map(|tab| tab.id)
            .collect();

        let removed = table.retain_live(&live);
        if removed > 0 {
            save_access_times(&self.store, &table).await?;
            info!("Swept {} access times of closed tabs", removed);
        }
        Ok(removed)
    }

    /// Snapshot of the persisted table
    pub async fn table(&self) -> Result<AccessTimeTable> {
        let _guard = self.gate.lock().await;
        load_access_times(&self.store).await
    }

    async fn touch(&self, tab_id: i32) -> Result<()> {
        let _guard = self.gate.lock().await;

        let mut table = load_access_times(&self.store).await?;
        table.record(tab_id, self.clock.now_ms());
        save_access_times(&self.store, &table).await
    }
}
