//! Window → drawer pane registry.
//!
//! The registry records which pane is the drawer of each tmux window. tmux
//! pane ids are only meaningful for the server that issued them, so the
//! registry also records the pid of that server; when the live pid differs
//! the whole registry is discarded.
//!
//! The registry tracks identity, not visibility: a hidden drawer keeps its
//! entry.

use crate::error::RegistryError;
use crate::store::{StateStore, StoreKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn is_zero(pid: &u32) -> bool {
    *pid == 0
}

/// Persistent window → drawer pane mapping for one tmux server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPaneMap {
    /// Pid of the tmux server that last wrote this map
    #[serde(default, skip_serializing_if = "is_zero")]
    pub pid: u32,
    /// Window id (`@N`) → drawer pane id (`%N`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub panes: BTreeMap<String, String>,
}

impl WindowPaneMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry from `store`.
    pub fn read(store: &StateStore) -> Result<Self, RegistryError> {
        store
            .load(StoreKey::PaneMap)?
            .ok_or_else(|| RegistryError::Missing(store.path(StoreKey::PaneMap)))
    }

    /// Save the registry to `store`.
    pub fn write(&self, store: &StateStore) -> Result<(), RegistryError> {
        store.save(StoreKey::PaneMap, self)?;
        Ok(())
    }

    /// Forget every entry and the server pid, then persist.
    pub fn clear(&mut self, store: &StateStore) -> Result<(), RegistryError> {
        self.pid = 0;
        self.panes.clear();
        self.write(store)
    }

    /// Create an empty registry document if none exists yet.
    pub fn initialize(store: &StateStore) -> Result<(), RegistryError> {
        if !store.exists(StoreKey::PaneMap) {
            log::debug!(
                "Creating empty pane registry at {:?}",
                store.path(StoreKey::PaneMap)
            );
            WindowPaneMap::new().clear(store)?;
        }
        Ok(())
    }

    /// Load the registry and discard it if it belongs to another tmux server.
    ///
    /// An unreadable registry is treated like a stale one: it is wiped and
    /// restarted for `current_pid`. The result is persisted before returning.
    pub fn reconcile(store: &StateStore, current_pid: u32) -> Result<Self, RegistryError> {
        let mut map = match Self::read(store) {
            Ok(map) if map.pid == current_pid => map,
            Ok(mut map) => {
                log::info!(
                    "tmux server pid changed ({} -> {}), discarding {} drawer entries",
                    map.pid,
                    current_pid,
                    map.panes.len()
                );
                map.clear(store)?;
                map
            }
            Err(RegistryError::Missing(path)) => {
                log::debug!("No pane registry at {:?} yet", path);
                let mut map = WindowPaneMap::new();
                map.clear(store)?;
                map
            }
            Err(e) => {
                log::warn!("Pane registry unreadable, starting fresh: {e:?}");
                let mut map = WindowPaneMap::new();
                map.clear(store)?;
                map
            }
        };

        map.pid = current_pid;
        map.write(store)?;
        Ok(map)
    }

    /// Drawer pane recorded for `window`, or an empty string.
    pub fn get_pane(&self, window: &str) -> &str {
        self.panes.get(window).map(String::as_str).unwrap_or_default()
    }

    /// Record `pane` as the drawer of `window`.
    pub fn set_pane(&mut self, window: impl Into<String>, pane: impl Into<String>) {
        self.panes.insert(window.into(), pane.into());
    }
}
