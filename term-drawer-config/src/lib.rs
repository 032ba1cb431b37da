//! Configuration and persistent state for term-drawer.
//!
//! This crate provides:
//!
//! - [`DrawerConfig`]: the validated layout preferences (position, size, units,
//!   stash session name)
//! - [`WindowPaneMap`]: the per-server registry of window → drawer pane
//! - [`StateStore`]: the storage service both documents are loaded from and
//!   saved to, rooted at a base directory and an optional tmux socket name

pub mod config;
pub mod error;
pub mod pane_map;
pub mod store;

pub use config::{
    DEFAULT_POSITION, DEFAULT_SESSION_NAME, DEFAULT_SIZE, DEFAULT_UNITS, DrawerConfig, Position,
    Units,
};
pub use error::{ConfigError, RegistryError, StoreError};
pub use pane_map::WindowPaneMap;
pub use store::{DocumentFormat, StateStore, StoreKey};
