//! Document storage for the drawer config and the pane registry.
//!
//! Both documents live under one base directory (by default
//! `~/.config/term-drawer`). The pane registry file name carries the tmux
//! socket name when one is given, so distinct tmux servers keep independent
//! registries:
//!
//! - `config.yaml`
//! - `pane-map.json` / `pane-map-<socket>.json`
//!
//! Saves are atomic: the document is written to a temp file and renamed over
//! the target.

use crate::error::StoreError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory name under `~/.config`.
const APP_DIR: &str = "term-drawer";

/// The documents held by a [`StateStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    /// Drawer layout preferences.
    Config,
    /// Window → drawer pane registry.
    PaneMap,
}

/// On-disk encoding of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl StoreKey {
    /// Encoding used for this document.
    pub fn format(self) -> DocumentFormat {
        match self {
            StoreKey::Config => DocumentFormat::Yaml,
            StoreKey::PaneMap => DocumentFormat::Json,
        }
    }
}

/// Storage service rooted at a base directory.
#[derive(Debug, Clone)]
pub struct StateStore {
    base_dir: PathBuf,
    instance: Option<String>,
}

impl StateStore {
    /// Create a store rooted at `base_dir`.
    ///
    /// `instance` is the tmux socket name; an empty string is treated the same
    /// as no socket. Path separators in it are replaced with `_` so the
    /// registry always stays inside `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>, instance: Option<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            instance: instance
                .filter(|s| !s.is_empty())
                .map(|s| s.replace(['/', '\\'], "_")),
        }
    }

    /// Create a store in the per-user default location.
    pub fn for_user(instance: Option<String>) -> Self {
        Self::new(Self::default_base_dir(), instance)
    }

    /// Default base directory (`~/.config/term-drawer`).
    pub fn default_base_dir() -> PathBuf {
        if let Some(home_dir) = dirs::home_dir() {
            home_dir.join(".config").join(APP_DIR)
        } else {
            // Fallback if home directory cannot be determined
            PathBuf::from(".")
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    /// Path of the document stored under `key`.
    pub fn path(&self, key: StoreKey) -> PathBuf {
        let file_name = match (key, self.instance.as_deref()) {
            (StoreKey::Config, _) => "config.yaml".to_string(),
            (StoreKey::PaneMap, None) => "pane-map.json".to_string(),
            (StoreKey::PaneMap, Some(socket)) => format!("pane-map-{socket}.json"),
        };
        self.base_dir.join(file_name)
    }

    /// Whether the document stored under `key` exists.
    pub fn exists(&self, key: StoreKey) -> bool {
        self.path(key).is_file()
    }

    /// Load and decode the document stored under `key`.
    ///
    /// Returns `Ok(None)` when the document does not exist.
    pub fn load<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>, StoreError> {
        let path = self.path(key);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No document at {:?}", path);
                return Ok(None);
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        log::debug!("Read {} bytes from {:?}", contents.len(), path);

        let value = match key.format() {
            DocumentFormat::Yaml => serde_yaml_ng::from_str(&contents)
                .map_err(|source| StoreError::Yaml {
                    path: path.clone(),
                    source,
                })?,
            DocumentFormat::Json => {
                serde_json::from_str(&contents).map_err(|source| StoreError::Json {
                    path: path.clone(),
                    source,
                })?
            }
        };
        Ok(Some(value))
    }

    /// Encode `value` and write it under `key`, creating the base directory
    /// if needed.
    pub fn save<T: Serialize>(&self, key: StoreKey, value: &T) -> Result<(), StoreError> {
        let path = self.path(key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = match key.format() {
            DocumentFormat::Yaml => {
                serde_yaml_ng::to_string(value).map_err(|source| StoreError::Yaml {
                    path: path.clone(),
                    source,
                })?
            }
            DocumentFormat::Json => {
                serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
                    path: path.clone(),
                    source,
                })?
            }
        };

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &contents).map_err(|source| StoreError::Io {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        log::debug!("Saved {} bytes to {:?}", contents.len(), path);
        Ok(())
    }
}
