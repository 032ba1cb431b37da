//! Drawer layout preferences.
//!
//! The config document is YAML under a namespaced top-level key:
//!
//! ```yaml
//! tmux-term-drawer:
//!   position: right
//!   size: 30
//!   units: percent
//!   sessionName: term-drawer
//! ```
//!
//! A missing document is replaced by the defaults and written back. A present
//! but invalid document is always an error; nothing is merged or repaired.

use crate::error::ConfigError;
use crate::store::{StateStore, StoreKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_POSITION: Position = Position::Right;
pub const DEFAULT_UNITS: Units = Units::Percent;
pub const DEFAULT_SIZE: u32 = 30;
pub const DEFAULT_SESSION_NAME: &str = "term-drawer";

/// Edge of the window the drawer attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Top,
    Bottom,
    Left,
    Right,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Top,
        Position::Bottom,
        Position::Left,
        Position::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Position::Top => "top",
            Position::Bottom => "bottom",
            Position::Left => "left",
            Position::Right => "right",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "invalid position: '{s}', valid values: top, bottom, left, right"
                ))
            })
    }
}

/// How `size` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    /// Rows (top/bottom) or columns (left/right).
    Absolute,
    /// Percentage of the window height (top/bottom) or width (left/right).
    Percent,
}

impl Units {
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Absolute => "absolute",
            Units::Percent => "percent",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "absolute" => Ok(Units::Absolute),
            "percent" => Ok(Units::Percent),
            _ => Err(ConfigError::Validation(format!(
                "invalid units: '{s}', valid values: absolute, percent"
            ))),
        }
    }
}

/// Validated drawer layout preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawerConfig {
    pub position: Position,
    /// Rows/columns or percentage, depending on `units`. Always > 0 once validated.
    pub size: u32,
    pub units: Units,
    /// Name of the detached session hidden drawers are parked in.
    pub session_name: String,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            position: DEFAULT_POSITION,
            size: DEFAULT_SIZE,
            units: DEFAULT_UNITS,
            session_name: DEFAULT_SESSION_NAME.to_string(),
        }
    }
}

/// The document as it appears on disk, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigDocument {
    #[serde(rename = "tmux-term-drawer", default)]
    drawer: RawDrawerConfig,
}

/// Unvalidated fields. Enum values stay strings here so that a bad value is
/// reported as a validation failure naming the accepted values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDrawerConfig {
    #[serde(default)]
    position: String,
    #[serde(default)]
    size: i64,
    #[serde(default)]
    units: String,
    #[serde(default)]
    session_name: String,
}

impl From<&DrawerConfig> for RawDrawerConfig {
    fn from(config: &DrawerConfig) -> Self {
        Self {
            position: config.position.as_str().to_string(),
            size: i64::from(config.size),
            units: config.units.as_str().to_string(),
            session_name: config.session_name.clone(),
        }
    }
}

impl TryFrom<RawDrawerConfig> for DrawerConfig {
    type Error = ConfigError;

    fn try_from(raw: RawDrawerConfig) -> Result<Self, Self::Error> {
        let position: Position = raw.position.parse()?;
        let size = u32::try_from(raw.size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or_else(|| invalid_size(raw.size))?;
        let units: Units = raw.units.parse()?;
        let config = DrawerConfig {
            position,
            size,
            units,
            session_name: raw.session_name,
        };
        config.validate()?;
        Ok(config)
    }
}

fn invalid_size(size: i64) -> ConfigError {
    ConfigError::Validation(format!(
        "invalid size: {size}, expected number greater than 0"
    ))
}

impl DrawerConfig {
    /// Check the fields the type system does not already guarantee.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(invalid_size(0));
        }
        if self.session_name.is_empty() {
            return Err(ConfigError::Validation(format!(
                "invalid session name: '{}', expected non-empty string",
                self.session_name
            )));
        }
        Ok(())
    }

    /// Load the config from `store`, creating it with defaults if absent.
    pub fn read(store: &StateStore) -> Result<Self, ConfigError> {
        match store.load::<ConfigDocument>(StoreKey::Config)? {
            Some(doc) => {
                log::info!("Loading config from {:?}", store.path(StoreKey::Config));
                DrawerConfig::try_from(doc.drawer)
            }
            None => {
                log::info!(
                    "Config file not found, creating default at {:?}",
                    store.path(StoreKey::Config)
                );
                let config = Self::default();
                config.write(store)?;
                Ok(config)
            }
        }
    }

    /// Save the config to `store`.
    pub fn write(&self, store: &StateStore) -> Result<(), ConfigError> {
        let doc = ConfigDocument {
            drawer: RawDrawerConfig::from(self),
        };
        store.save(StoreKey::Config, &doc)?;
        Ok(())
    }
}
