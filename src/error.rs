//! Top-level error type for term-drawer.
//!
//! Every failure a toggle can hit falls into one of four categories, each
//! coming from a different layer. Errors are never retried or recovered;
//! they are passed up unchanged to `main`, which reports them and exits.

use term_drawer_config::{ConfigError, RegistryError};
use term_drawer_tmux::TmuxError;
use thiserror::Error;

/// A condition that validated input can never produce.
///
/// Seeing one means config validation was bypassed or a layout calculation
/// has a bug; it is never caused by the user.
#[derive(Debug, Error)]
#[error("internal invariant violated: {0}")]
pub struct InvariantError(pub String);

/// Any failure of a drawer toggle.
#[derive(Debug, Error)]
pub enum DrawerError {
    /// The config document is unreadable or has an invalid field.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The window → pane registry could not be read or written.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A tmux command failed or printed something unexpected.
    #[error(transparent)]
    Multiplexer(#[from] TmuxError),

    /// See [`InvariantError`].
    #[error(transparent)]
    Invariant(#[from] InvariantError),
}
