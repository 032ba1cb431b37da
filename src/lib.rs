// Library exports for the binary and the integration tests.
//
// The toggle itself is generic over `term_drawer_tmux::Multiplexer`, so the
// tests in `tests/` drive it against an in-memory tmux model and a
// temporary state directory.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod debug;

pub mod cli;
pub mod error;
pub mod layout;
pub mod toggle;

pub use error::{DrawerError, InvariantError};
pub use toggle::{DrawerState, ToggleController, ToggleOutcome};
