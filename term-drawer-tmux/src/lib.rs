//! tmux integration for term-drawer
//!
//! This crate drives a running tmux server through its command-line
//! interface. It never talks to a shell: every operation is described by a
//! typed [`TmuxRequest`], rendered into an argument vector ([`TmuxCommand`])
//! and executed directly.
//!
//! ## Architecture
//!
//! - `types.rs`: ids, [`Column`], split orientation and position flag
//! - `commands.rs`: [`TmuxRequest`] → [`TmuxCommand`] translation
//! - `client.rs`: the [`Multiplexer`] trait and the [`TmuxClient`] adapter
//! - `error.rs`: [`TmuxError`]

mod client;
mod commands;
mod error;
mod types;

pub use client::{Multiplexer, ProcessRunner, TmuxClient, TmuxRunner};
pub use commands::{TmuxCommand, TmuxRequest};
pub use error::TmuxError;
pub use types::{Column, PositionFlag, SplitOrientation, TmuxPaneId, TmuxSessionId, TmuxWindowId};
