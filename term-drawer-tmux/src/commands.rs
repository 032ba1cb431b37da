//! tmux requests and their command-line form
//!
//! Each operation the drawer needs from tmux is a [`TmuxRequest`] variant
//! with typed arguments. [`TmuxCommand`] is the argument vector tmux is
//! invoked with; ids and paths are passed as separate arguments and are never
//! quoted or interpolated into a shell string.

use crate::types::{PositionFlag, SplitOrientation};
use std::fmt;

/// Format printing the id of the pane a split or break produced.
pub(crate) const PANE_ID_FORMAT: &str = "#{pane_id}";

/// A single operation against the tmux server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmuxRequest {
    /// Expand `format` for `target` (or the current client) and print it.
    Display {
        target: Option<String>,
        format: String,
    },
    /// Print `format` for every pane of the current window, or of the whole
    /// server when `all` is set.
    ListPanes { all: bool, format: String },
    /// Split a new full-span pane off the current window.
    SplitWindow {
        orientation: SplitOrientation,
        position: PositionFlag,
        size: u32,
        cwd: String,
    },
    /// Join `source` into the window `dest` as a full-span pane.
    MovePane {
        source: String,
        dest: String,
        orientation: SplitOrientation,
        position: PositionFlag,
        size: u32,
    },
    /// Move `source` into its own window after the last window of `session`,
    /// without switching to it.
    BreakPane { source: String, session: String },
    /// Set the width of `pane`.
    ResizePane { pane: String, width: u32 },
    /// Succeeds only if the session `target` resolves to exists.
    HasSession { target: String },
    /// Start a detached session called `name`.
    NewSession { name: String },
}

impl TmuxRequest {
    /// Target for a session given either by id (`$N`) or by name.
    ///
    /// Names get tmux's `=` prefix so they only match exactly, never as a
    /// prefix of another session's name.
    pub fn session_target(session: &str) -> String {
        if session.starts_with('$') {
            session.to_string()
        } else {
            format!("={session}")
        }
    }

    /// Query a format for the current client.
    pub fn display(format: impl Into<String>) -> Self {
        TmuxRequest::Display {
            target: None,
            format: format.into(),
        }
    }

    /// Query a format for a specific target (pane, window or session).
    pub fn display_for(target: impl Into<String>, format: impl Into<String>) -> Self {
        TmuxRequest::Display {
            target: Some(target.into()),
            format: format.into(),
        }
    }

    pub fn to_command(&self) -> TmuxCommand {
        TmuxCommand::from(self)
    }
}

/// A tmux command ready to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmuxCommand {
    /// Arguments following the tmux binary (and socket selection)
    args: Vec<String>,
}

impl TmuxCommand {
    fn new(name: &str) -> Self {
        Self {
            args: vec![name.to_string()],
        }
    }

    fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn flag_value(self, flag: &str, value: impl Into<String>) -> Self {
        self.arg(flag).arg(value)
    }

    fn position(self, position: PositionFlag) -> Self {
        match position.as_flag() {
            Some(flag) => self.arg(flag),
            None => self,
        }
    }

    /// Command name (e.g. `split-window`).
    pub fn name(&self) -> &str {
        &self.args[0]
    }

    /// Full argument vector, starting with the command name.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl From<&TmuxRequest> for TmuxCommand {
    fn from(request: &TmuxRequest) -> Self {
        match request {
            TmuxRequest::Display { target, format } => {
                let cmd = TmuxCommand::new("display-message").arg("-p");
                let cmd = match target {
                    Some(target) => cmd.flag_value("-t", target),
                    None => cmd,
                };
                cmd.arg(format)
            }
            TmuxRequest::ListPanes { all, format } => {
                let cmd = TmuxCommand::new("list-panes");
                let cmd = if *all { cmd.arg("-a") } else { cmd };
                cmd.flag_value("-F", format)
            }
            TmuxRequest::SplitWindow {
                orientation,
                position,
                size,
                cwd,
            } => TmuxCommand::new("split-window")
                .arg(orientation.as_flag())
                .arg("-f")
                .position(*position)
                .flag_value("-l", size.to_string())
                .flag_value("-c", cwd)
                .arg("-P")
                .flag_value("-F", PANE_ID_FORMAT),
            TmuxRequest::MovePane {
                source,
                dest,
                orientation,
                position,
                size,
            } => TmuxCommand::new("move-pane")
                .arg(orientation.as_flag())
                .arg("-f")
                .position(*position)
                .flag_value("-l", size.to_string())
                .flag_value("-s", source)
                .flag_value("-t", dest),
            TmuxRequest::BreakPane { source, session } => TmuxCommand::new("break-pane")
                .arg("-d")
                .arg("-a")
                .flag_value("-s", source)
                .flag_value("-t", format!("={session}:{{end}}")),
            TmuxRequest::ResizePane { pane, width } => TmuxCommand::new("resize-pane")
                .flag_value("-t", pane)
                .flag_value("-x", width.to_string()),
            TmuxRequest::HasSession { target } => {
                TmuxCommand::new("has-session").flag_value("-t", target)
            }
            TmuxRequest::NewSession { name } => TmuxCommand::new("new-session")
                .arg("-d")
                .flag_value("-s", name),
        }
    }
}

impl fmt::Display for TmuxCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, "{arg:?}")?;
            } else {
                f.write_str(arg)?;
            }
        }
        Ok(())
    }
}
