//! The multiplexer contract and its tmux implementation.
//!
//! [`Multiplexer`] is everything the drawer needs from tmux. [`TmuxClient`]
//! implements it by issuing one blocking tmux invocation per call through a
//! [`TmuxRunner`]; [`ProcessRunner`] is the runner that actually spawns tmux.

use crate::commands::{TmuxCommand, TmuxRequest};
use crate::error::TmuxError;
use crate::types::{
    Column, PositionFlag, SplitOrientation, TmuxPaneId, TmuxSessionId, TmuxWindowId,
};
use std::process::Command;

/// Operations the drawer performs against the terminal multiplexer.
///
/// Every call is a blocking round-trip. Queries about "the active" session,
/// window or pane refer to the client the tool was invoked from.
pub trait Multiplexer {
    fn active_session(&self) -> Result<TmuxSessionId, TmuxError>;
    fn active_window(&self) -> Result<TmuxWindowId, TmuxError>;
    fn active_pane(&self) -> Result<TmuxPaneId, TmuxError>;
    /// Pid of the tmux server process.
    fn active_pid(&self) -> Result<u32, TmuxError>;

    /// `(width, height)` of `window` in cells.
    fn window_dimensions(&self, window: &str) -> Result<(u32, u32), TmuxError>;
    /// Panes of the active window with their widths.
    fn list_columns(&self) -> Result<Vec<Column>, TmuxError>;

    fn pane_exists(&self, pane: &str) -> Result<bool, TmuxError>;
    fn pane_session(&self, pane: &str) -> Result<TmuxSessionId, TmuxError>;
    fn pane_window(&self, pane: &str) -> Result<TmuxWindowId, TmuxError>;
    fn pane_working_directory(&self, pane: &str) -> Result<String, TmuxError>;

    /// Split a new full-span pane off the active window and return its id.
    fn create_split(
        &self,
        orientation: SplitOrientation,
        position: PositionFlag,
        size: u32,
        cwd: &str,
    ) -> Result<TmuxPaneId, TmuxError>;

    /// Join `source` into window `dest` as a full-span pane.
    fn move_pane(
        &self,
        source: &str,
        dest: &str,
        orientation: SplitOrientation,
        position: PositionFlag,
        size: u32,
    ) -> Result<(), TmuxError>;

    /// Park `source` in a new window at the end of `stash_session`.
    fn break_pane_to_session_tail(&self, source: &str, stash_session: &str)
    -> Result<(), TmuxError>;

    fn set_pane_width(&self, pane: &str, width: u32) -> Result<(), TmuxError>;

    /// Make sure the session the tool was invoked from is available.
    fn attach_or_create_session(&self, name: &str) -> Result<(), TmuxError>;
    /// Make sure a detached session called `name` exists.
    fn start_session(&self, name: &str) -> Result<(), TmuxError>;
}

/// Executes a tmux command and returns its standard output.
pub trait TmuxRunner {
    fn run(&self, command: &TmuxCommand) -> Result<String, TmuxError>;
}

/// Runs tmux as a child process, optionally against a named socket (`-L`).
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    binary: String,
    socket: Option<String>,
}

impl ProcessRunner {
    pub fn new(socket: Option<String>) -> Self {
        Self {
            binary: "tmux".to_string(),
            socket: socket.filter(|s| !s.is_empty()),
        }
    }

    /// Use a tmux binary other than the one on `PATH`.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn socket(&self) -> Option<&str> {
        self.socket.as_deref()
    }
}

impl TmuxRunner for ProcessRunner {
    fn run(&self, command: &TmuxCommand) -> Result<String, TmuxError> {
        let mut process = Command::new(&self.binary);
        if let Some(socket) = &self.socket {
            process.arg("-L").arg(socket);
        }
        process.args(command.args());

        log::trace!("tmux {}", command);

        let output = process.output().map_err(|source| TmuxError::Spawn {
            binary: self.binary.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(TmuxError::CommandFailed {
                command: command.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| TmuxError::Utf8 {
            command: command.to_string(),
        })
    }
}

/// [`Multiplexer`] backed by the tmux command-line interface.
#[derive(Debug, Clone)]
pub struct TmuxClient<R = ProcessRunner> {
    runner: R,
}

impl TmuxClient<ProcessRunner> {
    /// Client for the default tmux server, or the one listening on `socket`.
    pub fn new(socket: Option<String>) -> Self {
        Self::with_runner(ProcessRunner::new(socket))
    }
}

impl<R: TmuxRunner> TmuxClient<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn run(&self, request: TmuxRequest) -> Result<(TmuxCommand, String), TmuxError> {
        let command = request.to_command();
        let output = self.runner.run(&command)?;
        Ok((command, output))
    }

    /// Run a query expected to print a single non-empty value.
    fn query(&self, request: TmuxRequest) -> Result<String, TmuxError> {
        let (command, output) = self.run(request)?;
        let value = output.trim();
        if value.is_empty() {
            return Err(TmuxError::parse(command, "empty output"));
        }
        Ok(value.to_string())
    }

    fn session_exists(&self, session: &str) -> Result<bool, TmuxError> {
        match self.run(TmuxRequest::HasSession {
            target: TmuxRequest::session_target(session),
        }) {
            Ok(_) => Ok(true),
            Err(TmuxError::CommandFailed { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn ensure_session(&self, name: &str) -> Result<(), TmuxError> {
        if name.starts_with('$') {
            // An id can only be resolved, never created.
            self.run(TmuxRequest::HasSession {
                target: name.to_string(),
            })?;
            return Ok(());
        }
        if self.session_exists(name)? {
            return Ok(());
        }
        log::info!("Creating detached tmux session '{}'", name);
        self.run(TmuxRequest::NewSession {
            name: name.to_string(),
        })?;
        Ok(())
    }
}

fn parse_number(command: &TmuxCommand, value: &str) -> Result<u32, TmuxError> {
    value
        .trim()
        .parse()
        .map_err(|_| TmuxError::parse(command, format!("expected an integer, got '{value}'")))
}

fn parse_dimensions(command: &TmuxCommand, output: &str) -> Result<(u32, u32), TmuxError> {
    match output.split_whitespace().collect::<Vec<_>>().as_slice() {
        [width, height] => Ok((parse_number(command, width)?, parse_number(command, height)?)),
        _ => Err(TmuxError::parse(
            command,
            format!("expected '<width> <height>', got '{}'", output.trim()),
        )),
    }
}

fn parse_columns(command: &TmuxCommand, output: &str) -> Result<Vec<Column>, TmuxError> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            [pane, width] => Ok(Column::new(*pane, parse_number(command, width)?)),
            _ => Err(TmuxError::parse(
                command,
                format!("expected '<pane> <width>', got '{line}'"),
            )),
        })
        .collect()
}

fn expect_pane_id(command: &TmuxCommand, output: &str) -> Result<TmuxPaneId, TmuxError> {
    let pane = output.trim();
    if pane.starts_with('%') && pane.len() > 1 {
        Ok(pane.to_string())
    } else {
        Err(TmuxError::parse(
            command,
            format!("expected a pane id, got '{pane}'"),
        ))
    }
}

impl<R: TmuxRunner> Multiplexer for TmuxClient<R> {
    fn active_session(&self) -> Result<TmuxSessionId, TmuxError> {
        self.query(TmuxRequest::display("#{session_id}"))
    }

    fn active_window(&self) -> Result<TmuxWindowId, TmuxError> {
        self.query(TmuxRequest::display("#{window_id}"))
    }

    fn active_pane(&self) -> Result<TmuxPaneId, TmuxError> {
        self.query(TmuxRequest::display("#{pane_id}"))
    }

    fn active_pid(&self) -> Result<u32, TmuxError> {
        let (command, output) = self.run(TmuxRequest::display("#{pid}"))?;
        parse_number(&command, &output)
    }

    fn window_dimensions(&self, window: &str) -> Result<(u32, u32), TmuxError> {
        let (command, output) = self.run(TmuxRequest::display_for(
            window,
            "#{window_width} #{window_height}",
        ))?;
        parse_dimensions(&command, &output)
    }

    fn list_columns(&self) -> Result<Vec<Column>, TmuxError> {
        let (command, output) = self.run(TmuxRequest::ListPanes {
            all: false,
            format: "#{pane_id} #{pane_width}".to_string(),
        })?;
        parse_columns(&command, &output)
    }

    fn pane_exists(&self, pane: &str) -> Result<bool, TmuxError> {
        if pane.is_empty() {
            return Ok(false);
        }
        let (_, output) = self.run(TmuxRequest::ListPanes {
            all: true,
            format: "#{pane_id}".to_string(),
        })?;
        Ok(output.lines().any(|line| line.trim() == pane))
    }

    fn pane_session(&self, pane: &str) -> Result<TmuxSessionId, TmuxError> {
        self.query(TmuxRequest::display_for(pane, "#{session_id}"))
    }

    fn pane_window(&self, pane: &str) -> Result<TmuxWindowId, TmuxError> {
        self.query(TmuxRequest::display_for(pane, "#{window_id}"))
    }

    fn pane_working_directory(&self, pane: &str) -> Result<String, TmuxError> {
        let (_, output) = self.run(TmuxRequest::display_for(pane, "#{pane_current_path}"))?;
        // Trim only the line terminator; paths may legitimately end in spaces.
        Ok(output.trim_end_matches(['\n', '\r']).to_string())
    }

    fn create_split(
        &self,
        orientation: SplitOrientation,
        position: PositionFlag,
        size: u32,
        cwd: &str,
    ) -> Result<TmuxPaneId, TmuxError> {
        let (command, output) = self.run(TmuxRequest::SplitWindow {
            orientation,
            position,
            size,
            cwd: cwd.to_string(),
        })?;
        expect_pane_id(&command, &output)
    }

    fn move_pane(
        &self,
        source: &str,
        dest: &str,
        orientation: SplitOrientation,
        position: PositionFlag,
        size: u32,
    ) -> Result<(), TmuxError> {
        self.run(TmuxRequest::MovePane {
            source: source.to_string(),
            dest: dest.to_string(),
            orientation,
            position,
            size,
        })?;
        Ok(())
    }

    fn break_pane_to_session_tail(
        &self,
        source: &str,
        stash_session: &str,
    ) -> Result<(), TmuxError> {
        self.run(TmuxRequest::BreakPane {
            source: source.to_string(),
            session: stash_session.to_string(),
        })?;
        Ok(())
    }

    fn set_pane_width(&self, pane: &str, width: u32) -> Result<(), TmuxError> {
        self.run(TmuxRequest::ResizePane {
            pane: pane.to_string(),
            width,
        })?;
        Ok(())
    }

    fn attach_or_create_session(&self, name: &str) -> Result<(), TmuxError> {
        // Each invocation is a fresh tmux client, so there is nothing to attach;
        // the session only has to exist.
        self.ensure_session(name)
    }

    fn start_session(&self, name: &str) -> Result<(), TmuxError> {
        self.ensure_session(name)
    }
}
