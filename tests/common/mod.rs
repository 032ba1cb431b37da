//! Shared integration test helpers for term-drawer.
//!
//! [`FakeTmux`] is an in-memory model of a tmux server (sessions, windows and
//! panes with their widths) implementing [`Multiplexer`], so the toggle can
//! be driven end to end without a real tmux. [`TestContext`] pairs it with a
//! [`StateStore`] rooted in a temporary directory.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{FakeTmux, TestContext};
//! ```
//!
//! The `#![allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers are used per file.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use tempfile::TempDir;
use term_drawer::toggle::{ToggleController, ToggleOutcome};
use term_drawer::DrawerError;
use term_drawer_config::{StateStore, StoreKey};
use term_drawer_tmux::{
    Column, Multiplexer, PositionFlag, SplitOrientation, TmuxError, TmuxPaneId, TmuxSessionId,
    TmuxWindowId,
};

/// Window size used by [`FakeTmux::new`].
pub const WINDOW_WIDTH: u32 = 200;
pub const WINDOW_HEIGHT: u32 = 50;

/// Working directory reported for every fake pane.
pub const PANE_CWD: &str = "/home/user/project";

#[derive(Debug, Clone)]
pub struct FakePane {
    pub id: TmuxPaneId,
    pub width: u32,
}

#[derive(Debug, Clone)]
pub struct FakeWindow {
    pub id: TmuxWindowId,
    pub width: u32,
    pub height: u32,
    pub panes: Vec<FakePane>,
}

#[derive(Debug, Clone)]
pub struct FakeSession {
    pub id: TmuxSessionId,
    pub name: String,
    pub windows: Vec<FakeWindow>,
}

/// A split or join the toggle asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitCall {
    pub orientation: SplitOrientation,
    pub position: PositionFlag,
    pub size: u32,
}

#[derive(Debug, Default)]
struct FakeState {
    pid: u32,
    sessions: Vec<FakeSession>,
    active_session: TmuxSessionId,
    active_window: TmuxWindowId,
    active_pane: TmuxPaneId,
    next_session: u32,
    next_window: u32,
    next_pane: u32,
    splits: Vec<SplitCall>,
    moves: Vec<SplitCall>,
    resizes: Vec<(TmuxPaneId, u32)>,
    checked_sessions: Vec<String>,
    fail_next: Option<String>,
}

/// Locate a pane: (session index, window index, pane index).
fn find_pane(state: &FakeState, pane: &str) -> Option<(usize, usize, usize)> {
    state.sessions.iter().enumerate().find_map(|(s, session)| {
        session.windows.iter().enumerate().find_map(|(w, window)| {
            window
                .panes
                .iter()
                .position(|p| p.id == pane)
                .map(|p| (s, w, p))
        })
    })
}

fn find_window(state: &FakeState, window: &str) -> Option<(usize, usize)> {
    state.sessions.iter().enumerate().find_map(|(s, session)| {
        session
            .windows
            .iter()
            .position(|w| w.id == window)
            .map(|w| (s, w))
    })
}

fn failed(command: &str, stderr: impl Into<String>) -> TmuxError {
    TmuxError::CommandFailed {
        command: command.to_string(),
        status: "exit status: 1".to_string(),
        stderr: stderr.into(),
    }
}

impl FakeState {
    /// Fail `command` once if [`FakeTmux::fail_next`] armed it.
    fn check_failure(&mut self, command: &str) -> Result<(), TmuxError> {
        if self.fail_next.as_deref() == Some(command) {
            self.fail_next = None;
            return Err(failed(command, "server exited unexpectedly"));
        }
        Ok(())
    }

    fn new_pane_id(&mut self) -> TmuxPaneId {
        let id = format!("%{}", self.next_pane);
        self.next_pane += 1;
        id
    }

    fn new_window_id(&mut self) -> TmuxWindowId {
        let id = format!("@{}", self.next_window);
        self.next_window += 1;
        id
    }

    fn new_session_id(&mut self) -> TmuxSessionId {
        let id = format!("${}", self.next_session);
        self.next_session += 1;
        id
    }

    /// Fresh server with one session `main` holding one full-width pane.
    fn boot(pid: u32) -> Self {
        let mut state = FakeState {
            pid,
            ..FakeState::default()
        };
        let session = state.new_session_id();
        let window = state.new_window_id();
        let pane = state.new_pane_id();
        state.sessions.push(FakeSession {
            id: session.clone(),
            name: "main".to_string(),
            windows: vec![FakeWindow {
                id: window.clone(),
                width: WINDOW_WIDTH,
                height: WINDOW_HEIGHT,
                panes: vec![FakePane {
                    id: pane.clone(),
                    width: WINDOW_WIDTH,
                }],
            }],
        });
        state.active_session = session;
        state.active_window = window;
        state.active_pane = pane;
        state
    }

    /// Insert `pane` into `window` the way a full-span split does.
    ///
    /// Side-by-side splits take their width plus one divider column from the
    /// neighbouring pane; stacked splits leave widths alone.
    fn insert_pane(
        &mut self,
        window: (usize, usize),
        pane: TmuxPaneId,
        orientation: SplitOrientation,
        position: PositionFlag,
        size: u32,
    ) {
        let window = &mut self.sessions[window.0].windows[window.1];
        let width = match orientation {
            SplitOrientation::Horizontal => size,
            SplitOrientation::Vertical => window.width,
        };
        let index = match position {
            PositionFlag::Before => 0,
            PositionFlag::After => window.panes.len(),
        };
        if orientation == SplitOrientation::Horizontal {
            let neighbour = match position {
                PositionFlag::Before => window.panes.first_mut(),
                PositionFlag::After => window.panes.last_mut(),
            };
            if let Some(neighbour) = neighbour {
                neighbour.width = neighbour.width.saturating_sub(size + 1).max(1);
            }
        }
        window.panes.insert(index, FakePane { id: pane, width });
    }

    /// Remove a pane, giving its width back to a neighbour. Empty windows
    /// are closed, as tmux does.
    fn remove_pane(&mut self, (s, w, p): (usize, usize, usize)) -> FakePane {
        let window = &mut self.sessions[s].windows[w];
        let removed = window.panes.remove(p);
        let side_by_side = window.panes.iter().all(|pane| pane.width < window.width);
        if side_by_side && !window.panes.is_empty() {
            let neighbour = p.min(window.panes.len() - 1);
            window.panes[neighbour].width += removed.width + 1;
        }
        if window.panes.is_empty() {
            self.sessions[s].windows.remove(w);
        }
        if self.active_pane == removed.id {
            self.active_pane = self
                .active_window_ref()
                .and_then(|w| w.panes.first())
                .map(|p| p.id.clone())
                .unwrap_or_default();
        }
        removed
    }

    fn active_window_ref(&self) -> Option<&FakeWindow> {
        find_window(self, &self.active_window).map(|(s, w)| &self.sessions[s].windows[w])
    }
}

/// In-memory tmux server.
pub struct FakeTmux {
    state: RefCell<FakeState>,
}

impl FakeTmux {
    /// Server with pid 100 and a single 200x50 window containing pane `%0`.
    pub fn new() -> Self {
        Self::with_pid(100)
    }

    pub fn with_pid(pid: u32) -> Self {
        Self {
            state: RefCell::new(FakeState::boot(pid)),
        }
    }

    /// Kill the server and start a new one: every id starts over.
    pub fn restart(&self, pid: u32) {
        *self.state.borrow_mut() = FakeState::boot(pid);
    }

    /// Make the next `command` (`move-pane`, `break-pane` or `resize-pane`)
    /// fail with [`TmuxError::CommandFailed`] without changing anything.
    pub fn fail_next(&self, command: &str) {
        self.state.borrow_mut().fail_next = Some(command.to_string());
    }

    /// Split the active window side by side as a user would, returning the
    /// new pane.
    pub fn user_split(&self, width: u32) -> TmuxPaneId {
        let mut state = self.state.borrow_mut();
        let pane = state.new_pane_id();
        let active = state.active_window.clone();
        if let Some(window) = find_window(&state, &active) {
            state.insert_pane(
                window,
                pane.clone(),
                SplitOrientation::Horizontal,
                PositionFlag::After,
                width,
            );
        }
        pane
    }

    /// Open a new window in the active session and switch to it.
    pub fn new_window(&self) -> TmuxWindowId {
        let mut state = self.state.borrow_mut();
        let window = state.new_window_id();
        let pane = state.new_pane_id();
        let session = state.active_session.clone();
        if let Some(s) = state.sessions.iter_mut().find(|s| s.id == session) {
            s.windows.push(FakeWindow {
                id: window.clone(),
                width: WINDOW_WIDTH,
                height: WINDOW_HEIGHT,
                panes: vec![FakePane {
                    id: pane.clone(),
                    width: WINDOW_WIDTH,
                }],
            });
        }
        state.active_window = window.clone();
        state.active_pane = pane;
        window
    }

    /// Switch the client to another window of the active session.
    pub fn select_window(&self, window: &str) {
        let mut state = self.state.borrow_mut();
        state.active_window = window.to_string();
        let first = state
            .active_window_ref()
            .and_then(|w| w.panes.first())
            .map(|p| p.id.clone());
        if let Some(pane) = first {
            state.active_pane = pane;
        }
    }

    /// Kill a pane as `kill-pane` would.
    pub fn kill_pane(&self, pane: &str) {
        let mut state = self.state.borrow_mut();
        if let Some(location) = find_pane(&state, pane) {
            state.remove_pane(location);
        }
    }

    pub fn active_window_id(&self) -> TmuxWindowId {
        self.state.borrow().active_window.clone()
    }

    /// Panes of the active window, in order.
    pub fn columns(&self) -> Vec<Column> {
        self.state
            .borrow()
            .active_window_ref()
            .map(|w| {
                w.panes
                    .iter()
                    .map(|p| Column::new(p.id.clone(), p.width))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `(session name, window id)` holding `pane`.
    pub fn location_of(&self, pane: &str) -> Option<(String, TmuxWindowId)> {
        let state = self.state.borrow();
        find_pane(&state, pane).map(|(s, w, _)| {
            (
                state.sessions[s].name.clone(),
                state.sessions[s].windows[w].id.clone(),
            )
        })
    }

    pub fn session_names(&self) -> Vec<String> {
        self.state
            .borrow()
            .sessions
            .iter()
            .map(|s| s.name.clone())
            .collect()
    }

    /// Window ids of the session called `name`, in order.
    pub fn windows_of(&self, name: &str) -> Vec<TmuxWindowId> {
        self.state
            .borrow()
            .sessions
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.windows.iter().map(|w| w.id.clone()).collect())
            .unwrap_or_default()
    }

    pub fn splits(&self) -> Vec<SplitCall> {
        self.state.borrow().splits.clone()
    }

    pub fn moves(&self) -> Vec<SplitCall> {
        self.state.borrow().moves.clone()
    }

    pub fn resizes(&self) -> Vec<(TmuxPaneId, u32)> {
        self.state.borrow().resizes.clone()
    }

    /// Sessions passed to `attach_or_create_session`.
    pub fn checked_sessions(&self) -> Vec<String> {
        self.state.borrow().checked_sessions.clone()
    }
}

impl Default for FakeTmux {
    fn default() -> Self {
        Self::new()
    }
}

impl Multiplexer for FakeTmux {
    fn active_session(&self) -> Result<TmuxSessionId, TmuxError> {
        Ok(self.state.borrow().active_session.clone())
    }

    fn active_window(&self) -> Result<TmuxWindowId, TmuxError> {
        Ok(self.state.borrow().active_window.clone())
    }

    fn active_pane(&self) -> Result<TmuxPaneId, TmuxError> {
        Ok(self.state.borrow().active_pane.clone())
    }

    fn active_pid(&self) -> Result<u32, TmuxError> {
        Ok(self.state.borrow().pid)
    }

    fn window_dimensions(&self, window: &str) -> Result<(u32, u32), TmuxError> {
        let state = self.state.borrow();
        let (s, w) = find_window(&state, window)
            .ok_or_else(|| failed("display-message", format!("can't find window: {window}")))?;
        let window = &state.sessions[s].windows[w];
        Ok((window.width, window.height))
    }

    fn list_columns(&self) -> Result<Vec<Column>, TmuxError> {
        Ok(self.columns())
    }

    fn pane_exists(&self, pane: &str) -> Result<bool, TmuxError> {
        Ok(find_pane(&self.state.borrow(), pane).is_some())
    }

    fn pane_session(&self, pane: &str) -> Result<TmuxSessionId, TmuxError> {
        let state = self.state.borrow();
        let (s, _, _) = find_pane(&state, pane)
            .ok_or_else(|| failed("display-message", format!("can't find pane: {pane}")))?;
        Ok(state.sessions[s].id.clone())
    }

    fn pane_window(&self, pane: &str) -> Result<TmuxWindowId, TmuxError> {
        let state = self.state.borrow();
        let (s, w, _) = find_pane(&state, pane)
            .ok_or_else(|| failed("display-message", format!("can't find pane: {pane}")))?;
        Ok(state.sessions[s].windows[w].id.clone())
    }

    fn pane_working_directory(&self, pane: &str) -> Result<String, TmuxError> {
        if find_pane(&self.state.borrow(), pane).is_none() {
            return Err(failed("display-message", format!("can't find pane: {pane}")));
        }
        Ok(PANE_CWD.to_string())
    }

    fn create_split(
        &self,
        orientation: SplitOrientation,
        position: PositionFlag,
        size: u32,
        _cwd: &str,
    ) -> Result<TmuxPaneId, TmuxError> {
        let mut state = self.state.borrow_mut();
        let active = state.active_window.clone();
        let window = find_window(&state, &active)
            .ok_or_else(|| failed("split-window", "no current window"))?;
        let pane = state.new_pane_id();
        state.insert_pane(window, pane.clone(), orientation, position, size);
        state.splits.push(SplitCall {
            orientation,
            position,
            size,
        });
        state.active_pane = pane.clone();
        Ok(pane)
    }

    fn move_pane(
        &self,
        source: &str,
        dest: &str,
        orientation: SplitOrientation,
        position: PositionFlag,
        size: u32,
    ) -> Result<(), TmuxError> {
        let mut state = self.state.borrow_mut();
        state.check_failure("move-pane")?;
        let location = find_pane(&state, source)
            .ok_or_else(|| failed("move-pane", format!("can't find pane: {source}")))?;
        if find_window(&state, dest).is_none() {
            return Err(failed("move-pane", format!("can't find window: {dest}")));
        }
        let pane = state.remove_pane(location);
        // Removing the pane may have closed a window and shifted indices.
        let window = find_window(&state, dest)
            .ok_or_else(|| failed("move-pane", format!("can't find window: {dest}")))?;
        state.insert_pane(window, pane.id, orientation, position, size);
        state.moves.push(SplitCall {
            orientation,
            position,
            size,
        });
        Ok(())
    }

    fn break_pane_to_session_tail(
        &self,
        source: &str,
        stash_session: &str,
    ) -> Result<(), TmuxError> {
        let mut state = self.state.borrow_mut();
        state.check_failure("break-pane")?;
        let location = find_pane(&state, source)
            .ok_or_else(|| failed("break-pane", format!("can't find pane: {source}")))?;
        if !state.sessions.iter().any(|s| s.name == stash_session) {
            return Err(failed(
                "break-pane",
                format!("can't find session: {stash_session}"),
            ));
        }
        let pane = state.remove_pane(location);
        let window = state.new_window_id();
        if let Some(session) = state.sessions.iter_mut().find(|s| s.name == stash_session) {
            session.windows.push(FakeWindow {
                id: window,
                width: WINDOW_WIDTH,
                height: WINDOW_HEIGHT,
                panes: vec![FakePane {
                    id: pane.id,
                    width: WINDOW_WIDTH,
                }],
            });
        }
        Ok(())
    }

    fn set_pane_width(&self, pane: &str, width: u32) -> Result<(), TmuxError> {
        let mut state = self.state.borrow_mut();
        state.check_failure("resize-pane")?;
        let (s, w, p) = find_pane(&state, pane)
            .ok_or_else(|| failed("resize-pane", format!("can't find pane: {pane}")))?;
        state.sessions[s].windows[w].panes[p].width = width;
        state.resizes.push((pane.to_string(), width));
        Ok(())
    }

    fn attach_or_create_session(&self, name: &str) -> Result<(), TmuxError> {
        let mut state = self.state.borrow_mut();
        state.checked_sessions.push(name.to_string());
        if state.sessions.iter().any(|s| s.id == name || s.name == name) {
            Ok(())
        } else {
            Err(failed("has-session", format!("can't find session: {name}")))
        }
    }

    fn start_session(&self, name: &str) -> Result<(), TmuxError> {
        let mut state = self.state.borrow_mut();
        if state.sessions.iter().any(|s| s.name == name) {
            return Ok(());
        }
        let id = state.new_session_id();
        let window = state.new_window_id();
        let pane = state.new_pane_id();
        state.sessions.push(FakeSession {
            id,
            name: name.to_string(),
            windows: vec![FakeWindow {
                id: window,
                width: WINDOW_WIDTH,
                height: WINDOW_HEIGHT,
                panes: vec![FakePane {
                    id: pane,
                    width: WINDOW_WIDTH,
                }],
            }],
        });
        Ok(())
    }
}

/// A fake tmux server plus a state store in a temporary directory.
///
/// The `TempDir` must be kept alive for the duration of the test.
pub struct TestContext {
    pub tmux: FakeTmux,
    pub store: StateStore,
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = StateStore::new(temp_dir.path(), None);
        Self {
            tmux: FakeTmux::new(),
            store,
            temp_dir,
        }
    }

    /// Write `yaml` as the config document before the first toggle.
    pub fn with_config(self, yaml: &str) -> Self {
        let path = self.store.path(StoreKey::Config);
        fs::create_dir_all(self.temp_dir.path()).expect("Failed to create config dir");
        fs::write(path, yaml).expect("Failed to write config");
        self
    }

    pub fn toggle(&self) -> Result<ToggleOutcome, DrawerError> {
        ToggleController::new(&self.tmux, &self.store).toggle()
    }

    pub fn read_file(&self, key: StoreKey) -> String {
        fs::read_to_string(self.store.path(key)).expect("Failed to read state file")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
