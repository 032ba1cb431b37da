//! Core types for tmux integration
//!
//! tmux ids are kept in their textual form (`$0`, `@1`, `%2`) since that is
//! what tmux prints and accepts as a target.

use std::fmt;

/// tmux session ID (e.g., $0, $1)
pub type TmuxSessionId = String;

/// tmux window ID (e.g., @0, @1)
pub type TmuxWindowId = String;

/// tmux pane ID (e.g., %0, %1)
pub type TmuxPaneId = String;

/// One pane of the active window, as seen at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Pane ID
    pub pane: TmuxPaneId,
    /// Pane width in characters
    pub width: u32,
}

impl Column {
    pub fn new(pane: impl Into<TmuxPaneId>, width: u32) -> Self {
        Self {
            pane: pane.into(),
            width,
        }
    }
}

/// Direction in which a new pane is split off.
///
/// Named after tmux's flags: a horizontal split (`-h`) places panes side by
/// side, a vertical split (`-v`) stacks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitOrientation {
    Horizontal,
    Vertical,
}

impl SplitOrientation {
    pub fn as_flag(self) -> &'static str {
        match self {
            SplitOrientation::Horizontal => "-h",
            SplitOrientation::Vertical => "-v",
        }
    }
}

impl fmt::Display for SplitOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

/// Whether the new pane goes before (left/above) or after (right/below)
/// the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionFlag {
    Before,
    After,
}

impl PositionFlag {
    /// tmux flag for this position; `After` is tmux's default and has none.
    pub fn as_flag(self) -> Option<&'static str> {
        match self {
            PositionFlag::Before => Some("-b"),
            PositionFlag::After => None,
        }
    }
}
