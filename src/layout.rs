//! Drawer geometry.
//!
//! Pure functions deriving the tmux split arguments for the configured
//! drawer position, the drawer size for a window, and the width
//! redistribution applied to the other panes after the drawer appears or
//! disappears.

use crate::error::InvariantError;
use term_drawer_config::{DrawerConfig, Position, Units};
use term_drawer_tmux::{Column, PositionFlag, SplitOrientation, TmuxPaneId};

/// Top and left drawers are inserted before the existing panes; bottom and
/// right drawers after them.
pub fn position_argument(position: Position) -> PositionFlag {
    match position {
        Position::Top | Position::Left => PositionFlag::Before,
        Position::Bottom | Position::Right => PositionFlag::After,
    }
}

/// Top and bottom drawers stack (`-v`); left and right drawers sit side by
/// side (`-h`).
pub fn split_orientation(position: Position) -> SplitOrientation {
    match position {
        Position::Top | Position::Bottom => SplitOrientation::Vertical,
        Position::Left | Position::Right => SplitOrientation::Horizontal,
    }
}

/// Drawer size in cells for a window of the given dimensions.
///
/// Absolute sizes are used as-is. Percentages apply to the window height for
/// top/bottom drawers and to the width for left/right drawers, rounded to the
/// nearest cell with halves rounded up.
pub fn drawer_size(
    window_width: u32,
    window_height: u32,
    config: &DrawerConfig,
) -> Result<u32, InvariantError> {
    if config.size == 0 {
        return Err(InvariantError(
            "drawer size must be positive; config was not validated".to_string(),
        ));
    }

    let size = match (config.units, config.position) {
        (Units::Absolute, _) => config.size,
        (Units::Percent, Position::Top | Position::Bottom) => percent_of(window_height, config.size),
        (Units::Percent, Position::Left | Position::Right) => percent_of(window_width, config.size),
    };
    Ok(size)
}

fn percent_of(extent: u32, percent: u32) -> u32 {
    let scaled = (u64::from(extent) * u64::from(percent) + 50) / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Split arguments for placing the drawer in a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPlan {
    pub orientation: SplitOrientation,
    pub position: PositionFlag,
    pub size: u32,
}

impl SplitPlan {
    /// Plan for a window of `window_width` x `window_height` cells.
    pub fn for_window(
        window_width: u32,
        window_height: u32,
        config: &DrawerConfig,
    ) -> Result<Self, InvariantError> {
        Ok(Self {
            orientation: split_orientation(config.position),
            position: position_argument(config.position),
            size: drawer_size(window_width, window_height, config)?,
        })
    }
}

/// New width for one pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneResize {
    pub pane: TmuxPaneId,
    pub width: u32,
}

/// Redistribute the width gained or lost by the drawer among the other panes.
///
/// Each pane present in `before` (other than `exclude_pane`) keeps its share
/// of the total width of those panes, scaled to the total they occupy in
/// `after`. Widths are rounded independently, so their sum may differ from
/// the new total by a cell or two.
///
/// Returns nothing when the other panes had no width to begin with.
pub fn rebalance(before: &[Column], after: &[Column], exclude_pane: &str) -> Vec<PaneResize> {
    let total = |columns: &[Column]| -> u64 {
        columns
            .iter()
            .filter(|c| c.pane != exclude_pane)
            .map(|c| u64::from(c.width))
            .sum()
    };

    let total_before = total(before);
    let total_after = total(after);

    if total_before == 0 {
        log::debug!("No sibling panes to rebalance");
        return Vec::new();
    }

    before
        .iter()
        .filter(|c| c.pane != exclude_pane)
        .map(|c| {
            let ratio = f64::from(c.width) / total_before as f64;
            PaneResize {
                pane: c.pane.clone(),
                width: (ratio * total_after as f64).round() as u32,
            }
        })
        .collect()
}
