//! The drawer toggle.
//!
//! Each invocation works out where the active window's drawer is from the
//! pane registry and live tmux state, performs exactly one of create, hide or
//! show, rebalances the remaining panes, and records the drawer pane.
//!
//! ## States
//!
//! | State | Meaning | Action |
//! |---|---|---|
//! | `NoDrawer` | nothing recorded, or the recorded pane is gone | create |
//! | `HiddenElsewhere` | the pane lives in another session or window | show |
//! | `Visible` | the pane is in the active window | hide |
//!
//! Nothing is kept between invocations except the registry, and the registry
//! only records which pane is the drawer; visibility is always re-derived.
//!
//! Invocations are not serialised against each other. The registry is written
//! once at the end, so a failure part-way leaves it at its previous state and
//! the next invocation corrects itself through the checks above.

use crate::error::DrawerError;
use crate::layout::{self, SplitPlan};
use term_drawer_config::{DrawerConfig, StateStore, WindowPaneMap};
use term_drawer_tmux::{Multiplexer, TmuxPaneId};

/// Where the active window's drawer currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawerState {
    NoDrawer,
    HiddenElsewhere { pane: TmuxPaneId },
    Visible { pane: TmuxPaneId },
}

impl DrawerState {
    /// Classify a recorded drawer pane.
    ///
    /// `location` is the pane's live `(session, window)`, or `None` if the
    /// pane is not recorded or no longer exists.
    pub fn classify(
        pane: &str,
        location: Option<(&str, &str)>,
        active_session: &str,
        active_window: &str,
    ) -> Self {
        match location {
            _ if pane.is_empty() => DrawerState::NoDrawer,
            None => DrawerState::NoDrawer,
            Some((session, window)) if session == active_session && window == active_window => {
                DrawerState::Visible {
                    pane: pane.to_string(),
                }
            }
            Some(_) => DrawerState::HiddenElsewhere {
                pane: pane.to_string(),
            },
        }
    }
}

/// What a toggle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A new drawer pane was split off the active window.
    Created(TmuxPaneId),
    /// The drawer was parked in the stash session.
    Hidden(TmuxPaneId),
    /// The drawer was brought back into the active window.
    Shown(TmuxPaneId),
}

impl ToggleOutcome {
    /// The drawer pane, whatever happened to it.
    pub fn pane(&self) -> &str {
        match self {
            ToggleOutcome::Created(pane)
            | ToggleOutcome::Hidden(pane)
            | ToggleOutcome::Shown(pane) => pane,
        }
    }
}

/// Toggles the drawer of the active tmux window.
pub struct ToggleController<'a, M: Multiplexer + ?Sized> {
    tmux: &'a M,
    store: &'a StateStore,
}

impl<'a, M: Multiplexer + ?Sized> ToggleController<'a, M> {
    pub fn new(tmux: &'a M, store: &'a StateStore) -> Self {
        Self { tmux, store }
    }

    /// Run one toggle.
    pub fn toggle(&self) -> Result<ToggleOutcome, DrawerError> {
        let config = DrawerConfig::read(self.store)?;
        log::debug!("Drawer config: {:?}", config);

        let active_session = self.tmux.active_session()?;

        let pid = self.tmux.active_pid()?;
        WindowPaneMap::reconcile(self.store, pid)?;

        self.tmux.attach_or_create_session(&active_session)?;
        self.tmux.start_session(&config.session_name)?;

        let active_window = self.tmux.active_window()?;

        WindowPaneMap::initialize(self.store)?;
        let mut pane_map = WindowPaneMap::read(self.store)?;

        let state = self.detect_state(
            pane_map.get_pane(&active_window),
            &active_session,
            &active_window,
        )?;
        log::info!(
            "Drawer for window {} in session {}: {:?}",
            active_window,
            active_session,
            state
        );

        let columns_before = self.tmux.list_columns()?;

        let outcome = match state {
            DrawerState::NoDrawer => {
                ToggleOutcome::Created(self.create_drawer(&config, &active_window)?)
            }
            DrawerState::Visible { pane } => {
                self.tmux
                    .break_pane_to_session_tail(&pane, &config.session_name)?;
                ToggleOutcome::Hidden(pane)
            }
            DrawerState::HiddenElsewhere { pane } => {
                self.show_drawer(&config, &pane, &active_window)?;
                ToggleOutcome::Shown(pane)
            }
        };

        let columns_after = self.tmux.list_columns()?;
        for resize in layout::rebalance(&columns_before, &columns_after, outcome.pane()) {
            log::debug!("Resizing {} to width {}", resize.pane, resize.width);
            self.tmux.set_pane_width(&resize.pane, resize.width)?;
        }

        pane_map.set_pane(active_window, outcome.pane());
        pane_map.write(self.store)?;

        log::info!("Toggle finished: {:?}", outcome);
        Ok(outcome)
    }

    fn detect_state(
        &self,
        pane: &str,
        active_session: &str,
        active_window: &str,
    ) -> Result<DrawerState, DrawerError> {
        if !self.tmux.pane_exists(pane)? {
            return Ok(DrawerState::classify(
                pane,
                None,
                active_session,
                active_window,
            ));
        }
        let session = self.tmux.pane_session(pane)?;
        let window = self.tmux.pane_window(pane)?;
        Ok(DrawerState::classify(
            pane,
            Some((session.as_str(), window.as_str())),
            active_session,
            active_window,
        ))
    }

    fn plan(&self, config: &DrawerConfig, window: &str) -> Result<SplitPlan, DrawerError> {
        let (width, height) = self.tmux.window_dimensions(window)?;
        let plan = SplitPlan::for_window(width, height, config)?;
        log::debug!("Window {} is {}x{}, drawer plan {:?}", window, width, height, plan);
        Ok(plan)
    }

    fn create_drawer(
        &self,
        config: &DrawerConfig,
        active_window: &str,
    ) -> Result<TmuxPaneId, DrawerError> {
        let plan = self.plan(config, active_window)?;
        let active_pane = self.tmux.active_pane()?;
        let cwd = self.tmux.pane_working_directory(&active_pane)?;
        let pane = self
            .tmux
            .create_split(plan.orientation, plan.position, plan.size, &cwd)?;
        Ok(pane)
    }

    fn show_drawer(
        &self,
        config: &DrawerConfig,
        pane: &str,
        active_window: &str,
    ) -> Result<(), DrawerError> {
        // Window size may have changed since the drawer was hidden.
        let plan = self.plan(config, active_window)?;
        self.tmux.move_pane(
            pane,
            active_window,
            plan.orientation,
            plan.position,
            plan.size,
        )?;
        Ok(())
    }
}
