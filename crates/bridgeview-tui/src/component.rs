//! Component trait: one implementation per view.
//!
//! Screens keep only presentation state (selection, scroll). Dashboard data
//! lives in the core `DashboardState` and is lent to every call.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use throbber_widgets_tui::ThrobberState;

use bridgeview_core::DashboardState;

use crate::action::Action;

/// Everything a screen may read while drawing.
pub struct RenderContext<'a> {
    pub state: &'a DashboardState,
    pub throbber: &'a ThrobberState,
}

pub trait Component {
    /// Handle a key the app did not consume. Return an Action to dispatch.
    fn handle_key_event(&mut self, key: KeyEvent, state: &DashboardState)
    -> Result<Option<Action>>;

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>);

    /// Key hints shown in the status bar.
    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }
}
