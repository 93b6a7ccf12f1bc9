//! Reusable widgets shared across screens.

pub mod modal;
pub mod panel;
pub mod sub_tabs;
pub mod table;

use ratatui::layout::Rect;
use ratatui::widgets::{Block, BorderType, Borders};

use crate::theme;

/// A `width` x `height` rect centred in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Double-bordered block used by every overlay.
pub fn overlay_block<'a>(title: impl Into<String>) -> Block<'a> {
    Block::default()
        .title(format!(" {} ", title.into()))
        .title_style(theme::overlay_title())
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(theme::border(true))
        .style(theme::overlay_bg())
}
