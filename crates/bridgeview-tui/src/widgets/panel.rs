//! Bordered panel around one data slot, with a per-panel loading indicator.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use throbber_widgets_tui::{BRAILLE_SIX, Throbber};

use bridgeview_core::PanelSlot;

use crate::component::RenderContext;
use crate::theme;

pub fn block<'a>(title: impl Into<String>, focused: bool) -> Block<'a> {
    Block::default()
        .title(format!(" {} ", title.into()))
        .title_style(theme::title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(focused))
}

/// Draw `slot` inside a titled block. `body` runs only when data is present;
/// otherwise a loading or "no data" line is shown. Stale data stays visible
/// while a reload is in flight.
pub fn render_slot<T>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    slot: &PanelSlot<T>,
    ctx: &RenderContext<'_>,
    body: impl FnOnce(&mut Frame, Rect, &T),
) {
    render_focusable_slot(frame, area, title, slot, false, ctx, body);
}

/// [`render_slot`] with a highlighted border when `focused`.
pub fn render_focusable_slot<T>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    slot: &PanelSlot<T>,
    focused: bool,
    ctx: &RenderContext<'_>,
    body: impl FnOnce(&mut Frame, Rect, &T),
) {
    let mut block = block(title, focused);
    if !slot.is_loading() {
        if let Some(at) = slot.updated_at() {
            let stamp = at.with_timezone(&chrono::Local).format(" %H:%M:%S ");
            block = block.title(
                Line::from(Span::styled(stamp.to_string(), theme::muted())).right_aligned(),
            );
        }
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if slot.is_loading() {
        render_throbber(frame, area, ctx);
    }

    match slot.data() {
        Some(data) => body(frame, inner, data),
        None if slot.is_loading() => {
            frame.render_widget(Paragraph::new(Span::styled("  Loading…", theme::muted())), inner);
        }
        None => {
            frame.render_widget(Paragraph::new(Span::styled("  No data", theme::muted())), inner);
        }
    }
}

/// Spinner in the top-right corner of `area`'s border.
pub fn render_throbber(frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
    const WIDTH: u16 = 12;
    if area.width < WIDTH + 4 {
        return;
    }
    let spot = Rect::new(area.x + area.width - WIDTH - 2, area.y, WIDTH, 1);
    let throbber = Throbber::default()
        .label("loading")
        .style(Style::default().fg(theme::DIM_WHITE))
        .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE))
        .throbber_set(BRAILLE_SIX);
    frame.render_stateful_widget(throbber, spot, &mut ctx.throbber.clone());
}

/// `label: value` line used by the summary panels.
pub fn stat_line<'a>(label: &'a str, value: String, style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {label:<16}"), theme::label()),
        Span::styled(value, style),
    ])
}
