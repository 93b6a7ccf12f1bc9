//! Palette and semantic styling for the TUI.
//!
//! Screens ask for a role (`border(focused)`, `badge(kind)`, `notice(level)`)
//! rather than a colour, so the palette stays in one place.

use ratatui::style::{Color, Modifier, Style};

use bridgeview_core::{BadgeKind, NoticeLevel};

// ── Palette ───────────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

fn fg(color: Color) -> Style {
    Style::default().fg(color)
}

fn bold(color: Color) -> Style {
    fg(color).add_modifier(Modifier::BOLD)
}

// ── Chrome ────────────────────────────────────────────────────────────

/// Panel and overlay titles.
pub fn title() -> Style {
    bold(NEON_CYAN)
}

/// Title of an editor or detail overlay.
pub fn overlay_title() -> Style {
    bold(ELECTRIC_YELLOW)
}

pub fn border(focused: bool) -> Style {
    fg(if focused { ELECTRIC_PURPLE } else { BORDER_GRAY })
}

pub fn tab(active: bool) -> Style {
    if active { bold(ELECTRIC_PURPLE) } else { fg(DIM_WHITE) }
}

pub fn key_hint() -> Style {
    fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    bold(NEON_CYAN)
}

/// Background fill behind overlays.
pub fn overlay_bg() -> Style {
    Style::default().bg(BG_DARK)
}

// ── Tables ────────────────────────────────────────────────────────────

pub fn table_header() -> Style {
    bold(NEON_CYAN).add_modifier(Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    fg(DIM_WHITE)
}

pub fn table_selected() -> Style {
    bold(ELECTRIC_PURPLE).bg(BG_HIGHLIGHT)
}

// ── Values ────────────────────────────────────────────────────────────

/// Placeholder and "nothing here" text.
pub fn muted() -> Style {
    fg(BORDER_GRAY)
}

/// Label in a `label: value` pair.
pub fn label() -> Style {
    fg(DIM_WHITE)
}

pub fn value() -> Style {
    fg(NEON_CYAN)
}

/// Refusals and failures the user must read.
pub fn error_text() -> Style {
    bold(ERROR_RED)
}

pub fn badge(kind: BadgeKind) -> Style {
    bold(match kind {
        BadgeKind::Ok => SUCCESS_GREEN,
        BadgeKind::Warning => ELECTRIC_YELLOW,
        BadgeKind::Error => ERROR_RED,
        BadgeKind::Info => NEON_CYAN,
        BadgeKind::Muted => BORDER_GRAY,
    })
}

/// Border colour and icon of a toast.
pub fn notice(level: NoticeLevel) -> (Color, &'static str) {
    match level {
        NoticeLevel::Success => (SUCCESS_GREEN, "✓"),
        NoticeLevel::Warning => (ELECTRIC_YELLOW, "!"),
        NoticeLevel::Info => (NEON_CYAN, "·"),
    }
}
