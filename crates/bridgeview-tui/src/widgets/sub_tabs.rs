//! Horizontal sub-tab bar (doc types) and filter chips.

use ratatui::text::{Line, Span};

use crate::theme;

/// One-line tab strip: the tab matching `active` is bracketed and bold.
pub fn render_sub_tabs<'a, T: PartialEq>(tabs: &[(T, &'a str)], active: &T) -> Line<'a> {
    let spans = tabs.iter().enumerate().flat_map(|(i, (tab, label))| {
        let gap = Span::styled(if i == 0 { " " } else { "  " }, theme::key_hint());
        let label = if tab == active {
            Span::styled(format!("[{label}]"), theme::tab(true))
        } else {
            Span::styled(*label, theme::tab(false))
        };
        [gap, label]
    });
    Line::from(spans.collect::<Vec<_>>())
}

/// `key label: value` chips describing the current filter.
pub fn render_filter_chips<'a>(chips: &[(&'a str, &'a str, String)]) -> Line<'a> {
    let mut spans = vec![Span::raw(" ")];
    for (key, label, value) in chips {
        spans.push(Span::styled(format!("{key} "), theme::key_hint_key()));
        spans.push(Span::styled(format!("{label}: "), theme::label()));
        spans.push(Span::styled(format!("[{value}]  "), theme::value()));
    }
    Line::from(spans)
}
