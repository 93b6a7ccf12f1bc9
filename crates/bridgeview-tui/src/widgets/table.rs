//! Generic renderer for the core's typed table rows.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};

use bridgeview_core::{Cell as DataCell, TableRow};

use crate::theme;

pub struct DataTable<'a> {
    columns: &'a [&'a str],
    widths: &'a [Constraint],
    rows: &'a [TableRow],
    selected: Option<usize>,
    empty: &'a str,
}

impl<'a> DataTable<'a> {
    pub fn new(columns: &'a [&'a str], widths: &'a [Constraint], rows: &'a [TableRow]) -> Self {
        Self {
            columns,
            widths,
            rows,
            selected: None,
            empty: "Nothing to show",
        }
    }

    /// Highlight row `index`, clamped to the last row.
    pub fn selected(mut self, index: usize) -> Self {
        self.selected = Some(index);
        self
    }

    pub fn empty(mut self, message: &'a str) -> Self {
        self.empty = message;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        if self.rows.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {}", self.empty), theme::muted())),
                area,
            );
            return;
        }

        let header = Row::new(
            self.columns
                .iter()
                .map(|c| Cell::from(*c).style(theme::table_header())),
        );
        let rows = self
            .rows
            .iter()
            .map(|row| Row::new(row.cells.iter().map(cell)).style(theme::table_row()));

        let table = Table::new(rows, self.widths.iter().copied())
            .header(header)
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("▸");

        let selected = self.selected.map(|i| i.min(self.rows.len() - 1));
        let mut state = TableState::default().with_selected(selected);
        frame.render_stateful_widget(table, area, &mut state);
    }
}

fn cell(value: &DataCell) -> Cell<'static> {
    match value {
        DataCell::Badge { label, kind } => Cell::from(label.clone()).style(theme::badge(*kind)),
        DataCell::Placeholder => Cell::from(value.display()).style(theme::muted()),
        DataCell::Number { .. } => Cell::from(value.display()).style(theme::value()),
        DataCell::Text(text) => Cell::from(text.clone()),
    }
}
