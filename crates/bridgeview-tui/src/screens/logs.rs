//! Logs screen: server-filtered entries with paging and export.
//!
//! Filter keys only stage changes; `a` applies them and reloads.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use strum::IntoEnumIterator;

use bridgeview_core::projection::sensor_names;
use bridgeview_core::table::{LOG_COLUMNS, log_row};
use bridgeview_core::{
    Command, DashboardState, ExportFormat, FilterUpdate, LogLevel, TableRow, ViewId,
};

use crate::action::Action;
use crate::component::{Component, RenderContext};
use crate::screens::{Selection, cycle};
use crate::theme;
use crate::widgets::panel::render_slot;
use crate::widgets::sub_tabs::render_filter_chips;
use crate::widgets::table::DataTable;

const WIDTHS: [Constraint; 5] = [
    Constraint::Length(19),
    Constraint::Length(9),
    Constraint::Length(12),
    Constraint::Length(16),
    Constraint::Min(20),
];

pub struct LogsScreen {
    selection: Selection,
}

impl LogsScreen {
    pub fn new() -> Self {
        Self {
            selection: Selection::default(),
        }
    }

    fn categories(state: &DashboardState) -> Vec<String> {
        state
            .panels
            .log_stats
            .data()
            .map_or_else(Vec::new, |stats| stats.by_category.keys().cloned().collect())
    }

    fn sensors(state: &DashboardState) -> Vec<String> {
        state.panels.sensors.data().map_or_else(Vec::new, |snap| {
            sensor_names(snap).into_iter().map(str::to_owned).collect()
        })
    }

    fn entry_count(state: &DashboardState) -> usize {
        state.panels.logs.data().map_or(0, |page| page.entries.len())
    }
}

fn set(update: FilterUpdate) -> Option<Action> {
    Some(Command::SetFilter(update).into())
}

impl Component for LogsScreen {
    fn handle_key_event(
        &mut self,
        key: KeyEvent,
        state: &DashboardState,
    ) -> Result<Option<Action>> {
        let filter = state.filters.logs();
        let len = Self::entry_count(state);
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.selection.move_by(1, len);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selection.move_by(-1, len);
                None
            }
            KeyCode::Char('l') => {
                let levels: Vec<LogLevel> = LogLevel::iter().collect();
                set(FilterUpdate::LogLevel(cycle(filter.level.as_ref(), &levels)))
            }
            KeyCode::Char('c') => set(FilterUpdate::LogCategory(cycle(
                filter.category.as_ref(),
                &Self::categories(state),
            ))),
            KeyCode::Char('s') => set(FilterUpdate::LogSensor(cycle(
                filter.sensor.as_ref(),
                &Self::sensors(state),
            ))),
            KeyCode::Char('t') => set(FilterUpdate::LogTimeRange(filter.time_range.next())),
            KeyCode::Char('o') => set(FilterUpdate::LogErrorsOnly(!filter.errors_only)),
            KeyCode::Char('a') | KeyCode::Enter => {
                self.selection.top();
                Some(Command::ApplyFilters(ViewId::Logs).into())
            }
            KeyCode::Char('m') => Some(Command::LoadMore.into()),
            KeyCode::Char('x') => Some(Command::Export(ExportFormat::Json).into()),
            KeyCode::Char('X') => Some(Command::Export(ExportFormat::Csv).into()),
            _ => None,
        };
        Ok(action)
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(area);
        let filter = ctx.state.filters.logs();
        let all = || "all".to_owned();

        let chips = render_filter_chips(&[
            ("l", "Level", filter.level.map_or_else(all, |l| l.to_string())),
            ("c", "Category", filter.category.clone().unwrap_or_else(all)),
            ("s", "Sensor", filter.sensor.clone().unwrap_or_else(all)),
            ("t", "Range", filter.time_range.to_string()),
            ("o", "Errors only", if filter.errors_only { "yes" } else { "no" }.into()),
        ]);
        frame.render_widget(Paragraph::new(chips), layout[0]);

        let summary = ctx.state.panels.logs.data().map_or_else(
            || Line::from(""),
            |page| {
                let total = page
                    .total
                    .map_or_else(|| "?".to_owned(), |t| t.to_string());
                Line::from(vec![
                    Span::styled(
                        format!("  showing {} of {total}", page.entries.len()),
                        theme::label(),
                    ),
                    Span::styled(format!("  (limit {})", filter.limit), theme::muted()),
                ])
            },
        );
        frame.render_widget(Paragraph::new(summary), layout[1]);

        let selected = self.selection;
        render_slot(frame, layout[2], "Logs", &ctx.state.panels.logs, ctx, |f, a, page| {
            let rows: Vec<TableRow> = page.entries.iter().map(log_row).collect();
            DataTable::new(&LOG_COLUMNS, &WIDTHS, &rows)
                .selected(selected.get(rows.len()))
                .empty("No log entries match the filter")
                .render(f, a);
        });
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("l/c/s/t/o", "filter"),
            ("a", "apply"),
            ("m", "more"),
            ("x/X", "export json/csv"),
        ]
    }
}
