//! Sensors screen: filterable sensor table with a detail overlay on Enter.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;
use strum::IntoEnumIterator;

use bridgeview_core::projection::{group_ids, project_sensors};
use bridgeview_core::table::{SENSOR_COLUMNS, sensor_row};
use bridgeview_core::{Command, DashboardState, FilterUpdate, SensorStatus, TableRow};

use crate::action::Action;
use crate::component::{Component, RenderContext};
use crate::screens::{Selection, cycle};
use crate::widgets::panel::render_slot;
use crate::widgets::sub_tabs::render_filter_chips;
use crate::widgets::table::DataTable;

const WIDTHS: [Constraint; 7] = [
    Constraint::Min(18),
    Constraint::Length(12),
    Constraint::Length(9),
    Constraint::Min(12),
    Constraint::Length(19),
    Constraint::Length(8),
    Constraint::Length(7),
];

pub struct SensorsScreen {
    selection: Selection,
}

impl SensorsScreen {
    pub fn new() -> Self {
        Self {
            selection: Selection::default(),
        }
    }

    /// Names of the rows currently shown, in display order.
    fn visible(state: &DashboardState) -> Vec<String> {
        state.panels.sensors.data().map_or_else(Vec::new, |snap| {
            project_sensors(snap, state.filters.sensors())
                .into_iter()
                .map(|row| row.sensor.name.clone())
                .collect()
        })
    }
}

impl Component for SensorsScreen {
    fn handle_key_event(
        &mut self,
        key: KeyEvent,
        state: &DashboardState,
    ) -> Result<Option<Action>> {
        let visible = Self::visible(state);
        let filter = state.filters.sensors();
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.selection.move_by(1, visible.len());
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selection.move_by(-1, visible.len());
                None
            }
            KeyCode::Enter => visible
                .get(self.selection.get(visible.len()))
                .map(|name| Command::OpenSensorDetail(name.clone()).into()),
            KeyCode::Char('f') => {
                let groups: Vec<String> = state.panels.sensors.data().map_or_else(Vec::new, |snap| {
                    group_ids(snap).into_iter().map(str::to_owned).collect()
                });
                self.selection.top();
                let next = cycle(filter.group.as_ref(), &groups);
                Some(Command::SetFilter(FilterUpdate::SensorGroup(next)).into())
            }
            KeyCode::Char('s') => {
                let statuses: Vec<SensorStatus> = SensorStatus::iter().collect();
                self.selection.top();
                let next = cycle(filter.status.as_ref(), &statuses);
                Some(Command::SetFilter(FilterUpdate::SensorStatus(next)).into())
            }
            _ => None,
        };
        Ok(action)
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        let layout = Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).split(area);
        let filter = ctx.state.filters.sensors();

        let chips = render_filter_chips(&[
            ("f", "Group", filter.group.clone().unwrap_or_else(|| "all".into())),
            ("s", "Status", filter.status.map_or_else(|| "all".into(), |s| s.to_string())),
        ]);
        frame.render_widget(Paragraph::new(chips), layout[0]);

        let selected = self.selection;
        render_slot(frame, layout[1], "Sensors", &ctx.state.panels.sensors, ctx, |f, a, snap| {
            let rows: Vec<TableRow> =
                project_sensors(snap, filter).into_iter().map(sensor_row).collect();
            DataTable::new(&SENSOR_COLUMNS, &WIDTHS, &rows)
                .selected(selected.get(rows.len()))
                .empty("No sensors match the filter")
                .render(f, a);
        });
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("j/k", "move"), ("Enter", "detail"), ("f", "group"), ("s", "status")]
    }
}
