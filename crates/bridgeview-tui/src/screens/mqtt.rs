//! MQTT screen: broker counters, server-reported sensor errors, and the
//! flow/message history of one picked sensor.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;

use bridgeview_core::projection::{mqtt_flows, mqtt_messages, sensor_names, top_errors};
use bridgeview_core::table::{
    Cell, ERROR_COLUMNS, FLOW_COLUMNS, MESSAGE_COLUMNS, error_row, flow_row, message_row,
};
use bridgeview_core::{Command, DashboardState, TableRow};

use crate::action::Action;
use crate::component::{Component, RenderContext};
use crate::screens::Selection;
use crate::screens::dashboard::mqtt_lines;
use crate::widgets::panel::{self, render_slot};
use crate::widgets::table::DataTable;

pub struct MqttScreen {
    picker: Selection,
}

impl MqttScreen {
    pub fn new() -> Self {
        Self {
            picker: Selection::default(),
        }
    }

    fn names(state: &DashboardState) -> Vec<String> {
        state.panels.sensors.data().map_or_else(Vec::new, |snap| {
            sensor_names(snap).into_iter().map(str::to_owned).collect()
        })
    }

    fn render_history(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        let Some(sensor) = ctx.state.mqtt_sensor() else {
            let block = panel::block("History", false);
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("  Pick a sensor on the left and press Enter"),
                inner,
            );
            return;
        };

        let title = format!("History: {sensor}");
        render_slot(frame, area, &title, &ctx.state.panels.mqtt_history, ctx, |f, a, history| {
            let halves =
                Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)]).split(a);

            let flows: Vec<TableRow> =
                mqtt_flows(history, None).into_iter().map(flow_row).collect();
            let widths = [
                Constraint::Length(19),
                Constraint::Length(15),
                Constraint::Min(8),
                Constraint::Min(8),
                Constraint::Length(9),
                Constraint::Length(7),
            ];
            DataTable::new(&FLOW_COLUMNS, &widths, &flows)
                .empty("No flows recorded")
                .render(f, halves[0]);

            let messages: Vec<TableRow> =
                mqtt_messages(history, None).into_iter().map(message_row).collect();
            let widths = [
                Constraint::Length(19),
                Constraint::Length(9),
                Constraint::Min(20),
                Constraint::Min(10),
            ];
            DataTable::new(&MESSAGE_COLUMNS, &widths, &messages)
                .empty("No messages recorded")
                .render(f, halves[1]);
        });
    }
}

impl Component for MqttScreen {
    fn handle_key_event(
        &mut self,
        key: KeyEvent,
        state: &DashboardState,
    ) -> Result<Option<Action>> {
        let names = Self::names(state);
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.picker.move_by(1, names.len());
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.picker.move_by(-1, names.len());
                None
            }
            KeyCode::Enter => names
                .get(self.picker.get(names.len()))
                .map(|name| Command::SelectMqttSensor(name.clone()).into()),
            _ => None,
        };
        Ok(action)
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        let panels = &ctx.state.panels;
        let rows = Layout::vertical([Constraint::Length(8), Constraint::Min(6)]).split(area);
        let top = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[0]);
        let bottom =
            Layout::horizontal([Constraint::Length(30), Constraint::Min(20)]).split(rows[1]);

        render_slot(frame, top[0], "Broker", &panels.mqtt_stats, ctx, |f, a, stats| {
            f.render_widget(Paragraph::new(mqtt_lines(stats)), a);
        });
        render_slot(frame, top[1], "Sensor errors", &panels.mqtt_stats, ctx, |f, a, stats| {
            let rows: Vec<TableRow> =
                top_errors(&stats.sensor_errors).into_iter().map(error_row).collect();
            let widths = [
                Constraint::Min(14),
                Constraint::Length(9),
                Constraint::Length(7),
                Constraint::Min(12),
            ];
            DataTable::new(&ERROR_COLUMNS, &widths, &rows)
                .empty("No sensor errors reported")
                .render(f, a);
        });

        let picked = ctx.state.mqtt_sensor();
        let cursor = self.picker;
        render_slot(frame, bottom[0], "Sensors", &panels.sensors, ctx, |f, a, snap| {
            let rows: Vec<TableRow> = sensor_names(snap)
                .into_iter()
                .map(|name| {
                    let mark = if Some(name) == picked { "●" } else { " " };
                    TableRow {
                        key: name.to_owned(),
                        cells: vec![Cell::text(mark), Cell::text(name)],
                    }
                })
                .collect();
            let widths = [Constraint::Length(1), Constraint::Min(10)];
            DataTable::new(&["", "Sensor"], &widths, &rows)
                .selected(cursor.get(rows.len()))
                .empty("No sensors")
                .render(f, a);
        });

        self.render_history(frame, bottom[1], ctx);
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("j/k", "move"), ("Enter", "show history")]
    }
}
