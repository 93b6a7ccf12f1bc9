//! Sensor detail overlay: the sensor's own fields plus its latest MQTT flows.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};

use bridgeview_core::projection::{DETAIL_HISTORY_LIMIT, mqtt_flows};
use bridgeview_core::table::{FLOW_COLUMNS, flow_row, sensor_detail};
use bridgeview_core::{Cell, TableRow};

use crate::component::RenderContext;
use crate::theme;
use crate::widgets::panel::render_slot;
use crate::widgets::table::DataTable;
use crate::widgets::{centered, overlay_block};

pub const HINTS: &[(&str, &str)] = &[("Esc", "close"), ("r", "refresh")];

pub fn render(frame: &mut Frame, area: Rect, name: &str, ctx: &RenderContext<'_>) {
    let overlay = centered(area, 96, 30);
    frame.render_widget(Clear, overlay);

    let block = overlay_block(format!("Sensor: {name}"));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let layout = Layout::vertical([
        Constraint::Length(17),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .split(inner);
    let panels = &ctx.state.panels;

    render_slot(frame, layout[0], "Sensor", &panels.detail_sensor, ctx, |f, a, sensor| {
        let lines: Vec<Line> = sensor_detail(sensor)
            .into_iter()
            .map(|(label, cell)| {
                let style = match &cell {
                    Cell::Badge { kind, .. } => theme::badge(*kind),
                    Cell::Placeholder => theme::muted(),
                    Cell::Text(_) | Cell::Number { .. } => theme::value(),
                };
                Line::from(vec![
                    Span::styled(format!("  {label:<14}"), theme::label()),
                    Span::styled(cell.display(), style),
                ])
            })
            .collect();
        f.render_widget(Paragraph::new(lines), a);
    });

    render_slot(frame, layout[1], "Recent MQTT flows", &panels.detail_history, ctx, |f, a, h| {
        let rows: Vec<TableRow> = mqtt_flows(h, Some(DETAIL_HISTORY_LIMIT))
            .into_iter()
            .map(flow_row)
            .collect();
        let widths = [
            Constraint::Length(19),
            Constraint::Length(15),
            Constraint::Min(8),
            Constraint::Min(8),
            Constraint::Length(9),
            Constraint::Length(7),
        ];
        DataTable::new(&FLOW_COLUMNS, &widths, &rows)
            .empty("No flows recorded")
            .render(f, a);
    });

    let hints: Vec<Span> = HINTS
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(format!(" {key} "), theme::key_hint_key()),
                Span::styled(format!("{label} "), theme::key_hint()),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(hints)), layout[2]);
}
