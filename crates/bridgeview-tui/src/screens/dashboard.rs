//! Dashboard: health, MQTT and log summaries, critical sensors, top errors.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use bridgeview_core::api::{HealthReport, LogStats, MqttStats};
use bridgeview_core::projection::{critical_sensors, sensor_errors};
use bridgeview_core::table::{
    self, CRITICAL_COLUMNS, ERROR_COLUMNS, HEALTH_COLUMNS, critical_row, error_row, health_row,
};
use bridgeview_core::{BadgeKind, DashboardState, NOT_AVAILABLE, TableRow};

use crate::action::Action;
use crate::component::{Component, RenderContext};
use crate::theme;
use crate::widgets::panel::{render_slot, stat_line};
use crate::widgets::table::DataTable;

pub struct DashboardScreen;

impl Component for DashboardScreen {
    fn handle_key_event(
        &mut self,
        _key: KeyEvent,
        _state: &DashboardState,
    ) -> Result<Option<Action>> {
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        let panels = &ctx.state.panels;
        let rows = Layout::vertical([Constraint::Length(11), Constraint::Min(6)]).split(area);
        let top = Layout::horizontal([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(rows[0]);
        let bottom = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        render_slot(frame, top[0], "Health", &panels.health, ctx, render_health);
        render_slot(frame, top[1], "MQTT", &panels.mqtt_stats, ctx, |f, a, stats| {
            f.render_widget(Paragraph::new(mqtt_lines(stats)), a);
        });
        render_slot(frame, top[2], "Logs", &panels.log_stats, ctx, |f, a, stats| {
            f.render_widget(Paragraph::new(log_stat_lines(stats)), a);
        });

        render_slot(frame, bottom[0], "Critical sensors", &panels.sensors, ctx, |f, a, snap| {
            let rows: Vec<TableRow> =
                critical_sensors(snap).into_iter().map(critical_row).collect();
            let widths = [Constraint::Min(16), Constraint::Length(9), Constraint::Min(10)];
            DataTable::new(&CRITICAL_COLUMNS, &widths, &rows)
                .empty("No priority-1 sensors")
                .render(f, a);
        });
        render_slot(frame, bottom[1], "Top errors", &panels.sensors, ctx, |f, a, snap| {
            let rows: Vec<TableRow> = sensor_errors(snap).into_iter().map(error_row).collect();
            let widths = [
                Constraint::Min(14),
                Constraint::Length(9),
                Constraint::Length(7),
                Constraint::Min(12),
            ];
            DataTable::new(&ERROR_COLUMNS, &widths, &rows)
                .empty("No failing sensors")
                .render(f, a);
        });
    }
}

fn render_health(frame: &mut Frame, area: Rect, health: &HealthReport) {
    let layout = Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).split(area);

    let lines = vec![
        stat_line(
            "Status",
            health.status.clone(),
            theme::badge(table::health_kind(&health.status)),
        ),
        stat_line(
            "Uptime",
            health.uptime.and_then(format_uptime).unwrap_or_else(|| NOT_AVAILABLE.into()),
            theme::value(),
        ),
        stat_line(
            "Version",
            health.version.clone().unwrap_or_else(|| NOT_AVAILABLE.into()),
            theme::value(),
        ),
    ];
    frame.render_widget(Paragraph::new(lines), layout[0]);

    let rows: Vec<TableRow> = health
        .components
        .iter()
        .map(|(name, component)| health_row(name, component))
        .collect();
    let widths = [Constraint::Length(14), Constraint::Length(12), Constraint::Min(8)];
    DataTable::new(&HEALTH_COLUMNS, &widths, &rows)
        .empty("No components reported")
        .render(frame, layout[1]);
}

fn format_uptime(secs: f64) -> Option<String> {
    let uptime = Duration::try_from_secs_f64(secs).ok()?;
    Some(humantime::format_duration(Duration::from_secs(uptime.as_secs())).to_string())
}

pub(crate) fn mqtt_lines(stats: &MqttStats) -> Vec<Line<'static>> {
    let (state, style) = if stats.connected {
        ("● connected", Style::default().fg(theme::SUCCESS_GREEN))
    } else {
        ("○ disconnected", Style::default().fg(theme::ERROR_RED))
    };
    let error_style = if stats.errors > 0 {
        Style::default().fg(theme::ERROR_RED)
    } else {
        theme::value()
    };
    vec![
        stat_line("Broker", state.into(), style),
        stat_line(
            "Address",
            stats.broker.clone().unwrap_or_else(|| NOT_AVAILABLE.into()),
            theme::value(),
        ),
        stat_line("Sent", stats.messages_sent.to_string(), theme::value()),
        stat_line("Received", stats.messages_received.to_string(), theme::value()),
        stat_line("Errors", stats.errors.to_string(), error_style),
        stat_line(
            "Last message",
            stats
                .last_message
                .as_ref()
                .map_or_else(|| NOT_AVAILABLE.into(), ToString::to_string),
            theme::value(),
        ),
    ]
}

fn log_stat_lines(stats: &LogStats) -> Vec<Line<'static>> {
    let mut lines = vec![
        stat_line("Entries", stats.total_entries.to_string(), theme::value()),
        stat_line(
            "Errors (24h)",
            stats
                .errors_last_24h
                .map_or_else(|| NOT_AVAILABLE.into(), |n| n.to_string()),
            Style::default().fg(theme::CORAL),
        ),
    ];
    lines.extend(stats.by_level.iter().map(|(level, count)| {
        let kind = level
            .parse()
            .map_or(BadgeKind::Muted, table::level_kind);
        Line::from(vec![
            Span::styled(format!("  {level:<16}"), theme::badge(kind)),
            Span::styled(count.to_string(), theme::value()),
        ])
    }));
    lines
}
