// ── Typed table rows ──
//
// Row builders turn projected entities into `TableRow`s of typed cells. The
// TUI has one generic renderer for them; it decides colours from
// `BadgeKind`, never from the text.

use bridgeview_api::{
    ComponentHealth, ConfigGroup, ConfigParameter, LogEntry, LogLevel, MqttFlow, MqttMessage,
    Sensor, SensorStatus, Timestamp,
};
use serde_json::Value;

use crate::projection::{ErrorSource, SensorView};

/// Shown wherever an optional value is absent.
pub const NOT_AVAILABLE: &str = "N/A";

/// Severity class of a badge cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    Ok,
    Warning,
    Error,
    Info,
    Muted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number { value: f64, precision: usize, unit: Option<String> },
    Badge { label: String, kind: BadgeKind },
    Placeholder,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn badge(label: impl Into<String>, kind: BadgeKind) -> Self {
        Self::Badge {
            label: label.into(),
            kind,
        }
    }

    pub fn opt_text(value: Option<impl Into<String>>) -> Self {
        value.map_or(Self::Placeholder, |v| Self::Text(v.into()))
    }

    pub fn opt_number(value: Option<f64>, precision: usize, unit: Option<&str>) -> Self {
        value.map_or(Self::Placeholder, |value| Self::Number {
            value,
            precision,
            unit: unit.map(str::to_owned),
        })
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn count(value: u64) -> Self {
        Self::Number {
            value: value as f64,
            precision: 0,
            unit: None,
        }
    }

    fn timestamp(ts: Option<&Timestamp>) -> Self {
        ts.map_or(Self::Placeholder, |ts| Self::Text(ts.to_string()))
    }

    fn json(value: Option<&Value>, unit: Option<&str>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Placeholder,
            Some(Value::Number(n)) => match n.as_f64() {
                Some(f) if n.is_f64() => Self::opt_number(Some(f), 2, unit),
                _ => Self::Text(with_unit(n.to_string(), unit)),
            },
            Some(Value::String(s)) => Self::Text(with_unit(s.clone(), unit)),
            Some(other) => Self::Text(with_unit(other.to_string(), unit)),
        }
    }

    /// Display text. Placeholders render as [`NOT_AVAILABLE`].
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number {
                value,
                precision,
                unit,
            } => with_unit(format!("{value:.precision$}"), unit.as_deref()),
            Self::Badge { label, .. } => label.clone(),
            Self::Placeholder => NOT_AVAILABLE.to_owned(),
        }
    }
}

fn with_unit(value: String, unit: Option<&str>) -> String {
    match unit.filter(|u| !u.is_empty()) {
        Some(unit) => format!("{value} {unit}"),
        None => value,
    }
}

/// One table row. `key` identifies the entity the row was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub key: String,
    pub cells: Vec<Cell>,
}

// ── Badges ───────────────────────────────────────────────────────────

pub fn status_badge(status: SensorStatus) -> Cell {
    let kind = match status {
        SensorStatus::Ok => BadgeKind::Ok,
        SensorStatus::Error => BadgeKind::Error,
        SensorStatus::Timeout => BadgeKind::Warning,
        SensorStatus::Unknown => BadgeKind::Muted,
    };
    Cell::badge(status.to_string(), kind)
}

pub fn level_kind(level: LogLevel) -> BadgeKind {
    match level {
        LogLevel::Debug => BadgeKind::Muted,
        LogLevel::Info => BadgeKind::Info,
        LogLevel::Warning => BadgeKind::Warning,
        LogLevel::Error | LogLevel::Critical => BadgeKind::Error,
    }
}

pub fn enabled_badge(enabled: bool) -> Cell {
    if enabled {
        Cell::badge("enabled", BadgeKind::Ok)
    } else {
        Cell::badge("disabled", BadgeKind::Muted)
    }
}

/// Health strings vary by component; anything recognisably good is green.
pub fn health_kind(status: &str) -> BadgeKind {
    match status.to_ascii_lowercase().as_str() {
        "ok" | "healthy" | "connected" | "running" | "up" => BadgeKind::Ok,
        "degraded" | "warning" | "reconnecting" => BadgeKind::Warning,
        "error" | "unhealthy" | "disconnected" | "down" | "failed" => BadgeKind::Error,
        _ => BadgeKind::Muted,
    }
}

fn interval(secs: Option<u64>) -> Cell {
    secs.map_or(Cell::Placeholder, |s| Cell::Text(format!("{s}s")))
}

// ── Row builders ─────────────────────────────────────────────────────

pub const SENSOR_COLUMNS: [&str; 7] =
    ["Sensor", "Group", "Status", "Value", "Updated", "Success", "Errors"];

pub fn sensor_row(row: SensorView<'_>) -> TableRow {
    let sensor = row.sensor;
    let reading = sensor.last_reading.as_ref();
    let stats = sensor.statistics.as_ref();
    TableRow {
        key: sensor.name.clone(),
        cells: vec![
            Cell::text(&sensor.name),
            Cell::text(row.group),
            status_badge(sensor.status),
            Cell::json(
                reading.and_then(|r| r.value.as_ref()),
                reading.and_then(|r| r.unit.as_deref()),
            ),
            Cell::timestamp(reading.and_then(|r| r.timestamp.as_ref())),
            Cell::opt_number(stats.and_then(|s| s.success_rate), 1, Some("%")),
            stats
                .and_then(|s| s.error_count)
                .map_or(Cell::Placeholder, Cell::count),
        ],
    }
}

pub const CRITICAL_COLUMNS: [&str; 3] = ["Sensor", "Status", "Value"];

pub fn critical_row(sensor: &Sensor) -> TableRow {
    let reading = sensor.last_reading.as_ref();
    TableRow {
        key: sensor.name.clone(),
        cells: vec![
            Cell::text(&sensor.name),
            status_badge(sensor.status),
            Cell::json(
                reading.and_then(|r| r.value.as_ref()),
                reading.and_then(|r| r.unit.as_deref()),
            ),
        ],
    }
}

pub const ERROR_COLUMNS: [&str; 4] = ["Sensor", "Status", "Errors", "Last error"];

pub fn error_row<T: ErrorSource + ?Sized>(entry: &T) -> TableRow {
    TableRow {
        key: entry.sensor_name().to_owned(),
        cells: vec![
            Cell::text(entry.sensor_name()),
            status_badge(entry.status()),
            Cell::count(entry.error_count()),
            Cell::opt_text(entry.last_error()),
        ],
    }
}

pub const FLOW_COLUMNS: [&str; 6] = ["Time", "Initiator", "Set", "State", "Response", "Result"];

pub fn flow_row(flow: &MqttFlow) -> TableRow {
    TableRow {
        key: flow.timestamp.as_str().to_owned(),
        cells: vec![
            Cell::timestamp(Some(&flow.timestamp)),
            Cell::text(flow.initiator.to_string()),
            Cell::json(flow.set_value.as_ref(), None),
            Cell::json(flow.state_value.as_ref(), None),
            Cell::opt_number(flow.response_time, 0, Some("ms")),
            if flow.success {
                Cell::badge("ok", BadgeKind::Ok)
            } else {
                Cell::badge("failed", BadgeKind::Error)
            },
        ],
    }
}

pub const MESSAGE_COLUMNS: [&str; 4] = ["Time", "Direction", "Topic", "Payload"];

pub fn message_row(message: &MqttMessage) -> TableRow {
    TableRow {
        key: format!("{}:{}", message.timestamp.as_str(), message.topic),
        cells: vec![
            Cell::timestamp(Some(&message.timestamp)),
            Cell::opt_text(message.direction.as_deref()),
            Cell::text(&message.topic),
            Cell::json(message.payload.as_ref(), None),
        ],
    }
}

pub const LOG_COLUMNS: [&str; 5] = ["Time", "Level", "Category", "Sensor", "Message"];

pub fn log_row(entry: &LogEntry) -> TableRow {
    TableRow {
        key: entry.timestamp.as_str().to_owned(),
        cells: vec![
            Cell::timestamp(Some(&entry.timestamp)),
            Cell::badge(entry.level.to_string(), level_kind(entry.level)),
            Cell::text(&entry.category),
            Cell::opt_text(entry.sensor_name.as_deref()),
            Cell::text(&entry.message),
        ],
    }
}

pub const HEALTH_COLUMNS: [&str; 3] = ["Component", "Status", "Message"];

pub fn health_row(name: &str, component: &ComponentHealth) -> TableRow {
    TableRow {
        key: name.to_owned(),
        cells: vec![
            Cell::text(name),
            Cell::badge(component.status(), health_kind(component.status())),
            Cell::opt_text(component.message()),
        ],
    }
}

pub const CONFIG_GROUP_COLUMNS: [&str; 5] = ["Group", "Priority", "Interval", "State", "Params"];

pub fn config_group_row(group: &ConfigGroup) -> TableRow {
    TableRow {
        key: group.name.clone(),
        cells: vec![
            Cell::text(group.display_name.as_deref().unwrap_or(&group.name)),
            Cell::text(group.priority.to_string()),
            interval(group.default_polling_interval),
            enabled_badge(group.enabled),
            Cell::text(group.parameter_count.to_string()),
        ],
    }
}

pub const PARAMETER_COLUMNS: [&str; 6] =
    ["Parameter", "Group", "Priority", "Interval", "State", "Unit"];

pub fn parameter_row(param: &ConfigParameter) -> TableRow {
    TableRow {
        key: param.name.clone(),
        cells: vec![
            Cell::text(&param.name),
            Cell::opt_text(param.group.as_deref()),
            Cell::text(param.priority.to_string()),
            interval(param.polling_interval),
            enabled_badge(param.enabled),
            Cell::opt_text(param.unit.as_deref()),
        ],
    }
}

/// Label/value pairs for the sensor detail overlay.
pub fn sensor_detail(sensor: &Sensor) -> Vec<(&'static str, Cell)> {
    let reading = sensor.last_reading.as_ref();
    let stats = sensor.statistics.as_ref();
    vec![
        ("Status", status_badge(sensor.status)),
        (
            "Value",
            Cell::json(
                reading.and_then(|r| r.value.as_ref()),
                reading.and_then(|r| r.unit.as_deref()),
            ),
        ),
        ("Updated", Cell::timestamp(reading.and_then(|r| r.timestamp.as_ref()))),
        (
            "Response",
            Cell::opt_number(reading.and_then(|r| r.response_time), 0, Some("ms")),
        ),
        ("Description", Cell::opt_text(sensor.description.as_deref())),
        ("Group", Cell::opt_text(sensor.group.as_deref())),
        ("Priority", Cell::text(sensor.priority.to_string())),
        ("Interval", interval(sensor.polling_interval)),
        ("State", enabled_badge(sensor.enabled)),
        ("Address", Cell::opt_text(sensor.address.map(|a| a.to_string()))),
        ("Entity", Cell::opt_text(sensor.entity_id.as_deref())),
        ("Success", Cell::opt_number(stats.and_then(|s| s.success_rate), 1, Some("%"))),
        ("Reads", stats.and_then(|s| s.total_reads).map_or(Cell::Placeholder, Cell::count)),
        ("Errors", Cell::count(sensor.error_count())),
        ("Last error", Cell::opt_text(stats.and_then(|s| s.last_error.as_deref()))),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_reading_renders_placeholders() {
        let sensor: Sensor =
            serde_json::from_value(json!({ "name": "boiler_temp", "status": "ok" })).unwrap();
        let row = sensor_row(SensorView {
            group: "heating",
            sensor: &sensor,
        });
        let text: Vec<String> = row.cells.iter().map(Cell::display).collect();
        assert_eq!(text, vec!["boiler_temp", "heating", "ok", "N/A", "N/A", "N/A", "N/A"]);
    }

    #[test]
    fn reading_with_unit_and_stats() {
        let sensor: Sensor = serde_json::from_value(json!({
            "name": "boiler_temp",
            "status": "error",
            "last_reading": { "value": 54.25, "unit": "°C" },
            "statistics": { "success_rate": 98.7, "error_count": 4 }
        }))
        .unwrap();
        let row = sensor_row(SensorView {
            group: "heating",
            sensor: &sensor,
        });
        assert_eq!(row.cells[2], Cell::badge("error", BadgeKind::Error));
        assert_eq!(row.cells[3].display(), "54.25 °C");
        assert_eq!(row.cells[5].display(), "98.7 %");
        assert_eq!(row.cells[6].display(), "4");
    }

    #[test]
    fn integer_and_string_values_are_kept_as_sent() {
        assert_eq!(Cell::json(Some(&json!(3)), Some("W")).display(), "3 W");
        assert_eq!(Cell::json(Some(&json!("on")), None).display(), "on");
        assert_eq!(Cell::json(Some(&Value::Null), None), Cell::Placeholder);
    }

    #[test]
    fn log_levels_map_to_badges() {
        let entry: LogEntry = serde_json::from_value(json!({
            "timestamp": "2024-03-01T10:00:00",
            "level": "CRITICAL",
            "message": "bus down"
        }))
        .unwrap();
        let row = log_row(&entry);
        assert_eq!(row.cells[1], Cell::badge("CRITICAL", BadgeKind::Error));
        assert_eq!(row.cells[3], Cell::Placeholder);
        assert_eq!(level_kind(LogLevel::Warning), BadgeKind::Warning);
    }

    #[test]
    fn detail_counts_missing_errors_as_zero() {
        let sensor: Sensor = serde_json::from_value(json!({
            "name": "boiler_temp",
            "address": 40001,
            "last_reading": { "value": 1, "response_time": 12.4 }
        }))
        .unwrap();
        let detail: Vec<(&str, String)> = sensor_detail(&sensor)
            .iter()
            .map(|(label, cell)| (*label, cell.display()))
            .collect();
        assert!(detail.contains(&("Errors", "0".to_owned())));
        assert!(detail.contains(&("Address", "40001".to_owned())));
        assert!(detail.contains(&("Response", "12 ms".to_owned())));
        assert!(detail.contains(&("Entity", NOT_AVAILABLE.to_owned())));
    }

    #[test]
    fn health_status_classification() {
        assert_eq!(health_kind("Healthy"), BadgeKind::Ok);
        assert_eq!(health_kind("disconnected"), BadgeKind::Error);
        assert_eq!(health_kind("starting"), BadgeKind::Muted);
    }
}
