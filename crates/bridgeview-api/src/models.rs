// Wire types for the bridge monitoring API.
//
// Every response is wrapped as `{ success, data?, error? }`. The client strips
// the envelope; these are the `data` payloads plus the partial-update bodies.
// Fields the server may omit are `Option` or carry a serde default so a
// missing field never fails the whole payload.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Envelope ────────────────────────────────────────────────────────

/// `{ success, data?, error? }` — the only envelope fields the client reads.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
}

// ── Timestamps ──────────────────────────────────────────────────────

/// A server timestamp, kept verbatim.
///
/// The bridge emits ISO-8601 strings (with or without offset) and sometimes
/// epoch seconds. The raw text is kept for display; [`Timestamp::parsed`]
/// gives a comparable instant when the text can be understood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timestamp(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Epoch(f64),
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Text(text) => Self(text),
            RawTimestamp::Epoch(secs) => Self::from_epoch(secs),
        })
    }
}

impl Timestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[allow(clippy::cast_possible_truncation, clippy::as_conversions, clippy::cast_sign_loss)]
    fn from_epoch(secs: f64) -> Self {
        let whole = secs.trunc() as i64;
        let nanos = (secs.fract().abs() * 1e9) as u32;
        DateTime::from_timestamp(whole, nanos)
            .map_or_else(|| Self(secs.to_string()), |dt| Self(dt.to_rfc3339()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret the raw text as an instant (naive values are taken as UTC).
    pub fn parsed(&self) -> Option<DateTime<Utc>> {
        let raw = self.0.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(naive.and_utc());
            }
        }
        None
    }
}

impl Ord for Timestamp {
    /// Parsed instants order chronologically; unparseable values sort
    /// before every parsed one and among themselves by raw text.
    fn cmp(&self, other: &Self) -> Ordering {
        self.parsed()
            .cmp(&other.parsed())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parsed() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            None => f.write_str(&self.0),
        }
    }
}

// ── Health ──────────────────────────────────────────────────────────

/// `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    #[serde(default = "unknown_status")]
    pub status: String,
    #[serde(default)]
    pub components: IndexMap<String, ComponentHealth>,
    /// Seconds since the bridge process started.
    #[serde(default)]
    pub uptime: Option<f64>,
    #[serde(default)]
    pub version: Option<String>,
}

fn unknown_status() -> String {
    "unknown".into()
}

/// One component's health: either `{status, message}` or a bare status string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentHealth {
    Detailed {
        status: String,
        #[serde(default)]
        message: Option<String>,
    },
    Plain(String),
}

impl ComponentHealth {
    pub fn status(&self) -> &str {
        match self {
            Self::Detailed { status, .. } | Self::Plain(status) => status,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Detailed { message, .. } => message.as_deref(),
            Self::Plain(_) => None,
        }
    }
}

// ── Sensors ─────────────────────────────────────────────────────────

/// Poll status of a sensor. Any string the client does not know maps to
/// [`SensorStatus::Unknown`].
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(from = "String", rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SensorStatus {
    Ok,
    Error,
    Timeout,
    #[default]
    Unknown,
}

impl From<String> for SensorStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "ok" => Self::Ok,
            "error" => Self::Error,
            "timeout" => Self::Timeout,
            _ => Self::Unknown,
        }
    }
}

impl SensorStatus {
    /// `error` and `timeout` both count as failing.
    pub fn is_failing(self) -> bool {
        matches!(self, Self::Error | Self::Timeout)
    }
}

/// `GET /api/sensors/status`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorSnapshot {
    #[serde(default)]
    pub groups: Vec<SensorGroup>,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorGroup {
    pub id: String,
    /// Display name; falls back to `id` when empty.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Lower is more critical.
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub default_polling_interval: Option<u64>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub parameter_count: usize,
    #[serde(default)]
    pub sensors: Vec<Sensor>,
}

impl SensorGroup {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Sensor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Owning group id.
    #[serde(default)]
    pub group: Option<String>,
    /// 1 is the critical tier.
    #[serde(default = "default_priority")]
    pub priority: u32,
    #[serde(default)]
    pub polling_interval: Option<u64>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub writable: bool,
    /// Protocol (register) address on the bus.
    #[serde(default)]
    pub address: Option<u32>,
    /// External automation-hub entity id.
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub status: SensorStatus,
    /// Absent until the first successful poll.
    #[serde(default)]
    pub last_reading: Option<Reading>,
    #[serde(default)]
    pub statistics: Option<SensorStatistics>,
}

impl Sensor {
    /// Error counter, with missing statistics counted as zero.
    pub fn error_count(&self) -> u64 {
        self.statistics
            .as_ref()
            .and_then(|s| s.error_count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    /// Milliseconds.
    #[serde(default)]
    pub response_time: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorStatistics {
    /// Percentage, 0–100.
    #[serde(default)]
    pub success_rate: Option<f64>,
    #[serde(default)]
    pub error_count: Option<u64>,
    #[serde(default)]
    pub total_reads: Option<u64>,
    #[serde(default)]
    pub last_error: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_priority() -> u32 {
    99
}

fn error_status() -> SensorStatus {
    SensorStatus::Error
}

// ── MQTT ────────────────────────────────────────────────────────────

/// `GET /api/mqtt/stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MqttStats {
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub broker: Option<String>,
    #[serde(default)]
    pub messages_sent: u64,
    #[serde(default)]
    pub messages_received: u64,
    #[serde(default)]
    pub errors: u64,
    #[serde(default)]
    pub last_message: Option<Timestamp>,
    /// Server-pushed list of sensors currently reporting errors.
    #[serde(default)]
    pub sensor_errors: Vec<SensorErrorSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorErrorSummary {
    pub sensor_name: String,
    /// Entries without a status are in the list because they failed.
    #[serde(default = "error_status")]
    pub status: SensorStatus,
    #[serde(default)]
    pub error_count: Option<u64>,
    #[serde(default)]
    pub last_error: Option<String>,
}

/// `GET /api/mqtt/history/{name}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MqttHistory {
    #[serde(default)]
    pub sensor_name: Option<String>,
    #[serde(default)]
    pub flows: Vec<MqttFlow>,
    #[serde(default)]
    pub messages: Vec<MqttMessage>,
}

/// Who started a set/state exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(from = "String", rename_all = "snake_case")]
pub enum FlowInitiator {
    #[strum(serialize = "Home Assistant")]
    HomeAssistant,
    #[strum(serialize = "System")]
    System,
}

impl From<String> for FlowInitiator {
    fn from(raw: String) -> Self {
        if raw.eq_ignore_ascii_case("home_assistant") {
            Self::HomeAssistant
        } else {
            Self::System
        }
    }
}

/// One correlated set → state exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttFlow {
    pub timestamp: Timestamp,
    pub initiator: FlowInitiator,
    #[serde(default)]
    pub set_value: Option<Value>,
    #[serde(default)]
    pub state_value: Option<Value>,
    /// Milliseconds between set and state.
    #[serde(default)]
    pub response_time: Option<f64>,
    #[serde(default)]
    pub success: bool,
}

/// One raw MQTT message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttMessage {
    pub timestamp: Timestamp,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub payload: Option<Value>,
}

// ── Logs ────────────────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: Timestamp,
    pub level: LogLevel,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sensor_name: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Option<Value>,
}

/// `GET /api/logs` — either a bare array or `{entries, total}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LogPage {
    pub entries: Vec<LogEntry>,
    pub total: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLogPage {
    List(Vec<LogEntry>),
    Page {
        #[serde(default, alias = "logs")]
        entries: Vec<LogEntry>,
        #[serde(default)]
        total: Option<u64>,
    },
}

impl<'de> Deserialize<'de> for LogPage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawLogPage::deserialize(deserializer)? {
            RawLogPage::List(entries) => Self {
                entries,
                total: None,
            },
            RawLogPage::Page { entries, total } => Self { entries, total },
        })
    }
}

/// `GET /api/logs/stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogStats {
    #[serde(default)]
    pub total_entries: u64,
    #[serde(default)]
    pub by_level: IndexMap<String, u64>,
    #[serde(default)]
    pub by_category: IndexMap<String, u64>,
    #[serde(default)]
    pub errors_last_24h: Option<u64>,
}

// ── Configuration ───────────────────────────────────────────────────

/// `GET /api/config/ui`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    #[serde(default)]
    pub groups: Vec<ConfigGroup>,
    #[serde(default)]
    pub parameters: Vec<ConfigParameter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigGroup {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub default_polling_interval: Option<u64>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub parameter_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigParameter {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: u32,
    #[serde(default)]
    pub polling_interval: Option<u64>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub writable: bool,
    #[serde(default)]
    pub unit: Option<String>,
}

/// `PUT /api/config/parameter/{name}` body. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polling_interval: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// `PUT /api/config/group/{name}` body. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_polling_interval: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

// ── Documentation ───────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocType {
    #[default]
    Mqtt,
    Conversion,
    Troubleshooting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocFormat {
    Markdown,
    #[default]
    Text,
}

/// `GET /api/documentation/{type}` — either a bare string or
/// `{content, format}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Documentation {
    pub content: String,
    pub format: DocFormat,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocumentation {
    Text(String),
    Structured {
        #[serde(default)]
        content: String,
        #[serde(default)]
        format: DocFormat,
    },
}

impl<'de> Deserialize<'de> for Documentation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawDocumentation::deserialize(deserializer)? {
            RawDocumentation::Text(content) => Self {
                content,
                format: DocFormat::Text,
            },
            RawDocumentation::Structured { content, format } => Self { content, format },
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_sensor_status_maps_to_unknown() {
        let sensor: Sensor = serde_json::from_value(json!({
            "name": "boiler_temp",
            "status": "degraded"
        }))
        .unwrap();
        assert_eq!(sensor.status, SensorStatus::Unknown);
        assert_eq!(sensor.priority, 99);
        assert!(sensor.enabled);
        assert!(sensor.last_reading.is_none());
    }

    #[test]
    fn error_count_defaults_to_zero_without_statistics() {
        let sensor: Sensor =
            serde_json::from_value(json!({ "name": "a", "status": "ERROR" })).unwrap();
        assert_eq!(sensor.status, SensorStatus::Error);
        assert_eq!(sensor.error_count(), 0);
    }

    #[test]
    fn timestamp_accepts_naive_offset_and_epoch_forms() {
        let naive = Timestamp::new("2024-03-01T10:00:00.250");
        let offset = Timestamp::new("2024-03-01T11:00:00+01:00");
        assert_eq!(naive.parsed().unwrap().to_rfc3339(), "2024-03-01T10:00:00.250+00:00");
        assert_eq!(offset.parsed(), Timestamp::new("2024-03-01T10:00:00Z").parsed());

        let epoch: Timestamp = serde_json::from_value(json!(1_709_287_200)).unwrap();
        assert_eq!(
            epoch.parsed().unwrap(),
            Timestamp::new("2024-03-01T10:00:00Z").parsed().unwrap()
        );
    }

    #[test]
    fn unparseable_timestamps_sort_first() {
        let garbage = Timestamp::new("yesterday");
        let real = Timestamp::new("2024-03-01T10:00:00Z");
        assert!(garbage < real);
        assert_eq!(garbage.to_string(), "yesterday");
    }

    #[test]
    fn log_page_accepts_bare_array() {
        let page: LogPage = serde_json::from_value(json!([
            { "timestamp": "2024-03-01T10:00:00", "level": "ERROR", "message": "read failed" }
        ]))
        .unwrap();
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].level, LogLevel::Error);
        assert!(page.total.is_none());
    }

    #[test]
    fn log_page_accepts_object_form() {
        let page: LogPage = serde_json::from_value(json!({
            "entries": [
                { "timestamp": "2024-03-01T10:00:00", "level": "INFO", "category": "mqtt", "message": "ok" }
            ],
            "total": 42
        }))
        .unwrap();
        assert_eq!(page.entries[0].category, "mqtt");
        assert_eq!(page.total, Some(42));
    }

    #[test]
    fn component_health_accepts_plain_and_detailed() {
        let report: HealthReport = serde_json::from_value(json!({
            "status": "healthy",
            "components": {
                "mqtt": { "status": "connected", "message": "broker up" },
                "modbus": "ok"
            }
        }))
        .unwrap();
        let mqtt = &report.components["mqtt"];
        assert_eq!(mqtt.status(), "connected");
        assert_eq!(mqtt.message(), Some("broker up"));
        assert_eq!(report.components["modbus"].status(), "ok");
        assert_eq!(report.components.get_index(0).unwrap().0, "mqtt");
    }

    #[test]
    fn partial_updates_skip_unset_fields() {
        let body = serde_json::to_value(ParameterUpdate {
            enabled: Some(false),
            ..ParameterUpdate::default()
        })
        .unwrap();
        assert_eq!(body, json!({ "enabled": false }));

        let body = serde_json::to_value(GroupUpdate {
            default_polling_interval: Some(30),
            enabled: Some(true),
        })
        .unwrap();
        assert_eq!(body, json!({ "default_polling_interval": 30, "enabled": true }));
    }

    #[test]
    fn documentation_accepts_string_or_object() {
        let plain: Documentation = serde_json::from_value(json!("# MQTT")).unwrap();
        assert_eq!(plain.content, "# MQTT");
        assert_eq!(plain.format, DocFormat::Text);

        let rich: Documentation =
            serde_json::from_value(json!({ "content": "# MQTT", "format": "markdown" })).unwrap();
        assert_eq!(rich.format, DocFormat::Markdown);
    }

    #[test]
    fn flow_initiator_from_wire() {
        let flow: MqttFlow = serde_json::from_value(json!({
            "timestamp": "2024-03-01T10:00:00",
            "initiator": "home_assistant",
            "set_value": 21.5,
            "success": true
        }))
        .unwrap();
        assert_eq!(flow.initiator, FlowInitiator::HomeAssistant);
        assert!(flow.state_value.is_none());
        assert_eq!(FlowInitiator::from("scheduler".to_string()), FlowInitiator::System);
    }

    #[test]
    fn reported_sensor_error_without_status_is_failing() {
        let stats: MqttStats = serde_json::from_value(json!({
            "connected": true,
            "sensor_errors": [
                { "sensor_name": "boiler_temp", "error_count": 3 },
                { "sensor_name": "pump_speed", "status": "timeout" }
            ]
        }))
        .unwrap();
        assert_eq!(stats.sensor_errors[0].status, SensorStatus::Error);
        assert_eq!(stats.sensor_errors[1].status, SensorStatus::Timeout);
    }
}
