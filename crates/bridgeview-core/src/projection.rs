// ── View-model reducers ──
//
// Pure functions from a fetched payload plus the current filter to a sorted,
// bounded projection. They borrow from the payload and never modify it, so a
// filter change re-projects the same snapshot.

use bridgeview_api::{
    ConfigGroup, ConfigParameter, ConfigSnapshot, MqttFlow, MqttHistory, MqttMessage, Sensor,
    SensorErrorSummary, SensorSnapshot, SensorStatus,
};

use crate::filter::{ConfigFilter, SensorFilter};

/// Entries shown in an error summary.
pub const TOP_ERRORS: usize = 5;
/// Flows shown in the sensor detail overlay.
pub const DETAIL_HISTORY_LIMIT: usize = 10;

// ── Sensors ──────────────────────────────────────────────────────────

/// A sensor together with the id of the group it was listed under.
#[derive(Debug, Clone, Copy)]
pub struct SensorView<'a> {
    pub group: &'a str,
    pub sensor: &'a Sensor,
}

fn flatten(snapshot: &SensorSnapshot) -> impl Iterator<Item = SensorView<'_>> {
    snapshot.groups.iter().flat_map(|group| {
        group.sensors.iter().map(move |sensor| SensorView {
            group: sensor.group.as_deref().unwrap_or(&group.id),
            sensor,
        })
    })
}

/// Sensors matching the group/status filter, ordered by `(priority, name)`.
pub fn project_sensors<'a>(
    snapshot: &'a SensorSnapshot,
    filter: &SensorFilter,
) -> Vec<SensorView<'a>> {
    let mut rows: Vec<_> = flatten(snapshot)
        .filter(|row| filter.group.as_deref().is_none_or(|g| g == row.group))
        .filter(|row| filter.status.is_none_or(|s| s == row.sensor.status))
        .collect();
    rows.sort_by(|a, b| {
        a.sensor
            .priority
            .cmp(&b.sensor.priority)
            .then_with(|| a.sensor.name.cmp(&b.sensor.name))
    });
    rows
}

/// Priority-1 sensors, failing (`error`) ones first, otherwise in listing order.
pub fn critical_sensors(snapshot: &SensorSnapshot) -> Vec<&Sensor> {
    let mut rows: Vec<&Sensor> = flatten(snapshot)
        .map(|row| row.sensor)
        .filter(|s| s.priority == 1)
        .collect();
    rows.sort_by_key(|s| s.status != SensorStatus::Error);
    rows
}

/// Distinct sensor names in `(priority, name)` order, for pickers.
pub fn sensor_names(snapshot: &SensorSnapshot) -> Vec<&str> {
    let mut names: Vec<&str> = project_sensors(snapshot, &SensorFilter::default())
        .into_iter()
        .map(|row| row.sensor.name.as_str())
        .collect();
    let mut seen = std::collections::HashSet::new();
    names.retain(|name| seen.insert(*name));
    names
}

/// Group ids in snapshot order, for pickers.
pub fn group_ids(snapshot: &SensorSnapshot) -> Vec<&str> {
    snapshot.groups.iter().map(|g| g.id.as_str()).collect()
}

// ── Error summaries ──────────────────────────────────────────────────

/// Anything that can appear in a "top errors" list.
///
/// The dashboard derives entries from the sensor snapshot; the MQTT view
/// uses the server-pushed `sensor_errors` list.
pub trait ErrorSource {
    fn sensor_name(&self) -> &str;
    fn status(&self) -> SensorStatus;
    /// Missing counters count as zero.
    fn error_count(&self) -> u64;
    fn last_error(&self) -> Option<&str>;
}

impl ErrorSource for Sensor {
    fn sensor_name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> SensorStatus {
        self.status
    }

    fn error_count(&self) -> u64 {
        Sensor::error_count(self)
    }

    fn last_error(&self) -> Option<&str> {
        self.statistics.as_ref()?.last_error.as_deref()
    }
}

impl ErrorSource for SensorErrorSummary {
    fn sensor_name(&self) -> &str {
        &self.sensor_name
    }

    fn status(&self) -> SensorStatus {
        self.status
    }

    fn error_count(&self) -> u64 {
        self.error_count.unwrap_or(0)
    }

    fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// Failing entries (`error` or `timeout`), most errors first, at most
/// [`TOP_ERRORS`]. Ties keep their input order.
pub fn top_errors<'a, T, I>(items: I) -> Vec<&'a T>
where
    T: ErrorSource + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut failing: Vec<&T> = items
        .into_iter()
        .filter(|item| item.status().is_failing())
        .collect();
    failing.sort_by(|a, b| b.error_count().cmp(&a.error_count()));
    failing.truncate(TOP_ERRORS);
    failing
}

/// Top failing sensors from the full snapshot.
pub fn sensor_errors(snapshot: &SensorSnapshot) -> Vec<&Sensor> {
    top_errors(flatten(snapshot).map(|row| row.sensor))
}

// ── MQTT ─────────────────────────────────────────────────────────────

/// Flows newest first, optionally capped. Equal timestamps keep input order.
pub fn mqtt_flows(history: &MqttHistory, limit: Option<usize>) -> Vec<&MqttFlow> {
    let mut flows: Vec<&MqttFlow> = history.flows.iter().collect();
    flows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    if let Some(limit) = limit {
        flows.truncate(limit);
    }
    flows
}

/// Raw messages newest first, optionally capped.
pub fn mqtt_messages(history: &MqttHistory, limit: Option<usize>) -> Vec<&MqttMessage> {
    let mut messages: Vec<&MqttMessage> = history.messages.iter().collect();
    messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    if let Some(limit) = limit {
        messages.truncate(limit);
    }
    messages
}

// ── Configuration ────────────────────────────────────────────────────

/// Groups by ascending priority, stable.
pub fn config_groups(snapshot: &ConfigSnapshot) -> Vec<&ConfigGroup> {
    let mut groups: Vec<&ConfigGroup> = snapshot.groups.iter().collect();
    groups.sort_by_key(|g| g.priority);
    groups
}

/// Parameters of the selected group (all when none), by `(priority, name)`.
pub fn config_parameters<'a>(
    snapshot: &'a ConfigSnapshot,
    filter: &ConfigFilter,
) -> Vec<&'a ConfigParameter> {
    let mut params: Vec<&ConfigParameter> = snapshot
        .parameters
        .iter()
        .filter(|p| {
            filter
                .group
                .as_deref()
                .is_none_or(|g| p.group.as_deref() == Some(g))
        })
        .collect();
    params.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.name.cmp(&b.name)));
    params
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bridgeview_api::Timestamp;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn snapshot() -> SensorSnapshot {
        serde_json::from_value(json!({
            "groups": [
                {
                    "id": "heating",
                    "name": "Heating",
                    "sensors": [
                        { "name": "flow_temp", "priority": 1, "status": "ok" },
                        { "name": "boiler_temp", "priority": 1, "status": "error",
                          "statistics": { "error_count": 3 } },
                        { "name": "pump_speed", "priority": 2, "status": "timeout",
                          "statistics": { "error_count": 7 } }
                    ]
                },
                {
                    "id": "solar",
                    "name": "Solar",
                    "sensors": [
                        { "name": "panel_temp", "priority": 1, "status": "error" },
                        { "name": "yield_today", "priority": 3, "status": "ok" },
                        { "name": "inverter", "priority": 2, "status": "error",
                          "statistics": { "error_count": 3 } }
                    ]
                }
            ]
        }))
        .unwrap()
    }

    fn names<'a>(rows: impl IntoIterator<Item = &'a Sensor>) -> Vec<&'a str> {
        rows.into_iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn sensor_projection_sorts_by_priority_then_name() {
        let snap = snapshot();
        let rows = project_sensors(&snap, &SensorFilter::default());
        assert_eq!(
            names(rows.iter().map(|r| r.sensor)),
            vec!["boiler_temp", "flow_temp", "panel_temp", "inverter", "pump_speed", "yield_today"]
        );
    }

    #[test]
    fn sensor_projection_applies_group_and_status() {
        let snap = snapshot();
        let filter = SensorFilter {
            group: Some("solar".into()),
            status: Some(SensorStatus::Error),
        };
        let rows = project_sensors(&snap, &filter);
        assert_eq!(names(rows.iter().map(|r| r.sensor)), vec!["panel_temp", "inverter"]);
        assert!(rows.iter().all(|r| r.group == "solar"));

        let expected = flatten(&snap)
            .filter(|r| r.group == "solar" && r.sensor.status == SensorStatus::Error)
            .count();
        assert_eq!(rows.len(), expected);
    }

    #[test]
    fn critical_projection_puts_errors_first_stably() {
        let snap = snapshot();
        let critical = critical_sensors(&snap);
        assert_eq!(names(critical.iter().copied()), vec!["boiler_temp", "panel_temp", "flow_temp"]);
        assert!(critical.iter().all(|s| s.priority == 1));
        let first_ok = critical.iter().position(|s| s.status != SensorStatus::Error);
        if let Some(idx) = first_ok {
            assert!(critical[idx..].iter().all(|s| s.status != SensorStatus::Error));
        }
    }

    #[test]
    fn top_errors_are_bounded_and_descending() {
        let snap = snapshot();
        let errors = sensor_errors(&snap);
        assert_eq!(
            names(errors.iter().copied()),
            vec!["pump_speed", "boiler_temp", "inverter", "panel_temp"]
        );
        assert!(errors.windows(2).all(|w| w[0].error_count() >= w[1].error_count()));
    }

    #[test]
    fn top_errors_caps_at_five() {
        let summaries: Vec<SensorErrorSummary> = (0..8)
            .map(|i| {
                serde_json::from_value(json!({
                    "sensor_name": format!("s{i}"),
                    "status": "error",
                    "error_count": i
                }))
                .unwrap()
            })
            .collect();
        let top = top_errors(&summaries);
        assert_eq!(top.len(), TOP_ERRORS);
        assert_eq!(top[0].sensor_name, "s7");
        assert_eq!(top[4].sensor_name, "s3");
    }

    #[test]
    fn top_errors_skips_healthy_and_defaults_missing_counts() {
        let summaries: Vec<SensorErrorSummary> = serde_json::from_value(json!([
            { "sensor_name": "a", "status": "ok", "error_count": 100 },
            { "sensor_name": "b", "status": "timeout" },
            { "sensor_name": "c", "status": "error", "error_count": 1 }
        ]))
        .unwrap();
        let top = top_errors(&summaries);
        let names: Vec<&str> = top.iter().map(|e| e.sensor_name.as_str()).collect();
        assert_eq!(names, vec!["c", "b"]);
    }

    #[test]
    fn detail_history_keeps_ten_most_recent() {
        let flows: Vec<serde_json::Value> = (0..15)
            .map(|i| {
                json!({
                    "timestamp": format!("2024-03-01T10:{i:02}:00"),
                    "initiator": "system",
                    "success": true
                })
            })
            .collect();
        let history: MqttHistory = serde_json::from_value(json!({ "flows": flows })).unwrap();

        let recent = mqtt_flows(&history, Some(DETAIL_HISTORY_LIMIT));
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].timestamp, Timestamp::new("2024-03-01T10:14:00"));
        assert_eq!(recent[9].timestamp, Timestamp::new("2024-03-01T10:05:00"));
        assert_eq!(mqtt_flows(&history, None).len(), 15);
    }

    #[test]
    fn config_projections() {
        let snap: ConfigSnapshot = serde_json::from_value(json!({
            "groups": [
                { "name": "solar", "priority": 3 },
                { "name": "heating", "priority": 1 },
                { "name": "misc", "priority": 3 }
            ],
            "parameters": [
                { "name": "z_flow", "group": "heating", "priority": 1 },
                { "name": "a_return", "group": "heating", "priority": 2 },
                { "name": "b_flow", "group": "heating", "priority": 1 },
                { "name": "panel", "group": "solar", "priority": 1 }
            ]
        }))
        .unwrap();

        let groups = config_groups(&snap);
        let group_names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(group_names, vec!["heating", "solar", "misc"]);

        let filter = ConfigFilter {
            group: Some("heating".into()),
        };
        let params = config_parameters(&snap, &filter);
        let param_names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(param_names, vec!["b_flow", "z_flow", "a_return"]);
        assert_eq!(config_parameters(&snap, &ConfigFilter::default()).len(), 4);
    }

    #[test]
    fn sensor_names_are_unique() {
        let snap = snapshot();
        let names = sensor_names(&snap);
        assert_eq!(names.len(), 6);
        assert_eq!(names[0], "boiler_temp");
        assert_eq!(group_ids(&snap), vec!["heating", "solar"]);
    }
}
