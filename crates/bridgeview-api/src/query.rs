// Log query parameters
//
// The `/api/logs` family shares one set of query parameters; the export
// endpoint adds `format`. Unset fields are omitted from the query string.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::LogLevel;

/// Filter snapshot sent to `GET /api/logs` and `GET /api/logs/export`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub level: Option<LogLevel>,
    pub category: Option<String>,
    pub sensor_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub errors_only: bool,
    pub limit: Option<usize>,
}

impl LogQuery {
    /// Query-string pairs, in a fixed order.
    ///
    /// `errors_only` is only sent when set; empty strings are treated as unset.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(level) = self.level {
            params.push(("level", level.to_string()));
        }
        if let Some(category) = non_empty(self.category.as_deref()) {
            params.push(("category", category.to_owned()));
        }
        if let Some(sensor) = non_empty(self.sensor_name.as_deref()) {
            params.push(("sensor_name", sensor.to_owned()));
        }
        if let Some(start) = self.start_time {
            params.push(("start_time", iso(start)));
        }
        if let Some(end) = self.end_time {
            params.push(("end_time", iso(end)));
        }
        if self.errors_only {
            params.push(("errors_only", "true".to_owned()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Export file format for `GET /api/logs/export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_query_sends_nothing() {
        assert!(LogQuery::default().to_params().is_empty());
    }

    #[test]
    fn error_filter_is_sent_as_params() {
        let query = LogQuery {
            level: Some(LogLevel::Error),
            errors_only: true,
            limit: Some(100),
            ..LogQuery::default()
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("level", "ERROR".to_owned()),
                ("errors_only", "true".to_owned()),
                ("limit", "100".to_owned()),
            ]
        );
    }

    #[test]
    fn time_window_and_blank_strings() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let query = LogQuery {
            category: Some("  ".into()),
            sensor_name: Some("boiler_temp".into()),
            start_time: Some(start),
            ..LogQuery::default()
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("sensor_name", "boiler_temp".to_owned()),
                ("start_time", "2024-03-01T09:00:00Z".to_owned()),
            ]
        );
    }

    #[test]
    fn export_format_names() {
        assert_eq!(ExportFormat::Json.as_ref(), "json");
        assert_eq!(ExportFormat::Csv.to_string(), "csv");
    }
}
