// Integration tests for `ApiClient` using wiremock.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bridgeview_api::{
    ApiClient, DocType, Error, ExportFormat, GroupUpdate, LogLevel, LogQuery, ParameterUpdate,
    SensorStatus,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
    );
    (server, client)
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_sensor_status_snapshot() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sensors/status"))
        .respond_with(ok(json!({
            "groups": [{
                "id": "heating",
                "name": "Heating",
                "priority": 1,
                "sensors": [
                    {
                        "name": "boiler_temp",
                        "priority": 1,
                        "status": "ok",
                        "last_reading": { "value": 54.5, "unit": "°C", "timestamp": "2024-03-01T10:00:00" },
                        "statistics": { "success_rate": 99.5, "error_count": 2 }
                    },
                    { "name": "pump_state", "priority": 2, "status": "sleeping" }
                ]
            }]
        })))
        .mount(&server)
        .await;

    let snapshot = client.sensor_status().await.unwrap();

    assert_eq!(snapshot.groups.len(), 1);
    let sensors = &snapshot.groups[0].sensors;
    assert_eq!(sensors[0].name, "boiler_temp");
    assert_eq!(sensors[0].error_count(), 2);
    assert_eq!(sensors[1].status, SensorStatus::Unknown);
    assert!(sensors[1].last_reading.is_none());
}

#[tokio::test]
async fn test_sensor_detail_encodes_name() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sensors/flow%20temp/status"))
        .respond_with(ok(json!({ "name": "flow temp", "status": "timeout" })))
        .mount(&server)
        .await;

    let sensor = client.sensor_detail("flow temp").await.unwrap();
    assert_eq!(sensor.status, SensorStatus::Timeout);
}

#[tokio::test]
async fn test_logs_sends_filter_as_query() {
    let (server, client) = setup().await;

    let entries = json!([
        { "timestamp": "2024-03-01T10:00:00", "level": "ERROR", "category": "modbus", "message": "timeout reading 30001" },
        { "timestamp": "2024-03-01T09:59:00", "level": "ERROR", "category": "mqtt", "message": "publish failed" }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .and(query_param("level", "ERROR"))
        .and(query_param("errors_only", "true"))
        .and(query_param("limit", "100"))
        .and(query_param_is_missing("category"))
        .respond_with(ok(entries))
        .expect(1)
        .mount(&server)
        .await;

    let query = LogQuery {
        level: Some(LogLevel::Error),
        errors_only: true,
        limit: Some(100),
        ..LogQuery::default()
    };
    let page = client.logs(&query).await.unwrap();

    let messages: Vec<_> = page.entries.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["timeout reading 30001", "publish failed"]);
}

#[tokio::test]
async fn test_mqtt_history_without_data_is_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/mqtt/history/boiler_temp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let history = client.mqtt_history("boiler_temp").await.unwrap();
    assert!(history.flows.is_empty());
    assert_eq!(history.sensor_name.as_deref(), Some("boiler_temp"));
}

#[tokio::test]
async fn test_update_group_sends_partial_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/config/group/heating"))
        .and(body_json(json!({ "default_polling_interval": 30, "enabled": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let update = GroupUpdate {
        default_polling_interval: Some(30),
        enabled: Some(true),
    };
    client.update_group("heating", &update).await.unwrap();
}

#[tokio::test]
async fn test_generate_documentation_posts_output_dir() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/documentation/generate"))
        .and(body_json(json!({ "output_dir": "docs/generated" })))
        .respond_with(ok(json!({ "files": ["mqtt.md"] })))
        .mount(&server)
        .await;

    let summary = client.generate_documentation("docs/generated").await.unwrap();
    assert_eq!(summary, Some(json!({ "files": ["mqtt.md"] })));
}

#[tokio::test]
async fn test_documentation_plain_string() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/documentation/troubleshooting"))
        .respond_with(ok(json!("# Troubleshooting\n\nCheck the bus wiring.")))
        .mount(&server)
        .await;

    let doc = client.documentation(DocType::Troubleshooting).await.unwrap();
    assert!(doc.content.starts_with("# Troubleshooting"));
}

#[test]
fn test_export_url_carries_filter_and_format() {
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://bridge.local:8000").unwrap(),
    );
    let query = LogQuery {
        sensor_name: Some("boiler temp".into()),
        limit: Some(200),
        ..LogQuery::default()
    };

    let url = client.export_url(&query, ExportFormat::Csv).unwrap();

    assert_eq!(
        url.as_str(),
        "http://bridge.local:8000/api/logs/export?sensor_name=boiler+temp&limit=200&format=csv"
    );
}

// ── Error-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_api_error_message_verbatim() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/config/parameter/boiler_temp"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": "locked" })),
        )
        .mount(&server)
        .await;

    let update = ParameterUpdate {
        enabled: Some(false),
        ..ParameterUpdate::default()
    };
    let err = client
        .update_parameter("boiler_temp", &update)
        .await
        .unwrap_err();

    assert_eq!(err.api_message(), Some("locked"));
}

#[tokio::test]
async fn test_missing_data_is_reported() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let err = client.health().await.unwrap_err();
    assert!(matches!(err, Error::MissingData { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_malformed_body_keeps_raw_text() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/mqtt/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let err = client.mqtt_stats().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "<html>proxy error</html>"),
        other => panic!("expected Deserialization, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_http_error_without_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/logs/stats"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Not Found" })),
        )
        .mount(&server)
        .await;

    let err = client.log_stats().await.unwrap_err();
    match err {
        Error::Http { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not Found");
        }
        other => panic!("expected Http, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_envelope_error_on_server_failure_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/config/ui"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "success": false, "error": "config file unreadable" })),
        )
        .mount(&server)
        .await;

    let err = client.config_ui().await.unwrap_err();
    assert_eq!(err.api_message(), Some("config file unreadable"));
}

#[tokio::test]
async fn test_connection_refused_is_transport() {
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:1").unwrap(),
    );

    let err = client.health().await.unwrap_err();
    assert!(err.is_transport(), "got: {err:?}");
}
