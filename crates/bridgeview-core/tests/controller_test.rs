// End-to-end tests for `Session` against a wiremock bridge.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bridgeview_api::ApiClient;
use bridgeview_core::{
    ClientConfig, Command, Controller, FilterUpdate, LogLevel, ModalForm, ModalStatus, Notice,
    Session, ViewId,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Session) {
    let server = MockServer::start().await;
    let base = Url::parse(&server.uri()).unwrap();
    let api = ApiClient::with_client(reqwest::Client::new(), base.clone());
    let (controller, outcomes) = Controller::with_api(api);
    let session = Session::with_controller(&ClientConfig::new(base), controller, outcomes);
    (server, session)
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

fn config_body() -> serde_json::Value {
    json!({
        "groups": [
            { "name": "heating", "priority": 1, "default_polling_interval": 60, "enabled": false }
        ],
        "parameters": [
            { "name": "boiler_temp", "group": "heating", "priority": 1,
              "polling_interval": 30, "enabled": true }
        ]
    })
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_dashboard_panels_fail_independently() {
    let (server, mut session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ok(json!({ "status": "healthy", "components": { "mqtt": "connected" } })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sensors/status"))
        .respond_with(ok(json!({ "groups": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/mqtt/stats"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/logs/stats"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": "log store offline" })),
        )
        .mount(&server)
        .await;

    let notices = session.start();
    assert!(notices.is_empty());
    assert_eq!(session.in_flight(), 4);

    let notices = session.settle().await;
    assert!(notices.is_empty(), "read failures stay silent: {notices:?}");

    let panels = &session.state().panels;
    assert_eq!(panels.health.data().unwrap().status, "healthy");
    assert!(panels.sensors.data().is_some());
    assert!(panels.mqtt_stats.data().is_none());
    assert!(panels.log_stats.data().is_none());
    assert!(!panels.mqtt_stats.is_loading());
    assert!(!panels.log_stats.is_loading());
}

#[tokio::test]
async fn test_log_filter_reaches_server() {
    let (server, mut session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .and(query_param("level", "ERROR"))
        .and(query_param("errors_only", "true"))
        .and(query_param("limit", "100"))
        .respond_with(ok(json!([
            { "timestamp": "2024-03-01T10:00:00", "level": "ERROR", "message": "timeout" }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/logs/stats"))
        .respond_with(ok(json!({ "total_entries": 1, "by_category": { "modbus": 1 } })))
        .mount(&server)
        .await;

    session.dispatch(Command::SetFilter(FilterUpdate::LogLevel(Some(LogLevel::Error))));
    session.dispatch(Command::SetFilter(FilterUpdate::LogErrorsOnly(true)));
    session.dispatch(Command::SelectTab(ViewId::Logs));
    session.settle().await;

    let logs = session.state().panels.logs.data().unwrap();
    assert_eq!(logs.entries.len(), 1);
    assert_eq!(logs.entries[0].message, "timeout");
}

#[tokio::test]
async fn test_group_save_reloads_config_exactly_once() {
    let (server, mut session) = setup().await;

    // Initial load plus one reload after the save.
    Mock::given(method("GET"))
        .and(path("/api/config/ui"))
        .respond_with(ok(config_body()))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/config/group/heating"))
        .and(body_json(json!({ "default_polling_interval": 30, "enabled": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    session.dispatch(Command::SelectTab(ViewId::Config));
    session.settle().await;

    session.dispatch(Command::OpenGroupEditor("heating".into()));
    let Some(ModalForm::Group(mut form)) = session.state().modal().map(|m| m.form.clone()) else {
        panic!("group editor should be open");
    };
    form.default_polling_interval = "30".into();
    form.enabled = true;
    session.dispatch(Command::SaveGroup(form));

    let notices = session.settle().await;

    assert!(session.state().modal().is_none());
    assert!(
        notices
            .iter()
            .all(|n| !matches!(n, Notice::Blocking(_))),
        "unexpected failure: {notices:?}"
    );
}

#[tokio::test]
async fn test_rejected_parameter_save_keeps_modal_open() {
    let (server, mut session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/config/ui"))
        .respond_with(ok(config_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/config/parameter/boiler_temp"))
        .and(body_json(json!({ "enabled": false })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": false, "error": "locked" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    session.dispatch(Command::SelectTab(ViewId::Config));
    session.settle().await;

    session.dispatch(Command::OpenParameterEditor("boiler_temp".into()));
    let Some(ModalForm::Parameter(mut form)) = session.state().modal().map(|m| m.form.clone())
    else {
        panic!("parameter editor should be open");
    };
    form.enabled = false;
    session.dispatch(Command::SaveParameter(form.clone()));

    let notices = session.settle().await;

    assert_eq!(notices, vec![Notice::Blocking("Fehler: locked".into())]);
    let modal = session.state().modal().unwrap();
    assert_eq!(modal.status, ModalStatus::Failed("Fehler: locked".into()));
    assert_eq!(modal.form, ModalForm::Parameter(form));
}

#[tokio::test]
async fn test_toggle_failure_rolls_back_through_reload() {
    let (server, mut session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/config/ui"))
        .respond_with(ok(config_body()))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/config/parameter/boiler_temp"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "bus busy" })))
        .mount(&server)
        .await;

    session.dispatch(Command::SelectTab(ViewId::Config));
    session.settle().await;

    session.dispatch(Command::ToggleParameter("boiler_temp".into()));
    assert!(!session.state().panels.config.data().unwrap().parameters[0].enabled);

    let notices = session.settle().await;

    assert_eq!(notices, vec![Notice::Blocking("Fehler: HTTP 500: bus busy".into())]);
    assert!(session.state().panels.config.data().unwrap().parameters[0].enabled);
}

#[tokio::test]
async fn test_export_builds_url_without_request() {
    let (server, mut session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/logs/export"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    session.dispatch(Command::Export(bridgeview_core::ExportFormat::Csv));
    let notices = session.settle().await;

    let [Notice::Toast { message, .. }] = notices.as_slice() else {
        panic!("one toast expected, got {notices:?}");
    };
    assert!(message.contains("/api/logs/export?"), "{message}");
    assert!(message.ends_with("format=csv"), "{message}");
}
