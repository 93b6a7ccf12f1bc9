// ── Controller ──
//
// Runs the side effects `update` describes. Every fetch and mutation is its
// own spawned task; results come back as `Outcome` messages over an
// unbounded channel, so one failing call never affects another. Nothing is
// retried or cancelled.

use std::sync::Arc;

use bridgeview_api::{ApiClient, ExportFormat};
use chrono::Utc;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::filter::LogFilter;
use crate::mutation::Mutation;
use crate::panel::Payload;
use crate::plan::Fetch;
use crate::update::{Notice, Outcome, Task};

/// Result of handing a batch of tasks to the controller.
#[derive(Debug, Default)]
pub struct Dispatch {
    /// Network tasks now running.
    pub spawned: usize,
    /// Notices for the front-end; these need no I/O.
    pub notices: Vec<Notice>,
}

#[derive(Clone)]
pub struct Controller {
    api: Arc<ApiClient>,
    outcomes: mpsc::UnboundedSender<Outcome>,
}

impl Controller {
    /// Build the HTTP client from `config`. Returns the controller and the
    /// receiving end of its outcome channel.
    pub fn new(config: &ClientConfig) -> Result<(Self, mpsc::UnboundedReceiver<Outcome>), CoreError> {
        let api = ApiClient::new(config.server.clone(), &config.transport())?;
        Ok(Self::with_api(api))
    }

    pub fn with_api(api: ApiClient) -> (Self, mpsc::UnboundedReceiver<Outcome>) {
        let (outcomes, rx) = mpsc::unbounded_channel();
        let controller = Self {
            api: Arc::new(api),
            outcomes,
        };
        (controller, rx)
    }

    /// Spawn the network tasks in `tasks`; notices are handed back.
    ///
    /// Must be called from within a tokio runtime.
    pub fn execute(&self, tasks: Vec<Task>) -> Dispatch {
        let mut dispatch = Dispatch::default();
        for task in tasks {
            match task {
                Task::Notify(notice) => dispatch.notices.push(notice),
                Task::Fetch { token, fetch } => {
                    let api = Arc::clone(&self.api);
                    let tx = self.outcomes.clone();
                    let panel = fetch.panel();
                    tokio::spawn(async move {
                        let result = run_fetch(&api, fetch).await;
                        send(&tx, Outcome::Fetched { token, panel, result });
                    });
                    dispatch.spawned += 1;
                }
                Task::Mutate(mutation) => {
                    let api = Arc::clone(&self.api);
                    let tx = self.outcomes.clone();
                    tokio::spawn(async move {
                        let result = run_mutation(&api, &mutation).await;
                        send(&tx, Outcome::Mutated { mutation, result });
                    });
                    dispatch.spawned += 1;
                }
                Task::Export { filter, format } => {
                    // URL construction only; the file itself is never downloaded here.
                    let result = export_url(&self.api, &filter, format);
                    send(&self.outcomes, Outcome::Exported { format, result });
                    dispatch.spawned += 1;
                }
            }
        }
        dispatch
    }
}

fn send(tx: &mpsc::UnboundedSender<Outcome>, outcome: Outcome) {
    if tx.send(outcome).is_err() {
        debug!("outcome receiver dropped");
    }
}

fn export_url(api: &ApiClient, filter: &LogFilter, format: ExportFormat) -> Result<Url, CoreError> {
    Ok(api.export_url(&filter.to_query(Utc::now()), format)?)
}

async fn run_fetch(api: &ApiClient, fetch: Fetch) -> Result<Payload, CoreError> {
    let result = match fetch {
        Fetch::Health => api.health().await.map(Payload::Health),
        Fetch::SensorStatus => api.sensor_status().await.map(Payload::Sensors),
        Fetch::MqttStats => api.mqtt_stats().await.map(Payload::MqttStats),
        Fetch::LogStats => api.log_stats().await.map(Payload::LogStats),
        Fetch::Logs(filter) => api.logs(&filter.to_query(Utc::now())).await.map(Payload::Logs),
        Fetch::MqttHistory { sensor } => api.mqtt_history(&sensor).await.map(Payload::MqttHistory),
        Fetch::ConfigSnapshot => api.config_ui().await.map(Payload::Config),
        Fetch::Documentation(doc_type) => api
            .documentation(doc_type)
            .await
            .map(|doc| Payload::Docs(doc_type, doc)),
        Fetch::SensorDetail { sensor } => api.sensor_detail(&sensor).await.map(Payload::DetailSensor),
        Fetch::DetailHistory { sensor } => {
            api.mqtt_history(&sensor).await.map(Payload::DetailHistory)
        }
    };
    result.map_err(|e| {
        warn!(error = %e, "fetch failed");
        CoreError::from(e)
    })
}

async fn run_mutation(api: &ApiClient, mutation: &Mutation) -> Result<Option<Value>, CoreError> {
    let result = match mutation {
        Mutation::Parameter { name, update } => api.update_parameter(name, update).await.map(|()| None),
        Mutation::Group { name, update } => api.update_group(name, update).await.map(|()| None),
        Mutation::ToggleParameter { name, enabled } => {
            let update = bridgeview_api::ParameterUpdate {
                enabled: Some(*enabled),
                ..Default::default()
            };
            api.update_parameter(name, &update).await.map(|()| None)
        }
        Mutation::RegenerateDocs { output_dir } => api.generate_documentation(output_dir).await,
    };
    Ok(result?)
}
