// MQTT endpoints

use tracing::debug;

use crate::client::{ApiClient, require_data};
use crate::error::Error;
use crate::models::{MqttHistory, MqttStats};

impl ApiClient {
    /// Aggregate broker counters plus the per-sensor error list.
    ///
    /// `GET /api/mqtt/stats`
    pub async fn mqtt_stats(&self) -> Result<MqttStats, Error> {
        let url = self.endpoint(&["mqtt", "stats"])?;
        debug!("fetching mqtt stats");
        require_data(self.get(url).await?, "mqtt/stats")
    }

    /// Set/state flows and raw messages for one sensor.
    ///
    /// `GET /api/mqtt/history/{name}`. A sensor without traffic may answer
    /// `success: true` with no data; that is an empty history, not an error.
    pub async fn mqtt_history(&self, name: &str) -> Result<MqttHistory, Error> {
        let url = self.endpoint(&["mqtt", "history", name])?;
        debug!(sensor = name, "fetching mqtt history");
        let history: Option<MqttHistory> = self.get(url).await?;
        Ok(history.unwrap_or_else(|| MqttHistory {
            sensor_name: Some(name.to_owned()),
            ..MqttHistory::default()
        }))
    }
}
