// Sensor endpoints
//
// Grouped sensor snapshot and single-sensor detail.

use tracing::debug;

use crate::client::{ApiClient, require_data};
use crate::error::Error;
use crate::models::{Sensor, SensorSnapshot};

impl ApiClient {
    /// Full grouped sensor snapshot.
    ///
    /// `GET /api/sensors/status`
    pub async fn sensor_status(&self) -> Result<SensorSnapshot, Error> {
        let url = self.endpoint(&["sensors", "status"])?;
        debug!("fetching sensor status");
        require_data(self.get(url).await?, "sensors/status")
    }

    /// Status, last reading and statistics for one sensor.
    ///
    /// `GET /api/sensors/{name}/status`
    pub async fn sensor_detail(&self, name: &str) -> Result<Sensor, Error> {
        let url = self.endpoint(&["sensors", name, "status"])?;
        debug!(sensor = name, "fetching sensor detail");
        require_data(self.get(url).await?, "sensors/{name}/status")
    }
}
