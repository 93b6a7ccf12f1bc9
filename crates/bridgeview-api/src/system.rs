// System endpoints
//
// Bridge process health.

use tracing::debug;

use crate::client::{ApiClient, require_data};
use crate::error::Error;
use crate::models::HealthReport;

impl ApiClient {
    /// Overall and per-component health.
    ///
    /// `GET /api/health`
    pub async fn health(&self) -> Result<HealthReport, Error> {
        let url = self.endpoint(&["health"])?;
        debug!("fetching health");
        require_data(self.get(url).await?, "health")
    }
}
