// Log endpoints
//
// Filtered log pages, aggregate stats and the export URL. The export is a
// file download meant for a browser or `curl`, so only its URL is built.

use tracing::debug;
use url::Url;

use crate::client::{ApiClient, require_data};
use crate::error::Error;
use crate::models::{LogPage, LogStats};
use crate::query::{ExportFormat, LogQuery};

impl ApiClient {
    /// One filtered page of log entries, as the server orders them.
    ///
    /// `GET /api/logs?level&category&sensor_name&start_time&end_time&errors_only&limit`
    pub async fn logs(&self, query: &LogQuery) -> Result<LogPage, Error> {
        let url = self.endpoint(&["logs"])?;
        let params = query.to_params();
        debug!(params = params.len(), "fetching logs");
        let page: Option<LogPage> = self.get_with_params(url, &params).await?;
        Ok(page.unwrap_or_default())
    }

    /// Totals by level and category.
    ///
    /// `GET /api/logs/stats`
    pub async fn log_stats(&self) -> Result<LogStats, Error> {
        let url = self.endpoint(&["logs", "stats"])?;
        debug!("fetching log stats");
        require_data(self.get(url).await?, "logs/stats")
    }

    /// Download URL for the current filter in the given format.
    ///
    /// `GET /api/logs/export?...&format=json|csv` (not requested here)
    pub fn export_url(&self, query: &LogQuery, format: ExportFormat) -> Result<Url, Error> {
        let mut url = self.endpoint(&["logs", "export"])?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.to_params() {
                pairs.append_pair(key, &value);
            }
            pairs.append_pair("format", format.as_ref());
        }
        Ok(url)
    }
}
