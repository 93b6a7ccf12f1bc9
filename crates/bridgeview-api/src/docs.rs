// Documentation endpoints

use serde_json::{Value, json};
use tracing::debug;

use crate::client::{ApiClient, require_data};
use crate::error::Error;
use crate::models::{DocType, Documentation};

impl ApiClient {
    /// Generated documentation of one type.
    ///
    /// `GET /api/documentation/{type}`
    pub async fn documentation(&self, doc_type: DocType) -> Result<Documentation, Error> {
        let url = self.endpoint(&["documentation", doc_type.as_ref()])?;
        debug!(%doc_type, "fetching documentation");
        require_data(self.get(url).await?, "documentation/{type}")
    }

    /// Regenerate documentation into `output_dir` on the bridge host.
    ///
    /// `POST /api/documentation/generate` with `{"output_dir": ...}`.
    /// Returns whatever summary the server reports (file list, counts).
    pub async fn generate_documentation(&self, output_dir: &str) -> Result<Option<Value>, Error> {
        let url = self.endpoint(&["documentation", "generate"])?;
        debug!(output_dir, "regenerating documentation");
        self.post(url, &json!({ "output_dir": output_dir })).await
    }
}
