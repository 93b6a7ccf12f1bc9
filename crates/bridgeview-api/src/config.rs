// Configuration endpoints
//
// Read the groups/parameters snapshot and submit partial updates. Update
// responses carry no payload the client uses; only the envelope verdict
// matters.

use serde_json::Value;
use tracing::debug;

use crate::client::{ApiClient, require_data};
use crate::error::Error;
use crate::models::{ConfigSnapshot, GroupUpdate, ParameterUpdate};

impl ApiClient {
    /// Groups and parameters as the configuration UI shows them.
    ///
    /// `GET /api/config/ui`
    pub async fn config_ui(&self) -> Result<ConfigSnapshot, Error> {
        let url = self.endpoint(&["config", "ui"])?;
        debug!("fetching config snapshot");
        require_data(self.get(url).await?, "config/ui")
    }

    /// Partially update one sensor parameter.
    ///
    /// `PUT /api/config/parameter/{name}`
    pub async fn update_parameter(&self, name: &str, update: &ParameterUpdate) -> Result<(), Error> {
        let url = self.endpoint(&["config", "parameter", name])?;
        debug!(parameter = name, ?update, "updating parameter");
        let _: Option<Value> = self.put(url, update).await?;
        Ok(())
    }

    /// Partially update one sensor group.
    ///
    /// `PUT /api/config/group/{name}`
    pub async fn update_group(&self, name: &str, update: &GroupUpdate) -> Result<(), Error> {
        let url = self.endpoint(&["config", "group", name])?;
        debug!(group = name, ?update, "updating group");
        let _: Option<Value> = self.put(url, update).await?;
        Ok(())
    }
}
