//! webhook action

use crate::bridge::WebhookClient;
use crate::engine::error::ActionError;
use crate::workflow::{ActionConfig, TriggerData};

/// POST the trigger data as JSON; any non-2xx response fails the action
pub async fn execute_webhook(
    client: &dyn WebhookClient,
    config: &ActionConfig,
    data: &TriggerData,
) -> Result<(), ActionError> {
    let url = config.require("url", data)?;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ActionError::InvalidConfig {
            key: "url".to_string(),
            reason: format!("'{}' is not an http(s) URL", url),
        });
    }

    let response = client.post_json(&url, &data.to_json()).await?;
    if !response.is_success() {
        return Err(ActionError::WebhookStatus {
            url,
            status: response.status,
        });
    }
    Ok(())
}
