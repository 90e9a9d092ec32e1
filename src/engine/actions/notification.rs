//! create_notification action

use crate::bridge::{NewNotification, NotificationStore};
use crate::engine::error::ActionError;
use crate::workflow::{ActionConfig, TriggerData};

pub async fn execute_create_notification(
    store: &dyn NotificationStore,
    config: &ActionConfig,
    data: &TriggerData,
    default_type: &str,
) -> Result<(), ActionError> {
    let notification = NewNotification {
        kind: config.resolve_or("type", data, default_type),
        title: config.require("title", data)?,
        message: config.require("message", data)?,
    };

    store.create(&notification).await?;
    Ok(())
}
