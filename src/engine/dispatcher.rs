//! Action Dispatcher - Routes a configured action to its handler

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::bridge::{EmailSender, NotificationStore, TagStore, TicketStore, WebhookClient};
use crate::engine::actions;
use crate::engine::error::ActionError;
use crate::workflow::{ActionConfig, ActionDefaults, ActionType, TriggerData};

/// The side-effect ports used by the built-in actions
#[derive(Clone)]
pub struct ActionPorts {
    pub email: Arc<dyn EmailSender>,
    pub notifications: Arc<dyn NotificationStore>,
    pub tags: Arc<dyn TagStore>,
    pub tickets: Arc<dyn TicketStore>,
    pub webhooks: Arc<dyn WebhookClient>,
}

#[derive(Clone)]
pub struct ActionDispatcher {
    ports: ActionPorts,
    defaults: ActionDefaults,
}

impl ActionDispatcher {
    pub fn new(ports: ActionPorts) -> Self {
        Self {
            ports,
            defaults: ActionDefaults::default(),
        }
    }

    /// Override the fallback values for optional config entries
    pub fn with_defaults(mut self, defaults: ActionDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Execute one action
    #[instrument(skip(self, config, data), fields(action_type = %action_type))]
    pub async fn dispatch(
        &self,
        action_type: &ActionType,
        config: &ActionConfig,
        data: &TriggerData,
    ) -> Result<(), ActionError> {
        debug!("Dispatching action");

        match action_type {
            ActionType::SendEmail => {
                actions::email::execute_send_email(self.ports.email.as_ref(), config, data).await
            }
            ActionType::CreateNotification => {
                actions::notification::execute_create_notification(
                    self.ports.notifications.as_ref(),
                    config,
                    data,
                    &self.defaults.notification_type,
                )
                .await
            }
            ActionType::AddTag => {
                actions::tag::execute_add_tag(self.ports.tags.as_ref(), config, data).await
            }
            ActionType::CreateTicket => {
                actions::ticket::execute_create_ticket(
                    self.ports.tickets.as_ref(),
                    config,
                    data,
                    &self.defaults,
                )
                .await
            }
            ActionType::Webhook => {
                actions::webhook::execute_webhook(self.ports.webhooks.as_ref(), config, data).await
            }
            ActionType::Unsupported(other) => {
                Err(ActionError::UnsupportedActionType(other.clone()))
            }
        }
    }
}
