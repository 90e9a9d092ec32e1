//! send_email action

use tracing::info;

use crate::bridge::{EmailMessage, EmailSender};
use crate::engine::error::ActionError;
use crate::workflow::{ActionConfig, TriggerData};

pub async fn execute_send_email(
    sender: &dyn EmailSender,
    config: &ActionConfig,
    data: &TriggerData,
) -> Result<(), ActionError> {
    let message = EmailMessage {
        to: config.require("to", data)?,
        subject: config.require("subject", data)?,
        body: config.require("body", data)?,
    };

    sender.send(&message).await?;
    info!(to = %message.to, "Email sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::OutboxEmailSender;
    use crate::workflow::ConfigError;

    #[tokio::test]
    async fn test_send_email_renders_templates() {
        let sender = OutboxEmailSender::new();
        let config = ActionConfig::new()
            .with("to", "{{ownerEmail}}")
            .with("subject", "Welcome {{name}}")
            .with("body", "Clinic #{{clinicId}} is ready");
        let data = TriggerData::new()
            .with("ownerEmail", "a@b.com")
            .with("name", "Ana")
            .with("clinicId", 42);

        execute_send_email(&sender, &config, &data).await.unwrap();

        let sent = sender.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@b.com");
        assert_eq!(sent[0].subject, "Welcome Ana");
        assert_eq!(sent[0].body, "Clinic #42 is ready");
    }

    #[tokio::test]
    async fn test_send_email_requires_recipient() {
        let sender = OutboxEmailSender::new();
        let config = ActionConfig::new().with("subject", "s").with("body", "b");

        let err = execute_send_email(&sender, &config, &TriggerData::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Config(ConfigError::Missing(ref k)) if k == "to"));
        assert!(sender.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_send_email_with_missing_placeholder_field() {
        let sender = OutboxEmailSender::new();
        let config = ActionConfig::new()
            .with("to", "{{ownerEmail}}")
            .with("subject", "Welcome")
            .with("body", "{{note}}");
        let data = TriggerData::new().with("ownerEmail", "a@b.com");

        execute_send_email(&sender, &config, &data).await.unwrap();

        let sent = sender.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "");
    }
}
