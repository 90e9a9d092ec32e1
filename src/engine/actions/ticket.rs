//! create_ticket action

use super::resolve_clinic_id;
use crate::bridge::{NewTicket, TicketStore};
use crate::engine::error::ActionError;
use crate::workflow::{ActionDefaults, ActionConfig, TriggerData};

pub async fn execute_create_ticket(
    store: &dyn TicketStore,
    config: &ActionConfig,
    data: &TriggerData,
    defaults: &ActionDefaults,
) -> Result<(), ActionError> {
    let trigger_json = serde_json::to_string_pretty(&data.to_json())
        .map_err(crate::bridge::BridgeError::from)?;

    let ticket = NewTicket {
        subject: config.require("subject", data)?,
        description: format!(
            "Ticket opened automatically by a workflow.\n\nTrigger data:\n{}",
            trigger_json
        ),
        priority: config.resolve_or("priority", data, &defaults.ticket_priority),
        category: config.resolve_or("category", data, &defaults.ticket_category),
        clinic_id: resolve_clinic_id(config, data),
    };

    store.create(&ticket).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::InMemoryTicketStore;

    #[tokio::test]
    async fn test_ticket_embeds_trigger_data() {
        let store = InMemoryTicketStore::new();
        let config = ActionConfig::new().with("subject", "Onboard {{clinicName}}");
        let data = TriggerData::new()
            .with("clinicId", 42)
            .with("clinicName", "Sorriso");

        execute_create_ticket(&store, &config, &data, &ActionDefaults::default())
            .await
            .unwrap();

        let tickets = store.all().await;
        assert_eq!(tickets.len(), 1);
        let ticket = &tickets[0];
        assert_eq!(ticket.subject, "Onboard Sorriso");
        assert_eq!(ticket.priority, "normal");
        assert_eq!(ticket.category, "general");
        assert_eq!(ticket.clinic_id, Some(42));
        assert!(ticket.description.contains("\"clinicName\": \"Sorriso\""));
    }

    #[tokio::test]
    async fn test_ticket_without_clinic() {
        let store = InMemoryTicketStore::new();
        let config = ActionConfig::new()
            .with("subject", "Manual review")
            .with("priority", "high")
            .with("category", "billing");

        execute_create_ticket(&store, &config, &TriggerData::new(), &ActionDefaults::default())
            .await
            .unwrap();

        let ticket = &store.all().await[0];
        assert_eq!(ticket.priority, "high");
        assert_eq!(ticket.category, "billing");
        assert_eq!(ticket.clinic_id, None);
    }
}
