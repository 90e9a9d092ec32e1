//! add_tag action

use tracing::{info, warn};

use super::resolve_clinic_id;
use crate::bridge::TagStore;
use crate::engine::error::ActionError;
use crate::workflow::{ActionConfig, TriggerData};

/// Tag the clinic referenced by the trigger. No-ops when no clinic resolves.
pub async fn execute_add_tag(
    store: &dyn TagStore,
    config: &ActionConfig,
    data: &TriggerData,
) -> Result<(), ActionError> {
    let tag_name = config.require("tagName", data)?;

    let Some(clinic_id) = resolve_clinic_id(config, data) else {
        warn!(tag = %tag_name, "add_tag: clinicId could not be resolved, skipping");
        return Ok(());
    };

    let tag = store.find_or_create_tag(&tag_name).await?;
    let created = store.find_or_create_association(tag.id, clinic_id).await?;
    info!(tag = %tag.name, clinic_id, created, "Tag applied");
    Ok(())
}
