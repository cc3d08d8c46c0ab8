use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::commands::requests::refresh_after_mutation;
use crate::models::{QueueItem, QueueStatus};
use crate::services::state::{AppState, Tab};
use crate::utils::queue_item_id;

pub const TAB_SWITCH_DELAY: Duration = Duration::from_secs(3);

/// Combined create-and-extract from an offer document. The queue marker is
/// enqueued before the call and always settles into a terminal status. On
/// success a delayed switch back to Overview is scheduled; a new upload
/// starting first cancels it.
pub async fn create_request_from_offer(
    state: &Arc<AppState>,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<(), String> {
    state.store.clear_messages();
    state.cancel_tab_switch();

    let queue_id = queue_item_id(filename);
    state.store.add_to_queue(QueueItem {
        id: queue_id.clone(),
        filename: filename.to_string(),
        status: QueueStatus::Processing,
    });

    match state.api.create_from_offer(filename, bytes).await {
        Ok(created) => {
            info!(id = created.id, filename, "request created from offer");
            if state.is_alive() {
                state.store.update_queue(&queue_id, QueueStatus::Completed);
                state.set_transient_success(format!(
                    "Request #{} created from {}.",
                    created.id, filename
                ));
            }
            refresh_after_mutation(state).await;
            state.schedule_tab_switch(TAB_SWITCH_DELAY, Tab::Overview);
            Ok(())
        }
        Err(err) => {
            let message = err.to_string();
            if state.is_alive() {
                state.store.update_queue(&queue_id, QueueStatus::Failed);
                state.store.set_error_message(Some(message.clone()));
            }
            Err(message)
        }
    }
}

/// Picker variant: reads the file and delegates to the byte-based flow.
pub async fn create_request_from_offer_path(
    state: &Arc<AppState>,
    path: &Path,
) -> Result<(), String> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| "Invalid offer file name".to_string())?
        .to_string();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| format!("Read offer file: {}", e))?;
    create_request_from_offer(state, &filename, bytes).await
}

/// Attach an offer to an existing request without extracting it yet.
pub async fn upload_offer_to(
    state: &Arc<AppState>,
    request_id: i64,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<(), String> {
    state.store.clear_messages();

    match state.api.upload_offer(request_id, filename, bytes).await {
        Ok(ack) => {
            if state.is_alive() {
                state.set_transient_success(format!(
                    "Offer {} attached to request #{}.",
                    ack.filename, request_id
                ));
            }
            Ok(())
        }
        Err(err) => {
            let message = err.to_string();
            if state.is_alive() {
                state.store.set_error_message(Some(message.clone()));
            }
            Err(message)
        }
    }
}

/// Server-side extraction against the most recently uploaded offer.
pub async fn extract_offer(state: &Arc<AppState>, request_id: i64) -> Result<(), String> {
    state.store.clear_messages();

    match state.api.extract_offer(request_id).await {
        Ok(updated) => {
            if state.is_alive() {
                state.set_transient_success(format!(
                    "Request #{} autofilled from its offer.",
                    updated.id
                ));
            }
            refresh_after_mutation(state).await;
            Ok(())
        }
        Err(err) => {
            let message = err.to_string();
            if state.is_alive() {
                state.store.set_error_message(Some(message.clone()));
            }
            Err(message)
        }
    }
}
