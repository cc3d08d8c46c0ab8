use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::models::{OrderLineCreate, ProcurementRequestCreate};
use crate::services::state::AppState;
use crate::utils::parse_decimal;

pub const PREDICT_DEBOUNCE: Duration = Duration::from_millis(500);

/// The manual-entry form. A single order line is synthesized from the
/// title and total cost on submission.
#[derive(Debug, Clone, Default)]
pub struct RequestForm {
    pub title: String,
    pub requestor_name: String,
    pub department: String,
    pub vendor_name: String,
    pub vendor_vat_id: String,
    pub total_cost: String,
    pub commodity_group_id: Option<String>,
}

impl RequestForm {
    pub fn validate(&self) -> Result<ProcurementRequestCreate, String> {
        let required = [
            ("title", &self.title),
            ("requestor name", &self.requestor_name),
            ("department", &self.department),
            ("vendor name", &self.vendor_name),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                return Err(format!("Missing {}", label));
            }
        }

        let cost = parse_decimal(&self.total_cost)
            .map_err(|_| "Total cost must be a number".to_string())?;
        if cost <= 0.0 {
            return Err("Total cost must be greater than zero".to_string());
        }

        let vat = self.vendor_vat_id.trim();
        Ok(ProcurementRequestCreate {
            requestor_name: self.requestor_name.trim().to_string(),
            title: self.title.trim().to_string(),
            department: self.department.trim().to_string(),
            vendor_name: self.vendor_name.trim().to_string(),
            vendor_vat_id: (!vat.is_empty()).then(|| vat.to_string()),
            order_lines: vec![OrderLineCreate {
                product: None,
                description: self.title.trim().to_string(),
                unit_price: cost,
                amount: 1,
                unit: None,
            }],
        })
    }
}

/// Title edits reschedule the debounced commodity-group prediction. Last
/// scheduled wins: the pending timer is aborted on every keystroke, and a
/// reply is dropped unless its generation is still current when it lands.
pub fn edit_title(state: &Arc<AppState>, title: String) {
    state.form().title = title.clone();

    let generation = state.next_predict_generation();
    let task_state = state.clone();
    state.schedule_prediction(PREDICT_DEBOUNCE, async move {
        let trimmed = title.trim().to_string();
        if trimmed.is_empty() {
            return;
        }
        match task_state.api.predict_commodity_group(&trimmed).await {
            Ok(Some(group_id)) => {
                if task_state.is_alive()
                    && task_state.current_predict_generation() == generation
                {
                    task_state.form().commodity_group_id = Some(group_id);
                }
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "commodity group prediction failed"),
        }
    });
}

pub async fn submit_request(state: &Arc<AppState>) -> Result<(), String> {
    state.store.clear_messages();

    let validated = state.form().validate();
    let payload = match validated {
        Ok(payload) => payload,
        Err(message) => {
            state.store.set_error_message(Some(message.clone()));
            return Err(message);
        }
    };

    let Some(_guard) = state.begin_action("create-request") else {
        return Err("A create is already in progress".to_string());
    };

    match state.api.create_request(&payload).await {
        Ok(created) => {
            info!(id = created.id, title = %created.title, "request created");
            if state.is_alive() {
                *state.form() = RequestForm::default();
                state.set_transient_success(format!("Request #{} created.", created.id));
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

pub async fn change_status(
    state: &Arc<AppState>,
    request_id: i64,
    status: &str,
    actor: &str,
) -> Result<(), String> {
    state.store.clear_messages();

    match state
        .api
        .update_request_status(request_id, status, actor)
        .await
    {
        Ok(updated) => {
            if state.is_alive() {
                state.set_transient_success(format!(
                    "Request #{} is now {}.",
                    updated.id, updated.current_status
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

/// Destructive; callers must pass an explicit confirmation.
pub async fn clear_history(state: &Arc<AppState>, confirmed: bool) -> Result<(), String> {
    if !confirmed {
        return Err("Confirmation required to clear all requests".to_string());
    }
    state.store.clear_messages();

    match state.api.delete_all_requests().await {
        Ok(()) => {
            if state.is_alive() {
                state.set_transient_success("All requests deleted.".to_string());
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

pub async fn refresh_overview(state: &Arc<AppState>) -> Result<(), String> {
    match state.refresh_requests().await {
        Ok(()) => Ok(()),
        Err(err) => {
            let message = err.to_string();
            if state.is_alive() {
                state.store.set_error_message(Some(message.clone()));
            }
            Err(message)
        }
    }
}

/// Consistency is pull-based: every successful mutation is followed by a
/// full-list re-fetch. A failed refresh surfaces like any other error.
pub(crate) async fn refresh_after_mutation(state: &Arc<AppState>) {
    if let Err(err) = state.refresh_requests().await {
        warn!(error = %err, "list refresh failed");
        if state.is_alive() {
            state.store.set_error_message(Some(err.to_string()));
        }
    }
}
