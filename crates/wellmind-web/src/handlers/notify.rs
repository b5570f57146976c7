//! Notification sinks hit after every prediction.
//!
//! /api/watson picks a follow-up action for the risk level.
//! /api/hedera issues a simulated ledger receipt for the payload.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;
use wellmind_common::{ApiError, RiskLevel, WellmindError};
use wellmind_predict::NotificationPayload;
use wellmind_store::ledger;

use crate::extract::ApiJson;
use crate::state::{AppEvent, SharedState};

/// Follow-up action for a notified risk label. Anything that is not a
/// known label (including the delegate fallback "Unknown") gets none.
pub fn follow_up_action(risk: Option<&Value>) -> &'static str {
    match risk.and_then(Value::as_str).and_then(|r| r.parse::<RiskLevel>().ok()) {
        Some(RiskLevel::High) => "schedule_check_in",
        Some(RiskLevel::Medium) => "share_resources",
        _ => "none",
    }
}

/// POST /api/watson
pub async fn api_watson(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<NotificationPayload>,
) -> Json<Value> {
    let action = follow_up_action(payload.risk.as_ref());
    info!(
        name = payload.name.as_deref().unwrap_or("anonymous"),
        action,
        "watson notification received"
    );
    state.publish(AppEvent::WatsonNotified { name: payload.name, action: action.to_string() });
    Json(json!({ "status": "received", "action": action }))
}

/// POST /api/hedera
pub async fn api_hedera(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<NotificationPayload>,
) -> Result<Json<Value>, ApiError> {
    let tx_id = ledger::receipt_for(&payload).map_err(WellmindError::from)?;
    info!("ledger receipt {} issued", tx_id);
    state.publish(AppEvent::LedgerRecorded { name: payload.name, tx_id: tx_id.clone() });
    Ok(Json(json!({ "tx_id": tx_id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_up_actions() {
        assert_eq!(follow_up_action(Some(&json!("High"))), "schedule_check_in");
        assert_eq!(follow_up_action(Some(&json!("Medium"))), "share_resources");
        assert_eq!(follow_up_action(Some(&json!("Low"))), "none");
        assert_eq!(follow_up_action(Some(&json!("Unknown"))), "none");
        assert_eq!(follow_up_action(Some(&json!(3))), "none");
        assert_eq!(follow_up_action(None), "none");
    }
}
