//! Survey intake: register employees, score and store their surveys, and
//! accept workflow status callbacks.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use wellmind_common::{scoring, ApiError, Submission, WellmindError};
use wellmind_predict::NotificationPayload;
use wellmind_store::{ledger, models::{STATUS_FAILED, STATUS_TRIGGERED}};

use crate::extract::ApiJson;
use crate::state::{AppEvent, SharedState};

#[derive(Debug, Deserialize)]
pub struct SurveyRequest {
    pub name: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub employee_id: u64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub result_id: u64,
    /// Numeric risk score.
    pub risk: i64,
    pub label: String,
    pub ledger_tx: Option<String>,
    pub orchestrate: String,
}

fn required(field: &str, value: Option<String>) -> Result<String, WellmindError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| WellmindError::Validation(format!("{} is required", field)))
}

/// POST /api/survey: find or create the employee by email.
pub async fn api_survey(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<SurveyRequest>,
) -> Result<Json<SurveyResponse>, ApiError> {
    let name = required("name", req.name)?;
    let email = required("email", req.email)?;
    let (employee, created) = state
        .store
        .upsert_employee(&name, req.department.as_deref(), &email)
        .await;
    if created {
        info!("new employee {} in {}", employee.id, employee.department);
    }
    Ok(Json(SurveyResponse {
        employee_id: employee.id,
        message: "Survey received, processing...".to_string(),
    }))
}

/// POST /api/analyze: score a survey, store it, issue a ledger receipt and
/// hand the result to the notifier.
pub async fn api_analyze(
    State(state): State<SharedState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let employee_id = body
        .get("employee_id")
        .and_then(Value::as_u64)
        .ok_or_else(|| WellmindError::Validation("employee_id is required".to_string()))?;
    let employee = state
        .store
        .employee(employee_id)
        .await
        .ok_or(WellmindError::EmployeeNotFound(employee_id))?;

    let submission = Submission::from_json(&body);
    let assessment = scoring::assess(&submission);
    let record = state
        .store
        .record_result(employee_id, assessment, submission.work_hours, submission.stress)
        .await?;

    let view = state
        .store
        .result_view(record.id)
        .await
        .ok_or(WellmindError::ResultNotFound(record.id))?;
    let tx_id = ledger::receipt_for(&view).map_err(WellmindError::from)?;
    state.store.set_ledger_txid(record.id, tx_id.clone()).await?;

    let payload = NotificationPayload {
        name: Some(employee.name.clone()),
        risk: Some(json!(assessment.risk)),
        score: Some(json!(assessment.score)),
    };
    let orchestrate = match state.predictions.notify(payload).await {
        Ok(()) => STATUS_TRIGGERED,
        Err(e) => {
            warn!("orchestrate error for result {}: {}", record.id, e);
            STATUS_FAILED
        }
    };
    state.store.set_orchestrate_status(record.id, orchestrate).await;

    state.publish(AppEvent::SurveyAnalyzed {
        result_id: record.id,
        employee_id,
        label: assessment.risk.to_string(),
        score: assessment.score,
    });

    Ok(Json(AnalyzeResponse {
        result_id: record.id,
        risk: assessment.score,
        label: assessment.risk.to_string(),
        ledger_tx: Some(tx_id),
        orchestrate: orchestrate.to_string(),
    }))
}

/// POST /api/orchestrate/callback. Every JSON callback is acknowledged;
/// the stored status only changes when `result_id` and `status` are both
/// present and the result exists.
pub async fn api_orchestrate_callback(
    State(state): State<SharedState>,
    ApiJson(body): ApiJson<Value>,
) -> Json<Value> {
    let result_id = body.get("result_id").and_then(Value::as_u64);
    let status = body.get("status").and_then(Value::as_str);
    match (result_id, status) {
        (Some(result_id), Some(status)) => {
            if state.store.set_orchestrate_status(result_id, status).await {
                state.publish(AppEvent::OrchestrateUpdated { result_id, status: status.to_string() });
            } else {
                warn!("callback for unknown result {}", result_id);
            }
        }
        _ => warn!("callback without result_id and status: {}", body),
    }
    Json(json!({ "status": "callback received" }))
}
