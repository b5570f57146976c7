//! Burnout prediction endpoint.

use axum::{body::Bytes, extract::State, Json};
use serde_json::{Map, Value};
use tracing::warn;
use wellmind_common::Submission;

use crate::state::{AppEvent, SharedState};

/// POST /api/predict
///
/// Always answers 200 with `{risk, score[, error]}`. Delegate failures are
/// embedded in the body and unreadable request bodies score with defaults.
pub async fn api_predict(State(state): State<SharedState>, body: Bytes) -> Json<Value> {
    let body = parse_body(&body);
    let prediction = state.predictions.predict(&body).await;

    state.publish(AppEvent::RiskScored {
        name: Submission::from_json(&body).name,
        risk: prediction.risk(),
        score: prediction.score(),
    });

    Json(prediction.to_json())
}

fn parse_body(bytes: &[u8]) -> Value {
    match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(e) => {
            warn!("unreadable prediction body, scoring with defaults: {}", e);
            Value::Object(Map::new())
        }
    }
}
