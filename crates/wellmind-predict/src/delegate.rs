//! Remote AI backend that replaces local scoring when configured.
//!
//! The delegate receives the raw submission body and is expected to answer
//! with a JSON risk assessment. Transport and decode failures degrade to
//! [`Prediction::Fallback`]; a non-2xx status with a JSON body is passed
//! through unchanged. In strict mode the body must also be a well-formed
//! assessment (known risk label, integer score from 0 to 100).

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use wellmind_common::{RiskAssessment, RiskLevel};

use crate::scorer::{Prediction, RiskScorer};

#[derive(Debug, Error)]
pub enum DelegateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid delegate response: {0}")]
    InvalidResponse(String),
}

pub struct RemoteDelegate {
    pub url: String,
    strict: bool,
    client: reqwest::Client,
}

impl RemoteDelegate {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self { url: url.into(), strict: false, client }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Forward `body` and return the decoded response.
    pub async fn call(&self, body: &Value) -> Result<Value, DelegateError> {
        let resp = self.client.post(&self.url).json(body).send().await?;
        let status = resp.status();
        let json: Value = resp.json().await?;
        if !status.is_success() {
            warn!("AI backend answered {} with a JSON body, passing it through", status);
        }
        if self.strict {
            validate_assessment(&json)?;
        }
        Ok(json)
    }
}

#[async_trait]
impl RiskScorer for RemoteDelegate {
    async fn predict(&self, body: &Value) -> Prediction {
        match self.call(body).await {
            Ok(json) => {
                debug!("AI backend returned {}", json);
                Prediction::Delegated(json)
            }
            Err(e) => {
                warn!("AI backend error ({}): {}", self.url, e);
                Prediction::Fallback
            }
        }
    }

    fn backend(&self) -> &str { &self.url }
    fn is_local(&self) -> bool { false }
}

/// Check that a delegate response is a usable risk assessment.
pub fn validate_assessment(json: &Value) -> Result<RiskAssessment, DelegateError> {
    let risk = json
        .get("risk")
        .and_then(Value::as_str)
        .ok_or_else(|| DelegateError::InvalidResponse("missing risk label".to_string()))?
        .parse::<RiskLevel>()
        .map_err(DelegateError::InvalidResponse)?;

    let score = json
        .get("score")
        .and_then(integer_of)
        .ok_or_else(|| DelegateError::InvalidResponse("score is not an integer".to_string()))?;
    if !(0..=100).contains(&score) {
        return Err(DelegateError::InvalidResponse(format!("score {} outside 0-100", score)));
    }

    Ok(RiskAssessment { risk, score })
}

fn integer_of(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.is_finite())
            .map(|f| f as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_http_client;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::{Duration, Instant};
    use wellmind_test_utils::{refused_url, spawn_delegate, spawn_slow_delegate};

    #[tokio::test]
    async fn test_unreachable_delegate_falls_back() {
        let delegate = RemoteDelegate::new(refused_url().await, reqwest::Client::new());
        let p = delegate.predict(&json!({"work_hours": 45})).await;
        assert_eq!(
            p.to_json(),
            json!({"risk": "Unknown", "score": 0, "error": "AI backend error"})
        );
    }

    #[tokio::test]
    async fn test_hanging_delegate_times_out_to_fallback() {
        let url = spawn_slow_delegate(
            Duration::from_secs(30),
            StatusCode::OK,
            r#"{"risk":"Low","score":1}"#,
        )
        .await;
        let client = build_http_client(Duration::from_millis(300)).unwrap();

        let started = Instant::now();
        let p = RemoteDelegate::new(url, client).predict(&json!({"work_hours": 45})).await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(
            p.to_json(),
            json!({"risk": "Unknown", "score": 0, "error": "AI backend error"})
        );
    }

    #[tokio::test]
    async fn test_non_json_body_falls_back() {
        let url = spawn_delegate(StatusCode::OK, "<html>maintenance</html>").await;
        let p = RemoteDelegate::new(url, reqwest::Client::new())
            .predict(&json!({}))
            .await;
        assert!(p.is_fallback());
    }

    #[tokio::test]
    async fn test_response_is_passed_through() {
        let url = spawn_delegate(StatusCode::OK, r#"{"risk":"Severe","score":512,"model":"x"}"#).await;
        let p = RemoteDelegate::new(url, reqwest::Client::new())
            .predict(&json!({}))
            .await;
        assert_eq!(p.to_json(), json!({"risk": "Severe", "score": 512, "model": "x"}));
    }

    #[tokio::test]
    async fn test_error_status_with_json_is_passed_through() {
        let url = spawn_delegate(StatusCode::SERVICE_UNAVAILABLE, r#"{"detail":"warming up"}"#).await;
        let p = RemoteDelegate::new(url, reqwest::Client::new())
            .predict(&json!({}))
            .await;
        assert_eq!(p, Prediction::Delegated(json!({"detail": "warming up"})));
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_unknown_label() {
        let url = spawn_delegate(StatusCode::OK, r#"{"risk":"Severe","score":80}"#).await;
        let p = RemoteDelegate::new(url, reqwest::Client::new())
            .with_strict(true)
            .predict(&json!({}))
            .await;
        assert!(p.is_fallback());
    }

    #[tokio::test]
    async fn test_strict_mode_accepts_valid_assessment() {
        let url = spawn_delegate(StatusCode::OK, r#"{"risk":"Low","score":12}"#).await;
        let p = RemoteDelegate::new(url, reqwest::Client::new())
            .with_strict(true)
            .predict(&json!({}))
            .await;
        assert_eq!(p.to_json(), json!({"risk": "Low", "score": 12}));
    }

    #[test]
    fn test_validate_assessment_ranges() {
        assert!(validate_assessment(&json!({"risk": "High", "score": 100})).is_ok());
        assert!(validate_assessment(&json!({"risk": "High", "score": 70.0})).is_ok());
        assert!(validate_assessment(&json!({"risk": "High", "score": 101})).is_err());
        assert!(validate_assessment(&json!({"risk": "Low", "score": -1})).is_err());
        assert!(validate_assessment(&json!({"risk": "Low", "score": 10.5})).is_err());
        assert!(validate_assessment(&json!({"score": 10})).is_err());
    }
}
