use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};
use wellmind_common::Submission;
use wellmind_config::AppConfig;

use crate::delegate::RemoteDelegate;
use crate::notifier::{NotificationPayload, Notifier, NotifyError};
use crate::scorer::{LocalHeuristic, Prediction, RiskScorer};

/// Scores a submission and fans the result out to the notification routes.
#[derive(Clone)]
pub struct PredictionService {
    scorer: Arc<dyn RiskScorer>,
    notifier: Notifier,
}

impl PredictionService {
    pub fn new(scorer: Arc<dyn RiskScorer>, notifier: Notifier) -> Self {
        Self { scorer, notifier }
    }

    /// Delegate when `delegate.url` is set, local heuristic otherwise.
    pub fn from_config(config: &AppConfig, client: reqwest::Client) -> Self {
        let scorer: Arc<dyn RiskScorer> = match &config.delegate.url {
            Some(url) => {
                info!("Using AI backend at {} (strict: {})", url, config.delegate.strict);
                Arc::new(RemoteDelegate::new(url.clone(), client.clone()).with_strict(config.delegate.strict))
            }
            None => {
                info!("AI_BACKEND_URL not set, using local heuristic");
                Arc::new(LocalHeuristic)
            }
        };
        Self::new(scorer, Notifier::from_config(config, client))
    }

    /// Score `body` and notify. Notification failures are logged, never returned.
    pub async fn predict(&self, body: &Value) -> Prediction {
        let prediction = self.scorer.predict(body).await;
        let name = Submission::from_json(body).name;
        let payload = NotificationPayload::for_prediction(name, &prediction);
        match self.notify(payload).await {
            Ok(()) => {}
            Err(NotifyError::QueueFull) => warn!("notification queue full, dropping notification"),
            Err(e) => error!("post processing error: {}", e),
        }
        prediction
    }

    pub async fn notify(&self, payload: NotificationPayload) -> Result<(), NotifyError> {
        self.notifier.notify(payload).await
    }

    pub fn scorer(&self) -> &dyn RiskScorer {
        self.scorer.as_ref()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use wellmind_config::DispatchMode;
    use wellmind_test_utils::{refused_url, spawn_delegate, spawn_sinks, wait_for};

    fn config(delegate: Option<String>, public_url: String, mode: DispatchMode) -> AppConfig {
        let mut config = AppConfig::default();
        config.delegate.url = delegate;
        config.server.public_url = public_url;
        config.notify.mode = mode;
        config
    }

    #[tokio::test]
    async fn test_local_prediction_notifies_inline() {
        let (base, calls) = spawn_sinks(Duration::ZERO).await;
        let service = PredictionService::from_config(
            &config(None, base, DispatchMode::Inline),
            reqwest::Client::new(),
        );
        assert!(service.scorer().is_local());

        let p = service.predict(&json!({"name": "Jane", "work_hours": 45, "stress": 6})).await;
        assert_eq!(p.to_json(), json!({"risk": "High", "score": 86}));

        let calls = calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, json!({"name": "Jane", "risk": "High", "score": 86}));
    }

    #[tokio::test]
    async fn test_delegate_failure_still_notifies_fallback() {
        let (base, calls) = spawn_sinks(Duration::ZERO).await;
        let service = PredictionService::from_config(
            &config(Some(refused_url().await), base, DispatchMode::Background),
            reqwest::Client::new(),
        );
        assert!(!service.scorer().is_local());

        let p = service.predict(&json!({"name": "Ali"})).await;
        assert_eq!(p.to_json(), json!({"risk": "Unknown", "score": 0, "error": "AI backend error"}));

        let delivered = wait_for(&calls, 2).await;
        assert_eq!(delivered[0].1, json!({"name": "Ali", "risk": "Unknown", "score": 0}));
    }

    #[tokio::test]
    async fn test_unreachable_sinks_do_not_change_result() {
        let service = PredictionService::from_config(
            &config(None, refused_url().await, DispatchMode::Inline),
            reqwest::Client::new(),
        );
        let p = service.predict(&json!({"work_hours": 40, "stress": 5})).await;
        assert_eq!(p.to_json(), json!({"risk": "High", "score": 75}));
    }

    #[tokio::test]
    async fn test_full_queue_does_not_change_result() {
        let mut cfg = config(None, refused_url().await, DispatchMode::Background);
        cfg.notify.queue_capacity = 1;
        let service = PredictionService::from_config(&cfg, reqwest::Client::new());
        for _ in 0..3 {
            let p = service.predict(&json!({"work_hours": 45, "stress": 6})).await;
            assert_eq!(p.to_json(), json!({"risk": "High", "score": 86}));
        }
    }

    #[tokio::test]
    async fn test_delegate_result_supersedes_local_scoring() {
        let (base, _calls) = spawn_sinks(Duration::ZERO).await;
        let url = spawn_delegate(StatusCode::OK, r#"{"risk":"Low","score":3}"#).await;
        let service = PredictionService::from_config(
            &config(Some(url), base, DispatchMode::Inline),
            reqwest::Client::new(),
        );
        let p = service.predict(&json!({"work_hours": 90, "stress": 10})).await;
        assert_eq!(p.to_json(), json!({"risk": "Low", "score": 3}));
    }
}
