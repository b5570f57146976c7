//! wellmind-predict: Burnout risk prediction and notification fan-out.
//!
//! Scorers:
//!   LocalHeuristic: hours/stress linear heuristic
//!   RemoteDelegate: external AI backend reached over HTTP
//!
//! The `PredictionService` picks one scorer at construction, then hands each
//! result to the `Notifier`, which delivers `{name, risk, score}` to the
//! Watson and Hedera routes.

pub mod scorer;
pub mod delegate;
pub mod notifier;
pub mod service;

pub use scorer::{LocalHeuristic, Prediction, RiskScorer};
pub use delegate::RemoteDelegate;
pub use notifier::{NotificationPayload, Notifier, NotifyError};
pub use service::PredictionService;

use std::time::Duration;

/// Shared outbound HTTP client with the configured timeout.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}
