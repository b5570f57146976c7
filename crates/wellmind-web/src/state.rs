//! Shared application state for the web server.

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use wellmind_common::WellmindError;
use wellmind_config::AppConfig;
use wellmind_predict::{build_http_client, PredictionService};
use wellmind_store::SurveyStore;

/// Events pushed to connected clients via SSE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// A submission was scored through /api/predict
    RiskScored { name: Option<String>, risk: Option<Value>, score: Option<Value> },
    /// The Watson route received a notification
    WatsonNotified { name: Option<String>, action: String },
    /// A ledger receipt was issued
    LedgerRecorded { name: Option<String>, tx_id: String },
    /// A survey was scored and stored
    SurveyAnalyzed { result_id: u64, employee_id: u64, label: String, score: i64 },
    /// A workflow callback changed a result's status
    OrchestrateUpdated { result_id: u64, status: String },
}

impl AppEvent {
    /// Same as the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            AppEvent::RiskScored { .. } => "risk_scored",
            AppEvent::WatsonNotified { .. } => "watson_notified",
            AppEvent::LedgerRecorded { .. } => "ledger_recorded",
            AppEvent::SurveyAnalyzed { .. } => "survey_analyzed",
            AppEvent::OrchestrateUpdated { .. } => "orchestrate_updated",
        }
    }
}

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub config: AppConfig,
    pub predictions: PredictionService,
    pub store: SurveyStore,
    pub templates: minijinja::Environment<'static>,
    /// Broadcast channel for SSE push events
    pub event_tx: broadcast::Sender<AppEvent>,
}

impl AppState {
    pub fn new(config: AppConfig, predictions: PredictionService) -> Result<Self, WellmindError> {
        let templates = crate::templates::environment().map_err(anyhow::Error::new)?;
        let (event_tx, _) = broadcast::channel(256);
        Ok(Self { config, predictions, store: SurveyStore::new(), templates, event_tx })
    }

    /// Build the outbound client and prediction service from `config`.
    /// Starts the notification worker in background mode, so it must run
    /// inside a Tokio runtime.
    pub fn from_config(config: AppConfig) -> Result<Self, WellmindError> {
        let client = build_http_client(config.http_timeout())?;
        let predictions = PredictionService::from_config(&config, client);
        Self::new(config, predictions)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.event_tx.subscribe()
    }

    /// Broadcast `event`. Having no subscribers is not an error.
    pub fn publish(&self, event: AppEvent) {
        let _ = self.event_tx.send(event);
    }
}

pub type SharedState = Arc<AppState>;
