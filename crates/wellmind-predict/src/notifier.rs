//! Post-prediction fan-out to the Watson and Hedera routes.
//!
//! Each payload is POSTed to `{base}/api/watson`, then `{base}/api/hedera`.
//! The calls are sequential and a transport failure on the first skips the
//! second. Response status and body are ignored.
//!
//! In `Inline` mode the caller awaits delivery. In `Background` mode payloads
//! are pushed onto a bounded queue drained by one worker task; a full queue
//! drops the payload. The worker exits once every sender is gone, after
//! delivering what is still queued, so shutdown can await it via
//! [`Notifier::take_worker`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use wellmind_config::{AppConfig, DispatchMode};

use crate::scorer::Prediction;

pub const NOTIFY_ROUTES: [&str; 2] = ["/api/watson", "/api/hedera"];

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery to {route} failed: {source}")]
    Delivery {
        route: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("notification queue is full")]
    QueueFull,
    #[error("notification worker has stopped")]
    WorkerStopped,
}

/// Body sent to both notification routes. Absent fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Value>,
}

impl NotificationPayload {
    pub fn for_prediction(name: Option<String>, prediction: &Prediction) -> Self {
        Self { name, risk: prediction.risk(), score: prediction.score() }
    }
}

#[derive(Clone)]
struct Delivery {
    client: reqwest::Client,
    base_url: String,
}

impl Delivery {
    async fn deliver(&self, payload: &NotificationPayload) -> Result<(), NotifyError> {
        for route in NOTIFY_ROUTES {
            let url = format!("{}{}", self.base_url, route);
            let resp = self
                .client
                .post(&url)
                .json(payload)
                .send()
                .await
                .map_err(|source| NotifyError::Delivery { route, source })?;
            debug!("{} answered {}", url, resp.status());
        }
        Ok(())
    }
}

#[derive(Clone)]
enum Dispatch {
    Inline(Delivery),
    Background(mpsc::Sender<NotificationPayload>),
}

#[derive(Clone)]
pub struct Notifier {
    dispatch: Dispatch,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Notifier {
    pub fn inline(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let delivery = Delivery { client, base_url: base_url.into() };
        Self { dispatch: Dispatch::Inline(delivery), worker: Arc::default() }
    }

    /// Start a delivery worker. It runs until every clone of the returned
    /// notifier is dropped. Must be called inside a Tokio runtime.
    pub fn background(client: reqwest::Client, base_url: impl Into<String>, capacity: usize) -> Self {
        let delivery = Delivery { client, base_url: base_url.into() };
        let (tx, rx) = mpsc::channel(capacity);
        let worker = tokio::spawn(run_worker(rx, delivery));
        Self {
            dispatch: Dispatch::Background(tx),
            worker: Arc::new(Mutex::new(Some(worker))),
        }
    }

    pub fn from_config(config: &AppConfig, client: reqwest::Client) -> Self {
        let base_url = config.notify_base_url().to_string();
        match config.notify.mode {
            DispatchMode::Inline => Self::inline(client, base_url),
            DispatchMode::Background => Self::background(client, base_url, config.notify.queue_capacity),
        }
    }

    /// Handle of the background worker, the first time it is asked for.
    /// Always `None` in inline mode.
    pub fn take_worker(&self) -> Option<JoinHandle<()>> {
        self.worker.lock().ok().and_then(|mut worker| worker.take())
    }

    pub fn mode(&self) -> DispatchMode {
        match self.dispatch {
            Dispatch::Inline(_) => DispatchMode::Inline,
            Dispatch::Background(_) => DispatchMode::Background,
        }
    }

    /// Deliver (inline) or enqueue (background) one payload.
    pub async fn notify(&self, payload: NotificationPayload) -> Result<(), NotifyError> {
        match &self.dispatch {
            Dispatch::Inline(delivery) => delivery.deliver(&payload).await,
            Dispatch::Background(tx) => tx.try_send(payload).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => NotifyError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => NotifyError::WorkerStopped,
            }),
        }
    }
}

async fn run_worker(mut rx: mpsc::Receiver<NotificationPayload>, delivery: Delivery) {
    let mut delivered = 0usize;
    while let Some(payload) = rx.recv().await {
        match delivery.deliver(&payload).await {
            Ok(()) => delivered += 1,
            Err(e) => warn!("post processing error: {}", e),
        }
    }
    info!(delivered, "notification worker stopped");
}
