//! Local HTTP doubles shared by the WellMind crate tests: notification
//! sinks, AI backends, and an address nothing listens on.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// `(route, body)` pairs recorded by a double, in arrival order.
pub type Calls = Arc<Mutex<Vec<(String, Value)>>>;

/// Serve `app` on an ephemeral port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nothing is listening on.
pub async fn refused_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Watson and Hedera sinks that record every body they receive.
/// `watson_delay` holds the Watson response back. Hedera answers 500, which
/// callers must still treat as delivered.
pub async fn spawn_sinks(watson_delay: Duration) -> (String, Calls) {
    let calls: Calls = Arc::default();
    let app = Router::new()
        .route(
            "/api/watson",
            post(move |State(calls): State<Calls>, Json(body): Json<Value>| async move {
                tokio::time::sleep(watson_delay).await;
                calls.lock().unwrap().push(("watson".to_string(), body));
                StatusCode::OK
            }),
        )
        .route(
            "/api/hedera",
            post(|State(calls): State<Calls>, Json(body): Json<Value>| async move {
                calls.lock().unwrap().push(("hedera".to_string(), body));
                StatusCode::INTERNAL_SERVER_ERROR
            }),
        )
        .with_state(calls.clone());
    (serve(app).await, calls)
}

/// An AI backend answering every POST with `status` and the raw `body`.
pub async fn spawn_delegate(status: StatusCode, body: &'static str) -> String {
    spawn_slow_delegate(Duration::ZERO, status, body).await
}

/// Like [`spawn_delegate`], but each answer is held back for `delay`.
pub async fn spawn_slow_delegate(delay: Duration, status: StatusCode, body: &'static str) -> String {
    let app = Router::new().route(
        "/predict",
        post(move || async move {
            tokio::time::sleep(delay).await;
            (status, [("content-type", "application/json")], body)
        }),
    );
    format!("{}/predict", serve(app).await)
}

/// An AI backend that records each request body and answers with `reply`.
pub async fn spawn_recording_delegate(reply: Value) -> (String, Calls) {
    let calls: Calls = Arc::default();
    let app = Router::new()
        .route(
            "/predict",
            post(move |State(calls): State<Calls>, Json(body): Json<Value>| {
                let reply = reply.clone();
                async move {
                    calls.lock().unwrap().push(("delegate".to_string(), body));
                    Json(reply)
                }
            }),
        )
        .with_state(calls.clone());
    (format!("{}/predict", serve(app).await), calls)
}

/// Wait until at least `n` calls were recorded, or two seconds pass.
pub async fn wait_for(calls: &Calls, n: usize) -> Vec<(String, Value)> {
    for _ in 0..100 {
        if calls.lock().unwrap().len() >= n {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    calls.lock().unwrap().clone()
}
