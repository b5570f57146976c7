//! Axum router: maps all URL paths to handlers.

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    pages::{landing_page, hr_page},
    health::health,
    predict::api_predict,
    notify::{api_watson, api_hedera},
    survey::{api_survey, api_analyze, api_orchestrate_callback},
    dashboard::{api_dashboard, api_employees},
};
use crate::sse::sse_handler;

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/",   get(landing_page))
        .route("/hr", get(hr_page))

        // Prediction and its notification sinks
        .route("/api/predict", post(api_predict))
        .route("/api/watson",  post(api_watson))
        .route("/api/hedera",  post(api_hedera))

        // Survey intake and dashboard data
        .route("/api/health",               get(health))
        .route("/api/survey",               post(api_survey))
        .route("/api/analyze",              post(api_analyze))
        .route("/api/orchestrate/callback", post(api_orchestrate_callback))
        .route("/api/dashboard",            get(api_dashboard))
        .route("/api/employees",            get(api_employees))

        // SSE streaming
        .route("/api/events", get(sse_handler))

        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(shared)
}
