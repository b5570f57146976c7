//! Server-rendered pages: landing form and HR dashboard.

use axum::{extract::State, response::Html};
use minijinja::context;
use wellmind_common::ApiError;
use wellmind_config::DispatchMode;

use crate::state::SharedState;

fn render(state: &SharedState, name: &str, ctx: minijinja::Value) -> Result<Html<String>, ApiError> {
    state
        .templates
        .get_template(name)
        .and_then(|t| t.render(ctx))
        .map(Html)
        .map_err(|e| ApiError::internal(format!("template {}: {}", name, e)))
}

/// GET /
pub async fn landing_page(State(state): State<SharedState>) -> Result<Html<String>, ApiError> {
    let scorer = if state.predictions.scorer().is_local() { "local heuristic" } else { "AI backend" };
    let notify_mode = match state.predictions.notifier().mode() {
        DispatchMode::Inline => "inline",
        DispatchMode::Background => "background",
    };
    render(&state, "landing.html", context! { scorer, notify_mode })
}

/// GET /hr
pub async fn hr_page(State(state): State<SharedState>) -> Result<Html<String>, ApiError> {
    render(&state, "hr.html", context! {})
}
