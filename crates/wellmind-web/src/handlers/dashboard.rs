//! HR dashboard data: aggregate summary and per-employee status.

use axum::{extract::State, Json};
use wellmind_store::{DashboardSummary, EmployeeRow};
use crate::state::SharedState;

/// GET /api/dashboard
pub async fn api_dashboard(State(state): State<SharedState>) -> Json<DashboardSummary> {
    Json(state.store.dashboard().await)
}

/// GET /api/employees
pub async fn api_employees(State(state): State<SharedState>) -> Json<Vec<EmployeeRow>> {
    Json(state.store.employee_rows().await)
}
