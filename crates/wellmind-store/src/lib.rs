//! wellmind-store: In-memory employee and burnout-result records.
//!
//! Modules:
//!   models: records and the dashboard projections built from them
//!   store: `SurveyStore`, the shared repository
//!   ledger: simulated audit-ledger receipts

pub mod models;
pub mod store;
pub mod ledger;

pub use models::{BurnoutResult, DashboardSummary, Employee, EmployeeRow, ResultView};
pub use store::SurveyStore;
