//! Stored records and the read-only projections served to the HR dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wellmind_common::RiskLevel;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_TRIGGERED: &str = "triggered";
pub const STATUS_FAILED: &str = "failed";

pub const DEFAULT_DEPARTMENT: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    pub department: String,
    /// Unique per employee.
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnoutResult {
    pub id: u64,
    pub employee_id: u64,
    pub risk_score: i64,
    pub label: RiskLevel,
    pub work_hours: f64,
    pub stress_level: f64,
    pub timestamp: DateTime<Utc>,
    pub ledger_txid: Option<String>,
    pub orchestrate_status: String,
}

/// A result joined with its employee, as listed under recent submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultView {
    pub id: u64,
    pub employee_id: u64,
    pub employee_name: String,
    pub department: String,
    pub risk_score: i64,
    pub label: RiskLevel,
    pub work_hours: f64,
    pub stress_level: f64,
    pub timestamp: DateTime<Utc>,
    pub ledger_txid: Option<String>,
    pub orchestrate_status: String,
}

impl ResultView {
    pub fn new(result: &BurnoutResult, employee: Option<&Employee>) -> Self {
        Self {
            id: result.id,
            employee_id: result.employee_id,
            employee_name: employee.map(|e| e.name.clone()).unwrap_or_else(|| "Unknown".to_string()),
            department: employee
                .map(|e| e.department.clone())
                .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string()),
            risk_score: result.risk_score,
            label: result.label,
            work_hours: result.work_hours,
            stress_level: result.stress_level,
            timestamp: result.timestamp,
            ledger_txid: result.ledger_txid.clone(),
            orchestrate_status: result.orchestrate_status.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_employees: usize,
    pub total_surveys: usize,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub low_risk_count: usize,
    pub average_risk: f64,
    pub average_hours: f64,
    pub average_stress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentStat {
    pub department: String,
    /// Number of surveys from this department.
    pub count: usize,
    pub avg_risk: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub summary: SummaryStats,
    pub departments: Vec<DepartmentStat>,
    pub recent_submissions: Vec<ResultView>,
}

/// One line of the employee table: the employee plus their latest result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRow {
    pub id: u64,
    pub name: String,
    pub department: String,
    pub email: String,
    pub latest_risk_score: Option<i64>,
    /// "N/A" when the employee has no result yet.
    pub latest_risk_label: String,
    pub work_hours: Option<f64>,
    pub stress_level: Option<f64>,
    pub last_submission: Option<DateTime<Utc>>,
    pub ledger_verified: bool,
}

impl EmployeeRow {
    pub fn new(employee: &Employee, latest: Option<&BurnoutResult>) -> Self {
        Self {
            id: employee.id,
            name: employee.name.clone(),
            department: employee.department.clone(),
            email: employee.email.clone(),
            latest_risk_score: latest.map(|r| r.risk_score),
            latest_risk_label: latest
                .map(|r| r.label.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            work_hours: latest.map(|r| r.work_hours),
            stress_level: latest.map(|r| r.stress_level),
            last_submission: latest.map(|r| r.timestamp),
            ledger_verified: latest.map_or(false, |r| r.ledger_txid.is_some()),
        }
    }
}

/// Round to one decimal place.
pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Mean of `values`, rounded to one decimal; 0 when empty.
pub(crate) fn mean1(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { 0.0 } else { round1(sum / n as f64) }
}
