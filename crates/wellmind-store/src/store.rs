//! Shared in-memory repository of employees and their burnout results.

use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;
use wellmind_common::{error::Result, RiskAssessment, RiskLevel, WellmindError};

use crate::models::{
    mean1, round1, BurnoutResult, DashboardSummary, DepartmentStat, Employee, EmployeeRow,
    ResultView, SummaryStats, DEFAULT_DEPARTMENT, STATUS_PENDING,
};

/// Most recent results listed on the dashboard.
pub const RECENT_LIMIT: usize = 50;

#[derive(Default)]
struct Inner {
    employees: Vec<Employee>,
    /// Append-only, so insertion order is chronological.
    results: Vec<BurnoutResult>,
    next_employee_id: u64,
    next_result_id: u64,
}

impl Inner {
    fn employee(&self, id: u64) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    fn result_mut(&mut self, id: u64) -> Option<&mut BurnoutResult> {
        self.results.iter_mut().find(|r| r.id == id)
    }

    fn latest_for(&self, employee_id: u64) -> Option<&BurnoutResult> {
        self.results.iter().rev().find(|r| r.employee_id == employee_id)
    }
}

#[derive(Default)]
pub struct SurveyStore {
    inner: RwLock<Inner>,
}

impl SurveyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the employee with `email`, or create one. Returns the employee and
    /// whether it was created. Existing records are not modified.
    pub async fn upsert_employee(
        &self,
        name: &str,
        department: Option<&str>,
        email: &str,
    ) -> (Employee, bool) {
        let email = email.trim();
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.employees.iter().find(|e| e.email == email) {
            return (existing.clone(), false);
        }

        inner.next_employee_id += 1;
        let employee = Employee {
            id: inner.next_employee_id,
            name: name.trim().to_string(),
            department: department
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .unwrap_or(DEFAULT_DEPARTMENT)
                .to_string(),
            email: email.to_string(),
        };
        debug!("registered employee {} ({})", employee.id, employee.email);
        inner.employees.push(employee.clone());
        (employee, true)
    }

    pub async fn employee(&self, id: u64) -> Option<Employee> {
        self.inner.read().await.employee(id).cloned()
    }

    /// Store a scored survey for an existing employee with status `pending`.
    pub async fn record_result(
        &self,
        employee_id: u64,
        assessment: RiskAssessment,
        work_hours: f64,
        stress_level: f64,
    ) -> Result<BurnoutResult> {
        let mut inner = self.inner.write().await;
        if inner.employee(employee_id).is_none() {
            return Err(WellmindError::EmployeeNotFound(employee_id));
        }

        inner.next_result_id += 1;
        let result = BurnoutResult {
            id: inner.next_result_id,
            employee_id,
            risk_score: assessment.score,
            label: assessment.risk,
            work_hours,
            stress_level,
            timestamp: Utc::now(),
            ledger_txid: None,
            orchestrate_status: STATUS_PENDING.to_string(),
        };
        inner.results.push(result.clone());
        Ok(result)
    }

    pub async fn result_view(&self, id: u64) -> Option<ResultView> {
        let inner = self.inner.read().await;
        let result = inner.results.iter().find(|r| r.id == id)?;
        Some(ResultView::new(result, inner.employee(result.employee_id)))
    }

    pub async fn set_ledger_txid(&self, result_id: u64, txid: String) -> Result<()> {
        let mut inner = self.inner.write().await;
        let result = inner
            .result_mut(result_id)
            .ok_or(WellmindError::ResultNotFound(result_id))?;
        result.ledger_txid = Some(txid);
        Ok(())
    }

    /// Returns false when no such result exists.
    pub async fn set_orchestrate_status(&self, result_id: u64, status: &str) -> bool {
        let mut inner = self.inner.write().await;
        match inner.result_mut(result_id) {
            Some(result) => {
                result.orchestrate_status = status.to_string();
                true
            }
            None => false,
        }
    }

    pub async fn dashboard(&self) -> DashboardSummary {
        let inner = self.inner.read().await;
        let results = &inner.results;

        let count_of = |level: RiskLevel| results.iter().filter(|r| r.label == level).count();
        let summary = SummaryStats {
            total_employees: inner.employees.len(),
            total_surveys: results.len(),
            high_risk_count: count_of(RiskLevel::High),
            medium_risk_count: count_of(RiskLevel::Medium),
            low_risk_count: count_of(RiskLevel::Low),
            average_risk: mean1(results.iter().map(|r| r.risk_score as f64)),
            average_hours: mean1(results.iter().map(|r| r.work_hours)),
            average_stress: mean1(results.iter().map(|r| r.stress_level)),
        };

        let mut by_department: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
        for result in results {
            let department = inner
                .employee(result.employee_id)
                .map_or(DEFAULT_DEPARTMENT, |e| e.department.as_str());
            let entry = by_department.entry(department).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += result.risk_score as f64;
        }
        let departments = by_department
            .into_iter()
            .map(|(department, (count, sum))| DepartmentStat {
                department: department.to_string(),
                count,
                avg_risk: round1(sum / count as f64),
            })
            .collect();

        let recent_submissions = results
            .iter()
            .rev()
            .take(RECENT_LIMIT)
            .map(|r| ResultView::new(r, inner.employee(r.employee_id)))
            .collect();

        DashboardSummary { summary, departments, recent_submissions }
    }

    pub async fn employee_rows(&self) -> Vec<EmployeeRow> {
        let inner = self.inner.read().await;
        inner
            .employees
            .iter()
            .map(|e| EmployeeRow::new(e, inner.latest_for(e.id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::STATUS_TRIGGERED;
    use pretty_assertions::assert_eq;
    use wellmind_common::scoring;

    async fn seeded() -> SurveyStore {
        let store = SurveyStore::new();
        let (jane, _) = store.upsert_employee("Jane", Some("Engineering"), "jane@corp.io").await;
        let (omar, _) = store.upsert_employee("Omar", Some("Sales"), "omar@corp.io").await;
        store.upsert_employee("Lee", None, "lee@corp.io").await;

        store.record_result(jane.id, scoring::score(45.0, 6.0), 45.0, 6.0).await.unwrap(); // 86 High
        store.record_result(omar.id, scoring::score(40.0, 5.0), 40.0, 5.0).await.unwrap(); // 75 High
        store.record_result(jane.id, scoring::score(20.0, 2.0), 20.0, 2.0).await.unwrap(); // 35 Low
        store
    }

    #[tokio::test]
    async fn test_upsert_finds_existing_by_email() {
        let store = SurveyStore::new();
        let (first, created) = store.upsert_employee("Jane", Some("Ops"), "jane@corp.io").await;
        assert!(created);
        let (again, created) = store.upsert_employee("Jane D.", Some("HR"), " jane@corp.io ").await;
        assert!(!created);
        assert_eq!(again, first);
    }

    #[tokio::test]
    async fn test_blank_department_defaults_to_general() {
        let store = SurveyStore::new();
        let (e, _) = store.upsert_employee("Lee", Some("  "), "lee@corp.io").await;
        assert_eq!(e.department, "General");
    }

    #[tokio::test]
    async fn test_record_result_requires_employee() {
        let store = SurveyStore::new();
        let err = store.record_result(9, scoring::score(40.0, 5.0), 40.0, 5.0).await;
        assert!(matches!(err, Err(WellmindError::EmployeeNotFound(9))));
    }

    #[tokio::test]
    async fn test_dashboard_summary() {
        let dashboard = seeded().await.dashboard().await;
        let s = &dashboard.summary;
        assert_eq!(s.total_employees, 3);
        assert_eq!(s.total_surveys, 3);
        assert_eq!((s.high_risk_count, s.medium_risk_count, s.low_risk_count), (2, 0, 1));
        assert_eq!(s.average_risk, 65.3);
        assert_eq!(s.average_hours, 35.0);
        assert_eq!(s.average_stress, 4.3);
    }

    #[tokio::test]
    async fn test_dashboard_departments_sorted_by_name() {
        let dashboard = seeded().await.dashboard().await;
        assert_eq!(
            dashboard.departments,
            vec![
                DepartmentStat { department: "Engineering".into(), count: 2, avg_risk: 60.5 },
                DepartmentStat { department: "Sales".into(), count: 1, avg_risk: 75.0 },
            ]
        );
    }

    #[tokio::test]
    async fn test_recent_submissions_newest_first() {
        let dashboard = seeded().await.dashboard().await;
        let ids: Vec<u64> = dashboard.recent_submissions.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(dashboard.recent_submissions[0].employee_name, "Jane");
        assert_eq!(dashboard.recent_submissions[0].department, "Engineering");
    }

    #[tokio::test]
    async fn test_recent_submissions_capped() {
        let store = SurveyStore::new();
        let (e, _) = store.upsert_employee("Jane", None, "jane@corp.io").await;
        for _ in 0..(RECENT_LIMIT + 5) {
            store.record_result(e.id, scoring::score(40.0, 5.0), 40.0, 5.0).await.unwrap();
        }
        let dashboard = store.dashboard().await;
        assert_eq!(dashboard.recent_submissions.len(), RECENT_LIMIT);
        assert_eq!(dashboard.summary.total_surveys, RECENT_LIMIT + 5);
    }

    #[tokio::test]
    async fn test_empty_dashboard_has_zero_averages() {
        let dashboard = SurveyStore::new().dashboard().await;
        assert_eq!(dashboard, DashboardSummary::default());
    }

    #[tokio::test]
    async fn test_employee_rows_use_latest_result() {
        let store = seeded().await;
        store.set_ledger_txid(3, "0.0.3-abcdef01".into()).await.unwrap();
        let rows = store.employee_rows().await;

        assert_eq!(rows[0].name, "Jane");
        assert_eq!(rows[0].latest_risk_score, Some(35));
        assert_eq!(rows[0].latest_risk_label, "Low");
        assert!(rows[0].ledger_verified);

        assert_eq!(rows[1].latest_risk_label, "High");
        assert!(!rows[1].ledger_verified);

        assert_eq!(rows[2].latest_risk_label, "N/A");
        assert_eq!(rows[2].latest_risk_score, None);
        assert_eq!(rows[2].last_submission, None);
    }

    #[tokio::test]
    async fn test_orchestrate_status_updates() {
        let store = seeded().await;
        assert_eq!(store.result_view(1).await.unwrap().orchestrate_status, "pending");
        assert!(store.set_orchestrate_status(1, STATUS_TRIGGERED).await);
        assert_eq!(store.result_view(1).await.unwrap().orchestrate_status, "triggered");
        assert!(!store.set_orchestrate_status(99, "done").await);
    }
}
