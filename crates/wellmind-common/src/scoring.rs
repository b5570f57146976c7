//! Burnout risk heuristic.
//!
//! score = round((work_hours / 40) * 50 + (stress / 10) * 50)
//!
//! The score is not clamped: extreme or negative inputs can produce values
//! above 100 or below 0.

use crate::assessment::{RiskAssessment, RiskLevel, Submission};

/// Hours per week that contribute a full half of the score.
const BASELINE_HOURS: f64 = 40.0;
/// Stress level that contributes a full half of the score.
const MAX_STRESS: f64 = 10.0;
const COMPONENT_WEIGHT: f64 = 50.0;

/// Score an already-coerced pair of inputs.
///
/// The rounded value is cast with `as`, so a raw score outside the `i64`
/// range saturates at `i64::MAX`/`i64::MIN` and NaN becomes 0. Coerced
/// submissions are always finite, so only direct callers can hit this.
pub fn score(work_hours: f64, stress: f64) -> RiskAssessment {
    let raw = (work_hours / BASELINE_HOURS) * COMPONENT_WEIGHT
        + (stress / MAX_STRESS) * COMPONENT_WEIGHT;
    let score = round_half_up(raw) as i64;
    RiskAssessment { risk: RiskLevel::from_score(score), score }
}

pub fn assess(submission: &Submission) -> RiskAssessment {
    score(submission.work_hours, submission.stress)
}

/// Round to the nearest integer, ties toward positive infinity
/// (`-2.5` rounds to `-2`, `2.5` to `3`).
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}
