//! Scorer trait and the local heuristic implementation.

use async_trait::async_trait;
use serde_json::{json, Value};
use wellmind_common::{scoring, RiskAssessment, Submission};

/// Message embedded in the fallback result when the delegate fails.
pub const FALLBACK_ERROR: &str = "AI backend error";

/// Outcome of scoring one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// Computed by the local heuristic.
    Local(RiskAssessment),
    /// Returned by the remote delegate. Unchecked unless the delegate is strict.
    Delegated(Value),
    /// The delegate could not be reached or returned something unreadable.
    Fallback,
}

impl Prediction {
    /// The JSON body returned to the caller.
    pub fn to_json(&self) -> Value {
        match self {
            Prediction::Local(a) => json!({ "risk": a.risk, "score": a.score }),
            Prediction::Delegated(v) => v.clone(),
            Prediction::Fallback => json!({ "risk": "Unknown", "score": 0, "error": FALLBACK_ERROR }),
        }
    }

    /// `risk` field of the result, if it has one.
    pub fn risk(&self) -> Option<Value> {
        match self {
            Prediction::Local(a) => Some(json!(a.risk)),
            Prediction::Delegated(v) => v.get("risk").cloned(),
            Prediction::Fallback => Some(json!("Unknown")),
        }
    }

    /// `score` field of the result, if it has one.
    pub fn score(&self) -> Option<Value> {
        match self {
            Prediction::Local(a) => Some(json!(a.score)),
            Prediction::Delegated(v) => v.get("score").cloned(),
            Prediction::Fallback => Some(json!(0)),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Prediction::Fallback)
    }
}

#[async_trait]
pub trait RiskScorer: Send + Sync {
    /// Score an untyped submission body. Never fails: errors degrade to
    /// [`Prediction::Fallback`].
    async fn predict(&self, body: &Value) -> Prediction;
    fn backend(&self) -> &str;
    fn is_local(&self) -> bool;
}

/// Hours/stress linear heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalHeuristic;

#[async_trait]
impl RiskScorer for LocalHeuristic {
    async fn predict(&self, body: &Value) -> Prediction {
        let submission = Submission::from_json(body);
        let assessment = scoring::assess(&submission);
        tracing::debug!(
            work_hours = submission.work_hours,
            stress = submission.stress,
            score = assessment.score,
            "scored submission locally"
        );
        Prediction::Local(assessment)
    }

    fn backend(&self) -> &str { "local" }
    fn is_local(&self) -> bool { true }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wellmind_common::RiskLevel;

    #[tokio::test]
    async fn test_local_heuristic_jane_fixture() {
        let p = LocalHeuristic
            .predict(&json!({"name": "Jane", "work_hours": 45, "stress": 6}))
            .await;
        assert_eq!(p, Prediction::Local(RiskAssessment { risk: RiskLevel::High, score: 86 }));
        assert_eq!(p.to_json(), json!({"risk": "High", "score": 86}));
    }

    #[tokio::test]
    async fn test_local_heuristic_defaults() {
        let p = LocalHeuristic.predict(&json!({"name": "Sam"})).await;
        assert_eq!(p.to_json(), json!({"risk": "High", "score": 75}));
    }

    #[test]
    fn test_fallback_shape_is_exact() {
        assert_eq!(
            Prediction::Fallback.to_json(),
            json!({"risk": "Unknown", "score": 0, "error": "AI backend error"})
        );
    }

    #[test]
    fn test_delegated_fields_are_read_loosely() {
        let p = Prediction::Delegated(json!({"risk": "Critical", "confidence": 0.4}));
        assert_eq!(p.risk(), Some(json!("Critical")));
        assert_eq!(p.score(), None);

        let not_an_object = Prediction::Delegated(json!("oops"));
        assert_eq!(not_an_object.risk(), None);
        assert_eq!(not_an_object.to_json(), json!("oops"));
    }
}
