//! Survey submissions and the risk assessments derived from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Weekly hours assumed when the submission carries no usable value.
pub const DEFAULT_WORK_HOURS: f64 = 40.0;
/// Stress level (1 to 10) assumed when the submission carries no usable value.
pub const DEFAULT_STRESS: f64 = 5.0;

/// Score at or above which a submission is labelled High.
pub const HIGH_THRESHOLD: i64 = 70;
/// Score at or above which a submission is labelled Medium.
pub const MEDIUM_THRESHOLD: i64 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: i64) -> Self {
        if score >= HIGH_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(RiskLevel::Low),
            "Medium" => Ok(RiskLevel::Medium),
            "High" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk label: {}", other)),
        }
    }
}

/// The `{risk, score}` pair returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk: RiskLevel,
    pub score: i64,
}

/// One employee's reported hours and stress, after lenient coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub name: Option<String>,
    pub work_hours: f64,
    pub stress: f64,
}

impl Default for Submission {
    fn default() -> Self {
        Self { name: None, work_hours: DEFAULT_WORK_HOURS, stress: DEFAULT_STRESS }
    }
}

impl Submission {
    /// Build a submission from an untyped JSON body.
    ///
    /// Never fails: missing, zero, non-numeric or non-finite fields fall back
    /// to [`DEFAULT_WORK_HOURS`] and [`DEFAULT_STRESS`]. A body that is not an
    /// object yields the defaults.
    pub fn from_json(body: &Value) -> Self {
        Self {
            name: body.get("name").and_then(name_of),
            work_hours: number_or(body.get("work_hours"), DEFAULT_WORK_HOURS),
            stress: number_or(body.get("stress"), DEFAULT_STRESS),
        }
    }
}

fn name_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Coerce a JSON value to a number the way an HTML form field is read:
/// numbers pass through, strings are trimmed and parsed (empty is 0, and
/// unsigned `0x`/`0o`/`0b` literals are accepted), booleans are 0/1 and
/// null is 0. Returns `None` when nothing numeric can be read.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else if let Some(v) = parse_radix_literal(trimmed) {
                v
            } else {
                trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
            }
        }
        Value::Array(items) => match items.as_slice() {
            [] => Some(0.0),
            [single] => coerce_number(single),
            _ => None,
        },
        Value::Object(_) => None,
    }
}

/// `Some(parsed)` when `s` starts with a radix prefix, `None` otherwise.
/// A prefixed literal with no digits or a bad digit parses to `None`.
fn parse_radix_literal(s: &str) -> Option<Option<f64>> {
    let radix = match s.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &s[2..];
    if digits.is_empty() {
        return Some(None);
    }
    Some(digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    }))
}

/// Coerced value, or `default` when absent, invalid, zero or non-finite.
pub fn number_or(value: Option<&Value>, default: f64) -> f64 {
    value
        .and_then(coerce_number)
        .filter(|v| *v != 0.0 && v.is_finite())
        .unwrap_or(default)
}
