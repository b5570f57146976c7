//! wellmind-common: Shared types, errors, and the burnout scoring heuristic
//! used across all WellMind crates.

pub mod error;
pub mod assessment;
pub mod scoring;

// Re-export commonly used types
pub use assessment::{RiskLevel, RiskAssessment, Submission};
pub use error::{ApiError, WellmindError};
