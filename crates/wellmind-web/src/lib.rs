//! wellmind-web: HTTP front end for WellMind.
//! Provides:
//!   - Landing page with the burnout intake form
//!   - Prediction endpoint with Watson/Hedera fan-out
//!   - Survey intake and HR dashboard API
//!   - HR dashboard page and live event stream

pub mod router;
pub mod extract;
pub mod handlers;
pub mod state;
pub mod sse;
pub mod templates;
