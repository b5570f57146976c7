//! HTTP handlers for all web routes.

pub mod pages;
pub mod health;
pub mod predict;
pub mod notify;
pub mod survey;
pub mod dashboard;
