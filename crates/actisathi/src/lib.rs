//! Back-end logic for the ActiSathi civic platform: welfare-scheme eligibility
//! matching and civic issue report intake.

pub mod config;
pub mod error;
pub mod reports;
pub mod telemetry;
pub mod welfare;
