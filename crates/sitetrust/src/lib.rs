//! Website trust scoring: risk aggregation, verdicts, remediation decisions, and scan history.

pub mod config;
pub mod error;
pub mod scans;
pub mod scoring;
pub mod telemetry;
