//! Scan history: scores each run, tracks trust trends, and records parameter changes.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{DomainError, DomainName, RunId, ScanEvent, ScanOverview, ScanRecord};
pub use repository::{RepositoryError, ScanRepository};
pub use router::scan_router;
pub use service::{ScanService, ScanServiceError};
