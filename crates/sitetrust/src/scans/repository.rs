use super::domain::{DomainName, RunId, ScanEvent, ScanRecord};

/// Storage abstraction for scan runs so the service can be exercised in isolation.
pub trait ScanRepository: Send + Sync {
    fn save_run(&self, record: ScanRecord) -> Result<RunId, RepositoryError>;
    fn latest_run(&self, domain: &DomainName) -> Result<Option<ScanRecord>, RepositoryError>;
    /// Change events for a domain, newest first.
    fn timeline(&self, domain: &DomainName) -> Result<Vec<ScanEvent>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("run already recorded")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
