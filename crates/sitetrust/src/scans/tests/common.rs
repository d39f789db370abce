use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::scans::domain::{DomainName, RunId, ScanEvent, ScanRecord};
use crate::scans::repository::{RepositoryError, ScanRepository};
use crate::scans::{scan_router, ScanService};
use crate::scoring::{ParameterSet, ScoringEngine};

pub(super) fn risks(pairs: &[(&str, f64)]) -> ParameterSet {
    ParameterSet::from_risks(pairs.iter().copied()).expect("valid parameter risks")
}

pub(super) fn build_service() -> (ScanService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ScanService::new(repository.clone(), Arc::new(ScoringEngine::default()));
    (service, repository)
}

pub(super) fn router_with_service(service: ScanService<MemoryRepository>) -> axum::Router {
    scan_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) runs: Arc<Mutex<HashMap<DomainName, Vec<ScanRecord>>>>,
}

impl MemoryRepository {
    pub(super) fn run_count(&self, domain: &str) -> usize {
        let domain = DomainName::parse(domain).expect("valid domain");
        self.runs
            .lock()
            .expect("repository mutex poisoned")
            .get(&domain)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl ScanRepository for MemoryRepository {
    fn save_run(&self, record: ScanRecord) -> Result<RunId, RepositoryError> {
        let mut guard = self.runs.lock().expect("repository mutex poisoned");
        let runs = guard.entry(record.domain.clone()).or_default();
        if runs.iter().any(|run| run.run_id == record.run_id) {
            return Err(RepositoryError::Conflict);
        }
        let run_id = record.run_id.clone();
        runs.push(record);
        Ok(run_id)
    }

    fn latest_run(&self, domain: &DomainName) -> Result<Option<ScanRecord>, RepositoryError> {
        let guard = self.runs.lock().expect("repository mutex poisoned");
        Ok(guard.get(domain).and_then(|runs| runs.last().cloned()))
    }

    fn timeline(&self, domain: &DomainName) -> Result<Vec<ScanEvent>, RepositoryError> {
        let guard = self.runs.lock().expect("repository mutex poisoned");
        let events = guard
            .get(domain)
            .map(|runs| {
                runs.iter()
                    .rev()
                    .flat_map(|run| run.events.iter().rev().cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(events)
    }
}

pub(super) struct UnavailableRepository;

impl ScanRepository for UnavailableRepository {
    fn save_run(&self, _record: ScanRecord) -> Result<RunId, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest_run(&self, _domain: &DomainName) -> Result<Option<ScanRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn timeline(&self, _domain: &DomainName) -> Result<Vec<ScanEvent>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Accepts reads but refuses every write as a duplicate.
pub(super) struct ConflictRepository;

impl ScanRepository for ConflictRepository {
    fn save_run(&self, _record: ScanRecord) -> Result<RunId, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn latest_run(&self, _domain: &DomainName) -> Result<Option<ScanRecord>, RepositoryError> {
        Ok(None)
    }

    fn timeline(&self, _domain: &DomainName) -> Result<Vec<ScanEvent>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
