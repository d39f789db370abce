use metrics_exporter_prometheus::PrometheusHandle;
use sitetrust::config::{ConfigError, ScoringSettings};
use sitetrust::error::AppError;
use sitetrust::scans::{DomainName, RepositoryError, RunId, ScanEvent, ScanRecord, ScanRepository};
use sitetrust::scoring::ScoringEngine;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local scan history; every run is kept, newest last.
#[derive(Default, Clone)]
pub(crate) struct InMemoryScanRepository {
    runs: Arc<Mutex<HashMap<DomainName, Vec<ScanRecord>>>>,
}

impl ScanRepository for InMemoryScanRepository {
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

pub(crate) fn scoring_engine(settings: &ScoringSettings) -> Result<ScoringEngine, AppError> {
    let tables = settings.load_tables()?;
    let engine = ScoringEngine::try_new(tables).map_err(ConfigError::from)?;
    Ok(engine.with_top_risk_limit(settings.top_risks))
}
