use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{DomainError, DomainName, RunId, ScanEvent, ScanOverview, ScanRecord};
use super::repository::{RepositoryError, ScanRepository};
use crate::scoring::{prioritize, Finding, ParameterSet, ScanOutcome, ScoringEngine, Severity};

/// Service composing the scoring engine with scan persistence.
///
/// Writes for one domain are serialized, so every recorded run is compared against the run
/// saved immediately before it.
pub struct ScanService<R> {
    repository: Arc<R>,
    engine: Arc<ScoringEngine>,
    domain_writes: Mutex<HashMap<DomainName, Arc<Mutex<()>>>>,
}

static RUN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_run_id() -> RunId {
    let id = RUN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RunId(format!("run-{id:06}"))
}

impl<R> ScanService<R>
where
    R: ScanRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: Arc<ScoringEngine>) -> Self {
        Self {
            repository,
            engine,
            domain_writes: Mutex::new(HashMap::new()),
        }
    }

    /// Stateless scoring; nothing is persisted.
    pub fn score(&self, parameters: &ParameterSet, trend_drop: i32) -> ScanOutcome {
        self.engine.score_with_trend(parameters, trend_drop)
    }

    /// Score a run against the previous one for the same domain and persist it.
    pub fn record_scan(
        &self,
        domain: &str,
        parameters: &ParameterSet,
    ) -> Result<ScanRecord, ScanServiceError> {
        let domain = DomainName::parse(domain)?;
        let write_lock = self.write_lock(&domain);
        // held until the run is saved
        let _write = write_lock.lock().expect("domain write lock poisoned");
        let previous = self.repository.latest_run(&domain)?;

        // trust score does not depend on the trend, only severity does
        let baseline = self.engine.score(parameters);
        let trend_drop = previous
            .as_ref()
            .map(|run| {
                (i32::from(run.summary.trust_score) - i32::from(baseline.summary.trust_score))
                    .max(0)
            })
            .unwrap_or(0);
        let outcome = if trend_drop > 0 {
            self.engine.score_with_trend(parameters, trend_drop)
        } else {
            baseline
        };

        let run_id = next_run_id();
        let events = previous
            .as_ref()
            .map(|run| detect_changes(&run_id, &run.findings, &outcome.findings))
            .unwrap_or_default();

        if trend_drop > 0 {
            warn!(
                domain = %domain,
                trend_drop,
                trust_score = outcome.summary.trust_score,
                "trust score dropped since previous run"
            );
        }

        let record = ScanRecord {
            run_id,
            domain,
            created_at: Utc::now(),
            trend_drop,
            summary: outcome.summary,
            findings: outcome.findings,
            decisions: prioritize(outcome.decisions),
            top_risks: outcome.top_risks,
            events,
        };

        self.repository.save_run(record.clone())?;
        info!(
            domain = %record.domain,
            run_id = %record.run_id,
            trust_score = record.summary.trust_score,
            verdict = record.summary.verdict.label(),
            changes = record.events.len(),
            "scan recorded"
        );

        Ok(record)
    }

    /// Most recent run for a domain.
    pub fn latest(&self, domain: &str) -> Result<ScanRecord, ScanServiceError> {
        let domain = DomainName::parse(domain)?;
        let record = self
            .repository
            .latest_run(&domain)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn overview(&self, domain: &str) -> Result<Option<ScanOverview>, ScanServiceError> {
        let domain = DomainName::parse(domain)?;
        let record = self.repository.latest_run(&domain)?;
        Ok(record.map(|record| record.overview()))
    }

    pub fn timeline(&self, domain: &str) -> Result<Vec<ScanEvent>, ScanServiceError> {
        let domain = DomainName::parse(domain)?;
        Ok(self.repository.timeline(&domain)?)
    }

    fn write_lock(&self, domain: &DomainName) -> Arc<Mutex<()>> {
        let mut locks = self.domain_writes.lock().expect("write lock table poisoned");
        locks.entry(domain.clone()).or_default().clone()
    }
}

/// One `MEDIUM` event per parameter present in both runs whose risk moved.
fn detect_changes(run_id: &RunId, previous: &[Finding], current: &[Finding]) -> Vec<ScanEvent> {
    let before: BTreeMap<&str, f64> = previous
        .iter()
        .map(|finding| (finding.parameter.as_str(), finding.risk))
        .collect();
    let recorded_at = Utc::now();

    current
        .iter()
        .filter_map(|finding| {
            let prior = *before.get(finding.parameter.as_str())?;
            (prior != finding.risk).then(|| ScanEvent {
                run_id: run_id.clone(),
                change: format!(
                    "{} changed from {:?} to {:?}",
                    finding.parameter, prior, finding.risk
                ),
                severity: Severity::Medium,
                recorded_at,
            })
        })
        .collect()
}

/// Error raised by the scan service.
#[derive(Debug, thiserror::Error)]
pub enum ScanServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
