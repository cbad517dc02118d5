use actisathi::reports::{IssueReport, ReportId, ReportRepository, RepositoryError};
use actisathi::welfare::{CatalogError, SchemeCatalog};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryReportRepository {
    records: Arc<Mutex<HashMap<ReportId, IssueReport>>>,
}

impl ReportRepository for InMemoryReportRepository {
    fn insert(&self, report: IssueReport) -> Result<IssueReport, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&report.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(report.id.clone(), report.clone());
        Ok(report)
    }

    fn update(&self, report: IssueReport) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&report.id) {
            guard.insert(report.id.clone(), report);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<IssueReport>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn active(&self) -> Result<Vec<IssueReport>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut reports: Vec<IssueReport> = guard
            .values()
            .filter(|report| report.status.is_active())
            .cloned()
            .collect();
        reports.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        Ok(reports)
    }
}

/// Load the catalog from `path`, falling back to the bundled seed schemes.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<SchemeCatalog, CatalogError> {
    match path {
        Some(path) => {
            let catalog = SchemeCatalog::from_path(path)?;
            info!(path = %path.display(), schemes = catalog.len(), "loaded scheme catalog");
            Ok(catalog)
        }
        None => Ok(SchemeCatalog::standard()),
    }
}
