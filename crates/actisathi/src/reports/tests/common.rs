use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::reports::domain::{
    Coordinates, IssueCategory, IssueReport, ReportId, ReportSubmission,
};
use crate::reports::duplicates::{DuplicateDetector, ProximityDuplicateDetector};
use crate::reports::moderation::{ContentModerator, KeywordModerator, ModerationVerdict};
use crate::reports::repository::{ReportRepository, RepositoryError};
use crate::reports::service::ReportService;

pub(super) fn pothole() -> ReportSubmission {
    ReportSubmission {
        title: "Deep pothole on MG Road".to_string(),
        description: "Two-wheelers are swerving into traffic to avoid it.".to_string(),
        category: IssueCategory::Pothole,
        location: "MG Road, Sector 14".to_string(),
        coordinates: Some(Coordinates {
            latitude: 28.4595,
            longitude: 77.0266,
        }),
        reporter: "citizen-42".to_string(),
    }
}

pub(super) fn build_service() -> (ReportService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ReportService::new(
        repository.clone(),
        Arc::new(KeywordModerator::new(["scam", "spam"])),
        Arc::new(ProximityDuplicateDetector::default()),
    );
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<ReportId, IssueReport>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl ReportRepository for MemoryRepository {
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
        guard.insert(report.id.clone(), report);
        Ok(())
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<IssueReport>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn active(&self) -> Result<Vec<IssueReport>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut active: Vec<IssueReport> = guard
            .values()
            .filter(|report| report.status.is_active())
            .cloned()
            .collect();
        active.sort_by_key(|report| report.created_at);
        Ok(active)
    }
}

/// Memory repository that stalls on reads, widening the gap between a
/// service's read and its write.
#[derive(Default, Clone)]
pub(super) struct SlowRepository {
    pub(super) inner: MemoryRepository,
}

const READ_DELAY: Duration = Duration::from_millis(40);

impl ReportRepository for SlowRepository {
    fn insert(&self, report: IssueReport) -> Result<IssueReport, RepositoryError> {
        self.inner.insert(report)
    }

    fn update(&self, report: IssueReport) -> Result<(), RepositoryError> {
        self.inner.update(report)
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<IssueReport>, RepositoryError> {
        let found = self.inner.fetch(id);
        thread::sleep(READ_DELAY);
        found
    }

    fn active(&self) -> Result<Vec<IssueReport>, RepositoryError> {
        let active = self.inner.active();
        thread::sleep(READ_DELAY);
        active
    }
}

pub(super) struct UnavailableRepository;

impl ReportRepository for UnavailableRepository {
    fn insert(&self, _report: IssueReport) -> Result<IssueReport, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _report: IssueReport) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ReportId) -> Result<Option<IssueReport>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn active(&self) -> Result<Vec<IssueReport>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Moderator that approves everything, for tests about other stages.
pub(super) struct ApproveAll;

impl ContentModerator for ApproveAll {
    fn review(&self, _text: &str) -> ModerationVerdict {
        ModerationVerdict::Approved
    }
}

/// Detector with a fixed answer so duplicate handling is deterministic.
pub(super) struct FixedDuplicate(pub(super) Option<ReportId>);

impl DuplicateDetector for FixedDuplicate {
    fn find_duplicate(
        &self,
        _candidate: &ReportSubmission,
        _existing: &[IssueReport],
    ) -> Option<ReportId> {
        self.0.clone()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
