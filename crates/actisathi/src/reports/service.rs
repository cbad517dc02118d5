use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{IssueReport, ReportId, ReportStatus, ReportSubmission};
use super::duplicates::DuplicateDetector;
use super::moderation::{ContentModerator, ModerationVerdict};
use super::repository::{ReportRepository, RepositoryError};

/// Service composing moderation, duplicate detection, and the report repository.
pub struct ReportService<R> {
    repository: Arc<R>,
    moderator: Arc<dyn ContentModerator>,
    detector: Arc<dyn DuplicateDetector>,
    /// Serializes read-check-write sequences against the repository.
    writes: Mutex<()>,
}

static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_report_id() -> ReportId {
    let id = REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReportId(format!("rpt-{id:06}"))
}

impl<R> ReportService<R>
where
    R: ReportRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        moderator: Arc<dyn ContentModerator>,
        detector: Arc<dyn DuplicateDetector>,
    ) -> Self {
        Self {
            repository,
            moderator,
            detector,
            writes: Mutex::new(()),
        }
    }

    /// Validate, moderate, and de-duplicate a report before storing it as open.
    pub fn submit(&self, submission: ReportSubmission) -> Result<IssueReport, ReportServiceError> {
        let missing = missing_fields(&submission);
        if !missing.is_empty() {
            return Err(ReportServiceError::Incomplete(missing));
        }
        if submission
            .coordinates
            .is_some_and(|coordinates| !coordinates.is_valid())
        {
            return Err(ReportServiceError::InvalidCoordinates);
        }

        let text = format!("{}\n{}", submission.title, submission.description);
        if let ModerationVerdict::Rejected { reason } = self.moderator.review(&text) {
            warn!(category = ?submission.category, %reason, "report rejected by moderation");
            return Err(ReportServiceError::Moderation(reason));
        }

        let _writes = self.lock_writes();
        let active = self.repository.active()?;
        if let Some(existing) = self.detector.find_duplicate(&submission, &active) {
            info!(duplicate_of = %existing, "report matches an active report");
            return Err(ReportServiceError::Duplicate(existing));
        }

        let report = IssueReport {
            id: next_report_id(),
            title: submission.title.trim().to_string(),
            description: submission.description.trim().to_string(),
            category: submission.category,
            location: submission.location.trim().to_string(),
            coordinates: submission.coordinates,
            reporter: submission.reporter.trim().to_string(),
            status: ReportStatus::Open,
            created_at: Utc::now(),
        };

        let stored = self.repository.insert(report)?;
        info!(report_id = %stored.id, category = ?stored.category, "issue report stored");
        Ok(stored)
    }

    pub fn get(&self, id: &ReportId) -> Result<IssueReport, ReportServiceError> {
        let report = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(report)
    }

    /// Mark an open report as seen by the responsible department.
    pub fn acknowledge(&self, id: &ReportId) -> Result<IssueReport, ReportServiceError> {
        self.transition(id, ReportStatus::Acknowledged)
    }

    pub fn resolve(&self, id: &ReportId) -> Result<IssueReport, ReportServiceError> {
        self.transition(id, ReportStatus::Resolved)
    }

    fn transition(
        &self,
        id: &ReportId,
        next: ReportStatus,
    ) -> Result<IssueReport, ReportServiceError> {
        let _writes = self.lock_writes();
        let mut report = self.get(id)?;

        let allowed = matches!(
            (report.status, next),
            (ReportStatus::Open, ReportStatus::Acknowledged)
                | (ReportStatus::Open, ReportStatus::Resolved)
                | (ReportStatus::Acknowledged, ReportStatus::Resolved)
        );
        if !allowed {
            return Err(ReportServiceError::InvalidTransition {
                from: report.status,
                to: next,
            });
        }

        report.status = next;
        self.repository.update(report.clone())?;
        info!(report_id = %report.id, status = next.label(), "issue report updated");
        Ok(report)
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn missing_fields(submission: &ReportSubmission) -> Vec<&'static str> {
    [
        ("title", &submission.title),
        ("description", &submission.description),
        ("location", &submission.location),
        ("reporter", &submission.reporter),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
    .collect()
}

/// Error raised by the report service.
#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error("missing required fields: {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),
    #[error("coordinates must be a valid latitude/longitude pair")]
    InvalidCoordinates,
    #[error("report rejected by moderation: {0}")]
    Moderation(String),
    #[error("an active report already covers this issue: {0}")]
    Duplicate(ReportId),
    #[error("cannot move report from {} to {}", .from.label(), .to.label())]
    InvalidTransition { from: ReportStatus, to: ReportStatus },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
