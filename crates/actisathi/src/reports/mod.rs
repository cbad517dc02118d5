//! Civic issue report intake.
//!
//! Content moderation and duplicate detection are injected as traits so the
//! decision functions can be swapped or stubbed.

pub mod domain;
pub mod duplicates;
pub mod moderation;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Coordinates, IssueCategory, IssueReport, ReportId, ReportStatus, ReportSubmission,
};
pub use duplicates::{distance_meters, DuplicateDetector, ProximityDuplicateDetector};
pub use moderation::{ContentModerator, KeywordModerator, ModerationVerdict};
pub use repository::{ReportRepository, RepositoryError};
pub use router::report_router;
pub use service::{ReportService, ReportServiceError};
