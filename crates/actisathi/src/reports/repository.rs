use super::domain::{IssueReport, ReportId};

/// Storage abstraction so the report service can be exercised in isolation.
pub trait ReportRepository: Send + Sync {
    fn insert(&self, report: IssueReport) -> Result<IssueReport, RepositoryError>;
    fn update(&self, report: IssueReport) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ReportId) -> Result<Option<IssueReport>, RepositoryError>;
    /// Reports that are not yet resolved, oldest first.
    fn active(&self) -> Result<Vec<IssueReport>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
