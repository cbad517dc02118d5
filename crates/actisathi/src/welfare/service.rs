use std::sync::Arc;

use tracing::{debug, error, info};

use super::catalog::{CatalogError, SchemeCatalog};
use super::directory::SchemeDirectory;
use super::domain::{ApplicantProfile, SchemeId, SchemeRecord, SchemeSummary};
use super::eligibility::{EligibilityEngine, EligibilityReport, EligibilityVerdict};
use super::intake::{ApplicantForm, IntakeGuard, ValidationError};

/// Service composing the intake guard, the scheme directory, and the evaluator.
pub struct EligibilityService<D> {
    guard: IntakeGuard,
    directory: Arc<D>,
    engine: EligibilityEngine,
}

impl<D> EligibilityService<D>
where
    D: SchemeDirectory + 'static,
{
    pub fn new(directory: Arc<D>) -> Self {
        Self::with_guard(IntakeGuard::default(), directory)
    }

    pub fn with_guard(guard: IntakeGuard, directory: Arc<D>) -> Self {
        Self {
            guard,
            directory,
            engine: EligibilityEngine::new(),
        }
    }

    /// Validate a raw form and list the schemes the applicant qualifies or may qualify for.
    pub fn check(
        &self,
        form: &ApplicantForm,
    ) -> Result<EligibilityReport, EligibilityServiceError> {
        let profile = self.profile(form)?;
        self.check_profile(&profile)
    }

    pub fn check_profile(
        &self,
        profile: &ApplicantProfile,
    ) -> Result<EligibilityReport, EligibilityServiceError> {
        let catalog = self.snapshot()?;
        let report = self.engine.report(&catalog, profile);

        info!(
            schemes = catalog.len(),
            eligible = report.eligible_schemes.len(),
            potential = report.potential_schemes.len(),
            "eligibility check completed"
        );

        Ok(report)
    }

    /// Full verdict trail for every scheme, including ineligible ones.
    pub fn assess(
        &self,
        form: &ApplicantForm,
    ) -> Result<Vec<EligibilityVerdict>, EligibilityServiceError> {
        let profile = self.profile(form)?;
        let catalog = self.snapshot()?;
        Ok(self.engine.assess(&catalog, &profile))
    }

    pub fn schemes(&self) -> Result<Vec<SchemeSummary>, EligibilityServiceError> {
        let catalog = self.snapshot()?;
        Ok(catalog.schemes().iter().map(SchemeRecord::summary).collect())
    }

    pub fn scheme(&self, id: &SchemeId) -> Result<Option<SchemeRecord>, EligibilityServiceError> {
        let catalog = self.snapshot()?;
        Ok(catalog.get(id).cloned())
    }

    fn profile(&self, form: &ApplicantForm) -> Result<ApplicantProfile, ValidationError> {
        self.guard.profile_from_form(form).map_err(|err| {
            debug!(
                missing = ?err.missing_fields(),
                invalid = ?err.invalid_fields(),
                "eligibility form rejected"
            );
            err
        })
    }

    fn snapshot(&self) -> Result<Arc<SchemeCatalog>, EligibilityServiceError> {
        self.directory.snapshot().map_err(|err| {
            error!(error = %err, "scheme directory unavailable");
            EligibilityServiceError::Directory(err)
        })
    }
}

/// Error raised by the eligibility service.
#[derive(Debug, thiserror::Error)]
pub enum EligibilityServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Directory(#[from] CatalogError),
}
