//! Welfare-scheme eligibility matching.
//!
//! Raw form input passes through the [`IntakeGuard`], the resulting profile is
//! evaluated against every scheme in the current [`SchemeCatalog`] snapshot,
//! and the verdicts are partitioned into eligible and potential schemes.

pub mod catalog;
pub mod directory;
pub mod domain;
pub mod eligibility;
pub mod intake;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, SchemeCatalog};
pub use directory::{SchemeDirectory, StaticSchemeDirectory};
pub use domain::{
    ApplicantProfile, DocumentKind, Education, Gender, Location, MaritalStatus, Occupation,
    ProfileFlag, SchemeId, SchemeRecord, SchemeSummary, SocialCategory, UnknownVariant,
};
pub use eligibility::{
    EligibilityEngine, EligibilityPredicate, EligibilityReport, EligibilityStatus,
    EligibilityVerdict, PredicateFinding, PredicateTier, RuleKey,
};
pub use intake::{ApplicantForm, FieldIssue, FieldProblem, IntakeGuard, ValidationError};
pub use router::welfare_router;
pub use service::{EligibilityService, EligibilityServiceError};
