use std::collections::BTreeSet;
use std::sync::Arc;

use axum::response::Response;
use serde_json::{json, Value};

use crate::welfare::catalog::{CatalogError, SchemeCatalog};
use crate::welfare::directory::{SchemeDirectory, StaticSchemeDirectory};
use crate::welfare::domain::{
    ApplicantProfile, DocumentKind, Education, Gender, Location, MaritalStatus, Occupation,
    ProfileFlag, SchemeId, SchemeRecord, SocialCategory,
};
use crate::welfare::eligibility::EligibilityPredicate;
use crate::welfare::intake::ApplicantForm;
use crate::welfare::service::EligibilityService;

/// The farmer profile used throughout the eligibility scenarios.
pub(super) fn farmer_profile() -> ApplicantProfile {
    ApplicantProfile {
        age: 45,
        gender: Gender::Male,
        occupation: Occupation::Farmer,
        annual_income: 120_000,
        location: Location::Rural,
        category: SocialCategory::General,
        education: Education::Primary,
        marital_status: MaritalStatus::Married,
        has_land: true,
        has_disability: false,
        is_bpl: false,
        is_minority: false,
        is_veteran: false,
        has_bank_account: true,
        has_aadhaar: true,
        is_for_self: true,
    }
}

pub(super) fn farmer_form() -> ApplicantForm {
    ApplicantForm::new()
        .with("age", "45")
        .with("gender", "male")
        .with("occupation", "farmer")
        .with("annualIncome", "120000")
        .with("location", "rural")
        .with("category", "general")
        .with("education", "primary")
        .with("maritalStatus", "married")
        .with("hasLand", true)
        .with("hasBankAccount", "on")
        .with("hasAadhaar", "yes")
}

pub(super) fn record(id: &str, eligibility: Vec<EligibilityPredicate>) -> SchemeRecord {
    SchemeRecord {
        id: SchemeId(id.to_string()),
        title: format!("Scheme {id}"),
        description: format!("Description of {id}"),
        category: "test".to_string(),
        provider: "Test Ministry".to_string(),
        eligibility,
        required_documents: BTreeSet::new(),
    }
}

pub(super) fn with_documents(mut scheme: SchemeRecord, documents: &[DocumentKind]) -> SchemeRecord {
    scheme.required_documents = documents.iter().copied().collect();
    scheme
}

pub(super) fn farmer_scheme() -> SchemeRecord {
    record(
        "farm-support",
        vec![
            EligibilityPredicate::RequiresFlag {
                flag: ProfileFlag::Land,
            },
            EligibilityPredicate::Occupations {
                allowed: [Occupation::Farmer].into_iter().collect(),
            },
        ],
    )
}

pub(super) fn income_capped_scheme(value: u64) -> SchemeRecord {
    record(
        "income-capped",
        vec![EligibilityPredicate::IncomeMax { value }],
    )
}

pub(super) fn test_catalog() -> SchemeCatalog {
    SchemeCatalog::new(vec![
        farmer_scheme(),
        with_documents(
            record(
                "aadhaar-linked",
                vec![EligibilityPredicate::AgeRange {
                    min: Some(18),
                    max: Some(60),
                }],
            ),
            &[DocumentKind::Aadhaar, DocumentKind::BankAccount],
        ),
        income_capped_scheme(300_000),
        record(
            "students-only",
            vec![EligibilityPredicate::Occupations {
                allowed: [Occupation::Student].into_iter().collect(),
            }],
        ),
        record("open-to-all", Vec::new()),
    ])
    .expect("test catalog is valid")
}

pub(super) fn build_service() -> EligibilityService<StaticSchemeDirectory> {
    EligibilityService::new(Arc::new(StaticSchemeDirectory::new(test_catalog())))
}

pub(super) struct UnavailableDirectory;

impl SchemeDirectory for UnavailableDirectory {
    fn snapshot(&self) -> Result<Arc<SchemeCatalog>, CatalogError> {
        Err(CatalogError::Unavailable("catalog store offline".to_string()))
    }
}

pub(super) fn form_body(form: &ApplicantForm) -> Value {
    json!(form)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn ids(summaries: &[crate::welfare::domain::SchemeSummary]) -> Vec<&str> {
    summaries.iter().map(|summary| summary.id.0.as_str()).collect()
}
