mod aggregate;
mod predicate;

pub use aggregate::EligibilityReport;
pub use predicate::{EligibilityPredicate, PredicateFinding, PredicateTier, RuleKey};

use super::catalog::SchemeCatalog;
use super::domain::{ApplicantProfile, DocumentKind, SchemeId, SchemeRecord};
use predicate::check_document;
use serde::{Deserialize, Serialize};

/// Three-way outcome for one scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EligibilityStatus {
    Eligible,
    /// Every hard rule passed; only document gaps remain.
    Potential,
    Ineligible,
}

impl EligibilityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EligibilityStatus::Eligible => "eligible",
            EligibilityStatus::Potential => "potentially eligible",
            EligibilityStatus::Ineligible => "not eligible",
        }
    }
}

/// Per-scheme decision with the rules that passed and failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityVerdict {
    pub scheme_id: SchemeId,
    pub status: EligibilityStatus,
    pub matched_predicates: Vec<PredicateFinding>,
    pub failed_predicates: Vec<PredicateFinding>,
}

/// Stateless interpreter applying scheme rules to a profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityEngine;

impl EligibilityEngine {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate one scheme. Rules run in rank order; the first failing hard
    /// rule ends evaluation, while failing soft rules (documents) only soften
    /// the verdict to `Potential`.
    pub fn evaluate(
        &self,
        scheme: &SchemeRecord,
        profile: &ApplicantProfile,
    ) -> EligibilityVerdict {
        let mut rules: Vec<Rule<'_>> = scheme
            .eligibility
            .iter()
            .map(Rule::Predicate)
            .chain(scheme.required_documents.iter().copied().map(Rule::Document))
            .collect();
        rules.sort_by_key(|rule| rule.key().rank());

        let mut matched = Vec::new();
        let mut failed = Vec::new();
        let mut status = EligibilityStatus::Eligible;

        for rule in rules {
            let key = rule.key();
            let (holds, notes) = rule.check(profile);
            let finding = PredicateFinding { rule: key, notes };
            if holds {
                matched.push(finding);
                continue;
            }

            failed.push(finding);
            match key.tier() {
                PredicateTier::Hard => {
                    status = EligibilityStatus::Ineligible;
                    break;
                }
                PredicateTier::Soft => status = EligibilityStatus::Potential,
            }
        }

        EligibilityVerdict {
            scheme_id: scheme.id.clone(),
            status,
            matched_predicates: matched,
            failed_predicates: failed,
        }
    }

    /// Verdicts for every scheme, in catalog order.
    pub fn assess(
        &self,
        catalog: &SchemeCatalog,
        profile: &ApplicantProfile,
    ) -> Vec<EligibilityVerdict> {
        catalog
            .schemes()
            .iter()
            .map(|scheme| self.evaluate(scheme, profile))
            .collect()
    }

    /// Partition the catalog into eligible and potential schemes, dropping the rest.
    pub fn report(&self, catalog: &SchemeCatalog, profile: &ApplicantProfile) -> EligibilityReport {
        let verdicts = self.assess(catalog, profile);
        EligibilityReport::from_verdicts(catalog, &verdicts)
    }
}

enum Rule<'a> {
    Predicate(&'a EligibilityPredicate),
    Document(DocumentKind),
}

impl Rule<'_> {
    fn key(&self) -> RuleKey {
        match self {
            Rule::Predicate(predicate) => predicate.key(),
            Rule::Document(document) => RuleKey::Document(*document),
        }
    }

    fn check(&self, profile: &ApplicantProfile) -> (bool, String) {
        match self {
            Rule::Predicate(predicate) => predicate.check(profile),
            Rule::Document(document) => check_document(*document, profile),
        }
    }
}
