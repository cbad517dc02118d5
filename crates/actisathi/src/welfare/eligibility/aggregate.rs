use serde::{Deserialize, Serialize};

use super::super::catalog::SchemeCatalog;
use super::super::domain::SchemeSummary;
use super::{EligibilityStatus, EligibilityVerdict};

/// Response body of an eligibility check. Ineligible schemes are not listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityReport {
    pub eligible_schemes: Vec<SchemeSummary>,
    pub potential_schemes: Vec<SchemeSummary>,
}

impl EligibilityReport {
    /// Build the report keeping the order in which verdicts were produced.
    pub fn from_verdicts(catalog: &SchemeCatalog, verdicts: &[EligibilityVerdict]) -> Self {
        let mut report = Self::default();

        for verdict in verdicts {
            let Some(scheme) = catalog.get(&verdict.scheme_id) else {
                continue;
            };
            match verdict.status {
                EligibilityStatus::Eligible => report.eligible_schemes.push(scheme.summary()),
                EligibilityStatus::Potential => report.potential_schemes.push(scheme.summary()),
                EligibilityStatus::Ineligible => {}
            }
        }

        report
    }

    pub fn is_empty(&self) -> bool {
        self.eligible_schemes.is_empty() && self.potential_schemes.is_empty()
    }
}
