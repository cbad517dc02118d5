use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::super::domain::{
    ApplicantProfile, DocumentKind, Gender, Location, Occupation, ProfileFlag, SocialCategory,
};

/// Declarative eligibility rule attached to a scheme.
///
/// Documents are not predicates here: they live on
/// [`SchemeRecord::required_documents`](super::super::SchemeRecord) and are
/// always checked after every hard rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EligibilityPredicate {
    /// Annual income must not exceed `value`.
    IncomeMax { value: u64 },
    /// Age must fall inside the inclusive range. Either bound may be open.
    AgeRange {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<u32>,
    },
    Occupations { allowed: BTreeSet<Occupation> },
    Categories { allowed: BTreeSet<SocialCategory> },
    Locations { allowed: BTreeSet<Location> },
    Genders { allowed: BTreeSet<Gender> },
    RequiresFlag { flag: ProfileFlag },
}

/// Name of the rule a finding refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKey {
    IncomeMax,
    AgeRange,
    Occupation,
    Category,
    Location,
    Gender,
    Flag(ProfileFlag),
    Document(DocumentKind),
}

/// Whether failing a rule excludes the applicant or only defers the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateTier {
    Hard,
    Soft,
}

impl RuleKey {
    pub const fn tier(self) -> PredicateTier {
        match self {
            RuleKey::Document(_) => PredicateTier::Soft,
            _ => PredicateTier::Hard,
        }
    }

    /// Position in the fixed evaluation order: numeric and categorical checks,
    /// then flags, then documents.
    pub(crate) const fn rank(self) -> u8 {
        match self {
            RuleKey::IncomeMax => 0,
            RuleKey::AgeRange => 1,
            RuleKey::Occupation => 2,
            RuleKey::Category => 3,
            RuleKey::Location => 4,
            RuleKey::Gender => 5,
            RuleKey::Flag(_) => 6,
            RuleKey::Document(_) => 7,
        }
    }
}

/// Result of checking a single rule, kept for audit trails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredicateFinding {
    pub rule: RuleKey,
    pub notes: String,
}

impl EligibilityPredicate {
    pub fn key(&self) -> RuleKey {
        match self {
            EligibilityPredicate::IncomeMax { .. } => RuleKey::IncomeMax,
            EligibilityPredicate::AgeRange { .. } => RuleKey::AgeRange,
            EligibilityPredicate::Occupations { .. } => RuleKey::Occupation,
            EligibilityPredicate::Categories { .. } => RuleKey::Category,
            EligibilityPredicate::Locations { .. } => RuleKey::Location,
            EligibilityPredicate::Genders { .. } => RuleKey::Gender,
            EligibilityPredicate::RequiresFlag { flag } => RuleKey::Flag(*flag),
        }
    }

    /// Check the rule against a profile, returning whether it holds and a note
    /// describing the comparison.
    pub(crate) fn check(&self, profile: &ApplicantProfile) -> (bool, String) {
        match self {
            EligibilityPredicate::IncomeMax { value } => {
                let income = profile.annual_income;
                if income <= *value {
                    (true, format!("income {income} within ceiling {value}"))
                } else {
                    (false, format!("income {income} exceeds ceiling {value}"))
                }
            }
            EligibilityPredicate::AgeRange { min, max } => {
                let age = profile.age;
                let above_min = min.map_or(true, |min| age >= min);
                let below_max = max.map_or(true, |max| age <= max);
                let range = describe_range(*min, *max);
                if above_min && below_max {
                    (true, format!("age {age} within {range}"))
                } else {
                    (false, format!("age {age} outside {range}"))
                }
            }
            EligibilityPredicate::Occupations { allowed } => {
                membership("occupation", &profile.occupation, allowed)
            }
            EligibilityPredicate::Categories { allowed } => {
                membership("category", &profile.category, allowed)
            }
            EligibilityPredicate::Locations { allowed } => {
                membership("location", &profile.location, allowed)
            }
            EligibilityPredicate::Genders { allowed } => {
                membership("gender", &profile.gender, allowed)
            }
            EligibilityPredicate::RequiresFlag { flag } => {
                if profile.has_flag(*flag) {
                    (true, format!("{} confirmed", flag.label()))
                } else {
                    (false, format!("requires {}", flag.label()))
                }
            }
        }
    }

    /// Empty allow-lists would exclude everyone and are rejected at catalog load.
    pub(crate) fn is_degenerate(&self) -> bool {
        match self {
            EligibilityPredicate::Occupations { allowed } => allowed.is_empty(),
            EligibilityPredicate::Categories { allowed } => allowed.is_empty(),
            EligibilityPredicate::Locations { allowed } => allowed.is_empty(),
            EligibilityPredicate::Genders { allowed } => allowed.is_empty(),
            EligibilityPredicate::IncomeMax { .. }
            | EligibilityPredicate::AgeRange { .. }
            | EligibilityPredicate::RequiresFlag { .. } => false,
        }
    }
}

pub(crate) fn check_document(
    document: DocumentKind,
    profile: &ApplicantProfile,
) -> (bool, String) {
    if profile.holds_document(document) {
        (true, format!("{} available", document.label()))
    } else {
        (false, format!("{} needed before applying", document.label()))
    }
}

fn membership<T>(field: &str, value: &T, allowed: &BTreeSet<T>) -> (bool, String)
where
    T: Ord + std::fmt::Display,
{
    let listed = allowed
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if allowed.contains(value) {
        (true, format!("{field} {value} is one of [{listed}]"))
    } else {
        (false, format!("{field} {value} not in [{listed}]"))
    }
}

fn describe_range(min: Option<u32>, max: Option<u32>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{min}-{max}"),
        (Some(min), None) => format!("{min}+"),
        (None, Some(max)) => format!("up to {max}"),
        (None, None) => "any age".to_string(),
    }
}
