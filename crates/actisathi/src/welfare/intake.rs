use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{
    ApplicantProfile, Education, Gender, Location, MaritalStatus, Occupation, SocialCategory,
};

/// Raw key/value payload posted by the eligibility form. Values arrive as the
/// controls produced them: strings from selects, booleans or "on" from
/// checkboxes, and occasionally numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicantForm(pub BTreeMap<String, Value>);

impl ApplicantForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    fn raw(&self, field: &str) -> Option<&Value> {
        match self.0.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) if text.trim().is_empty() => None,
            Some(value) => Some(value),
        }
    }
}

/// What went wrong with one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    Missing,
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub problem: FieldProblem,
}

/// Every problem found in a submission, so the form can be fixed in one round trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", describe_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.issues
            .iter()
            .filter(|issue| issue.problem == FieldProblem::Missing)
            .map(|issue| issue.field)
            .collect()
    }

    pub fn invalid_fields(&self) -> Vec<&'static str> {
        self.issues
            .iter()
            .filter(|issue| matches!(issue.problem, FieldProblem::Invalid(_)))
            .map(|issue| issue.field)
            .collect()
    }
}

fn describe_issues(issues: &[FieldIssue]) -> String {
    let mut missing = Vec::new();
    let mut invalid = Vec::new();
    for issue in issues {
        match &issue.problem {
            FieldProblem::Missing => missing.push(issue.field.to_string()),
            FieldProblem::Invalid(detail) => invalid.push(format!("{} ({})", issue.field, detail)),
        }
    }

    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing required fields: {}", missing.join(", ")));
    }
    if !invalid.is_empty() {
        parts.push(format!("invalid fields: {}", invalid.join(", ")));
    }
    if parts.is_empty() {
        parts.push("profile failed validation".to_string());
    }
    parts.join("; ")
}

/// Validation boundary turning form input into an [`ApplicantProfile`].
/// Any non-negative age is accepted unless a ceiling is configured.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard {
    max_age: Option<u32>,
}

impl IntakeGuard {
    pub fn with_max_age(max_age: u32) -> Self {
        Self {
            max_age: Some(max_age),
        }
    }

    /// Build a profile from the whole form at once. Required fields are never
    /// defaulted; unchecked flags read as `false` and `isForSelf` as `true`.
    pub fn profile_from_form(
        &self,
        form: &ApplicantForm,
    ) -> Result<ApplicantProfile, ValidationError> {
        let mut reader = FieldReader {
            form,
            issues: Vec::new(),
        };

        let age = reader
            .integer("age")
            .and_then(|age| match (u32::try_from(age), self.max_age) {
                (Ok(age), Some(max_age)) if age > max_age => {
                    reader.invalid("age", format!("must be between 0 and {max_age}"));
                    None
                }
                (Ok(age), _) => Some(age),
                (Err(_), _) => {
                    reader.invalid("age", "out of range".to_string());
                    None
                }
            });
        let gender = reader.choice::<Gender>("gender");
        let occupation = reader.choice::<Occupation>("occupation");
        let annual_income = reader.integer("annualIncome");
        let location = reader.choice::<Location>("location");
        let category = reader.choice::<SocialCategory>("category");
        let education = reader.choice::<Education>("education");
        let marital_status = reader.choice::<MaritalStatus>("maritalStatus");

        let has_land = reader.flag("hasLand", false);
        let has_disability = reader.flag("hasDisability", false);
        let is_bpl = reader.flag("isBPL", false);
        let is_minority = reader.flag("isMinority", false);
        let is_veteran = reader.flag("isVeteran", false);
        let has_bank_account = reader.flag("hasBankAccount", false);
        let has_aadhaar = reader.flag("hasAadhaar", false);
        let is_for_self = reader.flag("isForSelf", true);

        match (
            age,
            gender,
            occupation,
            annual_income,
            location,
            category,
            education,
            marital_status,
        ) {
            (
                Some(age),
                Some(gender),
                Some(occupation),
                Some(annual_income),
                Some(location),
                Some(category),
                Some(education),
                Some(marital_status),
            ) if reader.issues.is_empty() => Ok(ApplicantProfile {
                age,
                gender,
                occupation,
                annual_income,
                location,
                category,
                education,
                marital_status,
                has_land,
                has_disability,
                is_bpl,
                is_minority,
                is_veteran,
                has_bank_account,
                has_aadhaar,
                is_for_self,
            }),
            _ => Err(ValidationError {
                issues: reader.issues,
            }),
        }
    }
}

struct FieldReader<'a> {
    form: &'a ApplicantForm,
    issues: Vec<FieldIssue>,
}

impl FieldReader<'_> {
    fn missing(&mut self, field: &'static str) {
        self.issues.push(FieldIssue {
            field,
            problem: FieldProblem::Missing,
        });
    }

    fn invalid(&mut self, field: &'static str, detail: String) {
        self.issues.push(FieldIssue {
            field,
            problem: FieldProblem::Invalid(detail),
        });
    }

    fn integer(&mut self, field: &'static str) -> Option<u64> {
        let form = self.form;
        let parsed = match form.raw(field) {
            None => {
                self.missing(field);
                return None;
            }
            Some(Value::Number(number)) => number.as_u64().or_else(|| {
                number
                    .as_f64()
                    .filter(|value| {
                        *value >= 0.0 && value.fract() == 0.0 && *value <= u64::MAX as f64
                    })
                    .map(|value| value as u64)
            }),
            Some(Value::String(text)) => text
                .trim()
                .chars()
                .filter(|ch| *ch != ',' && *ch != '_')
                .collect::<String>()
                .parse::<u64>()
                .ok(),
            Some(_) => None,
        };

        if parsed.is_none() {
            self.invalid(field, "expected a non-negative integer".to_string());
        }
        parsed
    }

    fn choice<T>(&mut self, field: &'static str) -> Option<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let form = self.form;
        match form.raw(field) {
            None => {
                self.missing(field);
                None
            }
            Some(Value::String(text)) => match text.parse::<T>() {
                Ok(value) => Some(value),
                Err(err) => {
                    self.invalid(field, err.to_string());
                    None
                }
            },
            Some(other) => {
                self.invalid(field, format!("expected text, found {other}"));
                None
            }
        }
    }

    fn flag(&mut self, field: &'static str, default: bool) -> bool {
        let form = self.form;
        let parsed = match form.raw(field) {
            None => return default,
            Some(Value::Bool(value)) => Some(*value),
            Some(Value::Number(number)) => match number.as_u64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(true),
                "false" | "no" | "off" | "0" => Some(false),
                _ => None,
            },
            Some(_) => None,
        };

        match parsed {
            Some(value) => value,
            None => {
                self.invalid(field, "expected yes/no".to_string());
                default
            }
        }
    }
}
