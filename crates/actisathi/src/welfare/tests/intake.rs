use serde_json::json;

use super::common::*;
use crate::welfare::domain::{Location, Occupation};
use crate::welfare::intake::{ApplicantForm, FieldProblem, IntakeGuard};

#[test]
fn builds_typed_profile_from_form_strings() {
    let guard = IntakeGuard::default();

    let profile = guard
        .profile_from_form(&farmer_form())
        .expect("form is complete");

    assert_eq!(profile, farmer_profile());
}

#[test]
fn unchecked_flags_read_as_false_and_for_self_defaults_true() {
    let guard = IntakeGuard::default();
    let mut form = farmer_form();
    form.remove("hasLand");
    form.remove("hasAadhaar");

    let profile = guard.profile_from_form(&form).expect("flags are optional");

    assert!(!profile.has_land);
    assert!(!profile.has_aadhaar);
    assert!(!profile.is_bpl);
    assert!(profile.is_for_self);
}

#[test]
fn names_every_missing_field_in_one_error() {
    let guard = IntakeGuard::default();
    let mut form = farmer_form();
    form.remove("age");
    form.remove("occupation");
    let form = form.with("maritalStatus", "   ");

    let err = guard.profile_from_form(&form).expect_err("fields missing");

    assert_eq!(err.missing_fields(), vec!["age", "occupation", "maritalStatus"]);
    let message = err.to_string();
    assert!(message.contains("missing required fields: age, occupation, maritalStatus"));
}

#[test]
fn empty_form_reports_all_required_fields() {
    let err = IntakeGuard::default()
        .profile_from_form(&ApplicantForm::new())
        .expect_err("empty form rejected");

    assert_eq!(
        err.missing_fields(),
        vec![
            "age",
            "gender",
            "occupation",
            "annualIncome",
            "location",
            "category",
            "education",
            "maritalStatus"
        ]
    );
}

#[test]
fn rejects_negative_and_non_numeric_values() {
    let guard = IntakeGuard::default();
    let form = farmer_form()
        .with("age", -3)
        .with("annualIncome", "about a lakh");

    let err = guard.profile_from_form(&form).expect_err("malformed numbers");

    assert_eq!(err.invalid_fields(), vec!["age", "annualIncome"]);
    assert!(err.missing_fields().is_empty());
    assert!(err.to_string().contains("expected a non-negative integer"));
}

#[test]
fn default_guard_accepts_any_non_negative_age() {
    let guard = IntakeGuard::default();

    let profile = guard
        .profile_from_form(&farmer_form().with("age", 121))
        .expect("no default age ceiling");
    assert_eq!(profile.age, 121);

    let profile = guard
        .profile_from_form(&farmer_form().with("age", "0"))
        .expect("newborn applicant");
    assert_eq!(profile.age, 0);
}

#[test]
fn rejects_ages_beyond_a_configured_limit() {
    let guard = IntakeGuard::with_max_age(100);
    let form = farmer_form().with("age", 101);

    let err = guard.profile_from_form(&form).expect_err("age too high");

    assert_eq!(err.invalid_fields(), vec!["age"]);
    assert!(matches!(
        &err.issues[0].problem,
        FieldProblem::Invalid(detail) if detail.contains("between 0 and 100")
    ));
}

#[test]
fn accepts_numeric_json_and_grouped_income() {
    let guard = IntakeGuard::default();
    let form = farmer_form()
        .with("age", json!(45))
        .with("annualIncome", "1,20,000")
        .with("location", "Semi-Urban")
        .with("occupation", "Self Employed");

    let profile = guard.profile_from_form(&form).expect("form parses");

    assert_eq!(profile.annual_income, 120_000);
    assert_eq!(profile.location, Location::SemiUrban);
    assert_eq!(profile.occupation, Occupation::SelfEmployed);
}

#[test]
fn unknown_choices_and_bad_flags_are_invalid_not_missing() {
    let guard = IntakeGuard::default();
    let form = farmer_form()
        .with("category", "royalty")
        .with("hasLand", "maybe");

    let err = guard.profile_from_form(&form).expect_err("bad values");

    assert_eq!(err.invalid_fields(), vec!["category", "hasLand"]);
    assert!(err.to_string().contains("unrecognised category 'royalty'"));
}

#[test]
fn deserializes_from_json_object() {
    let form: ApplicantForm = serde_json::from_value(json!({
        "age": 30,
        "gender": "female",
        "occupation": "homemaker",
        "annualIncome": 90000,
        "location": "urban",
        "category": "sc",
        "education": "secondary",
        "maritalStatus": "widowed",
        "isBPL": true
    }))
    .expect("object deserializes");

    let profile = IntakeGuard::default()
        .profile_from_form(&form)
        .expect("complete profile");

    assert!(profile.is_bpl);
    assert!(!profile.has_bank_account);
}
