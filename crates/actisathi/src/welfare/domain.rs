use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::eligibility::EligibilityPredicate;

/// Identifier wrapper for catalog schemes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemeId(pub String);

impl fmt::Display for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One welfare program and the rules deciding who may apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeRecord {
    pub id: SchemeId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub provider: String,
    #[serde(default)]
    pub eligibility: Vec<EligibilityPredicate>,
    #[serde(default)]
    pub required_documents: BTreeSet<DocumentKind>,
}

impl SchemeRecord {
    pub fn summary(&self) -> SchemeSummary {
        SchemeSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            provider: self.provider.clone(),
        }
    }
}

/// Public projection of a scheme returned by the eligibility endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeSummary {
    pub id: SchemeId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub provider: String,
}

/// Typed, validated eligibility query. Only the intake guard constructs these from
/// raw form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    pub age: u32,
    pub gender: Gender,
    pub occupation: Occupation,
    pub annual_income: u64,
    pub location: Location,
    pub category: SocialCategory,
    pub education: Education,
    pub marital_status: MaritalStatus,
    pub has_land: bool,
    pub has_disability: bool,
    #[serde(rename = "isBPL")]
    pub is_bpl: bool,
    pub is_minority: bool,
    pub is_veteran: bool,
    pub has_bank_account: bool,
    pub has_aadhaar: bool,
    pub is_for_self: bool,
}

impl ApplicantProfile {
    pub fn has_flag(&self, flag: ProfileFlag) -> bool {
        match flag {
            ProfileFlag::Land => self.has_land,
            ProfileFlag::Disability => self.has_disability,
            ProfileFlag::Bpl => self.is_bpl,
            ProfileFlag::Minority => self.is_minority,
            ProfileFlag::Veteran => self.is_veteran,
        }
    }

    pub fn holds_document(&self, document: DocumentKind) -> bool {
        match document {
            DocumentKind::BankAccount => self.has_bank_account,
            DocumentKind::Aadhaar => self.has_aadhaar,
        }
    }
}

/// Boolean circumstances a scheme can insist on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileFlag {
    Land,
    Disability,
    Bpl,
    Minority,
    Veteran,
}

impl ProfileFlag {
    pub const fn label(self) -> &'static str {
        match self {
            ProfileFlag::Land => "land ownership",
            ProfileFlag::Disability => "disability status",
            ProfileFlag::Bpl => "below-poverty-line card",
            ProfileFlag::Minority => "minority community",
            ProfileFlag::Veteran => "armed forces veteran",
        }
    }
}

/// Documents an applicant can obtain before applying; gaps here never exclude outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    BankAccount,
    Aadhaar,
}

impl DocumentKind {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentKind::BankAccount => "bank account",
            DocumentKind::Aadhaar => "Aadhaar card",
        }
    }
}

/// Error returned when a form value names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Lower-cases and strips separators so `semi-urban`, `Semi Urban`, `semi_urban`
/// and `semiUrban` compare equal.
fn fold_token(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !matches!(ch, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

macro_rules! form_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $label:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let folded = fold_token(raw);
                $(
                    if folded == fold_token($label) $(|| folded == fold_token($alias))* {
                        return Ok($name::$variant);
                    }
                )+
                Err(UnknownVariant {
                    kind: $kind,
                    value: raw.trim().to_string(),
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

form_enum! {
    Gender, "gender" {
        Male => "male" | "m",
        Female => "female" | "f",
        Other => "other" | "transgender" | "non-binary",
    }
}

form_enum! {
    /// Occupation groups offered by the eligibility form.
    Occupation, "occupation" {
        Farmer => "farmer" | "agriculture",
        Student => "student",
        Laborer => "laborer" | "labourer" | "daily wage",
        SelfEmployed => "self-employed" | "business",
        Salaried => "salaried" | "employed",
        Unemployed => "unemployed",
        Homemaker => "homemaker",
        Retired => "retired",
        Other => "other",
    }
}

form_enum! {
    Location, "location" {
        Rural => "rural",
        Urban => "urban",
        SemiUrban => "semi-urban",
    }
}

form_enum! {
    /// Social categories recognised by central schemes.
    SocialCategory, "category" {
        General => "general",
        Obc => "obc",
        Sc => "sc",
        St => "st",
        Ews => "ews",
    }
}

form_enum! {
    Education, "education" {
        NoFormal => "none" | "no formal" | "illiterate",
        Primary => "primary",
        Secondary => "secondary",
        HigherSecondary => "higher secondary",
        Graduate => "graduate",
        Postgraduate => "postgraduate",
    }
}

form_enum! {
    MaritalStatus, "marital status" {
        Single => "single" | "unmarried",
        Married => "married",
        Widowed => "widowed",
        Divorced => "divorced",
        Separated => "separated",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_tokens_ignore_case_and_separators() {
        assert_eq!("Semi Urban".parse::<Location>(), Ok(Location::SemiUrban));
        assert_eq!("semiUrban".parse::<Location>(), Ok(Location::SemiUrban));
        assert_eq!("SELF_EMPLOYED".parse::<Occupation>(), Ok(Occupation::SelfEmployed));
        assert_eq!("labourer".parse::<Occupation>(), Ok(Occupation::Laborer));
        assert_eq!("OBC".parse::<SocialCategory>(), Ok(SocialCategory::Obc));
    }

    #[test]
    fn unknown_tokens_report_kind_and_value() {
        let err = "astronaut".parse::<Occupation>().expect_err("unknown occupation");
        assert_eq!(err.kind, "occupation");
        assert_eq!(err.to_string(), "unrecognised occupation 'astronaut'");
    }

    #[test]
    fn serde_uses_camel_case_variants() {
        let json = serde_json::to_string(&Education::HigherSecondary).expect("serializes");
        assert_eq!(json, "\"higherSecondary\"");
        let parsed: DocumentKind = serde_json::from_str("\"bankAccount\"").expect("parses");
        assert_eq!(parsed, DocumentKind::BankAccount);
    }
}
