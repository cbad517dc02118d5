use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::domain::{
    DocumentKind, Gender, Location, Occupation, ProfileFlag, SchemeId, SchemeRecord,
    SocialCategory,
};
use super::eligibility::EligibilityPredicate;

/// Problems found while loading or validating a scheme catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unable to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scheme id must not be empty")]
    EmptySchemeId,
    #[error("scheme id '{0}' appears more than once")]
    DuplicateSchemeId(String),
    #[error("scheme '{scheme}' has age range {min}-{max} with min above max")]
    InvertedAgeRange { scheme: String, min: u32, max: u32 },
    #[error("scheme '{0}' has an allow-list with no entries")]
    EmptyAllowList(String),
    #[error("scheme directory unavailable: {0}")]
    Unavailable(String),
}

/// Immutable, validated set of schemes in presentation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemeCatalog {
    schemes: Vec<SchemeRecord>,
}

impl SchemeCatalog {
    /// Validate records and build a catalog. Integrity problems surface here so
    /// evaluation never has to deal with them.
    pub fn new(schemes: Vec<SchemeRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for scheme in &schemes {
            let id = scheme.id.0.trim();
            if id.is_empty() {
                return Err(CatalogError::EmptySchemeId);
            }
            if !seen.insert(id.to_string()) {
                return Err(CatalogError::DuplicateSchemeId(id.to_string()));
            }
            for predicate in &scheme.eligibility {
                if let EligibilityPredicate::AgeRange {
                    min: Some(min),
                    max: Some(max),
                } = predicate
                {
                    if min > max {
                        return Err(CatalogError::InvertedAgeRange {
                            scheme: id.to_string(),
                            min: *min,
                            max: *max,
                        });
                    }
                }
                if predicate.is_degenerate() {
                    return Err(CatalogError::EmptyAllowList(id.to_string()));
                }
            }
        }

        Ok(Self { schemes })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let schemes: Vec<SchemeRecord> = serde_json::from_reader(reader)?;
        Self::new(schemes)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn schemes(&self) -> &[SchemeRecord] {
        &self.schemes
    }

    pub fn get(&self, id: &SchemeId) -> Option<&SchemeRecord> {
        self.schemes.iter().find(|scheme| &scheme.id == id)
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    /// Seed catalog of central government schemes shipped with the service.
    pub fn standard() -> Self {
        Self {
            schemes: standard_schemes(),
        }
    }
}

fn set<T: Ord, const N: usize>(items: [T; N]) -> BTreeSet<T> {
    items.into_iter().collect()
}

fn scheme(
    id: &str,
    title: &str,
    description: &str,
    category: &str,
    provider: &str,
    eligibility: Vec<EligibilityPredicate>,
    required_documents: BTreeSet<DocumentKind>,
) -> SchemeRecord {
    SchemeRecord {
        id: SchemeId(id.to_string()),
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        provider: provider.to_string(),
        eligibility,
        required_documents,
    }
}

fn standard_schemes() -> Vec<SchemeRecord> {
    use DocumentKind::{Aadhaar, BankAccount};

    vec![
        scheme(
            "pm-kisan",
            "PM Kisan Samman Nidhi",
            "Income support of Rs 6,000 a year paid in three instalments to landholding farmer families.",
            "agriculture",
            "Ministry of Agriculture & Farmers Welfare",
            vec![
                EligibilityPredicate::Occupations {
                    allowed: set([Occupation::Farmer]),
                },
                EligibilityPredicate::RequiresFlag {
                    flag: ProfileFlag::Land,
                },
            ],
            set([BankAccount, Aadhaar]),
        ),
        scheme(
            "pmay-gramin",
            "Pradhan Mantri Awas Yojana (Gramin)",
            "Financial assistance for constructing a pucca house for rural households.",
            "housing",
            "Ministry of Rural Development",
            vec![
                EligibilityPredicate::IncomeMax { value: 300_000 },
                EligibilityPredicate::Locations {
                    allowed: set([Location::Rural]),
                },
            ],
            set([BankAccount, Aadhaar]),
        ),
        scheme(
            "ayushman-bharat",
            "Ayushman Bharat PM-JAY",
            "Health cover of Rs 5 lakh per family per year for secondary and tertiary hospitalisation.",
            "health",
            "National Health Authority",
            vec![EligibilityPredicate::RequiresFlag {
                flag: ProfileFlag::Bpl,
            }],
            set([Aadhaar]),
        ),
        scheme(
            "post-matric-scholarship",
            "Post-Matric Scholarship for SC/ST/OBC Students",
            "Tuition and maintenance support for students from reserved categories studying beyond class 10.",
            "education",
            "Ministry of Social Justice & Empowerment",
            vec![
                EligibilityPredicate::Occupations {
                    allowed: set([Occupation::Student]),
                },
                EligibilityPredicate::AgeRange {
                    min: Some(15),
                    max: Some(30),
                },
                EligibilityPredicate::IncomeMax { value: 250_000 },
                EligibilityPredicate::Categories {
                    allowed: set([SocialCategory::Sc, SocialCategory::St, SocialCategory::Obc]),
                },
            ],
            set([BankAccount, Aadhaar]),
        ),
        scheme(
            "minority-pre-matric",
            "Pre-Matric Scholarship for Minorities",
            "Scholarships for students from notified minority communities up to class 10.",
            "education",
            "Ministry of Minority Affairs",
            vec![
                EligibilityPredicate::Occupations {
                    allowed: set([Occupation::Student]),
                },
                EligibilityPredicate::IncomeMax { value: 100_000 },
                EligibilityPredicate::RequiresFlag {
                    flag: ProfileFlag::Minority,
                },
            ],
            set([BankAccount]),
        ),
        scheme(
            "ignoaps",
            "Indira Gandhi National Old Age Pension",
            "Monthly pension for senior citizens living below the poverty line.",
            "pension",
            "Ministry of Rural Development",
            vec![
                EligibilityPredicate::AgeRange {
                    min: Some(60),
                    max: None,
                },
                EligibilityPredicate::RequiresFlag {
                    flag: ProfileFlag::Bpl,
                },
            ],
            set([BankAccount, Aadhaar]),
        ),
        scheme(
            "igndps",
            "Indira Gandhi National Disability Pension",
            "Monthly pension for adults with severe disabilities from BPL households.",
            "pension",
            "Ministry of Rural Development",
            vec![
                EligibilityPredicate::AgeRange {
                    min: Some(18),
                    max: Some(79),
                },
                EligibilityPredicate::RequiresFlag {
                    flag: ProfileFlag::Disability,
                },
                EligibilityPredicate::RequiresFlag {
                    flag: ProfileFlag::Bpl,
                },
            ],
            set([BankAccount, Aadhaar]),
        ),
        scheme(
            "pm-ujjwala",
            "Pradhan Mantri Ujjwala Yojana",
            "Deposit-free LPG connections for adult women from poor households.",
            "energy",
            "Ministry of Petroleum & Natural Gas",
            vec![
                EligibilityPredicate::Genders {
                    allowed: set([Gender::Female]),
                },
                EligibilityPredicate::AgeRange {
                    min: Some(18),
                    max: None,
                },
                EligibilityPredicate::RequiresFlag {
                    flag: ProfileFlag::Bpl,
                },
            ],
            set([BankAccount, Aadhaar]),
        ),
        scheme(
            "echs",
            "Ex-Servicemen Contributory Health Scheme",
            "Cashless medical care for retired armed forces personnel and their dependants.",
            "health",
            "Department of Ex-Servicemen Welfare",
            vec![EligibilityPredicate::RequiresFlag {
                flag: ProfileFlag::Veteran,
            }],
            BTreeSet::new(),
        ),
        scheme(
            "atal-pension",
            "Atal Pension Yojana",
            "Guaranteed pension after 60 for contributors who join between 18 and 40.",
            "pension",
            "PFRDA",
            vec![EligibilityPredicate::AgeRange {
                min: Some(18),
                max: Some(40),
            }],
            set([BankAccount]),
        ),
        scheme(
            "pm-jan-dhan",
            "Pradhan Mantri Jan Dhan Yojana",
            "Zero-balance savings account with RuPay debit card and accident insurance, open to every resident.",
            "financial inclusion",
            "Department of Financial Services",
            Vec::new(),
            BTreeSet::new(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn standard_catalog_passes_validation() {
        let standard = SchemeCatalog::standard();
        let validated =
            SchemeCatalog::new(standard.schemes().to_vec()).expect("seed catalog is valid");
        assert_eq!(validated.len(), standard.len());
        assert!(standard.get(&SchemeId("pm-kisan".to_string())).is_some());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut schemes = SchemeCatalog::standard().schemes().to_vec();
        schemes.push(schemes[0].clone());
        match SchemeCatalog::new(schemes) {
            Err(CatalogError::DuplicateSchemeId(id)) => assert_eq!(id, "pm-kisan"),
            other => panic!("expected duplicate id, got {other:?}"),
        }
    }

    #[test]
    fn rejects_inverted_age_range_and_empty_allow_lists() {
        let inverted = scheme(
            "bad-age",
            "Bad",
            "",
            "misc",
            "test",
            vec![EligibilityPredicate::AgeRange {
                min: Some(40),
                max: Some(18),
            }],
            BTreeSet::new(),
        );
        assert!(matches!(
            SchemeCatalog::new(vec![inverted]),
            Err(CatalogError::InvertedAgeRange { min: 40, max: 18, .. })
        ));

        let empty = scheme(
            "bad-list",
            "Bad",
            "",
            "misc",
            "test",
            vec![EligibilityPredicate::Occupations {
                allowed: BTreeSet::new(),
            }],
            BTreeSet::new(),
        );
        assert!(matches!(
            SchemeCatalog::new(vec![empty]),
            Err(CatalogError::EmptyAllowList(_))
        ));
    }

    #[test]
    fn loads_tagged_predicates_from_json() {
        let json = r#"[
            {
                "id": "state-farm-aid",
                "title": "State Farm Aid",
                "description": "Seed subsidy",
                "category": "agriculture",
                "provider": "State Agriculture Department",
                "eligibility": [
                    {"kind": "occupations", "allowed": ["farmer"]},
                    {"kind": "ageRange", "min": 18},
                    {"kind": "requiresFlag", "flag": "land"}
                ],
                "requiredDocuments": ["aadhaar"]
            },
            {
                "id": "open-scheme",
                "title": "Open",
                "description": "No rules",
                "category": "misc",
                "provider": "NGO"
            }
        ]"#;

        let catalog = SchemeCatalog::from_reader(Cursor::new(json)).expect("catalog parses");
        assert_eq!(catalog.len(), 2);
        let farm = &catalog.schemes()[0];
        assert_eq!(farm.eligibility.len(), 3);
        assert!(farm.required_documents.contains(&DocumentKind::Aadhaar));
        assert!(catalog.schemes()[1].eligibility.is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        match SchemeCatalog::from_path("/nonexistent/schemes.json") {
            Err(CatalogError::Io { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/schemes.json"))
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
