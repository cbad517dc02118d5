use crate::infra::{load_catalog, InMemoryReportRepository};
use actisathi::config::DEFAULT_BLOCKED_TERMS;
use actisathi::error::AppError;
use actisathi::reports::{
    Coordinates, IssueCategory, KeywordModerator, ProximityDuplicateDetector, ReportService,
    ReportSubmission,
};
use actisathi::welfare::{
    ApplicantForm, EligibilityService, EligibilityStatus, EligibilityVerdict, RuleKey,
    SchemeCatalog, StaticSchemeDirectory,
};
use clap::Args;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    /// JSON scheme catalog to list instead of the bundled schemes
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// JSON file holding the applicant form, keyed as the web form posts it
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// JSON scheme catalog to evaluate against instead of the bundled schemes
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) fn run_scheme_listing(args: ListArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    println!("{} welfare schemes", catalog.len());
    for scheme in catalog.schemes() {
        println!(
            "- {} [{}] {} ({}, {} rules, {} documents)",
            scheme.id,
            scheme.category,
            scheme.title,
            scheme.provider,
            scheme.eligibility.len(),
            scheme.required_documents.len()
        );
    }
    Ok(())
}

pub(crate) fn run_eligibility_check(args: CheckArgs) -> Result<(), AppError> {
    let reader = BufReader::new(File::open(&args.profile)?);
    let form: ApplicantForm = serde_json::from_reader(reader)?;
    let catalog = load_catalog(args.catalog.as_deref())?;
    let directory = Arc::new(StaticSchemeDirectory::new(catalog.clone()));
    let service = EligibilityService::new(directory);

    let verdicts = service.assess(&form)?;
    for line in render_verdicts(&catalog, &verdicts) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    println!("ActiSathi demo");

    let catalog = SchemeCatalog::standard();
    let directory = Arc::new(StaticSchemeDirectory::new(catalog.clone()));
    let service = EligibilityService::new(directory);
    let form = demo_applicant_form();
    println!("\nEligibility check for a 45-year-old rural farmer without Aadhaar");
    match service.assess(&form) {
        Ok(verdicts) => {
            for line in render_verdicts(&catalog, &verdicts) {
                println!("{line}");
            }
        }
        Err(err) => {
            println!("  Eligibility check rejected: {}", err);
            return Ok(());
        }
    }

    println!("\nCivic issue intake");
    let reports = ReportService::new(
        Arc::new(InMemoryReportRepository::default()),
        Arc::new(KeywordModerator::new(DEFAULT_BLOCKED_TERMS)),
        Arc::new(ProximityDuplicateDetector::default()),
    );

    let stored = match reports.submit(demo_report()) {
        Ok(report) => report,
        Err(err) => {
            println!("  Submission rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Stored report {} ({:?}) -> status {}",
        stored.id,
        stored.category,
        stored.status.label()
    );

    let mut repeat = demo_report();
    repeat.reporter = "neighbour-22".to_string();
    repeat.coordinates = Some(Coordinates {
        latitude: 28.4597,
        longitude: 77.0267,
    });
    match reports.submit(repeat) {
        Ok(report) => println!("- Second report stored as {}", report.id),
        Err(err) => println!("- Second report rejected: {}", err),
    }

    let mut abusive = demo_report();
    abusive.category = IssueCategory::Garbage;
    abusive.description = "This is a scam, nobody ever cleans here".to_string();
    if let Err(err) = reports.submit(abusive) {
        println!("- Third report rejected: {}", err);
    }

    for step in [reports.acknowledge(&stored.id), reports.resolve(&stored.id)] {
        match step {
            Ok(report) => println!("- Report {} is now {}", report.id, report.status.label()),
            Err(err) => println!("- Status change refused: {}", err),
        }
    }

    Ok(())
}

pub(crate) fn render_verdicts(
    catalog: &SchemeCatalog,
    verdicts: &[EligibilityVerdict],
) -> Vec<String> {
    let mut lines = Vec::new();
    for status in [
        EligibilityStatus::Eligible,
        EligibilityStatus::Potential,
        EligibilityStatus::Ineligible,
    ] {
        let matching: Vec<&EligibilityVerdict> = verdicts
            .iter()
            .filter(|verdict| verdict.status == status)
            .collect();
        lines.push(format!("{} ({})", status.label(), matching.len()));

        for verdict in matching {
            let title = catalog
                .get(&verdict.scheme_id)
                .map(|scheme| scheme.title.as_str())
                .unwrap_or("unknown scheme");
            lines.push(format!("  - {} [{}]", title, verdict.scheme_id));
            if status != EligibilityStatus::Eligible {
                for finding in &verdict.failed_predicates {
                    lines.push(format!(
                        "      {}: {}",
                        rule_label(finding.rule),
                        finding.notes
                    ));
                }
            }
        }
    }
    lines
}

fn rule_label(rule: RuleKey) -> String {
    match rule {
        RuleKey::IncomeMax => "income".to_string(),
        RuleKey::AgeRange => "age".to_string(),
        RuleKey::Occupation => "occupation".to_string(),
        RuleKey::Category => "social category".to_string(),
        RuleKey::Location => "location".to_string(),
        RuleKey::Gender => "gender".to_string(),
        RuleKey::Flag(flag) => flag.label().to_string(),
        RuleKey::Document(document) => document.label().to_string(),
    }
}

fn demo_applicant_form() -> ApplicantForm {
    ApplicantForm::new()
        .with("age", "45")
        .with("gender", "male")
        .with("occupation", "farmer")
        .with("annualIncome", "1,20,000")
        .with("location", "rural")
        .with("category", "obc")
        .with("education", "secondary")
        .with("maritalStatus", "married")
        .with("hasLand", "on")
        .with("isBPL", true)
        .with("hasBankAccount", true)
        .with("hasAadhaar", false)
}

fn demo_report() -> ReportSubmission {
    ReportSubmission {
        title: "Deep pothole at the market junction".to_string(),
        description: "Two-wheelers are skidding after the rain".to_string(),
        category: IssueCategory::Pothole,
        location: "Sadar Bazaar junction".to_string(),
        coordinates: Some(Coordinates {
            latitude: 28.4595,
            longitude: 77.0266,
        }),
        reporter: "resident-14".to_string(),
    }
}
