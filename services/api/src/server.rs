use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, InMemoryReportRepository};
use crate::routes::with_application_routes;
use actisathi::config::AppConfig;
use actisathi::error::AppError;
use actisathi::reports::{KeywordModerator, ProximityDuplicateDetector, ReportService};
use actisathi::telemetry;
use actisathi::welfare::{EligibilityService, StaticSchemeDirectory};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = load_catalog(config.catalog.path.as_deref())?;
    let scheme_count = catalog.len();
    let eligibility_service = Arc::new(EligibilityService::new(Arc::new(
        StaticSchemeDirectory::new(catalog),
    )));

    let report_service = Arc::new(ReportService::new(
        Arc::new(InMemoryReportRepository::default()),
        Arc::new(KeywordModerator::new(&config.moderation.blocked_terms)),
        Arc::new(ProximityDuplicateDetector::default()),
    ));

    let app = with_application_routes(eligibility_service, report_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, schemes = scheme_count, "welfare and civic service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
