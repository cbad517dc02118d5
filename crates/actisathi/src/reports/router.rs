use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{ReportId, ReportSubmission};
use super::repository::{ReportRepository, RepositoryError};
use super::service::{ReportService, ReportServiceError};

/// Router exposing civic issue intake and status endpoints.
pub fn report_router<R>(service: Arc<ReportService<R>>) -> Router
where
    R: ReportRepository + 'static,
{
    Router::new()
        .route("/api/v1/reports", post(submit_handler::<R>))
        .route("/api/v1/reports/:report_id", get(status_handler::<R>))
        .route(
            "/api/v1/reports/:report_id/acknowledge",
            post(acknowledge_handler::<R>),
        )
        .route(
            "/api/v1/reports/:report_id/resolve",
            post(resolve_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ReportService<R>>>,
    payload: Result<Json<ReportSubmission>, JsonRejection>,
) -> Response
where
    R: ReportRepository + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let payload = json!({ "error": rejection.body_text() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match service.submit(submission) {
        Ok(report) => (StatusCode::CREATED, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<ReportService<R>>>,
    Path(report_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
{
    match service.get(&ReportId(report_id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn acknowledge_handler<R>(
    State(service): State<Arc<ReportService<R>>>,
    Path(report_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
{
    match service.acknowledge(&ReportId(report_id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn resolve_handler<R>(
    State(service): State<Arc<ReportService<R>>>,
    Path(report_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
{
    match service.resolve(&ReportId(report_id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: ReportServiceError) -> Response {
    let status = match &err {
        ReportServiceError::Incomplete(_) | ReportServiceError::InvalidCoordinates => {
            StatusCode::BAD_REQUEST
        }
        ReportServiceError::Moderation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ReportServiceError::Duplicate(existing) => {
            let payload = json!({
                "error": err.to_string(),
                "duplicateOf": existing,
            });
            return (StatusCode::CONFLICT, Json(payload)).into_response();
        }
        ReportServiceError::InvalidTransition { .. }
        | ReportServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ReportServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ReportServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
