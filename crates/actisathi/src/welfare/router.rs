use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::warn;

use super::directory::SchemeDirectory;
use super::domain::SchemeId;
use super::intake::ApplicantForm;
use super::service::{EligibilityService, EligibilityServiceError};

/// Router exposing the eligibility check and read-only catalog endpoints.
pub fn welfare_router<D>(service: Arc<EligibilityService<D>>) -> Router
where
    D: SchemeDirectory + 'static,
{
    Router::new()
        .route(
            "/api/welfare-schemes/check-eligibility",
            post(check_eligibility_handler::<D>),
        )
        .route("/api/welfare-schemes", get(list_schemes_handler::<D>))
        .route(
            "/api/welfare-schemes/:scheme_id",
            get(scheme_detail_handler::<D>),
        )
        .with_state(service)
}

pub(crate) async fn check_eligibility_handler<D>(
    State(service): State<Arc<EligibilityService<D>>>,
    payload: Result<Json<ApplicantForm>, JsonRejection>,
) -> Response
where
    D: SchemeDirectory + 'static,
{
    let Json(form) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let payload = json!({ "error": rejection.body_text() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match service.check(&form) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn list_schemes_handler<D>(
    State(service): State<Arc<EligibilityService<D>>>,
) -> Response
where
    D: SchemeDirectory + 'static,
{
    match service.schemes() {
        Ok(schemes) => (StatusCode::OK, Json(schemes)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn scheme_detail_handler<D>(
    State(service): State<Arc<EligibilityService<D>>>,
    Path(scheme_id): Path<String>,
) -> Response
where
    D: SchemeDirectory + 'static,
{
    let id = SchemeId(scheme_id);
    match service.scheme(&id) {
        Ok(Some(scheme)) => (StatusCode::OK, Json(scheme)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": format!("scheme '{id}' not found") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

fn service_error_response(err: EligibilityServiceError) -> Response {
    let status = match &err {
        EligibilityServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        EligibilityServiceError::Directory(_) => {
            warn!(error = %err, "eligibility request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
