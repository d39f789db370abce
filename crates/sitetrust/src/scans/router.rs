use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::repository::{RepositoryError, ScanRepository};
use super::service::{ScanService, ScanServiceError};
use crate::scoring::ParameterSet;

/// Body of a stateless scoring request.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub parameters: ParameterSet,
    #[serde(default)]
    pub trend_drop: i32,
}

/// Body of a recorded scan.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub domain: String,
    pub parameters: ParameterSet,
}

/// Router builder exposing scoring and scan history endpoints.
pub fn scan_router<R>(service: Arc<ScanService<R>>) -> Router
where
    R: ScanRepository + 'static,
{
    Router::new()
        .route("/api/v1/score", post(score_handler::<R>))
        .route("/api/v1/scans", post(record_handler::<R>))
        .route("/api/v1/scans/:domain", get(overview_handler::<R>))
        .route("/api/v1/scans/:domain/timeline", get(timeline_handler::<R>))
        .with_state(service)
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Malformed JSON is a 400; well-formed bodies violating the parameter contract are a 422.
fn rejection_response(rejection: JsonRejection) -> Response {
    error_response(rejection.status(), rejection.body_text())
}

fn service_error_response(error: ScanServiceError) -> Response {
    match error {
        ScanServiceError::Domain(error) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, error.to_string())
        }
        ScanServiceError::Repository(RepositoryError::Conflict) => error_response(
            StatusCode::CONFLICT,
            "scan run already recorded".to_string(),
        ),
        ScanServiceError::Repository(RepositoryError::NotFound) => {
            error_response(StatusCode::NOT_FOUND, "no scans recorded".to_string())
        }
        other => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn score_handler<R>(
    State(service): State<Arc<ScanService<R>>>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Response
where
    R: ScanRepository + 'static,
{
    match payload {
        Ok(Json(request)) => {
            let outcome = service.score(&request.parameters, request.trend_drop);
            (StatusCode::OK, Json(outcome)).into_response()
        }
        Err(rejection) => rejection_response(rejection),
    }
}

pub(crate) async fn record_handler<R>(
    State(service): State<Arc<ScanService<R>>>,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> Response
where
    R: ScanRepository + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(rejection),
    };

    match service.record_scan(&request.domain, &request.parameters) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn overview_handler<R>(
    State(service): State<Arc<ScanService<R>>>,
    Path(domain): Path<String>,
) -> Response
where
    R: ScanRepository + 'static,
{
    match service.overview(&domain) {
        Ok(Some(overview)) => (StatusCode::OK, Json(overview)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            format!("no scans recorded for {}", domain.trim()),
        ),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn timeline_handler<R>(
    State(service): State<Arc<ScanService<R>>>,
    Path(domain): Path<String>,
) -> Response
where
    R: ScanRepository + 'static,
{
    match service.timeline(&domain) {
        Ok(events) => (StatusCode::OK, Json(events)).into_response(),
        Err(error) => service_error_response(error),
    }
}
