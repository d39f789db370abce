use crate::infra::{AppState, InMemoryScanRepository};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use sitetrust::error::AppError;
use sitetrust::scans::{scan_router, RunId, ScanService};
use sitetrust::scoring::{Decision, Finding, RankedRisk};
use std::sync::Arc;

pub(crate) type SiteScanService = ScanService<InMemoryScanRepository>;

/// Parameter-level view of the latest run, mirroring what the dashboard lists under "risks".
#[derive(Debug, Serialize)]
pub(crate) struct RiskReport {
    pub(crate) run_id: RunId,
    pub(crate) findings: Vec<Finding>,
    pub(crate) top_risks: Vec<RankedRisk>,
    pub(crate) decisions: Vec<Decision>,
}

pub(crate) fn with_scan_routes(service: Arc<SiteScanService>) -> axum::Router {
    scan_router(service.clone())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/scans/:domain/risks",
            axum::routing::get(risk_report_endpoint),
        )
        .layer(Extension(service))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn risk_report_endpoint(
    Extension(service): Extension<Arc<SiteScanService>>,
    Path(domain): Path<String>,
) -> Result<Json<RiskReport>, AppError> {
    let record = service.latest(&domain)?;

    Ok(Json(RiskReport {
        run_id: record.run_id,
        findings: record.findings,
        top_risks: record.top_risks,
        decisions: record.decisions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use sitetrust::scoring::{ParameterSet, ScoringEngine};
    use tower::ServiceExt;

    fn service() -> Arc<SiteScanService> {
        Arc::new(ScanService::new(
            Arc::new(InMemoryScanRepository::default()),
            Arc::new(ScoringEngine::default()),
        ))
    }

    fn parameters() -> ParameterSet {
        serde_json::from_value(json!({
            "missing_csp_header": 1.0,
            "content_security_policy": { "risk": 1.0, "value": 0 },
            "open_ports": 0.3
        }))
        .expect("parameters deserialize")
    }

    #[tokio::test]
    async fn risk_report_lists_latest_findings() {
        let service = service();
        let record = service
            .record_scan("example.com", &parameters())
            .expect("scan recorded");

        let Json(report) = risk_report_endpoint(
            Extension(service.clone()),
            Path("www.example.com".to_string()),
        )
        .await
        .expect("report builds");

        assert_eq!(report.run_id, record.run_id);
        assert_eq!(report.findings.len(), 3);
        assert_eq!(report.top_risks[0].parameter, "missing_csp_header");
        assert_eq!(report.decisions.len(), 1);
    }

    #[tokio::test]
    async fn risk_report_for_unknown_domain_is_not_found() {
        let unknown = Path("unknown.example".to_string());
        let response = risk_report_endpoint(Extension(service()), unknown)
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_and_scoring_share_one_router() {
        let router = with_scan_routes(service());

        let request = Request::get("/health")
            .body(Body::empty())
            .expect("request");
        let health = router
            .clone()
            .oneshot(request)
            .await
            .expect("route executes");
        assert_eq!(health.status(), StatusCode::OK);

        let payload = json!({ "parameters": parameters() });
        let request = Request::post("/api/v1/score")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request");
        let scored = router.oneshot(request).await.expect("route executes");
        assert_eq!(scored.status(), StatusCode::OK);
    }
}
