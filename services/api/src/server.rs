use crate::cli::ServeArgs;
use crate::infra::{scoring_engine, AppState, InMemoryScanRepository};
use crate::routes::with_scan_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use sitetrust::config::AppConfig;
use sitetrust::error::AppError;
use sitetrust::scans::ScanService;
use sitetrust::telemetry;
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

    let engine = Arc::new(scoring_engine(&config.scoring)?);
    let repository = Arc::new(InMemoryScanRepository::default());
    let scan_service = Arc::new(ScanService::new(repository, engine));

    let app = with_scan_routes(scan_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        scoring_config = ?config.scoring.config_path,
        "sitetrust api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
