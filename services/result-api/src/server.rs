use crate::cli::ServeArgs;
use crate::infra::{AppState, EngineState};
use crate::routes::{engine_router, with_operational_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use result_engine::config::AppConfig;
use result_engine::error::AppError;
use result_engine::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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

    let fixtures = config.fixtures()?;
    info!(
        subjects = fixtures.subjects.len(),
        companies = fixtures.companies.len(),
        semesters = fixtures.transcript.len(),
        "fixtures loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_operational_routes(engine_router(EngineState::from_fixtures(fixtures)))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "result engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
