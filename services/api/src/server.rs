use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_registry_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use grid_connect::config::AppConfig;
use grid_connect::error::AppError;
use grid_connect::registry::{RegistryService, RegistryStores};
use grid_connect::telemetry;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(RegistryService::new(
        RegistryStores::in_memory(),
        config.provisioning,
    ));

    let app = with_registry_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        compensate_on_failure = config.provisioning.compensate_on_failure,
        "grid connect registry ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
