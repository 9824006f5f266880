use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryServiceRequestRepository, InMemoryVehicleRepository};
use crate::routes::with_marketplace_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use garage_link::config::AppConfig;
use garage_link::error::AppError;
use garage_link::marketplace::{MarketplaceService, UsagePolicy};
use garage_link::telemetry;

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

    let vehicles = Arc::new(InMemoryVehicleRepository::default());
    let requests = Arc::new(InMemoryServiceRequestRepository::default());
    let marketplace_service = Arc::new(MarketplaceService::new(
        UsagePolicy::default(),
        vehicles,
        requests,
    ));

    let app = with_marketplace_routes(marketplace_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "garage link marketplace ready");

    axum::serve(listener, app).await?;
    Ok(())
}
