use crate::cli::ServeArgs;
use crate::infra::{AppState, BookletService};
use crate::routes::with_booklet_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mindmirror::config::AppConfig;
use mindmirror::error::AppError;
use mindmirror::telemetry;
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

    let booklets = BookletService::from_config(&config.assets);

    let app = with_booklet_routes(booklets)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        asset_root = %config.assets.root.display(),
        "mindmirror booklet service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
