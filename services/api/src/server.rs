use crate::cli::ServeArgs;
use crate::infra::{open_store, AppState};
use crate::routes::with_api_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_board::config::AppConfig;
use job_board::error::AppError;
use job_board::resources::Resources;
use job_board::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::from_env()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(uri) = args.mongo_uri.take() {
        config.storage.mongo_uri = Some(uri);
    }
    if !args.in_memory {
        config.validate()?;
    }

    telemetry::init(&config.telemetry)?;

    let store = open_store(&config.storage, args.in_memory).await?;
    let resources = Resources::new(&store);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        storage_backend: store.backend(),
    };

    let app = with_api_routes(&resources)
        .layer(Extension(app_state))
        .layer(CorsLayer::permissive())
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, storage = store.backend(), "job board ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received ctrl+c interrupt, closing server"),
        Err(err) => {
            warn!(error = %err, "unable to listen for ctrl+c, serving until killed");
            std::future::pending::<()>().await;
        }
    }
}
