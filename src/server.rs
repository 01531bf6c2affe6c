use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    config::Config,
    export::CsvExporter,
    handlers::{self, AppState},
    metrics,
    signals::shutdown_signal,
    store::EventStore,
    weather::WeatherClient,
    webhook::WebhookQueue,
};

/// Start the LogBuddy server
///
/// This function:
/// 1. Initializes metrics
/// 2. Opens the event store and runs migrations
/// 3. Spawns the webhook worker pool
/// 4. Serves requests until SIGINT/SIGTERM
/// 5. Drains queued webhooks before returning
pub async fn start_server(config: Config) -> Result<()> {
    info!("Initializing Prometheus metrics...");
    let metrics_handle =
        Arc::new(metrics::init_metrics().context("Failed to install Prometheus recorder")?);

    let store = EventStore::connect(&config.database.url, config.database.max_connections)
        .await
        .with_context(|| format!("Failed to open event store at {}", config.database.url))?;
    info!(
        url = %config.database.url,
        events = store.count().await?,
        "Event store ready"
    );

    let (webhooks, workers) = WebhookQueue::spawn(
        store.clone(),
        config.webhook.queue_capacity,
        config.webhook.workers,
    );

    let app_state = AppState {
        store: store.clone(),
        webhooks,
        exporter: CsvExporter::new(&config.export.directory),
        weather: WeatherClient::new(reqwest::Client::new(), config.weather.clone()),
        max_limit: config.query.max_limit,
    };

    let app = create_router(app_state, metrics_handle);

    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .with_context(|| format!("Invalid server.host: {}", config.server.host))?,
        config.server.port,
    ));

    info!("Starting LogBuddy on {}", addr);
    info!(
        "Configuration: {} webhook workers, queue capacity {}, export dir {}",
        config.webhook.workers,
        config.webhook.queue_capacity,
        config.export.directory.display()
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    // All queue handles lived in the router state, which is gone now
    info!("Draining webhook queue...");
    workers
        .join(Duration::from_secs(config.server.shutdown_timeout_seconds))
        .await;
    store.close().await;

    info!("Server stopped gracefully");
    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(app_state: AppState, metrics_handle: Arc<PrometheusHandle>) -> Router {
    let api_routes = Router::new()
        .route(
            "/logs",
            post(handlers::events::create_log).get(handlers::events::list_logs),
        )
        .route("/analytics", get(handlers::analytics::get_analytics))
        .route("/export/csv", get(handlers::export::export_csv))
        .route("/external-api/webhook", post(handlers::webhook::handle_webhook))
        .route("/external-api/weather", get(handlers::weather::get_weather))
        .with_state(app_state);

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics_handler::metrics))
        .with_state(metrics_handle)
        .merge(api_routes)
        // Limit request body size to 10MB
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
}
