#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use axum::{Router, middleware::from_fn, routing::get};
use retail_insights_api::{construct_router, state::State};
use std::sync::Arc;
use tokio::signal;

mod config;
mod metrics;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let prometheus = metrics::init_telemetry()?;

    tracing::info!("Starting Retail Insights API Service");

    let config = config::Config::from_env()?;
    tracing::info!(
        env = %config.app_env,
        warehouse = %config.analytics.warehouse_location,
        paid_status = %config.analytics.paid_status,
        "Loaded configuration"
    );

    let state = Arc::new(State::connect(&config.database, config.analytics.clone()).await?);

    let app = Router::new()
        .merge(construct_router(state))
        .route(
            "/metrics",
            get(move || std::future::ready(prometheus.render())),
        )
        .layer(from_fn(metrics::track_http));

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    metrics::shutdown_tracing();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
