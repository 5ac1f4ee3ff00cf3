//! Teamlunch server entry point.

use std::sync::Arc;

use axum::Router;
use teamlunch_api::{AppState, router as api_router};
use teamlunch_common::{Config, SharedClock, SystemClock};
use teamlunch_core::Schedule;
use teamlunch_scheduler::{SchedulerConfig, WeeklyWinnerScheduler};
use tokio::{signal, sync::watch};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teamlunch=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting teamlunch server...");

    // Load configuration
    let config = Config::load()?;
    let schedule = Schedule::from_config(&config.schedule)?;
    info!(
        winner_time = %schedule.winner_time(),
        disclosure_cutoff = %schedule.disclosure_cutoff(),
        timezone = %schedule.timezone(),
        "Loaded voting schedule"
    );

    // Connect to database
    let db = teamlunch_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    teamlunch_db::migrate(&db).await?;
    info!("Migrations completed");

    let clock: SharedClock = Arc::new(SystemClock);
    let state = AppState::new(Arc::new(db), schedule.clone(), clock);

    // Start the weekly winner scheduler
    let (stop_tx, stop_rx) = watch::channel(false);
    let scheduler = WeeklyWinnerScheduler::new(
        Arc::new(state.weekly_winner_service.clone()),
        SystemClock,
        schedule,
        SchedulerConfig::from(&config.schedule),
    );
    let scheduler_handle = scheduler.spawn(stop_rx);

    let app = Router::new()
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the scheduler and wait for it to finish
    if stop_tx.send(true).is_err() {
        info!("Scheduler already stopped");
    }
    if let Err(e) = scheduler_handle.await {
        error!(error = %e, "Scheduler task ended abnormally");
    }

    info!("Server shutdown complete");
    Ok(())
}
