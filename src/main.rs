//! Trove Timer - a focus/break countdown service
//!
//! This is the main entry point for the trove-timer application.

use std::sync::Arc;
use tokio::{net::TcpListener, sync::mpsc};
use tracing::info;

use trove_timer::{
    api::create_router,
    config::Config,
    engine::IntervalTicker,
    services::PersistenceBridge,
    state::AppState,
    tasks::{display_renderer_task, tick_driver_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("trove_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting trove-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, store={}, persist={}, notifications={}",
        config.host,
        config.port,
        config.store.display(),
        !config.no_persist,
        config.notifications
    );

    let persistence = PersistenceBridge::new(config.open_store());

    // Ticks flow from per-start interval tasks to the tick driver
    let (tick_tx, tick_rx) = mpsc::unbounded_channel();
    let ticker = IntervalTicker::new(tick_tx)?;

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        persistence,
        Arc::new(ticker),
        config.timer_options(),
    ));

    tokio::spawn(tick_driver_task(Arc::clone(&state), tick_rx));
    tokio::spawn(display_renderer_task(state.timer_view_rx.clone()));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /timer/start|pause|toggle|reset|focus|break");
    info!("  PUT    /timer/durations   - Set focus/break minutes");
    info!("  GET    /todos, POST /todos, POST /todos/:id/toggle, DELETE /todos/:id");
    info!("  GET    /settings/display, PUT /settings/display");
    info!("  GET    /status            - Timer, task and display status");
    info!("  GET    /health            - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Settings and sessions are saved on every change; only the tick needs releasing
    if let Err(e) = state.timer_command("shutdown", |engine| engine.pause()) {
        tracing::error!("Failed to pause timer on shutdown: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
