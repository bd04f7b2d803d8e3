//! Stopwatch - A state-managed HTTP stopwatch
//! 
//! This is the main entry point for the stopwatch application.

use std::sync::Arc;
use tokio::{net::TcpListener, runtime::Handle};
use tracing::info;

use stopwatch::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::{presenter_task, IntervalTicker},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("stopwatch={},tower_http=info", config.log_level()))
        .init();

    info!("Starting stopwatch server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms",
          config.host, config.port, config.tick_ms);

    // Create application state with a wall-clock ticker
    let ticker = Arc::new(IntervalTicker::new(config.tick_period(), Handle::current()));
    let state = Arc::new(AppState::new(config.port, config.host.clone(), ticker));

    // Render every timer change
    tokio::spawn(presenter_task(state.controller.subscribe()));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start   - Start the timer");
    info!("  POST /pause   - Pause the running timer");
    info!("  POST /resume  - Resume the paused timer");
    info!("  POST /quit    - Stop and reset to zero");
    info!("  POST /finish  - Stop and keep the elapsed time");
    info!("  GET  /status  - Current time, phase and controls");
    info!("  GET  /health  - Health check");

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

    state.controller.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
