//! Stopwatch - A state-managed HTTP stopwatch
//! 
//! This library provides a four-phase timer (idle, running, paused, finished)
//! driven by an injectable tick source, plus the HTTP surface and presenter
//! task that render it.

pub mod config;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, TimerController, TimerState};
pub use api::create_router;
pub use utils::{format_elapsed, shutdown_signal};
