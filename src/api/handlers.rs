//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::error;

use crate::state::{AppState, Control, TimerView};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Press `control` and build the response
fn perform(state: &AppState, control: Control) -> Result<Json<ApiResponse>, StatusCode> {
    let action = control.as_str();
    match state.perform(action, control.event()) {
        Ok(transition) => {
            let view = TimerView::from(&transition.state);
            let response = if transition.changed {
                ApiResponse::changed(format!("Timer {}", view.phase.as_str()), view)
            } else {
                ApiResponse::unchanged(
                    format!("Cannot {} while {}", action, view.phase.as_str()),
                    view,
                )
            };
            Ok(Json(response))
        }
        Err(e) => {
            error!("Failed to {} timer: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start - Start counting from idle
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    perform(&state, Control::Start)
}

/// Handle POST /resume - Continue a paused timer
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    perform(&state, Control::Resume)
}

/// Handle POST /pause - Stop counting, keep elapsed time
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    perform(&state, Control::Pause)
}

/// Handle POST /quit - Stop counting and reset to zero
pub async fn quit_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    perform(&state, Control::Quit)
}

/// Handle POST /finish - Stop counting and freeze the elapsed time
pub async fn finish_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    perform(&state, Control::Finish)
}

/// Handle GET /status - Return the rendered timer
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer_state = match state.get_timer_state() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer: TimerView::from(&timer_state),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
