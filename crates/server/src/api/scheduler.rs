//! Scheduler control handlers.
//!
//! These replace the operator's launch, pause and resume buttons.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use kitchenprint_core::{CycleReport, SchedulerStatus, SettingsError};

use super::handlers::{api_error, ApiError};
use crate::state::AppState;

/// Result of a control action.
#[derive(Debug, Serialize)]
pub struct ControlResponse {
    pub message: String,
    /// False when the request was a no-op in the current state.
    pub changed: bool,
    pub status: SchedulerStatus,
}

async fn respond(state: &AppState, message: impl Into<String>, changed: bool) -> Json<ControlResponse> {
    Json(ControlResponse {
        message: message.into(),
        changed,
        status: state.scheduler().status().await,
    })
}

/// Current scheduler status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<SchedulerStatus> {
    Json(state.scheduler().status().await)
}

/// Validate settings and start polling
pub async fn launch(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ControlResponse>, ApiError> {
    match state.launch().await {
        Ok(interval_secs) => Ok(respond(
            &state,
            format!("Checking for new orders every {} seconds", interval_secs),
            true,
        )
        .await),
        Err(e @ SettingsError::Incomplete { .. }) => {
            state.notify().notify(format!("Cannot launch: {}", e));
            Err(api_error(StatusCode::CONFLICT, e))
        }
        Err(e) => {
            warn!("Launch failed: {}", e);
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e))
        }
    }
}

/// Pause polling if the task is running
pub async fn pause(State(state): State<Arc<AppState>>) -> Json<ControlResponse> {
    if !state.scheduler().is_task_running() {
        return respond(&state, "Task is not running", false).await;
    }
    state.scheduler().pause().await;
    state.notify().notify("Task paused");
    respond(&state, "Task paused", true).await
}

/// Resume polling if the task is not running
pub async fn resume(State(state): State<Arc<AppState>>) -> Json<ControlResponse> {
    if state.scheduler().is_task_running() {
        return respond(&state, "Task is already running", false).await;
    }
    let before = state.scheduler().status().await;
    if before.interval_secs.is_none() {
        return respond(&state, "No task to resume", false).await;
    }
    state.scheduler().resume().await;
    state.notify().notify("Task resumed");
    respond(&state, "Task resumed", true).await
}

/// Kill the task and reset the scheduler
pub async fn kill(State(state): State<Arc<AppState>>) -> Json<ControlResponse> {
    let had_task = state.scheduler().status().await.interval_secs.is_some();
    state.scheduler().kill().await;
    let message = if had_task {
        "Task killed and reset"
    } else {
        "No task to kill"
    };
    respond(&state, message, had_task).await
}

/// Run one cycle now and return its report
pub async fn run_once(State(state): State<Arc<AppState>>) -> Json<CycleReport> {
    Json(state.run_once().await)
}
