//! Print device and notice handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use kitchenprint_core::Notice;

use super::handlers::{api_error, ApiError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PrintersResponse {
    pub sink: String,
    pub devices: Vec<String>,
}

/// Live device list from the print sink
pub async fn list_printers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PrintersResponse>, ApiError> {
    let sink = state.sink();
    let devices = sink
        .list_devices()
        .await
        .map_err(|e| api_error(StatusCode::BAD_GATEWAY, e))?;
    Ok(Json(PrintersResponse {
        sink: sink.name().to_string(),
        devices,
    }))
}

/// Recent notices, oldest first
pub async fn list_notices(State(state): State<Arc<AppState>>) -> Json<Vec<Notice>> {
    Json(state.recent_notices().snapshot().await)
}
