//! Runtime settings handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use kitchenprint_core::{keys, ConfigStore, StoreError};

use super::handlers::{api_error, ApiError};
use crate::state::AppState;

/// Stored settings, password withheld
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub server: Option<String>,
    pub username: Option<String>,
    pub password_configured: bool,
    pub interval_secs: u64,
    pub targets: Vec<String>,
}

/// Settings update
///
/// Omitted or empty text fields keep their stored value. `targets` always
/// replaces the stored list.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Seconds, as a number or numeric string.
    #[serde(default)]
    pub interval: Option<Value>,
    #[serde(default)]
    pub targets: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateSettingsResponse {
    #[serde(flatten)]
    pub settings: SettingsResponse,
    /// Whether a scheduled task was killed to apply the change.
    pub task_killed: bool,
}

fn store_error(e: StoreError) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, e)
}

fn read_settings(store: &dyn ConfigStore) -> Result<SettingsResponse, StoreError> {
    Ok(SettingsResponse {
        server: store.get(keys::SERVER)?,
        username: store.get(keys::USERNAME)?,
        password_configured: store
            .get(keys::PASSWORD)?
            .is_some_and(|p| !p.is_empty()),
        interval_secs: store.interval_secs()?,
        targets: store.list_targets()?,
    })
}

/// Parse a positive whole number of seconds.
fn parse_interval(value: &Value) -> Option<u64> {
    let secs = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    u64::try_from(secs).ok().filter(|secs| *secs > 0)
}

/// Get stored settings
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SettingsResponse>, ApiError> {
    read_settings(state.store()).map(Json).map_err(store_error)
}

/// Save settings, replace the target list and kill any scheduled task
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<UpdateSettingsResponse>, ApiError> {
    let interval = match &request.interval {
        None | Some(Value::Null) => None,
        Some(value) => Some(parse_interval(value).ok_or_else(|| {
            api_error(
                StatusCode::BAD_REQUEST,
                format!("interval must be a positive number of seconds, got {}", value),
            )
        })?),
    };

    let store = state.store();
    for (key, value) in [
        (keys::SERVER, request.server.as_deref()),
        (keys::USERNAME, request.username.as_deref()),
        (keys::PASSWORD, request.password.as_deref()),
    ] {
        if let Some(value) = value {
            store.set(key, value.trim()).map_err(store_error)?;
        }
    }
    if let Some(secs) = interval {
        store
            .set(keys::INTERVAL, &secs.to_string())
            .map_err(store_error)?;
    }

    let targets: Vec<String> = request
        .targets
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    store.set_targets(&targets).map_err(store_error)?;
    info!("Settings saved, {} target printer(s)", targets.len());

    let task_killed = state.scheduler().status().await.interval_secs.is_some();
    if task_killed {
        state.scheduler().kill().await;
    }
    state.notify().notify("Settings saved");

    let settings = read_settings(store).map_err(store_error)?;
    Ok(Json(UpdateSettingsResponse {
        settings,
        task_killed,
    }))
}
