use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::{handlers, notices, scheduler, settings};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Scheduler control
        .route("/scheduler", get(scheduler::get_status))
        .route("/scheduler/launch", post(scheduler::launch))
        .route("/scheduler/pause", post(scheduler::pause))
        .route("/scheduler/resume", post(scheduler::resume))
        .route("/scheduler/kill", post(scheduler::kill))
        .route("/scheduler/run-once", post(scheduler::run_once))
        // Runtime settings
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        // Print devices and notices
        .route("/printers", get(notices::list_printers))
        .route("/notices", get(notices::list_notices))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
