//! HTTP API module
//!
//! The UI-adapter layer: every endpoint maps to one explicit command on the
//! timer engine, the to-do list, or the display settings.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::{
    add_todo_handler, break_handler, delete_todo_handler, durations_handler, focus_handler,
    get_display_handler, health_handler, list_todos_handler, pause_handler, reset_handler,
    start_handler, status_handler, toggle_handler, toggle_todo_handler, update_display_handler,
};

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timer/start", post(start_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/toggle", post(toggle_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/timer/focus", post(focus_handler))
        .route("/timer/break", post(break_handler))
        .route("/timer/durations", put(durations_handler))
        .route("/todos", get(list_todos_handler).post(add_todo_handler))
        .route("/todos/:id", axum::routing::delete(delete_todo_handler))
        .route("/todos/:id/toggle", post(toggle_todo_handler))
        .route("/settings/display", get(get_display_handler).put(update_display_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
