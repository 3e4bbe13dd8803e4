//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::{
    engine::TimerEngine,
    state::{AppState, DisplaySettings, DisplaySettingsUpdate, TodoItem},
};
use super::responses::{
    minutes_from_value, DurationsRequest, DurationsResponse, HealthResponse, NewTodoRequest,
    StatusResponse, TimerResponse, TodoListResponse,
};

/// Run a timer command and wrap the resulting view
fn run_timer_command<F>(
    state: &AppState,
    action: &str,
    message: &str,
    command: F,
) -> Result<Json<TimerResponse>, StatusCode>
where
    F: FnOnce(&mut TimerEngine),
{
    match state.timer_command(action, command) {
        Ok(((), view)) => {
            info!("{} endpoint called - {} {}", action, view.mode.as_str(), view.clock());
            Ok(Json(TimerResponse::new(message.to_string(), view)))
        }
        Err(e) => {
            error!("Failed to run {} command: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/start
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    run_timer_command(&state, "start", "Timer start requested", |engine| {
        engine.start();
    })
}

/// Handle POST /timer/pause
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    run_timer_command(&state, "pause", "Timer pause requested", |engine| {
        engine.pause();
    })
}

/// Handle POST /timer/toggle
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    run_timer_command(&state, "toggle", "Timer toggled", |engine| {
        engine.toggle();
    })
}

/// Handle POST /timer/reset - back to idle focus with the counter zeroed
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    run_timer_command(&state, "reset", "Timer reset", TimerEngine::reset)
}

/// Handle POST /timer/focus - the focus mode button
pub async fn focus_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    run_timer_command(&state, "focus", "Focus mode selected", TimerEngine::switch_to_focus)
}

/// Handle POST /timer/break - the break mode button
pub async fn break_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    run_timer_command(&state, "break", "Break mode selected", TimerEngine::switch_to_break)
}

/// Handle PUT /timer/durations
pub async fn durations_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationsRequest>,
) -> Result<Json<DurationsResponse>, StatusCode> {
    let result = state.timer_command("durations", |engine| {
        if let Some(focus) = &request.focus_minutes {
            engine.set_focus_duration(minutes_from_value(focus));
        }
        if let Some(brk) = &request.break_minutes {
            engine.set_break_duration(minutes_from_value(brk));
        }
        engine.config()
    });

    match result {
        Ok((config, view)) => Ok(Json(DurationsResponse::new(config, view))),
        Err(e) => {
            error!("Failed to update durations: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the full widget status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let (timer, config) = state
        .with_engine(|engine| (engine.view(), engine.config()))
        .map_err(|e| {
            error!("Failed to read timer state: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let current_task = state.get_current_task().map_err(|e| {
        error!("Failed to read to-do list: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let display = state.get_display_settings().map_err(|e| {
        error!("Failed to read display settings: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        focus_duration_seconds: config.focus_duration_seconds,
        break_duration_seconds: config.break_duration_seconds,
        current_task,
        display,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

fn todo_list_response(state: &AppState) -> Result<TodoListResponse, StatusCode> {
    let items = state.get_todos();
    let current_task = state.get_current_task();
    match (items, current_task) {
        (Ok(items), Ok(current_task)) => Ok(TodoListResponse { current_task, items }),
        (Err(e), _) | (_, Err(e)) => {
            error!("Failed to read to-do list: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /todos
pub async fn list_todos_handler(State(state): State<Arc<AppState>>) -> Result<Json<TodoListResponse>, StatusCode> {
    todo_list_response(&state).map(Json)
}

/// Handle POST /todos - blank text is rejected with 400
pub async fn add_todo_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewTodoRequest>,
) -> Result<(StatusCode, Json<TodoItem>), StatusCode> {
    match state.add_todo(&request.text) {
        Ok(Some(item)) => {
            info!("Added to-do {}", item.id);
            Ok((StatusCode::CREATED, Json(item)))
        }
        Ok(None) => Err(StatusCode::BAD_REQUEST),
        Err(e) => {
            error!("Failed to add to-do: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /todos/:id/toggle
pub async fn toggle_todo_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<TodoItem>, StatusCode> {
    match state.toggle_todo(id) {
        Ok(Some(item)) => Ok(Json(item)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to toggle to-do {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle DELETE /todos/:id
pub async fn delete_todo_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<TodoListResponse>, StatusCode> {
    match state.delete_todo(id) {
        Ok(true) => todo_list_response(&state).map(Json),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to delete to-do {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /settings/display
pub async fn get_display_handler(State(state): State<Arc<AppState>>) -> Result<Json<DisplaySettings>, StatusCode> {
    state.get_display_settings().map(Json).map_err(|e| {
        error!("Failed to read display settings: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle PUT /settings/display - partial update
pub async fn update_display_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<DisplaySettingsUpdate>,
) -> Result<Json<DisplaySettings>, StatusCode> {
    state.update_display_settings(&update).map(Json).map_err(|e| {
        error!("Failed to update display settings: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
