//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    engine::{minutes_from_input, TimerView},
    state::{DisplaySettings, TimerConfig, TodoItem},
};

/// Response for timer command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl TimerResponse {
    /// Status follows whether the countdown is running after the command
    pub fn new(message: String, timer: TimerView) -> Self {
        let status = if timer.running { "running" } else { "paused" };
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Body of `PUT /timer/durations`
///
/// Values may be numbers or strings; anything that does not read as a
/// positive number of minutes falls back to the default duration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DurationsRequest {
    pub focus_minutes: Option<Value>,
    pub break_minutes: Option<Value>,
}

/// Lenient minutes from a JSON value
pub fn minutes_from_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => minutes_from_input(s),
        _ => 0,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationsResponse {
    pub focus_minutes: u32,
    pub break_minutes: u32,
    pub timer: TimerView,
}

impl DurationsResponse {
    pub fn new(config: TimerConfig, timer: TimerView) -> Self {
        Self {
            focus_minutes: config.focus_duration_seconds / 60,
            break_minutes: config.break_duration_seconds / 60,
            timer,
        }
    }
}

/// Full status of the widget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub focus_duration_seconds: u32,
    pub break_duration_seconds: u32,
    pub current_task: String,
    pub display: DisplaySettings,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTodoRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoListResponse {
    pub current_task: String,
    pub items: Vec<TodoItem>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minutes_from_value() {
        assert_eq!(minutes_from_value(&json!(10)), 10);
        assert_eq!(minutes_from_value(&json!(7.9)), 7);
        assert_eq!(minutes_from_value(&json!("15")), 15);
        assert_eq!(minutes_from_value(&json!("-5")), -5);
        assert_eq!(minutes_from_value(&json!(null)), 0);
        assert_eq!(minutes_from_value(&json!([1])), 0);
    }
}
