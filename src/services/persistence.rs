//! Persistence bridge between owned state and the key-value store
//!
//! Every operation is synchronous and best-effort: store failures are logged
//! and swallowed, and malformed stored values fall back to defaults field by
//! field. The in-memory state stays authoritative for the session.

use std::sync::Arc;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::store::KeyValueStore;
use crate::state::{
    settings_state::{DisplaySettings, Font},
    timer_state::TimerConfig,
    todo_state::TodoItem,
};

/// Keys used in the store
pub mod keys {
    pub const TIMER_SETTINGS: &str = "trove_timer_settings";
    pub const DISPLAY_SETTINGS: &str = "trove_display_settings";
    pub const TODO_ITEMS: &str = "trove_todo_items";
    pub const SESSIONS_COMPLETED: &str = "trove_sessions_completed";
}

#[derive(Clone)]
pub struct PersistenceBridge {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for PersistenceBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceBridge").finish_non_exhaustive()
    }
}

impl PersistenceBridge {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        match self.store.set(key, value) {
            Ok(()) => debug!("Saved {}", key),
            Err(e) => warn!("Failed to save {}: {}", key, e),
        }
    }

    fn read_json(&self, key: &str) -> Option<Value> {
        let raw = self.read(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring malformed {}: {}", key, e);
                None
            }
        }
    }

    /// Load focus/break durations, defaulting each missing or invalid field
    pub fn load_config(&self) -> TimerConfig {
        let defaults = TimerConfig::default();
        let Some(value) = self.read_json(keys::TIMER_SETTINGS) else {
            return defaults;
        };

        TimerConfig::new(
            positive_seconds(&value, &["focusDurationSeconds", "focusTime"])
                .unwrap_or(defaults.focus_duration_seconds),
            positive_seconds(&value, &["breakDurationSeconds", "breakTime"])
                .unwrap_or(defaults.break_duration_seconds),
        )
    }

    pub fn save_config(&self, config: &TimerConfig) {
        let value = json!({
            "focusDurationSeconds": config.focus_duration_seconds,
            "breakDurationSeconds": config.break_duration_seconds,
        });
        self.write(keys::TIMER_SETTINGS, &value.to_string());
    }

    /// Load the session counter; absent or malformed values read as 0
    pub fn load_sessions_completed(&self) -> u32 {
        let Some(raw) = self.read(keys::SESSIONS_COMPLETED) else {
            return 0;
        };
        match raw.trim().parse::<u32>() {
            Ok(n) => n,
            Err(e) => {
                warn!("Ignoring malformed {} {:?}: {}", keys::SESSIONS_COMPLETED, raw, e);
                0
            }
        }
    }

    pub fn save_sessions_completed(&self, sessions: u32) {
        self.write(keys::SESSIONS_COMPLETED, &sessions.to_string());
    }

    pub fn load_display_settings(&self) -> DisplaySettings {
        let Some(value) = self.read_json(keys::DISPLAY_SETTINGS) else {
            return DisplaySettings::default();
        };

        DisplaySettings {
            night_mode: value.get("nightMode").and_then(Value::as_bool).unwrap_or(false),
            font: value
                .get("font")
                .and_then(Value::as_str)
                .and_then(Font::from_name)
                .unwrap_or_default(),
        }
    }

    pub fn save_display_settings(&self, settings: &DisplaySettings) {
        match serde_json::to_string(settings) {
            Ok(encoded) => self.write(keys::DISPLAY_SETTINGS, &encoded),
            Err(e) => warn!("Failed to encode display settings: {}", e),
        }
    }

    pub fn load_todo_items(&self) -> Vec<TodoItem> {
        let Some(value) = self.read_json(keys::TODO_ITEMS) else {
            return Vec::new();
        };
        serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("Ignoring malformed {}: {}", keys::TODO_ITEMS, e);
            Vec::new()
        })
    }

    pub fn save_todo_items(&self, items: &[TodoItem]) {
        match serde_json::to_string(items) {
            Ok(encoded) => self.write(keys::TODO_ITEMS, &encoded),
            Err(e) => warn!("Failed to encode to-do items: {}", e),
        }
    }
}

/// First field among `names` holding a positive integer that fits in u32
fn positive_seconds(value: &Value, names: &[&str]) -> Option<u32> {
    names.iter().find_map(|name| {
        value
            .get(*name)
            .and_then(Value::as_u64)
            .filter(|&seconds| seconds > 0)
            .and_then(|seconds| u32::try_from(seconds).ok())
    })
}
