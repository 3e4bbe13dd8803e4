//! State management module
//!
//! This module contains the owned state instances and the shared application
//! state that holds them.

pub mod app_state;
pub mod garden;
pub mod settings_state;
pub mod timer_state;
pub mod todo_state;

// Re-export main types
pub use app_state::{AppState, TimerOptions};
pub use garden::{Garden, SlotState};
pub use settings_state::{DisplaySettings, DisplaySettingsUpdate, Font};
pub use timer_state::{TimerConfig, TimerMode, TimerState};
pub use todo_state::{TodoItem, TodoList};
