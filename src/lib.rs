//! Trove Timer - a focus/break countdown service
//!
//! This library provides the focus/break timer engine, its persistence
//! bridge over a key-value store, a small to-do tracker, display settings,
//! and the HTTP adapter that drives them.

pub mod api;
pub mod config;
pub mod engine;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use engine::TimerEngine;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
