//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod display_renderer;
pub mod tick_driver;

// Re-export main functions
pub use display_renderer::display_renderer_task;
pub use tick_driver::tick_driver_task;
