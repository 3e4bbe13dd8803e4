//! Timer engine module
//!
//! The focus/break state machine and the seams it drives: repeating ticks,
//! completion notifications, and display rendering.

pub mod notifier;
pub mod ticker;
pub mod timer;
pub mod view;

// Re-export main types
pub use notifier::{CompletionMessage, Notifier};
pub use ticker::{IntervalTicker, ManualTicker, TickHandle, TickId, Ticker};
pub use timer::{minutes_from_input, TimerEngine};
pub use view::{format_countdown, NullRenderer, Renderer, TimerView, WatchRenderer};
