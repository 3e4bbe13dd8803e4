//! Display view of the timer and the renderer seam

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::state::{garden::SlotState, TimerMode, TimerState};

/// Label shown on the active mode button while it counts down
pub const PAUSE_LABEL: &str = "PAUSE";

/// Everything the display needs to draw the timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerView {
    pub minutes: String,
    pub seconds: String,
    pub mode: TimerMode,
    pub running: bool,
    pub time_left_seconds: u32,
    pub focus_label: String,
    pub break_label: String,
    pub sessions_completed: u32,
    pub slots: Vec<SlotState>,
}

impl TimerView {
    pub fn new(state: &TimerState, slots: Vec<SlotState>) -> Self {
        let (minutes, seconds) = format_countdown(state.time_left_seconds);
        Self {
            minutes,
            seconds,
            mode: state.mode,
            running: state.running,
            time_left_seconds: state.time_left_seconds,
            focus_label: button_label(state, TimerMode::Focus).to_string(),
            break_label: button_label(state, TimerMode::Break).to_string(),
            sessions_completed: state.sessions_completed,
            slots,
        }
    }

    /// `MM:SS` form of the countdown
    pub fn clock(&self) -> String {
        format!("{}:{}", self.minutes, self.seconds)
    }
}

impl Default for TimerView {
    fn default() -> Self {
        Self::new(&TimerState::default(), Vec::new())
    }
}

/// Zero-padded two-digit minutes and seconds. Minutes grow past two digits
/// for durations of 100 minutes or more.
pub fn format_countdown(time_left_seconds: u32) -> (String, String) {
    (
        format!("{:02}", time_left_seconds / 60),
        format!("{:02}", time_left_seconds % 60),
    )
}

fn button_label(state: &TimerState, button: TimerMode) -> &'static str {
    if state.mode == button && state.running {
        PAUSE_LABEL
    } else {
        button.label()
    }
}

/// Receives a fresh view after every timer state change
pub trait Renderer: Send + Sync {
    fn render(&self, view: &TimerView);
}

/// Renderer for headless use
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&self, _view: &TimerView) {}
}

/// Publishes views into a watch channel
#[derive(Debug)]
pub struct WatchRenderer {
    tx: watch::Sender<TimerView>,
}

impl WatchRenderer {
    pub fn new(tx: watch::Sender<TimerView>) -> Self {
        Self { tx }
    }
}

impl Renderer for WatchRenderer {
    fn render(&self, view: &TimerView) {
        // send_if_modified keeps the value current even with no receivers
        self.tx.send_if_modified(|current| {
            if *current == *view {
                false
            } else {
                *current = view.clone();
                true
            }
        });
    }
}
