//! Completion notification seam

use crate::state::TimerMode;

/// Title and body shown when a countdown completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionMessage {
    pub title: &'static str,
    pub body: &'static str,
}

impl CompletionMessage {
    pub fn for_mode(completed: TimerMode) -> Self {
        match completed {
            TimerMode::Focus => Self {
                title: "Focus time complete!",
                body: "Great work! Time for a break.",
            },
            TimerMode::Break => Self {
                title: "Break time over!",
                body: "Ready to focus again?",
            },
        }
    }
}

/// User-visible alert fired when a countdown completes.
///
/// Implementations must return promptly and must not fail the engine when
/// the underlying capability is unavailable.
pub trait Notifier: Send + Sync {
    fn notify(&self, completed: TimerMode);
}
