//! Timer state structure and management

use serde::{Deserialize, Serialize};

/// Default focus duration in minutes
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
/// Default break duration in minutes
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

/// The two countdown phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Focus,
    Break,
}

impl TimerMode {
    /// Label shown on the mode button while the mode is idle
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Focus => "FOCUS",
            TimerMode::Break => "BREAK",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::Break => "break",
        }
    }
}

/// Focus/break durations, the persisted part of the timer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub focus_duration_seconds: u32,
    pub break_duration_seconds: u32,
}

impl TimerConfig {
    pub fn new(focus_duration_seconds: u32, break_duration_seconds: u32) -> Self {
        Self {
            focus_duration_seconds,
            break_duration_seconds,
        }
    }

    /// Duration of the given mode in seconds
    pub fn duration_of(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus_duration_seconds,
            TimerMode::Break => self.break_duration_seconds,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_MINUTES * 60, DEFAULT_BREAK_MINUTES * 60)
    }
}

/// Countdown state owned by the timer engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: TimerMode,
    pub running: bool,
    pub time_left_seconds: u32,
    pub focus_duration_seconds: u32,
    pub break_duration_seconds: u32,
    pub sessions_completed: u32,
}

impl TimerState {
    /// Idle focus state built from a configuration and a restored session count
    pub fn new(config: TimerConfig, sessions_completed: u32) -> Self {
        Self {
            mode: TimerMode::Focus,
            running: false,
            time_left_seconds: config.focus_duration_seconds,
            focus_duration_seconds: config.focus_duration_seconds,
            break_duration_seconds: config.break_duration_seconds,
            sessions_completed,
        }
    }

    pub fn config(&self) -> TimerConfig {
        TimerConfig::new(self.focus_duration_seconds, self.break_duration_seconds)
    }

    /// Duration the countdown resets to when entering `mode`
    pub fn duration_of(&self, mode: TimerMode) -> u32 {
        self.config().duration_of(mode)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(TimerConfig::default(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_idle_focus() {
        let state = TimerState::default();
        assert_eq!(state.mode, TimerMode::Focus);
        assert!(!state.running);
        assert_eq!(state.time_left_seconds, 1500);
        assert_eq!(state.break_duration_seconds, 300);
        assert_eq!(state.sessions_completed, 0);
    }
}
