//! Focus/break timer engine
//!
//! A synchronous state machine driven by explicit commands and by ticks
//! delivered from outside. The engine owns the [`TimerState`], the optional
//! tick handle, and the garden slots; persistence, notifications and
//! rendering are pluggable collaborators.

use std::sync::Arc;
use tracing::{debug, info};

use super::{
    notifier::Notifier,
    ticker::{TickHandle, TickId, Ticker},
    view::{NullRenderer, Renderer, TimerView},
};
use crate::{
    services::PersistenceBridge,
    state::{
        garden::Garden,
        timer_state::{DEFAULT_BREAK_MINUTES, DEFAULT_FOCUS_MINUTES},
        TimerConfig, TimerMode, TimerState,
    },
};

pub struct TimerEngine {
    state: TimerState,
    garden: Garden,
    tick: Option<TickHandle>,
    last_tick_id: TickId,
    ticker: Arc<dyn Ticker>,
    persistence: Option<PersistenceBridge>,
    notifier: Option<Arc<dyn Notifier>>,
    renderer: Arc<dyn Renderer>,
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state)
            .field("garden", &self.garden)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

impl TimerEngine {
    /// Idle focus engine with no persistence, notifications or renderer
    pub fn new(config: TimerConfig, sessions_completed: u32, ticker: Arc<dyn Ticker>) -> Self {
        Self {
            state: TimerState::new(config, sessions_completed),
            garden: Garden::default(),
            tick: None,
            last_tick_id: 0,
            ticker,
            persistence: None,
            notifier: None,
            renderer: Arc::new(NullRenderer),
        }
    }

    /// Engine restored from persisted durations and session count
    pub fn load(persistence: PersistenceBridge, ticker: Arc<dyn Ticker>) -> Self {
        let config = persistence.load_config();
        let sessions = persistence.load_sessions_completed();
        info!(
            "Loaded timer settings: focus={}s, break={}s, sessions={}",
            config.focus_duration_seconds, config.break_duration_seconds, sessions
        );
        Self::new(config, sessions, ticker).with_persistence(persistence)
    }

    pub fn with_persistence(mut self, persistence: PersistenceBridge) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self.render();
        self
    }

    pub fn with_garden_slots(mut self, slots: usize) -> Self {
        self.garden = Garden::new(slots);
        self.render();
        self
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn config(&self) -> TimerConfig {
        self.state.config()
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Id of the active repeating tick, if running
    pub fn active_tick(&self) -> Option<TickId> {
        self.tick.as_ref().map(TickHandle::id)
    }

    pub fn view(&self) -> TimerView {
        TimerView::new(&self.state, self.garden.render(self.state.sessions_completed))
    }

    fn render(&self) {
        self.renderer.render(&self.view());
    }

    fn save_sessions(&self) {
        if let Some(persistence) = &self.persistence {
            persistence.save_sessions_completed(self.state.sessions_completed);
        }
    }

    fn save_config(&self) {
        if let Some(persistence) = &self.persistence {
            persistence.save_config(&self.state.config());
        }
    }

    /// Start counting down. Rejected while running or with nothing left.
    pub fn start(&mut self) -> bool {
        if self.state.running || self.state.time_left_seconds == 0 {
            return false;
        }

        self.last_tick_id += 1;
        self.tick = Some(self.ticker.start(self.last_tick_id));
        self.state.running = true;
        debug!(
            "Timer started: mode={}, left={}s, tick={}",
            self.state.mode.as_str(),
            self.state.time_left_seconds,
            self.last_tick_id
        );
        self.render();
        true
    }

    /// Stop counting down and release the tick
    pub fn pause(&mut self) -> bool {
        if !self.state.running {
            return false;
        }

        self.tick = None;
        self.state.running = false;
        debug!(
            "Timer paused: mode={}, left={}s",
            self.state.mode.as_str(),
            self.state.time_left_seconds
        );
        self.render();
        true
    }

    /// Pause if running, else start. Returns the new running flag.
    pub fn toggle(&mut self) -> bool {
        if self.state.running {
            self.pause();
        } else {
            self.start();
        }
        self.state.running
    }

    /// Back to an idle focus countdown with the session counter zeroed
    pub fn reset(&mut self) {
        self.pause();
        self.state.mode = TimerMode::Focus;
        self.state.time_left_seconds = self.state.focus_duration_seconds;
        self.state.sessions_completed = 0;
        self.save_sessions();
        self.garden.clear();
        info!("Timer reset");
        self.render();
    }

    pub fn switch_to_focus(&mut self) {
        self.switch_to(TimerMode::Focus);
    }

    pub fn switch_to_break(&mut self) {
        self.switch_to(TimerMode::Break);
    }

    /// Pressing the active mode pauses/resumes it; pressing the other mode
    /// restarts the countdown in that mode
    fn switch_to(&mut self, target: TimerMode) {
        if self.state.mode == target {
            if self.state.running {
                self.pause();
                return;
            }
        } else {
            self.pause();
            self.state.mode = target;
            self.state.time_left_seconds = self.state.duration_of(target);
            info!("Switched to {} mode", target.as_str());
        }

        if target == TimerMode::Focus {
            self.garden.plant(self.state.sessions_completed);
        }
        if !self.start() {
            self.render();
        }
    }

    /// Advance the active countdown by one second.
    ///
    /// Returns the completed mode when this tick brought the countdown to
    /// zero. Ticks while idle are ignored.
    pub fn tick(&mut self) -> Option<TimerMode> {
        if !self.state.running {
            return None;
        }

        self.state.time_left_seconds = self.state.time_left_seconds.saturating_sub(1);
        self.render();

        if self.state.time_left_seconds == 0 {
            let completed = self.state.mode;
            self.complete();
            return Some(completed);
        }
        None
    }

    /// Deliver a tick from the repeating tick tagged `id`. Ticks from a
    /// handle that is no longer active are dropped.
    pub fn handle_tick(&mut self, id: TickId) -> Option<TimerMode> {
        if self.active_tick() != Some(id) {
            debug!("Ignoring stale tick {}", id);
            return None;
        }
        self.tick()
    }

    fn complete(&mut self) {
        let completed = self.state.mode;
        self.pause();
        info!("{} countdown complete", completed.as_str());

        if let Some(notifier) = &self.notifier {
            notifier.notify(completed);
        }

        match completed {
            TimerMode::Focus => {
                self.garden.grow();
                self.state.sessions_completed = self.state.sessions_completed.saturating_add(1);
                self.save_sessions();
                info!("Sessions completed: {}", self.state.sessions_completed);
                self.switch_to_break();
            }
            TimerMode::Break => self.switch_to_focus(),
        }
    }

    /// Set the focus duration; non-positive input falls back to 25 minutes
    pub fn set_focus_duration(&mut self, minutes: i64) {
        self.set_duration(TimerMode::Focus, minutes);
    }

    /// Set the break duration; non-positive input falls back to 5 minutes
    pub fn set_break_duration(&mut self, minutes: i64) {
        self.set_duration(TimerMode::Break, minutes);
    }

    fn set_duration(&mut self, mode: TimerMode, minutes: i64) {
        let default = match mode {
            TimerMode::Focus => DEFAULT_FOCUS_MINUTES,
            TimerMode::Break => DEFAULT_BREAK_MINUTES,
        };
        let seconds = if minutes > 0 {
            u32::try_from(minutes.saturating_mul(60)).unwrap_or(u32::MAX)
        } else {
            default * 60
        };

        match mode {
            TimerMode::Focus => self.state.focus_duration_seconds = seconds,
            TimerMode::Break => self.state.break_duration_seconds = seconds,
        }
        self.save_config();
        info!("{} duration set to {}s", mode.as_str(), seconds);

        // Only an idle countdown in the same mode picks up the new value
        if self.state.mode == mode && !self.state.running {
            self.state.time_left_seconds = seconds;
        }
        self.render();
    }
}

/// Integer minutes from user-entered text: optional sign then leading
/// digits, anything after is ignored. Text with no leading digits reads as
/// 0, which the duration setters turn into their default.
pub fn minutes_from_input(input: &str) -> i64 {
    let input = input.trim_start();
    let (negative, digits) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });

    if negative {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::ticker::ManualTicker,
        services::{persistence::keys, store::KeyValueStore, MemoryStore},
        state::garden::SlotState,
    };
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        fired: Mutex<Vec<TimerMode>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, completed: TimerMode) {
            self.fired.lock().unwrap().push(completed);
        }
    }

    fn engine() -> (TimerEngine, ManualTicker) {
        let ticker = ManualTicker::new();
        let engine = TimerEngine::new(TimerConfig::default(), 0, Arc::new(ticker.clone()));
        (engine, ticker)
    }

    fn persisted_engine() -> (TimerEngine, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let bridge = PersistenceBridge::new(store.clone());
        let engine = TimerEngine::load(bridge, Arc::new(ManualTicker::new()));
        (engine, store)
    }

    fn run_ticks(engine: &mut TimerEngine, n: u32) -> Vec<TimerMode> {
        (0..n).filter_map(|_| engine.tick()).collect()
    }

    #[test]
    fn test_initial_state() {
        let (engine, ticker) = engine();
        let state = engine.state();
        assert_eq!(state.mode, TimerMode::Focus);
        assert!(!state.running);
        assert_eq!(state.time_left_seconds, 1500);
        assert_eq!(engine.active_tick(), None);
        assert_eq!(ticker.active(), 0);
    }

    #[test]
    fn test_ticks_decrement_by_one() {
        for n in [0u32, 1, 59, 600, 1499] {
            let (mut engine, _) = engine();
            engine.start();
            run_ticks(&mut engine, n);
            assert_eq!(engine.state().time_left_seconds, 1500 - n);
            assert!(engine.is_running());
        }
    }

    #[test]
    fn test_ticks_while_idle_do_nothing() {
        let (mut engine, _) = engine();
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.state().time_left_seconds, 1500);
    }

    #[test]
    fn test_double_start_schedules_one_tick() {
        let (mut engine, ticker) = engine();
        assert!(engine.start());
        assert!(!engine.start());
        assert_eq!(ticker.active(), 1);
        assert_eq!(ticker.started(), 1);
    }

    #[test]
    fn test_pause_releases_tick() {
        let (mut engine, ticker) = engine();
        assert!(!engine.pause());

        engine.start();
        assert!(engine.pause());
        assert!(!engine.is_running());
        assert_eq!(engine.active_tick(), None);
        assert_eq!(ticker.active(), 0);
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let (mut engine, ticker) = engine();
        engine.tick();
        let before = engine.state().clone();

        assert!(engine.toggle());
        engine.tick();
        engine.tick();
        assert!(!engine.toggle());

        let after = engine.state();
        assert_eq!(after.running, before.running);
        assert_eq!(after.mode, before.mode);
        assert_eq!(after.time_left_seconds, before.time_left_seconds - 2);
        assert_eq!(ticker.active(), 0);
    }

    #[test]
    fn test_start_rejected_at_zero() {
        let (mut engine, ticker) = engine();
        engine.state.time_left_seconds = 0;
        assert!(!engine.start());
        assert!(!engine.is_running());
        assert_eq!(ticker.started(), 0);
    }

    #[test]
    fn test_stale_ticks_are_ignored() {
        let (mut engine, _) = engine();
        engine.start();
        let first = engine.active_tick().unwrap();
        engine.pause();
        engine.start();
        let second = engine.active_tick().unwrap();
        assert_ne!(first, second);

        assert_eq!(engine.handle_tick(first), None);
        assert_eq!(engine.state().time_left_seconds, 1500);

        engine.handle_tick(second);
        assert_eq!(engine.state().time_left_seconds, 1499);
    }

    #[test]
    fn test_full_focus_cycle_with_defaults() {
        let (mut engine, ticker) = engine();
        let notifier = Arc::new(RecordingNotifier::default());
        engine = engine.with_notifier(notifier.clone());

        engine.start();
        let completions = run_ticks(&mut engine, 1500);

        assert_eq!(completions, vec![TimerMode::Focus]);
        assert_eq!(*notifier.fired.lock().unwrap(), vec![TimerMode::Focus]);

        let state = engine.state();
        assert_eq!(state.mode, TimerMode::Break);
        assert_eq!(state.time_left_seconds, 300);
        assert_eq!(state.sessions_completed, 1);
        assert!(state.running);
        assert_eq!(ticker.active(), 1);
    }

    #[test]
    fn test_break_completion_returns_to_focus() {
        let (mut engine, _) = engine();
        engine.switch_to_break();
        assert_eq!(engine.state().time_left_seconds, 300);

        let completions = run_ticks(&mut engine, 300);
        assert_eq!(completions, vec![TimerMode::Break]);

        let state = engine.state();
        assert_eq!(state.mode, TimerMode::Focus);
        assert_eq!(state.time_left_seconds, 1500);
        assert_eq!(state.sessions_completed, 0);
        assert!(state.running);
    }

    #[test]
    fn test_cycle_repeats_until_paused() {
        let (mut engine, ticker) = engine();
        engine.start();
        let completions = run_ticks(&mut engine, 1500 + 300 + 1500);
        assert_eq!(
            completions,
            vec![TimerMode::Focus, TimerMode::Break, TimerMode::Focus]
        );
        assert_eq!(engine.state().sessions_completed, 2);
        assert_eq!(engine.state().mode, TimerMode::Break);
        assert_eq!(ticker.active(), 1);
    }

    #[test]
    fn test_reset_from_any_state() {
        let (mut engine, ticker) = engine();
        engine.start();
        run_ticks(&mut engine, 1600);
        assert_eq!(engine.state().mode, TimerMode::Break);

        engine.reset();
        let state = engine.state();
        assert_eq!(state.mode, TimerMode::Focus);
        assert!(!state.running);
        assert_eq!(state.time_left_seconds, 1500);
        assert_eq!(state.sessions_completed, 0);
        assert_eq!(ticker.active(), 0);
        assert!(engine.view().slots.iter().all(|s| *s == SlotState::Empty));

        engine.reset();
        assert_eq!(engine.state().time_left_seconds, 1500);
    }

    #[test]
    fn test_same_mode_button_pauses_and_resumes() {
        let (mut engine, _) = engine();
        engine.switch_to_focus();
        assert!(engine.is_running());
        run_ticks(&mut engine, 10);

        engine.switch_to_focus();
        assert!(!engine.is_running());
        assert_eq!(engine.state().time_left_seconds, 1490);

        engine.switch_to_focus();
        assert!(engine.is_running());
        assert_eq!(engine.state().time_left_seconds, 1490);
    }

    #[test]
    fn test_other_mode_button_restarts_countdown() {
        let (mut engine, ticker) = engine();
        engine.start();
        run_ticks(&mut engine, 10);

        engine.switch_to_break();
        assert_eq!(engine.state().mode, TimerMode::Break);
        assert_eq!(engine.state().time_left_seconds, 300);
        assert!(engine.is_running());
        assert_eq!(ticker.active(), 1);

        engine.switch_to_focus();
        assert_eq!(engine.state().time_left_seconds, 1500);
        assert_eq!(engine.state().sessions_completed, 0);
    }

    #[test]
    fn test_focus_switch_sprouts_current_slot() {
        let (mut engine, _) = engine();
        engine.switch_to_focus();
        assert_eq!(engine.view().slots[0], SlotState::Sprouting);

        run_ticks(&mut engine, 1500);
        let slots = engine.view().slots;
        assert_eq!(slots[0], SlotState::Grown);
        assert_eq!(slots[1], SlotState::Empty);
    }

    #[test]
    fn test_set_focus_duration_while_idle() {
        let (mut engine, _) = engine();
        engine.set_focus_duration(10);
        assert_eq!(engine.state().focus_duration_seconds, 600);
        assert_eq!(engine.state().time_left_seconds, 600);
        assert_eq!(engine.view().minutes, "10");
    }

    #[test]
    fn test_invalid_durations_fall_back() {
        let (mut engine, _) = engine();
        engine.set_focus_duration(-5);
        assert_eq!(engine.state().focus_duration_seconds, 1500);

        engine.set_break_duration(0);
        assert_eq!(engine.state().break_duration_seconds, 300);
    }

    #[test]
    fn test_duration_change_does_not_touch_running_countdown() {
        let (mut engine, _) = engine();
        engine.start();
        run_ticks(&mut engine, 5);

        engine.set_focus_duration(50);
        assert_eq!(engine.state().focus_duration_seconds, 3000);
        assert_eq!(engine.state().time_left_seconds, 1495);

        engine.set_break_duration(1);
        assert_eq!(engine.state().time_left_seconds, 1495);

        run_ticks(&mut engine, 1495);
        assert_eq!(engine.state().mode, TimerMode::Break);
        assert_eq!(engine.state().time_left_seconds, 60);
    }

    #[test]
    fn test_other_mode_duration_change_keeps_idle_display() {
        let (mut engine, _) = engine();
        engine.set_break_duration(15);
        assert_eq!(engine.state().time_left_seconds, 1500);
    }

    #[test]
    fn test_persists_sessions_and_config() {
        let (mut engine, store) = persisted_engine();
        engine.set_focus_duration(1);
        engine.start();
        run_ticks(&mut engine, 60);

        assert_eq!(
            store.get(keys::SESSIONS_COMPLETED).unwrap().as_deref(),
            Some("1")
        );

        let reloaded = TimerEngine::load(
            PersistenceBridge::new(store.clone()),
            Arc::new(ManualTicker::new()),
        );
        assert_eq!(reloaded.state().focus_duration_seconds, 60);
        assert_eq!(reloaded.state().time_left_seconds, 60);
        assert_eq!(reloaded.state().sessions_completed, 1);
        assert!(!reloaded.is_running());

        engine.reset();
        assert_eq!(
            store.get(keys::SESSIONS_COMPLETED).unwrap().as_deref(),
            Some("0")
        );
    }

    #[test]
    fn test_session_counter_saturates() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::SESSIONS_COMPLETED, &u32::MAX.to_string()).unwrap();
        let mut engine = TimerEngine::load(
            PersistenceBridge::new(store.clone()),
            Arc::new(ManualTicker::new()),
        );
        assert_eq!(engine.state().sessions_completed, u32::MAX);

        engine.set_focus_duration(1);
        engine.start();
        let completions = run_ticks(&mut engine, 60);

        assert_eq!(completions, vec![TimerMode::Focus]);
        assert_eq!(engine.state().sessions_completed, u32::MAX);
        assert_eq!(engine.state().mode, TimerMode::Break);
        assert_eq!(
            store.get(keys::SESSIONS_COMPLETED).unwrap(),
            Some(u32::MAX.to_string())
        );
    }

    #[test]
    fn test_minutes_from_input() {
        assert_eq!(minutes_from_input("10"), 10);
        assert_eq!(minutes_from_input("  15 "), 15);
        assert_eq!(minutes_from_input("12.5"), 12);
        assert_eq!(minutes_from_input("-5"), -5);
        assert_eq!(minutes_from_input("abc"), 0);
        assert_eq!(minutes_from_input(""), 0);
    }
}
