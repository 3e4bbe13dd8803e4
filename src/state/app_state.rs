//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::info;

use super::{
    garden::DEFAULT_GARDEN_SLOTS,
    settings_state::{DisplaySettings, DisplaySettingsUpdate},
    todo_state::{TodoItem, TodoList},
};
use crate::{
    engine::{Notifier, TickId, Ticker, TimerEngine, TimerView, WatchRenderer},
    services::PersistenceBridge,
    state::TimerMode,
};

/// Optional timer capabilities chosen at startup
#[derive(Clone)]
pub struct TimerOptions {
    pub notifier: Option<Arc<dyn Notifier>>,
    pub garden_slots: usize,
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self {
            notifier: None,
            garden_slots: DEFAULT_GARDEN_SLOTS,
        }
    }
}

/// Owned instances of the timer, to-do list and display settings, shared
/// between the HTTP handlers and the tick driver
#[derive(Debug)]
pub struct AppState {
    /// Timer engine, the only owner of the countdown state
    pub engine: Arc<Mutex<TimerEngine>>,
    pub todos: Arc<Mutex<TodoList>>,
    pub display: Arc<Mutex<DisplaySettings>>,
    pub persistence: PersistenceBridge,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Latest rendered timer view
    pub timer_view_rx: watch::Receiver<TimerView>,
}

impl AppState {
    /// Restore all state from `persistence` and wire the engine to `ticker`
    pub fn new(
        port: u16,
        host: String,
        persistence: PersistenceBridge,
        ticker: Arc<dyn Ticker>,
        options: TimerOptions,
    ) -> Self {
        let (view_tx, view_rx) = watch::channel(TimerView::default());

        let mut engine = TimerEngine::load(persistence.clone(), ticker)
            .with_garden_slots(options.garden_slots)
            .with_renderer(Arc::new(WatchRenderer::new(view_tx)));
        if let Some(notifier) = options.notifier {
            engine = engine.with_notifier(notifier);
        }

        let todos = TodoList::new(persistence.load_todo_items());
        let display_settings = persistence.load_display_settings();
        info!(
            "Restored {} to-do items, night_mode={}, font={:?}",
            todos.items().len(),
            display_settings.night_mode,
            display_settings.font
        );

        Self {
            engine: Arc::new(Mutex::new(engine)),
            todos: Arc::new(Mutex::new(todos)),
            display: Arc::new(Mutex::new(display_settings)),
            persistence,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            timer_view_rx: view_rx,
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Run a timer command and return its result with the resulting view
    pub fn timer_command<R, F>(&self, action: &str, command: F) -> Result<(R, TimerView), String>
    where
        F: FnOnce(&mut TimerEngine) -> R,
    {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;

        let result = command(&mut engine);
        let view = engine.view();
        drop(engine);

        self.record_action(action);
        Ok((result, view))
    }

    /// Deliver a tick from the repeating tick `id`
    pub fn handle_tick(&self, id: TickId) -> Result<Option<TimerMode>, String> {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;
        Ok(engine.handle_tick(id))
    }

    /// Current timer view
    pub fn get_timer_view(&self) -> Result<TimerView, String> {
        self.engine.lock()
            .map(|engine| engine.view())
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    /// Run a read-only query against the engine
    pub fn with_engine<R>(&self, query: impl FnOnce(&TimerEngine) -> R) -> Result<R, String> {
        self.engine.lock()
            .map(|engine| query(&engine))
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    pub fn get_todos(&self) -> Result<Vec<TodoItem>, String> {
        self.todos.lock()
            .map(|todos| todos.items().to_vec())
            .map_err(|e| format!("Failed to lock to-do list: {}", e))
    }

    /// Headline task text shown above the timer
    pub fn get_current_task(&self) -> Result<String, String> {
        self.todos.lock()
            .map(|todos| todos.headline().to_string())
            .map_err(|e| format!("Failed to lock to-do list: {}", e))
    }

    /// Apply a change to the to-do list, persisting it when `update` reports one
    fn update_todos<R, F>(&self, action: &str, update: F) -> Result<Option<R>, String>
    where
        F: FnOnce(&mut TodoList) -> Option<R>,
    {
        let mut todos = self.todos.lock()
            .map_err(|e| format!("Failed to lock to-do list: {}", e))?;

        let result = update(&mut todos);
        if result.is_some() {
            self.persistence.save_todo_items(todos.items());
            drop(todos);
            self.record_action(action);
        }
        Ok(result)
    }

    pub fn add_todo(&self, text: &str) -> Result<Option<TodoItem>, String> {
        self.update_todos("todo-add", |todos| todos.add(text))
    }

    pub fn toggle_todo(&self, id: i64) -> Result<Option<TodoItem>, String> {
        self.update_todos("todo-toggle", |todos| todos.toggle(id))
    }

    pub fn delete_todo(&self, id: i64) -> Result<bool, String> {
        self.update_todos("todo-delete", |todos| todos.delete(id).then_some(()))
            .map(|deleted| deleted.is_some())
    }

    pub fn get_display_settings(&self) -> Result<DisplaySettings, String> {
        self.display.lock()
            .map(|settings| *settings)
            .map_err(|e| format!("Failed to lock display settings: {}", e))
    }

    pub fn update_display_settings(&self, update: &DisplaySettingsUpdate) -> Result<DisplaySettings, String> {
        let mut settings = self.display.lock()
            .map_err(|e| format!("Failed to lock display settings: {}", e))?;

        if settings.apply(update) {
            info!("Display settings: night_mode={}, font={:?}", settings.night_mode, settings.font);
            self.persistence.save_display_settings(&settings);
        }
        let updated = *settings;
        drop(settings);

        self.record_action("display-settings");
        Ok(updated)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
