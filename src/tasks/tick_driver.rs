//! Tick driver background task

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, trace};

use crate::{engine::TickId, state::AppState};

/// Background task that feeds ticks from the interval ticker into the engine
pub async fn tick_driver_task(state: Arc<AppState>, mut tick_rx: mpsc::UnboundedReceiver<TickId>) {
    info!("Starting tick driver task");

    while let Some(id) = tick_rx.recv().await {
        trace!("Tick {} received", id);
        match state.handle_tick(id) {
            Ok(Some(completed)) => {
                info!("Tick {} completed the {} countdown", id, completed.as_str());
            }
            Ok(None) => {}
            Err(e) => {
                error!("Failed to deliver tick {}: {}", id, e);
            }
        }
    }

    info!("Tick channel closed, tick driver stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::{
        engine::IntervalTicker,
        services::{MemoryStore, PersistenceBridge},
        state::{TimerMode, TimerOptions},
    };

    fn spawn_state() -> Arc<AppState> {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let ticker = IntervalTicker::new(tick_tx).unwrap();
        let state = Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            PersistenceBridge::new(Arc::new(MemoryStore::new())),
            Arc::new(ticker),
            TimerOptions::default(),
        ));
        tokio::spawn(tick_driver_task(Arc::clone(&state), tick_rx));
        state
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_follows_clock() {
        let state = spawn_state();
        state.timer_command("start", |engine| engine.start()).unwrap();

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(state.get_timer_view().unwrap().time_left_seconds, 1497);

        state.timer_command("pause", |engine| engine.pause()).unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(state.get_timer_view().unwrap().time_left_seconds, 1497);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_does_not_double_tick() {
        let state = spawn_state();
        state.timer_command("start", |engine| engine.start()).unwrap();
        state.timer_command("start", |engine| engine.start()).unwrap();
        state.timer_command("toggle", |engine| engine.toggle()).unwrap();
        state.timer_command("toggle", |engine| engine.toggle()).unwrap();

        tokio::time::sleep(Duration::from_millis(5500)).await;
        assert_eq!(state.get_timer_view().unwrap().time_left_seconds, 1495);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_switches_to_break() {
        let state = spawn_state();
        state
            .timer_command("durations", |engine| engine.set_focus_duration(1))
            .unwrap();
        state.timer_command("start", |engine| engine.start()).unwrap();

        tokio::time::sleep(Duration::from_millis(60_500)).await;
        let view = state.get_timer_view().unwrap();
        assert_eq!(view.mode, TimerMode::Break);
        assert_eq!(view.sessions_completed, 1);
        assert_eq!(view.time_left_seconds, 300);
        assert!(view.running);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(state.get_timer_view().unwrap().time_left_seconds, 298);
    }
}
