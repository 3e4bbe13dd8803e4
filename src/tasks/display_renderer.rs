//! Display renderer background task

use tokio::sync::watch;
use tracing::{debug, info};

use crate::engine::TimerView;

/// Follow rendered timer views and log what the display would show
pub async fn display_renderer_task(mut view_rx: watch::Receiver<TimerView>) {
    info!("Starting display renderer task");

    let mut last = view_rx.borrow_and_update().clone();
    while view_rx.changed().await.is_ok() {
        let view = view_rx.borrow_and_update().clone();

        if view.mode != last.mode || view.running != last.running {
            info!(
                "{} {} [{} | {}]",
                view.mode.label(),
                view.clock(),
                view.focus_label,
                view.break_label
            );
        }
        if view.sessions_completed != last.sessions_completed {
            info!("Garden: {:?}", view.slots);
        }
        debug!("{}", view.clock());

        last = view;
    }

    debug!("Timer view channel closed, display renderer stopped");
}
