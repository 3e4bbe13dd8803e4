//! Repeating one-second tick scheduling
//!
//! The engine never talks to a runtime directly. It asks a [`Ticker`] for a
//! repeating tick and keeps the returned [`TickHandle`] while running;
//! dropping the handle cancels the tick.

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{
    runtime::{Handle, TryCurrentError},
    sync::mpsc,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, trace};

/// Generation id of a repeating tick. Ticks carry the id of the handle that
/// produced them so the engine can discard ticks from cancelled handles.
pub type TickId = u64;

/// Period of the repeating countdown tick
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Creates repeating ticks
pub trait Ticker: Send + Sync {
    /// Begin a repeating tick tagged with `id`
    fn start(&self, id: TickId) -> TickHandle;
}

/// Owned handle to an active repeating tick; cancels it on drop
pub struct TickHandle {
    id: TickId,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TickHandle {
    pub fn new(id: TickId, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn id(&self) -> TickId {
        self.id
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            trace!("Cancelling tick {}", self.id);
            cancel();
        }
    }
}

impl std::fmt::Debug for TickHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickHandle").field("id", &self.id).finish()
    }
}

/// Tokio-backed ticker: one interval task per handle, each tick sent as the
/// handle id over a channel to the tick driver
#[derive(Debug, Clone)]
pub struct IntervalTicker {
    runtime: Handle,
    tick_tx: mpsc::UnboundedSender<TickId>,
    period: Duration,
}

impl IntervalTicker {
    /// Must be called from within a tokio runtime
    pub fn new(tick_tx: mpsc::UnboundedSender<TickId>) -> Result<Self, TryCurrentError> {
        Self::with_period(tick_tx, TICK_PERIOD)
    }

    pub fn with_period(
        tick_tx: mpsc::UnboundedSender<TickId>,
        period: Duration,
    ) -> Result<Self, TryCurrentError> {
        Ok(Self {
            runtime: Handle::try_current()?,
            tick_tx,
            period,
        })
    }
}

impl Ticker for IntervalTicker {
    fn start(&self, id: TickId) -> TickHandle {
        let tick_tx = self.tick_tx.clone();
        let period = self.period;

        let task = self.runtime.spawn(async move {
            // First tick fires one full period after start
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if tick_tx.send(id).is_err() {
                    debug!("Tick receiver closed, stopping tick {}", id);
                    break;
                }
            }
        });

        TickHandle::new(id, move || task.abort())
    }
}

/// Ticker that schedules nothing; the owner delivers ticks by hand.
/// Counts live handles so callers can check that only one tick is active.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    active: Arc<AtomicUsize>,
    started: Arc<AtomicUsize>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles currently alive
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Handles created so far
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

impl Ticker for ManualTicker {
    fn start(&self, id: TickId) -> TickHandle {
        self.active.fetch_add(1, Ordering::SeqCst);
        self.started.fetch_add(1, Ordering::SeqCst);
        let active = Arc::clone(&self.active);
        TickHandle::new(id, move || {
            active.fetch_sub(1, Ordering::SeqCst);
        })
    }
}
