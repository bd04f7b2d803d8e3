//! Periodic tick sources

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Callback invoked once per tick
pub type TickCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// A source of periodic ticks.
///
/// At most one subscription is live at a time; subscribing again replaces the
/// previous callback. `unsubscribe` must take effect before it returns.
pub trait Ticker: Send + Sync {
    fn subscribe(&self, callback: TickCallback);
    fn unsubscribe(&self);
}

/// Ticker backed by a tokio interval task
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    handle: Handle,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl IntervalTicker {
    /// Create a ticker that fires every `period`, spawning onto `handle`
    pub fn new(period: Duration, handle: Handle) -> Self {
        Self {
            period,
            handle,
            task: Mutex::new(None),
        }
    }
}

impl Ticker for IntervalTicker {
    fn subscribe(&self, callback: TickCallback) {
        let period = self.period;
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = task.take() {
            previous.abort();
        }

        debug!("Starting interval ticker every {:?}", period);
        *task = Some(self.handle.spawn(async move {
            // First tick fires one full period after subscribing
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                callback();
            }
        }));
    }

    fn unsubscribe(&self) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(running) = task.take() {
            debug!("Stopping interval ticker");
            running.abort();
        }
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Ticker driven by explicit [`ManualTicker::fire`] calls
#[derive(Default)]
pub struct ManualTicker {
    callback: Mutex<Option<TickCallback>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_subscribed(&self) -> bool {
        self.callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Deliver one tick to the current subscriber. Returns false if nobody is subscribed.
    pub fn fire(&self) -> bool {
        // Clone out so the callback runs without our lock held
        let callback = self
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Deliver `count` ticks, returning how many reached a subscriber
    pub fn fire_n(&self, count: usize) -> usize {
        (0..count).filter(|_| self.fire()).count()
    }
}

impl Ticker for ManualTicker {
    fn subscribe(&self, callback: TickCallback) {
        *self.callback.lock().unwrap_or_else(PoisonError::into_inner) = Some(callback);
    }

    fn unsubscribe(&self) {
        self.callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}
