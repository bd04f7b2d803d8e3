//! Timer controller: owns the live timer state and its tick subscription

use std::sync::{Arc, Mutex, PoisonError, Weak};
use tokio::sync::watch;
use tracing::{debug, info, trace};

use super::timer_state::{apply, TimerEvent, TimerState};
use crate::tasks::ticker::{TickCallback, Ticker};

/// Result of a transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: TimerState,
    /// False when the event was out of phase and nothing happened
    pub changed: bool,
}

#[derive(Debug)]
struct Inner {
    state: TimerState,
    /// Generation of the live tick subscription, if any
    subscription: Option<u64>,
    next_subscription: u64,
}

/// Drives a [`TimerState`] with a [`Ticker`] and publishes every change
pub struct TimerController {
    inner: Mutex<Inner>,
    ticker: Arc<dyn Ticker>,
    update_tx: watch::Sender<TimerState>,
    me: Weak<TimerController>,
}

impl TimerController {
    /// Create an idle controller using `ticker` as its tick source
    pub fn new(ticker: Arc<dyn Ticker>) -> Arc<Self> {
        let (update_tx, _) = watch::channel(TimerState::new());

        Arc::new_cyclic(|me| Self {
            inner: Mutex::new(Inner {
                state: TimerState::new(),
                subscription: None,
                next_subscription: 1,
            }),
            ticker,
            update_tx,
            me: me.clone(),
        })
    }

    /// Receive every committed state change
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.update_tx.subscribe()
    }

    /// Get the current state
    pub fn state(&self) -> Result<TimerState, String> {
        self.inner
            .lock()
            .map(|inner| inner.state)
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Start or resume counting
    pub fn start(&self) -> Result<Transition, String> {
        self.dispatch(TimerEvent::Start)
    }

    /// Stop counting and keep the elapsed time
    pub fn pause(&self) -> Result<Transition, String> {
        self.dispatch(TimerEvent::Pause)
    }

    /// Stop counting and reset to zero
    pub fn quit(&self) -> Result<Transition, String> {
        self.dispatch(TimerEvent::Quit)
    }

    /// Stop counting and freeze the elapsed time
    pub fn finish(&self) -> Result<Transition, String> {
        self.dispatch(TimerEvent::Finish)
    }

    /// Apply a user-facing event. Ticks only come from the ticker and are
    /// ignored here.
    pub fn dispatch(&self, event: TimerEvent) -> Result<Transition, String> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        if event == TimerEvent::Tick {
            debug!("Ignoring tick dispatched outside the ticker");
            return Ok(Transition {
                state: inner.state,
                changed: false,
            });
        }

        let transition = self.transition(&mut inner, event);
        drop(inner);

        if transition.changed {
            info!(
                "Timer {}: phase={} elapsed={}s",
                event.as_str(),
                transition.state.phase.as_str(),
                transition.state.elapsed_seconds
            );
            self.update_tx.send_replace(transition.state);
        } else {
            debug!(
                "Ignoring {} while {}",
                event.as_str(),
                transition.state.phase.as_str()
            );
        }

        Ok(transition)
    }

    /// Release the tick subscription without touching the state
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.subscription.take().is_some() {
            info!("Releasing tick subscription");
            self.ticker.unsubscribe();
        }
    }

    /// Handle a tick from subscription `generation`
    fn tick(&self, generation: u64) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.subscription != Some(generation) {
            trace!("Dropping tick from released subscription {}", generation);
            return;
        }

        let transition = self.transition(&mut inner, TimerEvent::Tick);
        drop(inner);

        if transition.changed {
            trace!("Tick: elapsed={}s", transition.state.elapsed_seconds);
            self.update_tx.send_replace(transition.state);
        }
    }

    /// Apply `event` and bring the tick subscription in line with the new phase.
    /// Must be called with the state lock held.
    fn transition(&self, inner: &mut Inner, event: TimerEvent) -> Transition {
        let previous = inner.state;
        let next = apply(previous, event);

        if !previous.is_running() && next.is_running() {
            let generation = inner.next_subscription;
            inner.next_subscription += 1;
            inner.subscription = Some(generation);
            self.ticker.subscribe(self.tick_callback(generation));
        } else if previous.is_running() && !next.is_running() {
            inner.subscription = None;
            self.ticker.unsubscribe();
        }

        inner.state = next;
        Transition {
            state: next,
            changed: next != previous,
        }
    }

    fn tick_callback(&self, generation: u64) -> TickCallback {
        let me = self.me.clone();
        Arc::new(move || {
            if let Some(controller) = me.upgrade() {
                controller.tick(generation);
            }
        })
    }
}

impl Drop for TimerController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::timer_state::Phase;
    use crate::tasks::ticker::{IntervalTicker, ManualTicker};
    use std::time::Duration;
    use tokio::runtime::Handle;

    fn manual() -> (Arc<ManualTicker>, Arc<TimerController>) {
        let ticker = Arc::new(ManualTicker::new());
        let controller = TimerController::new(ticker.clone());
        (ticker, controller)
    }

    #[test]
    fn starts_idle() {
        let (ticker, controller) = manual();
        assert_eq!(controller.state().unwrap(), TimerState::new());
        assert!(!ticker.is_subscribed());
    }

    #[test]
    fn start_subscribes_and_ticks_count() {
        let (ticker, controller) = manual();

        let transition = controller.start().unwrap();
        assert!(transition.changed);
        assert_eq!(transition.state.phase, Phase::Running);
        assert!(ticker.is_subscribed());

        assert_eq!(ticker.fire_n(3), 3);
        assert_eq!(controller.state().unwrap().elapsed_seconds, 3);
    }

    #[test]
    fn pause_keeps_elapsed_and_stops_ticks() {
        let (ticker, controller) = manual();
        controller.start().unwrap();
        ticker.fire_n(2);

        let paused = controller.pause().unwrap();
        assert_eq!(paused.state.phase, Phase::Paused);
        assert_eq!(paused.state.elapsed_seconds, 2);
        assert!(!ticker.is_subscribed());

        ticker.fire_n(5);
        assert_eq!(controller.state().unwrap().elapsed_seconds, 2);
    }

    #[test]
    fn pausing_twice_is_a_noop() {
        let (ticker, controller) = manual();
        controller.start().unwrap();
        ticker.fire();
        let first = controller.pause().unwrap();

        let second = controller.pause().unwrap();
        assert!(!second.changed);
        assert_eq!(second.state, first.state);
    }

    #[test]
    fn resume_continues_counting() {
        let (ticker, controller) = manual();
        controller.start().unwrap();
        ticker.fire_n(2);
        controller.pause().unwrap();
        controller.start().unwrap();
        ticker.fire_n(2);

        assert_eq!(
            controller.state().unwrap(),
            TimerState {
                elapsed_seconds: 4,
                phase: Phase::Running
            }
        );
    }

    #[test]
    fn quit_resets_from_any_active_phase() {
        let (ticker, controller) = manual();

        controller.start().unwrap();
        ticker.fire_n(3);
        assert_eq!(controller.quit().unwrap().state, TimerState::new());
        assert!(!ticker.is_subscribed());

        controller.start().unwrap();
        ticker.fire();
        controller.pause().unwrap();
        assert_eq!(controller.quit().unwrap().state, TimerState::new());

        controller.start().unwrap();
        ticker.fire();
        controller.finish().unwrap();
        assert_eq!(controller.quit().unwrap().state, TimerState::new());

        assert!(!controller.quit().unwrap().changed);
    }

    #[test]
    fn finish_freezes_elapsed() {
        let (ticker, controller) = manual();
        controller.start().unwrap();
        ticker.fire_n(4);

        let finished = controller.finish().unwrap();
        assert_eq!(finished.state.phase, Phase::Finished);
        assert_eq!(finished.state.elapsed_seconds, 4);
        assert!(!ticker.is_subscribed());

        ticker.fire_n(3);
        assert!(!controller.start().unwrap().changed);
        assert_eq!(controller.state().unwrap(), finished.state);
    }

    #[test]
    fn finish_from_paused_keeps_elapsed() {
        let (ticker, controller) = manual();
        controller.start().unwrap();
        ticker.fire_n(5);
        controller.pause().unwrap();

        let finished = controller.finish().unwrap();
        assert!(finished.changed);
        assert_eq!(
            finished.state,
            TimerState {
                elapsed_seconds: 5,
                phase: Phase::Finished
            }
        );
        assert!(!ticker.is_subscribed());
    }

    #[test]
    fn out_of_phase_calls_do_not_subscribe() {
        let (ticker, controller) = manual();
        assert!(!controller.pause().unwrap().changed);
        assert!(!controller.finish().unwrap().changed);
        assert!(!ticker.is_subscribed());

        controller.start().unwrap();
        assert!(!controller.start().unwrap().changed);
        assert!(ticker.is_subscribed());
    }

    #[test]
    fn dispatched_ticks_are_ignored() {
        let (_ticker, controller) = manual();
        controller.start().unwrap();
        assert!(!controller.dispatch(TimerEvent::Tick).unwrap().changed);
        assert_eq!(controller.state().unwrap().elapsed_seconds, 0);
    }

    #[test]
    fn ticks_from_a_released_subscription_are_dropped() {
        let (_ticker, controller) = manual();
        controller.start().unwrap();
        controller.pause().unwrap();
        controller.start().unwrap();

        // Generation 1 belonged to the first run
        controller.tick(1);
        assert_eq!(controller.state().unwrap().elapsed_seconds, 0);

        controller.tick(2);
        assert_eq!(controller.state().unwrap().elapsed_seconds, 1);
    }

    #[test]
    fn dropping_the_controller_releases_the_ticker() {
        let (ticker, controller) = manual();
        controller.start().unwrap();
        assert!(ticker.is_subscribed());

        drop(controller);
        assert!(!ticker.is_subscribed());
        assert!(!ticker.fire());
    }

    #[test]
    fn shutdown_releases_without_resetting() {
        let (ticker, controller) = manual();
        controller.start().unwrap();
        ticker.fire();

        controller.shutdown();
        assert!(!ticker.is_subscribed());
        assert_eq!(controller.state().unwrap().elapsed_seconds, 1);
    }

    #[test]
    fn changes_are_published() {
        let (ticker, controller) = manual();
        let rx = controller.subscribe();

        controller.start().unwrap();
        ticker.fire_n(2);
        assert_eq!(*rx.borrow(), controller.state().unwrap());
        assert_eq!(rx.borrow().elapsed_seconds, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn counts_real_intervals() {
        let ticker = Arc::new(IntervalTicker::new(Duration::from_secs(1), Handle::current()));
        let controller = TimerController::new(ticker);

        controller.start().unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;
        controller.pause().unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(
            controller.state().unwrap(),
            TimerState {
                elapsed_seconds: 3,
                phase: Phase::Paused
            }
        );
    }
}
