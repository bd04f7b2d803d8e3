//! Presenter background task

use tokio::sync::watch;
use tracing::{debug, info};

use crate::state::{Phase, TimerState, TimerView};

/// Re-render the timer every time it changes. Phase changes are logged at
/// info, plain ticks at debug. Returns once the controller is gone.
pub async fn presenter_task(mut updates: watch::Receiver<TimerState>) {
    info!("Starting presenter task");

    let mut last_phase: Option<Phase> = None;

    loop {
        let view = TimerView::from(&*updates.borrow_and_update());

        if last_phase != Some(view.phase) {
            info!(
                "{}  {} {}",
                view.display,
                view.phase.as_str(),
                view.controls_line()
            );
            last_phase = Some(view.phase);
        } else {
            debug!("{}", view.display);
        }

        if updates.changed().await.is_err() {
            debug!("Timer controller dropped, stopping presenter");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, time::Duration};
    use crate::{state::TimerController, tasks::ManualTicker};

    #[tokio::test]
    async fn stops_when_controller_is_dropped() {
        let ticker = Arc::new(ManualTicker::new());
        let controller = TimerController::new(ticker.clone());
        let handle = tokio::spawn(presenter_task(controller.subscribe()));

        controller.start().unwrap();
        ticker.fire_n(2);
        controller.finish().unwrap();
        drop(controller);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("presenter should stop")
            .expect("presenter should not panic");
    }
}
