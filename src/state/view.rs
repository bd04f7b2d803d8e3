//! Read model shared by all presenters

use serde::{Deserialize, Serialize};

use super::timer_state::{Control, Phase, TimerState};
use crate::utils::format_elapsed;

/// What a presenter shows for a given timer state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerView {
    pub display: String,
    pub elapsed_seconds: u64,
    pub phase: Phase,
    pub controls: Vec<Control>,
}

impl TimerView {
    /// Render the control labels as a single line, e.g. `[Pause] [Quit]`
    pub fn controls_line(&self) -> String {
        self.controls
            .iter()
            .map(|control| format!("[{}]", control.label()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<&TimerState> for TimerView {
    fn from(state: &TimerState) -> Self {
        Self {
            display: format_elapsed(state.elapsed_seconds),
            elapsed_seconds: state.elapsed_seconds,
            phase: state.phase,
            controls: state.controls(),
        }
    }
}
