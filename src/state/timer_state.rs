//! Timer state structure and the pure transition function

use serde::{Deserialize, Serialize};

/// The four mutually exclusive timer phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Finished,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::Finished => "finished",
        }
    }
}

/// Inputs accepted by [`apply`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Start,
    Pause,
    /// One period of the ticker elapsed
    Tick,
    Quit,
    Finish,
}

impl TimerEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerEvent::Start => "start",
            TimerEvent::Pause => "pause",
            TimerEvent::Tick => "tick",
            TimerEvent::Quit => "quit",
            TimerEvent::Finish => "finish",
        }
    }
}

/// Stopwatch state: elapsed seconds plus the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub elapsed_seconds: u64,
    pub phase: Phase,
}

impl TimerState {
    /// Create the initial idle state at zero
    pub fn new() -> Self {
        Self {
            elapsed_seconds: 0,
            phase: Phase::Idle,
        }
    }

    /// Check if the timer is counting
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Controls a presenter should offer for this state
    pub fn controls(&self) -> Vec<Control> {
        match self.phase {
            Phase::Idle => vec![Control::Start],
            Phase::Running => vec![Control::Pause, Control::Quit],
            Phase::Paused if self.elapsed_seconds == 0 => vec![Control::Start],
            Phase::Paused => vec![Control::Resume, Control::Finish],
            // Nothing leads out of Finished from the screen yet; Quit still works
            Phase::Finished => Vec::new(),
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply one event to a state. Out-of-phase events return the state unchanged.
pub fn apply(state: TimerState, event: TimerEvent) -> TimerState {
    use Phase::*;

    match (state.phase, event) {
        (Idle | Paused, TimerEvent::Start) => TimerState {
            phase: Running,
            ..state
        },
        (Running, TimerEvent::Pause) => TimerState {
            phase: Paused,
            ..state
        },
        (Running, TimerEvent::Tick) => TimerState {
            elapsed_seconds: state.elapsed_seconds.saturating_add(1),
            ..state
        },
        (Running | Paused | Finished, TimerEvent::Quit) => TimerState::new(),
        (Running | Paused, TimerEvent::Finish) => TimerState {
            phase: Finished,
            ..state
        },
        _ => state,
    }
}

/// A button the presenter can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    Start,
    Pause,
    Resume,
    Quit,
    Finish,
}

impl Control {
    pub fn as_str(&self) -> &'static str {
        match self {
            Control::Start => "start",
            Control::Pause => "pause",
            Control::Resume => "resume",
            Control::Quit => "quit",
            Control::Finish => "finish",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Control::Start => "Start",
            Control::Pause => "Pause",
            Control::Resume => "Resume",
            Control::Quit => "Quit",
            Control::Finish => "Finish",
        }
    }

    /// The transition this control triggers
    pub fn event(&self) -> TimerEvent {
        match self {
            Control::Start | Control::Resume => TimerEvent::Start,
            Control::Pause => TimerEvent::Pause,
            Control::Quit => TimerEvent::Quit,
            Control::Finish => TimerEvent::Finish,
        }
    }
}
