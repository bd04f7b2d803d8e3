//! State management module
//! 
//! This module contains the timer state machine, its controller and the
//! read model presenters render from.

pub mod app_state;
pub mod controller;
pub mod timer_state;
pub mod view;

// Re-export main types
pub use app_state::AppState;
pub use controller::{TimerController, Transition};
pub use timer_state::{apply, Control, Phase, TimerEvent, TimerState};
pub use view::TimerView;
