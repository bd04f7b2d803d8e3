//! Background tasks module
//! 
//! This module contains the tick sources that drive the timer and the
//! presenter task that renders it.

pub mod presenter;
pub mod ticker;

// Re-export main items
pub use presenter::presenter_task;
pub use ticker::{IntervalTicker, ManualTicker, TickCallback, Ticker};
