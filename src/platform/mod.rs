//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (monotonic clocks and frame deltas)

pub mod time;

pub use time::{Clock, FrameClock, ManualClock, SystemClock};
