//! Frame timing for the runtime loop.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
