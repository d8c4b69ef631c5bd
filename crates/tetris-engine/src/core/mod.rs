//! Contract between the runtime loop and the application.
//!
//! The runtime owns the window and the GPU context; the application owns its
//! renderer and receives per-frame access to both through [`FrameCtx`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
