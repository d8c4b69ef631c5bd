use winit::event::WindowEvent;

use crate::device::Gpu;

use super::ctx::{FrameCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application driven by [`Runtime`](crate::window::Runtime).
///
/// Call order: `on_start` once after the GPU context exists, then `on_frame` per
/// redraw interleaved with `on_window_event`, then `on_exit` once while the GPU
/// context is still alive.
pub trait App {
    /// Creates GPU-side state (renderers, buffers). An error aborts the run.
    fn on_start(&mut self, gpu: &Gpu<'_>, window: &WindowCtx<'_>) -> anyhow::Result<()>;

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> anyhow::Result<AppControl>;

    /// Releases GPU-side state. The GPU context is dropped right after.
    fn on_exit(&mut self) {}
}
