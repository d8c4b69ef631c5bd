use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction};
use crate::render::RenderTarget;
use crate::time::FrameTime;

use super::app::AppControl;

/// Window handle and metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Logical window size as `(width, height)`.
    pub fn logical_size(&self) -> (f32, f32) {
        let logical: winit::dpi::LogicalSize<f64> =
            self.window.inner_size().to_logical(self.window.scale_factor());
        (logical.width as f32, logical.height as f32)
    }
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
///
/// `'a` is the callback duration, `'w` the window borrow carried by `Gpu<'w>`.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires the next surface texture, lets `draw` record into it, then submits
    /// and presents.
    ///
    /// Nothing is cleared here; the renderer's `begin_drawing` owns the clear. A
    /// failed acquisition skips the frame, or returns `Exit` when the surface
    /// cannot recover.
    pub fn render<F>(&mut self, draw: F) -> anyhow::Result<AppControl>
    where
        F: FnOnce(&mut RenderTarget<'_>) -> anyhow::Result<()>,
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("surface acquisition failed: {err}");
                return Ok(match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => AppControl::Continue,
                });
            }
        };

        // Target borrows the frame's encoder; drop it before presenting.
        {
            let mut target = frame.target();
            draw(&mut target)?;
        }

        self.window.window.pre_present_notify();
        self.gpu.present(frame);

        Ok(AppControl::Continue)
    }
}
