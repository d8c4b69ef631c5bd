//! GPU context owned by the application side of the renderer.
//!
//! Creates the wgpu instance/adapter/device/queue, configures the window surface,
//! and hands out per-frame encoders. The renderer itself only sees the device and
//! queue through [`WgpuBackend`](crate::render::WgpuBackend).

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
