//! Batched quad rendering.
//!
//! Quads are accumulated on the CPU during a frame and flushed with one upload and
//! one indexed draw.
//!
//! Convention:
//! - CPU geometry is in pixels (top-left origin, +Y down).
//! - The vertex shader maps pixels to NDC with a fixed orthographic projection.

mod backend;
mod batch;
mod ctx;
mod error;
mod quad;
mod renderer;
pub mod shader;
mod wgpu_backend;

pub use backend::{GpuBackend, IndexedDraw};
pub use ctx::RenderTarget;
pub use error::RenderError;
pub use quad::{quad_indices, Quad, Vertex, INDICES_PER_QUAD, QUAD_INDEX_PATTERN, VERTICES_PER_QUAD};
pub use renderer::{FrameState, FrameStats, Renderer, RendererConfig, PROJECTION_UNIFORM};
pub use shader::{ShaderError, ShaderKind, ShaderProgram, VertexInput};
pub use wgpu_backend::{QuadPipeline, WgpuBackend};
