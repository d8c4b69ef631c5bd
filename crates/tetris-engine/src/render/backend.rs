use crate::coords::Color;

use super::shader::{ShaderProgram, UniformSlot};
use super::RenderError;

/// Graphics calls the quad renderer depends on.
///
/// Every call reports failure through [`RenderError`] instead of aborting, so the
/// renderer can propagate it with `?`. The production implementation is
/// [`WgpuBackend`](super::WgpuBackend).
pub trait GpuBackend {
    /// GPU buffer handle (vertex, index or uniform).
    type Buffer;

    /// Linked program plus whatever binding state is needed to draw with it.
    type Pipeline;

    /// Per-frame destination for clears and draws.
    type Target<'t>;

    /// Allocates an uninitialized vertex buffer of `size` bytes, writable every frame.
    fn create_vertex_buffer(&mut self, label: &'static str, size: u64) -> Result<Self::Buffer, RenderError>;

    /// Allocates and fills an immutable index buffer.
    fn create_index_buffer(&mut self, label: &'static str, indices: &[u32]) -> Result<Self::Buffer, RenderError>;

    /// Allocates and fills a uniform buffer.
    fn create_uniform_buffer(&mut self, label: &'static str, contents: &[u8]) -> Result<Self::Buffer, RenderError>;

    /// Creates the draw pipeline for `program` with `uniform` bound at `slot`.
    fn create_pipeline(
        &mut self,
        program: &ShaderProgram,
        slot: UniformSlot,
        uniform: &Self::Buffer,
    ) -> Result<Self::Pipeline, RenderError>;

    /// Overwrites `data.len()` bytes of `buffer` starting at `offset`.
    fn write_buffer(&mut self, buffer: &Self::Buffer, offset: u64, data: &[u8]) -> Result<(), RenderError>;

    /// Clears the color target of `target`.
    fn clear(&mut self, target: &mut Self::Target<'_>, color: Color) -> Result<(), RenderError>;

    /// Records one indexed triangle-list draw.
    fn draw_indexed(&mut self, target: &mut Self::Target<'_>, draw: IndexedDraw<'_, Self>) -> Result<(), RenderError>;

    fn destroy_buffer(&mut self, buffer: &Self::Buffer);

    fn destroy_pipeline(&mut self, pipeline: &Self::Pipeline);
}

/// Arguments of a single indexed draw.
pub struct IndexedDraw<'a, B: GpuBackend + ?Sized> {
    pub pipeline: &'a B::Pipeline,
    pub vertex_buffer: &'a B::Buffer,
    pub index_buffer: &'a B::Buffer,
    pub index_count: u32,
}
