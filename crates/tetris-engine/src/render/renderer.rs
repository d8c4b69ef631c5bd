use crate::coords::{Color, Rect, Viewport};
use crate::math::Matrix4x4;

use super::backend::{GpuBackend, IndexedDraw};
use super::batch::QuadBatch;
use super::quad::{quad_indices, Quad, Vertex, INDICES_PER_QUAD, VERTICES_PER_QUAD};
use super::shader::{self, ShaderProgram};
use super::RenderError;

/// Name of the projection uniform the quad program must declare.
pub const PROJECTION_UNIFORM: &str = "u_projection";

/// Renderer configuration. Fixed for the lifetime of a [`Renderer`].
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Hard cap on quads per frame. Sizes the vertex, index and batch buffers.
    pub max_quad_count: u32,

    /// Viewport size in pixels; the projection maps it onto the full target.
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Color written by [`Renderer::begin_drawing`].
    pub clear_color: Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_quad_count: 1024,
            viewport_width: 720,
            viewport_height: 480,
            clear_color: Color::black(),
        }
    }
}

impl RendererConfig {
    fn validate(&self) -> Result<(), RenderError> {
        if self.max_quad_count == 0 {
            return Err(RenderError::InvalidConfig("max_quad_count must be > 0".to_owned()));
        }
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "viewport must be non-empty, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        if self.max_quad_count.checked_mul(INDICES_PER_QUAD).is_none()
            || self.max_quad_count.checked_mul(VERTICES_PER_QUAD).is_none()
        {
            return Err(RenderError::InvalidConfig(format!(
                "max_quad_count {} overflows 32-bit indices",
                self.max_quad_count
            )));
        }
        if !self.clear_color.is_normalized() {
            return Err(RenderError::InvalidConfig(format!(
                "clear color {:?} outside [0, 1]",
                self.clear_color
            )));
        }
        Ok(())
    }
}

/// Summary of the draw issued by [`Renderer::end_drawing`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub quad_count: u32,
    pub index_count: u32,
    pub bytes_uploaded: u64,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameState {
    BetweenFrames,
    Accumulating,
}

struct GpuObjects<B: GpuBackend> {
    vertex_buffer: B::Buffer,
    index_buffer: B::Buffer,
    projection_buffer: B::Buffer,
    pipeline: B::Pipeline,
}

/// Batched quad renderer.
///
/// Per frame: [`begin_drawing`](Self::begin_drawing), any number of
/// [`draw_quad`](Self::draw_quad), then [`end_drawing`](Self::end_drawing), which
/// uploads the batch and records a single indexed draw. Presenting the frame is
/// left to the caller.
///
/// GPU objects and batch storage are released once, by [`destroy`](Self::destroy)
/// or on drop.
pub struct Renderer<B: GpuBackend> {
    backend: B,
    gpu: GpuObjects<B>,
    quads: QuadBatch,
    projection: Matrix4x4,
    config: RendererConfig,
    state: FrameState,
}

impl<B: GpuBackend> Renderer<B> {
    /// Creates all GPU objects and uploads the static index buffer and projection.
    pub fn new(backend: B, config: RendererConfig) -> Result<Self, RenderError> {
        config.validate()?;
        let program = shader::build_quad_program()?;
        Self::with_program(backend, config, program)
    }

    /// Like [`new`](Self::new) with a caller-built program.
    ///
    /// The program is checked before anything is allocated: it must declare
    /// [`PROJECTION_UNIFORM`] and read only [`Vertex`] attributes in their formats.
    pub fn with_program(mut backend: B, config: RendererConfig, program: ShaderProgram) -> Result<Self, RenderError> {
        config.validate()?;

        let slot = program
            .uniform_binding(PROJECTION_UNIFORM)
            .ok_or(RenderError::MissingUniform { name: PROJECTION_UNIFORM })?;
        program.check_vertex_layout(&Vertex::ATTRS)?;

        let max_quads = config.max_quad_count;
        let vertex_bytes = u64::from(max_quads) * std::mem::size_of::<Quad>() as u64;
        let vertex_buffer = backend.create_vertex_buffer("tetris quad vbo", vertex_bytes)?;

        let indices = quad_indices(max_quads);
        let index_buffer = backend.create_index_buffer("tetris quad ibo", &indices)?;
        drop(indices);

        let projection = Matrix4x4::orthographic(
            0.0,
            config.viewport_width as f32,
            0.0,
            config.viewport_height as f32,
            -1.0,
            1.0,
        );
        let projection_buffer =
            backend.create_uniform_buffer("tetris projection ubo", bytemuck::bytes_of(&projection))?;

        let pipeline = backend.create_pipeline(&program, slot, &projection_buffer)?;

        let quads = QuadBatch::with_capacity(max_quads as usize);

        log::info!(
            "renderer initialized: {} quads max, viewport {}x{}",
            max_quads,
            config.viewport_width,
            config.viewport_height
        );

        Ok(Self {
            backend,
            gpu: GpuObjects {
                vertex_buffer,
                index_buffer,
                projection_buffer,
                pipeline,
            },
            quads,
            projection,
            config,
            state: FrameState::BetweenFrames,
        })
    }

    /// Clears the target and starts an empty batch.
    ///
    /// # Panics
    /// Panics if the previous frame was not finished with `end_drawing`.
    #[track_caller]
    pub fn begin_drawing(&mut self, target: &mut B::Target<'_>) -> Result<(), RenderError> {
        assert!(
            self.state == FrameState::BetweenFrames,
            "Renderer::begin_drawing: previous frame not ended"
        );

        self.backend.clear(target, self.config.clear_color)?;
        self.quads.reset();
        self.state = FrameState::Accumulating;
        Ok(())
    }

    /// Queues an axis-aligned rectangle with its corner at (`x`, `y`).
    ///
    /// # Panics
    /// Panics outside `begin_drawing`/`end_drawing`, if `width` or `height` is
    /// not positive, if a color channel is outside `[0, 1]`, or if the frame
    /// already holds `max_quad_count` quads.
    #[track_caller]
    pub fn draw_quad(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        assert!(
            self.state == FrameState::Accumulating,
            "Renderer::draw_quad: called outside begin_drawing/end_drawing"
        );
        assert!(width > 0.0, "Renderer::draw_quad: width must be > 0, got {width}");
        assert!(height > 0.0, "Renderer::draw_quad: height must be > 0, got {height}");
        assert!(
            color.is_normalized(),
            "Renderer::draw_quad: color channels must be in [0, 1], got {color:?}"
        );
        assert!(
            !self.quads.is_full(),
            "Renderer::draw_quad: batch full ({} quads)",
            self.quads.capacity()
        );

        self.quads.push(Quad::new(x, y, width, height, color));
    }

    #[inline]
    #[track_caller]
    pub fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.draw_quad(rect.origin.x, rect.origin.y, rect.size.x, rect.size.y, color);
    }

    /// Uploads the batch and records one indexed draw covering it.
    ///
    /// An empty batch uploads nothing and records no draw.
    ///
    /// # Panics
    /// Panics if no frame was started with `begin_drawing`.
    #[track_caller]
    pub fn end_drawing(&mut self, target: &mut B::Target<'_>) -> Result<FrameStats, RenderError> {
        assert!(
            self.state == FrameState::Accumulating,
            "Renderer::end_drawing: begin_drawing was not called"
        );
        self.state = FrameState::BetweenFrames;

        let quads = self.quads.as_slice();
        if quads.is_empty() {
            return Ok(FrameStats::default());
        }

        let bytes: &[u8] = bytemuck::cast_slice(quads);
        // Bounded by max_quad_count, which validate() keeps within u32 indices.
        let quad_count = quads.len() as u32;
        let index_count = quad_count * INDICES_PER_QUAD;

        self.backend.write_buffer(&self.gpu.vertex_buffer, 0, bytes)?;
        self.backend.draw_indexed(
            target,
            IndexedDraw {
                pipeline: &self.gpu.pipeline,
                vertex_buffer: &self.gpu.vertex_buffer,
                index_buffer: &self.gpu.index_buffer,
                index_count,
            },
        )?;

        Ok(FrameStats {
            quad_count,
            index_count,
            bytes_uploaded: bytes.len() as u64,
        })
    }

    /// Releases every GPU object and the batch storage.
    pub fn destroy(self) {
        drop(self);
    }

    /// Quads queued in the current (or last) frame.
    #[inline]
    pub fn batch(&self) -> &[Quad] {
        self.quads.as_slice()
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    #[inline]
    pub fn max_quad_count(&self) -> u32 {
        self.config.max_quad_count
    }

    #[inline]
    pub fn frame_state(&self) -> FrameState {
        self.state
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.config.viewport_width as f32, self.config.viewport_height as f32)
    }

    #[inline]
    pub fn projection(&self) -> &Matrix4x4 {
        &self.projection
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: GpuBackend> Drop for Renderer<B> {
    fn drop(&mut self) {
        self.backend.destroy_pipeline(&self.gpu.pipeline);
        self.backend.destroy_buffer(&self.gpu.projection_buffer);
        self.backend.destroy_buffer(&self.gpu.index_buffer);
        self.backend.destroy_buffer(&self.gpu.vertex_buffer);
        log::debug!("renderer destroyed");
    }
}
