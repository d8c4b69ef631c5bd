use wgpu::util::DeviceExt;

use crate::coords::Color;

use super::backend::{GpuBackend, IndexedDraw};
use super::quad::Vertex;
use super::shader::{ShaderProgram, UniformSlot};
use super::{RenderError, RenderTarget};

/// [`GpuBackend`] over a wgpu device/queue pair.
///
/// Arguments are checked against device limits and destination sizes before
/// each call. Device-side calls additionally run inside validation and
/// out-of-memory error scopes, so anything wgpu rejects comes back as
/// [`RenderError::Backend`] naming the call instead of reaching the uncaptured
/// error handler.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_format: wgpu::TextureFormat,
}

/// Render pipeline plus the bind group carrying the projection uniform.
pub struct QuadPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
}

impl WgpuBackend {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            device: device.clone(),
            queue: queue.clone(),
            surface_format,
        }
    }

    fn check_size(&self, label: &'static str, size: u64) -> Result<(), RenderError> {
        check_buffer_size(label, size, self.device.limits().max_buffer_size)
    }

    /// Runs `f` inside error scopes and reports whatever the device captured.
    fn scoped<T>(&self, call: &'static str, f: impl FnOnce(&wgpu::Device, &wgpu::Queue) -> T) -> Result<T, RenderError> {
        let oom = self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let validation = self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let value = f(&self.device, &self.queue);

        let validation = pollster::block_on(validation.pop());
        let oom = pollster::block_on(oom.pop());
        match validation.or(oom) {
            None => Ok(value),
            Some(err) => {
                log::error!("{call} failed: {err}");
                Err(RenderError::backend(call, err.to_string()))
            }
        }
    }
}

fn check_buffer_size(label: &'static str, size: u64, max: u64) -> Result<(), RenderError> {
    if size > max {
        return Err(RenderError::BufferTooLarge { label, size, max });
    }
    Ok(())
}

fn check_write(buffer_size: u64, offset: u64, len: u64) -> Result<(), RenderError> {
    let end = offset.saturating_add(len);
    if end > buffer_size {
        return Err(RenderError::backend(
            "write_buffer",
            format!("write of {len} bytes at offset {offset} overruns buffer of {buffer_size} bytes"),
        ));
    }
    if offset % wgpu::COPY_BUFFER_ALIGNMENT != 0 || len % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
        return Err(RenderError::backend(
            "write_buffer",
            format!(
                "write of {len} bytes at offset {offset} is not aligned to {}",
                wgpu::COPY_BUFFER_ALIGNMENT
            ),
        ));
    }
    Ok(())
}

fn check_index_count(index_buffer_size: u64, index_count: u32) -> Result<(), RenderError> {
    let capacity = index_buffer_size / std::mem::size_of::<u32>() as u64;
    if u64::from(index_count) > capacity {
        return Err(RenderError::backend(
            "draw_indexed",
            format!("{index_count} indices requested, index buffer holds {capacity}"),
        ));
    }
    Ok(())
}

fn check_uniform_slot(slot: UniformSlot) -> Result<(), RenderError> {
    if slot.group != 0 {
        return Err(RenderError::backend(
            "create_bind_group_layout",
            format!("uniform must live in bind group 0, program uses group {}", slot.group),
        ));
    }
    Ok(())
}

impl GpuBackend for WgpuBackend {
    type Buffer = wgpu::Buffer;
    type Pipeline = QuadPipeline;
    type Target<'t> = RenderTarget<'t>;

    fn create_vertex_buffer(&mut self, label: &'static str, size: u64) -> Result<wgpu::Buffer, RenderError> {
        self.check_size(label, size)?;
        log::debug!("creating vertex buffer `{label}` ({size} bytes)");

        self.scoped("create_buffer", |device, _| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        })
    }

    fn create_index_buffer(&mut self, label: &'static str, indices: &[u32]) -> Result<wgpu::Buffer, RenderError> {
        let contents: &[u8] = bytemuck::cast_slice(indices);
        self.check_size(label, contents.len() as u64)?;
        log::debug!("creating index buffer `{label}` ({} indices)", indices.len());

        self.scoped("create_buffer_init", |device, _| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::INDEX,
            })
        })
    }

    fn create_uniform_buffer(&mut self, label: &'static str, contents: &[u8]) -> Result<wgpu::Buffer, RenderError> {
        self.check_size(label, contents.len() as u64)?;

        self.scoped("create_buffer_init", |device, _| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        })
    }

    fn create_pipeline(
        &mut self,
        program: &ShaderProgram,
        slot: UniformSlot,
        uniform: &wgpu::Buffer,
    ) -> Result<QuadPipeline, RenderError> {
        check_uniform_slot(slot)?;

        let vs_module = self.scoped("create_shader_module", |device, _| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("tetris quad vs"),
                source: wgpu::ShaderSource::Wgsl(program.vertex_source().into()),
            })
        })?;
        let fs_module = self.scoped("create_shader_module", |device, _| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("tetris quad fs"),
                source: wgpu::ShaderSource::Wgsl(program.fragment_source().into()),
            })
        })?;

        let (bind_group_layout, bind_group) = self.scoped("create_bind_group", |device, _| {
            let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("tetris quad bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: slot.binding,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(uniform.size()),
                    },
                    count: None,
                }],
            });
            let group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("tetris quad bind group"),
                layout: &layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: slot.binding,
                    resource: uniform.as_entire_binding(),
                }],
            });
            (layout, group)
        })?;

        let format = self.surface_format;
        let pipeline = self.scoped("create_render_pipeline", |device, _| {
            let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("tetris quad pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("tetris quad pipeline"),
                layout: Some(&layout),

                vertex: wgpu::VertexState {
                    module: &vs_module,
                    entry_point: Some(program.vertex_entry()),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout()],
                },

                // Opaque, no blending: later quads overwrite earlier ones.
                fragment: Some(wgpu::FragmentState {
                    module: &fs_module,
                    entry_point: Some(program.fragment_entry()),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        })?;

        log::debug!("created quad pipeline for {format:?}");

        Ok(QuadPipeline { pipeline, bind_group })
    }

    fn write_buffer(&mut self, buffer: &wgpu::Buffer, offset: u64, data: &[u8]) -> Result<(), RenderError> {
        check_write(buffer.size(), offset, data.len() as u64)?;
        self.scoped("write_buffer", |_, queue| queue.write_buffer(buffer, offset, data))
    }

    fn clear(&mut self, target: &mut RenderTarget<'_>, color: Color) -> Result<(), RenderError> {
        let _rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tetris clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: color.r as f64,
                        g: color.g as f64,
                        b: color.b as f64,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        Ok(())
    }

    fn draw_indexed(&mut self, target: &mut RenderTarget<'_>, draw: IndexedDraw<'_, Self>) -> Result<(), RenderError> {
        check_index_count(draw.index_buffer.size(), draw.index_count)?;

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tetris quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&draw.pipeline.pipeline);
        rpass.set_bind_group(0, &draw.pipeline.bind_group, &[]);
        rpass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
        rpass.set_index_buffer(draw.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..draw.index_count, 0, 0..1);

        Ok(())
    }

    fn destroy_buffer(&mut self, buffer: &wgpu::Buffer) {
        buffer.destroy();
    }

    fn destroy_pipeline(&mut self, _pipeline: &QuadPipeline) {
        // Pipelines and bind groups are released when dropped.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_call(err: RenderError) -> &'static str {
        match err {
            RenderError::Backend { call, .. } => call,
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn buffer_size_limit() {
        assert!(check_buffer_size("vbo", 256, 256).is_ok());
        assert_eq!(
            check_buffer_size("vbo", 257, 256),
            Err(RenderError::BufferTooLarge { label: "vbo", size: 257, max: 256 })
        );
    }

    #[test]
    fn write_must_fit_buffer() {
        assert!(check_write(240, 0, 240).is_ok());
        assert!(check_write(240, 80, 160).is_ok());
        assert_eq!(backend_call(check_write(240, 80, 240).unwrap_err()), "write_buffer");
        assert!(check_write(240, u64::MAX, 4).is_err());
    }

    #[test]
    fn write_must_be_copy_aligned() {
        let err = check_write(64, 0, 6).unwrap_err();
        assert!(err.to_string().contains("not aligned"), "{err}");
        assert!(check_write(64, 2, 4).is_err());
    }

    #[test]
    fn index_count_within_buffer() {
        // Two quads worth of u32 indices.
        assert!(check_index_count(48, 12).is_ok());
        assert!(check_index_count(48, 0).is_ok());
        let err = check_index_count(48, 13).unwrap_err();
        assert!(err.to_string().contains("index buffer holds 12"), "{err}");
        assert_eq!(backend_call(err), "draw_indexed");
    }

    #[test]
    fn uniform_must_be_in_group_zero() {
        assert!(check_uniform_slot(UniformSlot { group: 0, binding: 3 }).is_ok());
        let err = check_uniform_slot(UniformSlot { group: 1, binding: 0 }).unwrap_err();
        assert_eq!(backend_call(err), "create_bind_group_layout");
    }
}
