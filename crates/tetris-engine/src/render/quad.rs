//! Quad geometry: vertex layout, corner order and the shared index pattern.

use bytemuck::{Pod, Zeroable};

use crate::bounded::BoundedBuffer;
use crate::coords::{Color, Rect};

/// Per-vertex data, tightly packed (20 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

impl Vertex {
    pub(crate) const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x3  // color
    ];

    #[inline]
    pub const fn new(position: [f32; 2], color: [f32; 3]) -> Self {
        Self { position, color }
    }

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Four corners of an axis-aligned rectangle.
///
/// Corner names read in a y-up frame: `bottom_left` is `(x, y)` and `top_left`
/// is `(x, y + height)`. With the renderer's top-left-origin projection the
/// `bottom_*` pair ends up at the upper edge on screen.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Quad {
    pub bottom_left: Vertex,
    pub top_left: Vertex,
    pub top_right: Vertex,
    pub bottom_right: Vertex,
}

impl Quad {
    /// Builds a uniformly colored quad. Arguments are not validated.
    pub fn new(x: f32, y: f32, width: f32, height: f32, color: Color) -> Self {
        let c = color.to_array();
        Self {
            bottom_left: Vertex::new([x, y], c),
            top_left: Vertex::new([x, y + height], c),
            top_right: Vertex::new([x + width, y + height], c),
            bottom_right: Vertex::new([x + width, y], c),
        }
    }

    #[inline]
    pub fn from_rect(rect: Rect, color: Color) -> Self {
        Self::new(rect.origin.x, rect.origin.y, rect.size.x, rect.size.y, color)
    }

    #[inline]
    pub fn vertices(&self) -> [Vertex; 4] {
        [self.bottom_left, self.top_left, self.top_right, self.bottom_right]
    }
}

/// Two triangles per quad, relative to the quad's first vertex.
pub const QUAD_INDEX_PATTERN: [u32; 6] = [0, 1, 2, 0, 2, 3];

pub const INDICES_PER_QUAD: u32 = QUAD_INDEX_PATTERN.len() as u32;
pub const VERTICES_PER_QUAD: u32 = 4;

/// Generates the static index list for `max_quad_count` quad slots.
///
/// # Panics
/// Panics if `max_quad_count == 0`.
pub fn quad_indices(max_quad_count: u32) -> Vec<u32> {
    let len = max_quad_count as usize * QUAD_INDEX_PATTERN.len();
    let mut storage = vec![0u32; len];

    let mut indices = BoundedBuffer::new(len, &mut storage);
    for quad in 0..max_quad_count {
        let base = quad * VERTICES_PER_QUAD;
        for offset in QUAD_INDEX_PATTERN {
            indices.append(base + offset);
        }
    }
    debug_assert!(indices.is_full());

    storage
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_layout_sizes() {
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
        assert_eq!(std::mem::size_of::<Quad>(), 80);
        assert_eq!(Vertex::layout().array_stride, 20);
    }

    #[test]
    fn color_attribute_follows_position() {
        let layout = Vertex::layout();
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[1].offset, 8);
        assert_eq!(layout.attributes[1].shader_location, 1);
    }

    #[test]
    fn quad_corners_wind_from_origin() {
        let q = Quad::new(10.0, 20.0, 30.0, 40.0, Color::new(1.0, 0.0, 0.0));
        let positions: Vec<[f32; 2]> = q.vertices().iter().map(|v| v.position).collect();
        assert_eq!(positions, vec![[10.0, 20.0], [10.0, 60.0], [40.0, 60.0], [40.0, 20.0]]);
        assert!(q.vertices().iter().all(|v| v.color == [1.0, 0.0, 0.0]));
    }

    #[test]
    fn from_rect_matches_new() {
        let c = Color::new(0.0, 0.5, 1.0);
        assert_eq!(
            Quad::from_rect(Rect::new(1.0, 2.0, 3.0, 4.0), c),
            Quad::new(1.0, 2.0, 3.0, 4.0, c)
        );
    }

    #[test]
    fn indices_for_two_quads() {
        assert_eq!(quad_indices(2), vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn indices_cover_every_slot() {
        let indices = quad_indices(100);
        assert_eq!(indices.len(), 600);
        assert_eq!(&indices[594..], &[396, 397, 398, 396, 398, 399]);
        assert_eq!(indices.iter().copied().max(), Some(399));
    }

    #[test]
    #[should_panic(expected = "capacity must be > 0")]
    fn zero_quads_panics() {
        let _ = quad_indices(0);
    }
}
