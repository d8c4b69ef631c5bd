use bytemuck::{Pod, Zeroable};

/// 4x4 `f32` matrix, column-major.
///
/// `elems[col * 4 + row]` holds the element at (`row`, `col`). Construct with
/// [`Matrix4x4::new`], which takes arguments in row-major reading order.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Matrix4x4 {
    elems: [f32; 16],
}

impl Matrix4x4 {
    /// Builds a matrix from elements given as `eRC` (row `R`, column `C`).
    ///
    /// Storage is transposed relative to the argument order.
    #[allow(clippy::too_many_arguments)]
    #[rustfmt::skip]
    pub const fn new(
        e11: f32, e12: f32, e13: f32, e14: f32,
        e21: f32, e22: f32, e23: f32, e24: f32,
        e31: f32, e32: f32, e33: f32, e34: f32,
        e41: f32, e42: f32, e43: f32, e44: f32,
    ) -> Self {
        Self {
            elems: [
                e11, e21, e31, e41,
                e12, e22, e32, e42,
                e13, e23, e33, e43,
                e14, e24, e34, e44,
            ],
        }
    }

    #[rustfmt::skip]
    pub const fn identity() -> Self {
        Self::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Orthographic projection mapping the box
    /// `[left, right] x [bottom, top] x [near, far]` onto normalized device coordinates.
    ///
    /// Passing `top = 0, bottom = height` yields a top-left origin with +Y down.
    #[rustfmt::skip]
    pub fn orthographic(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Self {
        let scale_x = 2.0 / (right - left);
        let scale_y = 2.0 / (top - bottom);
        let scale_z = 2.0 / (near - far);
        let translate_x = (left + right) / (left - right);
        let translate_y = (bottom + top) / (bottom - top);
        let translate_z = (near + far) / (near - far);

        Self::new(
            scale_x, 0.0,     0.0,     translate_x,
            0.0,     scale_y, 0.0,     translate_y,
            0.0,     0.0,     scale_z, translate_z,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// Element at (`row`, `col`), zero-based.
    #[inline]
    #[track_caller]
    pub fn element(&self, row: usize, col: usize) -> f32 {
        assert!(row < 4 && col < 4, "Matrix4x4::element: ({row}, {col}) out of range");
        self.elems[col * 4 + row]
    }

    /// Column-major storage, ready for uniform upload.
    #[inline]
    pub fn as_array(&self) -> &[f32; 16] {
        &self.elems
    }

    /// Multiplies the homogeneous column vector `v` by this matrix.
    pub fn transform(&self, v: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        for (row, slot) in out.iter_mut().enumerate() {
            *slot = (0..4).map(|col| self.element(row, col) * v[col]).sum();
        }
        out
    }
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::identity()
    }
}
