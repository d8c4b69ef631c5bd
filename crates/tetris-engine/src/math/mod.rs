//! Transform math for the renderer.
//!
//! Matrices are stored column-major, matching the layout WGSL expects for a
//! `mat4x4<f32>` uniform.

mod matrix;

pub use matrix::Matrix4x4;
