//! Coordinate and color types shared by the renderer and its callers.
//!
//! Canonical CPU space:
//! - Pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! The renderer converts to NDC with an orthographic projection uniform.

mod color;
mod rect;
mod vec2;
mod viewport;

pub use color::Color;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
