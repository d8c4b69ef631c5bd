//! Fixed-capacity storage views.
//!
//! `BoundedBuffer` never owns its backing memory. Callers allocate storage once
//! (typically at startup, sized to the worst case) and hand out a view that can
//! be filled and reset every frame without reallocating.

mod buffer;

pub use buffer::BoundedBuffer;
