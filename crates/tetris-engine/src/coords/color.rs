/// Opaque RGB color.
///
/// Channels are expected in `[0, 1]`. The range is checked where the color is
/// submitted for drawing, not here.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Creates a color from 8-bit channels.
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// True when every channel lies in `[0, 1]` (NaN fails).
    #[inline]
    pub fn is_normalized(self) -> bool {
        let unit = |c: f32| (0.0..=1.0).contains(&c);
        unit(self.r) && unit(self.g) && unit(self.b)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_range_is_inclusive() {
        assert!(Color::black().is_normalized());
        assert!(Color::white().is_normalized());
        assert!(Color::from_u8(255, 128, 0).is_normalized());
    }

    #[test]
    fn out_of_range_and_nan_are_rejected() {
        assert!(!Color::new(1.5, 0.0, 0.0).is_normalized());
        assert!(!Color::new(0.0, -0.1, 0.0).is_normalized());
        assert!(!Color::new(0.0, 0.0, f32::NAN).is_normalized());
    }
}
