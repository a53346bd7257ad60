//! RGBA colours used by the style and the scene description.

use bytemuck::{Pod, Zeroable};

/// A colour with straight (non-premultiplied) alpha.
///
/// Components are `f32`s in `[0.0, 1.0]`. The layout is `#[repr(C)]` so
/// the value can be copied straight into vertex buffers (see
/// [`crate::mesh::MeshVertex`]).
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Color {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
    /// Alpha component.
    pub a: f32,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    /// Light grey used for the unfilled band.
    pub const BAND_GREY: Color = Color::new(238.0 / 255.0, 238.0 / 255.0, 238.0 / 255.0, 0.8);
    /// Orange used for the progress fill.
    pub const PROGRESS_ORANGE: Color = Color::new(251.0 / 255.0, 167.0 / 255.0, 51.0 / 255.0, 1.0);

    /// Creates a colour from `f32` components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a colour from `u8` components.
    #[inline]
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: f32::from(a) / 255.0,
        }
    }

    /// Returns the same colour with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// True when the colour contributes nothing to the output.
    #[inline]
    pub fn is_transparent(self) -> bool {
        self.a <= 0.0
    }

    /// Converts the colour to `[r, g, b, a]`.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    #[inline]
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u8_matches_palette() {
        let orange = Color::from_rgba_u8(251, 167, 51, 255);
        assert_eq!(orange, Color::PROGRESS_ORANGE);
    }

    #[test]
    fn test_with_alpha_keeps_channels() {
        let faded = Color::WHITE.with_alpha(0.0);
        assert!(faded.is_transparent());
        assert_eq!(faded.to_array(), [1.0, 1.0, 1.0, 0.0]);
    }
}
