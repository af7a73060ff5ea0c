// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! RGBA pixel buffers laid out the way `ImageData` reads them.

use bytemuck::{Pod, Zeroable};

use vizhost_backend_web::ImageSize;
use vizhost_core::compute::{Region, SharedMemory};

/// One RGBA pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Rgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    /// An opaque color.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// An opaque color from unit-range channels; out-of-range values clamp.
    #[must_use]
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        Self::opaque(unit_to_u8(r), unit_to_u8(g), unit_to_u8(b))
    }

    /// CSS `#rrggbb` notation.
    #[must_use]
    pub fn css_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channel-wise linear blend, `t` in `0..=1`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let mix = |a: u8, b: u8| f64::from(a) + (f64::from(b) - f64::from(a)) * t;
        Self::opaque(
            unit_to_u8(mix(self.r, other.r) / 255.0),
            unit_to_u8(mix(self.g, other.g) / 255.0),
            unit_to_u8(mix(self.b, other.b) / 255.0),
        )
    }

    /// The color dimmed (or brightened) by `factor`, kept opaque.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        let scale = |c: u8| f64::from(c) / 255.0 * factor;
        Self::from_unit(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Channel-wise maximum, for additive-looking overdraw.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self {
            r: self.r.max(other.r),
            g: self.g.max(other.g),
            b: self.b.max(other.b),
            a: self.a.max(other.a),
        }
    }
}

fn unit_to_u8(v: f64) -> u8 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "clamped to 0..=255 before the cast"
    )]
    let byte = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    byte
}

/// A width × height image owned by a compute kernel.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    size: ImageSize,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    /// A black image of `size`.
    #[must_use]
    pub fn new(size: ImageSize) -> Self {
        let count = size.width as usize * size.height as usize;
        Self {
            size,
            pixels: vec![Rgba::BLACK; count],
        }
    }

    /// Image dimensions.
    #[must_use]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Row-major pixels.
    #[must_use]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Row-major pixels, writable.
    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    /// The raw RGBA bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

impl SharedMemory for PixelBuffer {
    fn shared_region(&self) -> Region {
        Region::new(self.pixels.as_ptr() as usize, self.bytes().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_are_rgba_in_order() {
        let mut buffer = PixelBuffer::new(ImageSize::new(2, 1));
        buffer.pixels_mut()[1] = Rgba::opaque(1, 2, 3);
        assert_eq!(buffer.bytes(), [0, 0, 0, 255, 1, 2, 3, 255]);
        assert_eq!(buffer.shared_region().len, 8);
    }

    #[test]
    fn unit_channels_clamp() {
        assert_eq!(Rgba::from_unit(-1.0, 0.5, 2.0), Rgba::opaque(0, 128, 255));
        assert_eq!(Rgba::opaque(255, 16, 0).css_hex(), "#ff1000");
    }

    #[test]
    fn lerp_endpoints() {
        let a = Rgba::opaque(0, 100, 200);
        let b = Rgba::opaque(200, 100, 0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgba::opaque(100, 100, 100));
    }

    #[test]
    fn scale_and_max() {
        let c = Rgba::opaque(200, 100, 0);
        assert_eq!(c.scaled(0.5), Rgba::opaque(100, 50, 0));
        assert_eq!(c.scaled(2.0), Rgba::opaque(255, 200, 0));
        assert_eq!(c.max(Rgba::opaque(50, 150, 10)), Rgba::opaque(200, 150, 10));
    }
}
