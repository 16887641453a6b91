//! Addressable RGBA-f32 image storage.
//!
//! The renderer reads the source exclusively through position-indexed fetches
//! with an explicit edge mode; there is no implicit border color.

use glam::{Vec2, Vec4};
use remap_core::EngineError;
use remap_effects::EdgeMode;

/// An owned 2D RGBA image, f32 components, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl ImageBuffer {
    /// Allocates a transparent-black image.
    ///
    /// Precondition: both dimensions are non-zero (validated at the config
    /// boundary).
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "image dimensions must be non-zero");
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; (width as usize) * (height as usize)],
        }
    }

    /// Wraps an existing pixel vector; length must match the dimensions.
    pub fn from_pixels(
        width: u32,
        height: u32,
        pixels: Vec<[f32; 4]>,
    ) -> Result<Self, EngineError> {
        let expected = (width as usize) * (height as usize);
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(EngineError::other(format!(
                "from_pixels: expected {expected} pixels for {width}x{height}, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Vec4) {
        debug_assert!(x < self.width && y < self.height);
        let idx = (y as usize) * (self.width as usize) + x as usize;
        self.pixels[idx] = color.to_array();
    }

    /// In-bounds read by integer coordinate.
    pub fn pixel(&self, x: u32, y: u32) -> Vec4 {
        debug_assert!(x < self.width && y < self.height);
        let idx = (y as usize) * (self.width as usize) + x as usize;
        Vec4::from_array(self.pixels[idx])
    }

    /// Point-filtered fetch at a scene position, resolving out-of-bounds
    /// coordinates through `edge`.
    ///
    /// Scene positions follow the pixel-center convention: pixel (x, y)
    /// covers [x, x+1) × [y, y+1), so a fetch anywhere inside that box reads
    /// that pixel.
    pub fn fetch(&self, pos: Vec2, edge: EdgeMode) -> Vec4 {
        let x = resolve(pos.x.floor() as i64, self.width as i64, edge);
        let y = resolve(pos.y.floor() as i64, self.height as i64, edge);
        self.pixel(x as u32, y as u32)
    }

    /// Flat float view of the pixel data (RGBA interleaved).
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Quantizes to 8-bit RGBA, clamping each component to [0, 1].
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.as_floats()
            .iter()
            .map(|&c| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8)
            .collect()
    }
}

/// Maps an out-of-bounds coordinate into [0, len).
fn resolve(coord: i64, len: i64, edge: EdgeMode) -> i64 {
    debug_assert!(len > 0);
    match edge {
        EdgeMode::Clamp => coord.clamp(0, len - 1),
        EdgeMode::Mirror => {
            let period = 2 * len;
            let m = coord.rem_euclid(period);
            if m < len {
                m
            } else {
                period - 1 - m
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: u32, height: u32) -> ImageBuffer {
        let mut img = ImageBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                img.set_pixel(x, y, Vec4::new(x as f32, y as f32, 0.0, 1.0));
            }
        }
        img
    }

    #[test]
    fn from_pixels_rejects_length_mismatch() {
        let err = ImageBuffer::from_pixels(4, 4, vec![[0.0; 4]; 15]).expect_err("must fail");
        assert!(err.to_string().contains("expected 16"), "got: {err}");
    }

    #[test]
    fn fetch_inside_pixel_box_reads_that_pixel() {
        let img = ramp(8, 8);
        for (px, py) in [(0u32, 0u32), (3, 5), (7, 7)] {
            for (dx, dy) in [(0.01, 0.01), (0.5, 0.5), (0.99, 0.99)] {
                let pos = Vec2::new(px as f32 + dx, py as f32 + dy);
                let c = img.fetch(pos, EdgeMode::Clamp);
                assert_eq!(c.x, px as f32);
                assert_eq!(c.y, py as f32);
            }
        }
    }

    #[test]
    fn clamp_pins_to_the_border() {
        let img = ramp(4, 4);
        let c = img.fetch(Vec2::new(-10.0, 2.5), EdgeMode::Clamp);
        assert_eq!((c.x, c.y), (0.0, 2.0));
        let c = img.fetch(Vec2::new(9.5, -3.0), EdgeMode::Clamp);
        assert_eq!((c.x, c.y), (3.0, 0.0));
    }

    #[test]
    fn mirror_reflects_at_the_border() {
        // len 4: coords ..., -2 -> 1, -1 -> 0, 4 -> 3, 5 -> 2
        assert_eq!(resolve(-2, 4, EdgeMode::Mirror), 1);
        assert_eq!(resolve(-1, 4, EdgeMode::Mirror), 0);
        assert_eq!(resolve(4, 4, EdgeMode::Mirror), 3);
        assert_eq!(resolve(5, 4, EdgeMode::Mirror), 2);
        // Reflection is periodic.
        assert_eq!(resolve(8, 4, EdgeMode::Mirror), 0);
        assert_eq!(resolve(-5, 4, EdgeMode::Mirror), 3);
    }

    #[test]
    fn float_view_is_rgba_interleaved() {
        let img = ramp(2, 1);
        assert_eq!(img.as_floats(), &[0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn rgba8_quantization_clamps() {
        let mut img = ImageBuffer::new(1, 1);
        img.set_pixel(0, 0, Vec4::new(-1.0, 0.5, 2.0, 1.0));
        assert_eq!(img.to_rgba8(), vec![0, 128, 255, 255]);
    }
}
