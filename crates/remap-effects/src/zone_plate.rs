//! Zone-plate test pattern.
//!
//! An output-only shader producing concentric rings whose spatial frequency
//! rises toward the rim. Useful for judging resampling/antialiasing quality,
//! which is why it ships alongside the distortion maps.

use glam::{Vec2, Vec4};
use std::f32::consts::PI;

use crate::ColorShader;

/// User-tunable zone-plate parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZonePlateParams {
    /// Plate diameter as a fraction of the smaller image dimension, [0, 2].
    pub scale: f32,
}

impl Default for ZonePlateParams {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// Zone-plate shader with image-size constants baked in.
#[derive(Debug, Clone, Copy)]
pub struct ZonePlateShader {
    half_width: f32,
    half_height: f32,
    diameter: f32,
}

impl ZonePlateShader {
    pub fn new(params: ZonePlateParams, width: u32, height: u32) -> Self {
        // Even-sized diameter base keeps the pattern centered on a pixel edge.
        let base = (width.min(height) & !1) as f32;
        Self {
            half_width: (width >> 1) as f32,
            half_height: (height >> 1) as f32,
            diameter: base * params.scale,
        }
    }
}

impl ColorShader for ZonePlateShader {
    fn evaluate(&self, pos: Vec2) -> Vec4 {
        let xo = pos.x - self.half_width;
        let yo = pos.y - self.half_height;

        let rm = 0.5 * self.diameter;
        let km = 0.7 / self.diameter * PI;
        let w = rm / 10.0;

        let d = xo * xo + yo * yo;
        let v = 1.0 + (1.0 + ((rm - d.sqrt()) / w).tanh()) * (km * d).sin() * 0.5;
        let vo = v * 0.5;

        Vec4::new(vo, vo, vo, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_is_pure_and_finite() {
        let s = ZonePlateShader::new(ZonePlateParams::default(), 256, 256);
        for p in [Vec2::ZERO, Vec2::new(128.0, 128.0), Vec2::new(255.0, 1.0)] {
            let a = s.evaluate(p);
            let b = s.evaluate(p);
            assert_eq!(a, b);
            assert!(a.x.is_finite() && a.y.is_finite() && a.z.is_finite());
            assert_eq!(a.w, 1.0);
        }
    }

    #[test]
    fn output_is_grayscale_in_unit_range() {
        let s = ZonePlateShader::new(ZonePlateParams::default(), 128, 128);
        for y in (0..128).step_by(13) {
            for x in (0..128).step_by(13) {
                let c = s.evaluate(Vec2::new(x as f32, y as f32));
                assert_eq!(c.x, c.y);
                assert_eq!(c.y, c.z);
                assert!(
                    c.x >= 0.0 && c.x <= 1.0 + 1e-3,
                    "value out of expected range: {}",
                    c.x
                );
            }
        }
    }

    #[test]
    fn diameter_tracks_the_smaller_dimension() {
        let s = ZonePlateShader::new(ZonePlateParams { scale: 1.0 }, 200, 101);
        // min(200, 101) rounded down to even
        assert!((s.diameter - 100.0).abs() < 1e-6);
    }
}
