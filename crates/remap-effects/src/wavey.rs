//! Wavey transform distortion.
//!
//! Classic full-image sine/cosine displacement: every pixel is pushed by a
//! wave field derived from its normalized position.

use glam::Vec2;

use crate::{SampleMap, SampleMapOutput};

/// User-tunable wavey parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveyParams {
    /// Wave scale, [1, 200]; drives both frequency and displacement.
    pub scale: f32,
}

impl Default for WaveyParams {
    fn default() -> Self {
        Self { scale: 100.0 }
    }
}

/// Wavey sample map with the reciprocal image size baked in.
#[derive(Debug, Clone, Copy)]
pub struct WaveyMap {
    inv_image_size: Vec2,
    scale: f32,
}

impl WaveyMap {
    pub fn new(params: WaveyParams, width: u32, height: u32) -> Self {
        Self {
            inv_image_size: Vec2::new(1.0 / width as f32, 1.0 / height as f32),
            scale: params.scale,
        }
    }
}

impl SampleMap for WaveyMap {
    fn evaluate(&self, pos: Vec2) -> SampleMapOutput {
        // [-1, +1], with (0, 0) at the image center.
        let uv = ((pos * self.inv_image_size) - Vec2::splat(0.5)) * 2.0;

        let (sin_u, cos_u) = (uv.x * self.scale).sin_cos();
        let (sin_v, cos_v) = (uv.y * self.scale).sin_cos();

        let dxdy = Vec2::new((sin_u + cos_v) * self.scale, (cos_u + sin_v) * self.scale);

        SampleMapOutput::resample_at(pos + dxdy)
    }
}
