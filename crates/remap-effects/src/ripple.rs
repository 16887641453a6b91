//! Radial ripple distortion.
//!
//! Displaces pixels along the direction away from a center point, with a
//! sinusoidal wave whose falloff reaches zero at the configured size.

use glam::Vec2;

use crate::math::saturate;
use crate::{SampleMap, SampleMapOutput};

/// User-tunable ripple parameters.
///
/// `size` and `center` are normalized to the image; everything else is in the
/// units the shader consumes directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleParams {
    /// Ripple extent as a fraction of half the larger image dimension, (0, 1].
    pub size: f32,
    /// Wave frequency, [0, 1000].
    pub frequency: f32,
    /// Wave phase, [-100, 100].
    pub phase: f32,
    /// Peak displacement in pixels, [0, 1000].
    pub amplitude: f32,
    /// Falloff exponent control, (0, 100]; higher spreads the ripple wider.
    pub spread: f32,
    /// Center in normalized [-1, 1]² coordinates, (0, 0) = image center.
    pub center: Vec2,
}

impl Default for RippleParams {
    fn default() -> Self {
        Self {
            size: 0.5,
            frequency: 100.0,
            phase: 0.0,
            amplitude: 100.0,
            spread: 1.0,
            center: Vec2::ZERO,
        }
    }
}

/// Ripple sample map with parameters baked to pixel units.
#[derive(Debug, Clone, Copy)]
pub struct RippleMap {
    size_px: f32,
    frequency: f32,
    phase: f32,
    amplitude: f32,
    spread: f32,
    center_px: Vec2,
}

impl RippleMap {
    pub fn new(params: RippleParams, width: u32, height: u32) -> Self {
        let w = width as f32;
        let h = height as f32;
        Self {
            size_px: params.size * (w.max(h) / 2.0),
            frequency: params.frequency,
            phase: params.phase,
            amplitude: params.amplitude,
            spread: params.spread,
            center_px: Vec2::new(
                (w + params.center.x * w) / 2.0,
                (h + params.center.y * h) / 2.0,
            ),
        }
    }
}

impl SampleMap for RippleMap {
    fn evaluate(&self, pos: Vec2) -> SampleMapOutput {
        let to_pixel = pos - self.center_px;

        // Scale distance such that the displacement decays to 0 at size_px.
        let distance = (to_pixel * (1.0 / self.size_px)).length();
        // Zero direction at the exact center; normalizing a zero vector
        // would inject NaN into the accumulator.
        let direction = to_pixel.normalize_or_zero();

        let wave = (self.frequency * distance + self.phase).sin();

        // Clamp the falloff so the ripple does not extend beyond the limit;
        // spread controls how quickly it decays up to that limit.
        let falloff = saturate(1.0 - distance).powf(1.0 / self.spread);

        let input_offset = (wave * falloff * self.amplitude) * direction;

        SampleMapOutput::resample_at(pos + input_offset)
    }
}
