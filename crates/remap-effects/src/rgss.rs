//! Rotated-grid supersampling offsets.
//!
//! For a quality level q there are q² sample points per pixel, distributed on
//! a rotated grid so no two samples share a row or column. The distribution
//! is a pure function of (quality, index): no randomness, reproducible across
//! calls, which is what lets renders be compared bit-for-bit in tests.

use crate::math::frac;
use glam::Vec2;

/// Number of sub-pixel samples for a quality level.
pub fn rgss_offset_count(quality: u32) -> usize {
    (quality * quality) as usize
}

/// Offset for one sample index, each component in [-0.5, 0.5].
///
/// Quality 1 is the no-supersampling case: the single sample sits exactly on
/// the pixel center.
///
/// Precondition: `quality >= 1` and `index < quality * quality`. Violations
/// are programming errors and fail fast.
pub fn rgss_offset(quality: u32, index: usize) -> Vec2 {
    assert!(quality >= 1, "quality must be >= 1, got {quality}");
    let count = rgss_offset_count(quality);
    assert!(index < count, "index {index} out of range for quality {quality}");

    if quality == 1 {
        return Vec2::ZERO;
    }

    let y = (index as f32 + 1.0) / (count as f32 + 1.0);
    let x = frac(y * quality as f32);

    Vec2::new(x - 0.5, y - 0.5)
}

/// All q² offsets for a quality level, in index order.
pub fn rgss_offsets(quality: u32) -> Vec<Vec2> {
    assert!(quality >= 1, "quality must be >= 1, got {quality}");
    (0..rgss_offset_count(quality))
        .map(|i| rgss_offset(quality, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_is_quality_squared() {
        for q in 1..=8 {
            assert_eq!(rgss_offset_count(q), (q * q) as usize);
            assert_eq!(rgss_offsets(q).len(), (q * q) as usize);
        }
    }

    #[test]
    fn quality_one_is_pixel_center() {
        assert_eq!(rgss_offsets(1), vec![Vec2::ZERO]);
    }

    #[test]
    fn offsets_stay_in_half_open_unit_box() {
        for q in 1..=8 {
            for (i, o) in rgss_offsets(q).iter().enumerate() {
                assert!(
                    o.x >= -0.5 && o.x <= 0.5 && o.y >= -0.5 && o.y <= 0.5,
                    "q={q} i={i} offset {o:?} out of range"
                );
            }
        }
    }

    #[test]
    fn offsets_are_deterministic() {
        for q in 1..=8 {
            assert_eq!(rgss_offsets(q), rgss_offsets(q));
        }
    }

    #[test]
    fn quality_two_matches_the_formula_exactly() {
        // y_i = (i+1)/5, x_i = frac(2*y_i), offset = (x-0.5, y-0.5)
        let expected = [
            Vec2::new(-0.1, -0.3),
            Vec2::new(0.3, -0.1),
            Vec2::new(-0.3, 0.1),
            Vec2::new(0.1, 0.3),
        ];
        let got = rgss_offsets(2);
        for (g, e) in got.iter().zip(expected.iter()) {
            assert!(
                (g.x - e.x).abs() < 1e-6 && (g.y - e.y).abs() < 1e-6,
                "got {g:?}, expected {e:?}"
            );
        }
    }

    #[test]
    #[should_panic(expected = "quality must be >= 1")]
    fn zero_quality_fails_fast() {
        let _ = rgss_offset(0, 0);
    }
}
