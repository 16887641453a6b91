//! Host-side configuration loading and validation.
//!
//! This is the validation boundary for render configuration: everything
//! downstream (graph builders, the renderer frontend) assumes values that
//! passed [`RenderConfig::validate`] and treats violations as programming
//! errors, not recoverable failures.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Lowest accepted antialiasing quality (no supersampling).
pub const MIN_QUALITY: u32 = 1;

/// Highest accepted antialiasing quality (64 samples per pixel).
pub const MAX_QUALITY: u32 = 8;

/// Render settings supplied by the host before a build.
///
/// `quality` is structural: the sample count is `quality * quality`, so a
/// quality change forces a topology rebuild rather than a constant update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Antialiasing quality in [`MIN_QUALITY`]..=[`MAX_QUALITY`].
    pub quality: u32,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

impl RenderConfig {
    /// Checks ranges without touching the filesystem. Returns a message
    /// suitable for [`EngineError::InvalidConfig`].
    pub fn validate(&self) -> Result<(), String> {
        if self.quality < MIN_QUALITY || self.quality > MAX_QUALITY {
            return Err(format!(
                "quality must be in {MIN_QUALITY}..={MAX_QUALITY}, got {}",
                self.quality
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "output size must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        Ok(())
    }

    /// Samples per pixel implied by this configuration.
    pub fn sample_count(&self) -> usize {
        (self.quality * self.quality) as usize
    }
}

/// Reads and deserializes a JSON file into `T`.
pub fn load_typed_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, EngineError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| EngineError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a [`RenderConfig`] from JSON and validates it.
pub fn load_render_config_from(path: impl AsRef<Path>) -> Result<RenderConfig, EngineError> {
    let path = path.as_ref();
    let config: RenderConfig = load_typed_json(path)?;
    config.validate().map_err(|msg| EngineError::InvalidConfig {
        path: path.to_path_buf(),
        msg,
    })?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_quality_range() {
        for quality in MIN_QUALITY..=MAX_QUALITY {
            let cfg = RenderConfig {
                quality,
                width: 64,
                height: 64,
            };
            assert!(cfg.validate().is_ok(), "quality {quality} should be valid");
        }
    }

    #[test]
    fn validate_rejects_out_of_range_quality() {
        for quality in [0, MAX_QUALITY + 1] {
            let cfg = RenderConfig {
                quality,
                width: 64,
                height: 64,
            };
            let msg = cfg.validate().expect_err("out-of-range quality must fail");
            assert!(msg.contains("quality"), "unexpected message: {msg}");
        }
    }

    #[test]
    fn validate_rejects_empty_output() {
        let cfg = RenderConfig {
            quality: 2,
            width: 0,
            height: 64,
        };
        let msg = cfg.validate().expect_err("zero width must fail");
        assert!(msg.contains("size"), "unexpected message: {msg}");
    }

    #[test]
    fn sample_count_is_quality_squared() {
        let cfg = RenderConfig {
            quality: 3,
            width: 16,
            height: 16,
        };
        assert_eq!(cfg.sample_count(), 9);
    }
}
