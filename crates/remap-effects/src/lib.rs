#![forbid(unsafe_code)]

//! Backend-agnostic effect "standard library".
//!
//! This crate defines the sample-map shader contract and the built-in effect
//! parameter blocks that backends evaluate. Everything here is pure: a shader
//! is a function of (position, immutable parameter block) and nothing else,
//! so backends are free to evaluate it redundantly or out of order.
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

use glam::{Vec2, Vec4};
use std::fmt;

pub mod math;
pub mod rgss;
pub mod ripple;
pub mod wavey;
pub mod zone_plate;

pub use ripple::{RippleMap, RippleParams};
pub use wavey::{WaveyMap, WaveyParams};
pub use zone_plate::{ZonePlateParams, ZonePlateShader};

// -------------------------------------------------------------------------------------------------
// Shader contract
// -------------------------------------------------------------------------------------------------

/// Result of evaluating a sample map at one position.
///
/// Layout follows the 4-component sample-map convention: `pos` is the source
/// position to resample, `weight` is an alpha multiplier applied to the
/// fetched color (usually 1), and `aux` is reserved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleMapOutput {
    pub pos: Vec2,
    pub weight: f32,
    pub aux: f32,
}

impl SampleMapOutput {
    /// The common distortion case: resample `pos` at full weight.
    pub fn resample_at(pos: Vec2) -> Self {
        Self {
            pos,
            weight: 1.0,
            aux: 1.0,
        }
    }

    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.pos.x, self.pos.y, self.weight, self.aux)
    }
}

/// A distortion shader: maps a query position to a source position.
///
/// Implementations must be pure over (position, parameter block); the backend
/// may evaluate any position any number of times, in any order.
pub trait SampleMap: fmt::Debug {
    fn evaluate(&self, pos: Vec2) -> SampleMapOutput;
}

/// A generative shader: computes an RGBA color directly from a position.
pub trait ColorShader: fmt::Debug {
    fn evaluate(&self, pos: Vec2) -> Vec4;
}

/// A shader instance ready for a backend to evaluate, built from an
/// [`EffectParams`] snapshot and the image size.
#[derive(Debug)]
pub enum ShaderInstance {
    /// Output drives a source-image fetch per sample.
    Distortion(Box<dyn SampleMap>),
    /// Output is consumed as a color, no fetch.
    Generative(Box<dyn ColorShader>),
}

/// How out-of-bounds source fetches are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeMode {
    /// Clamp the sampling position to the image bounds.
    Clamp,
    /// Reflect the sampling position back into the image.
    Mirror,
}

// -------------------------------------------------------------------------------------------------
// Parameter snapshots
// -------------------------------------------------------------------------------------------------

/// Effect discriminant. Changing the kind changes what the stages evaluate,
/// so it is a structural parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Ripple,
    Wavey,
    ZonePlate,
}

/// An immutable snapshot of user-tunable effect parameters.
///
/// The host rebuilds this on every configuration edit; backends never see a
/// partially-updated snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectParams {
    Ripple(RippleParams),
    Wavey(WaveyParams),
    ZonePlate(ZonePlateParams),
}

impl EffectParams {
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectParams::Ripple(_) => EffectKind::Ripple,
            EffectParams::Wavey(_) => EffectKind::Wavey,
            EffectParams::ZonePlate(_) => EffectKind::ZonePlate,
        }
    }

    /// Edge mode each effect was authored against.
    pub fn edge_mode(&self) -> EdgeMode {
        match self {
            EffectParams::Ripple(_) => EdgeMode::Clamp,
            EffectParams::Wavey(_) => EdgeMode::Mirror,
            EffectParams::ZonePlate(_) => EdgeMode::Clamp,
        }
    }

    /// True when the parameters produce no displacement (or would divide by
    /// zero); the renderer passes the source through unmodified instead of
    /// evaluating shaders.
    pub fn is_identity(&self) -> bool {
        match self {
            EffectParams::Ripple(p) => p.amplitude == 0.0 || p.size <= 0.0 || p.spread <= 0.0,
            EffectParams::Wavey(p) => p.scale == 0.0,
            EffectParams::ZonePlate(p) => p.scale <= 0.0,
        }
    }

    /// Bakes this snapshot into a shader instance for an image of the given
    /// pixel size. Image size is folded into shader constants here, once,
    /// rather than per evaluation.
    pub fn instantiate(&self, width: u32, height: u32) -> ShaderInstance {
        match self {
            EffectParams::Ripple(p) => {
                ShaderInstance::Distortion(Box::new(RippleMap::new(*p, width, height)))
            }
            EffectParams::Wavey(p) => {
                ShaderInstance::Distortion(Box::new(WaveyMap::new(*p, width, height)))
            }
            EffectParams::ZonePlate(p) => {
                ShaderInstance::Generative(Box::new(ZonePlateShader::new(*p, width, height)))
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Presets
// -------------------------------------------------------------------------------------------------

/// Named parameter presets for the built-in effects.
///
/// Presets let hosts offer one-click starting points without re-authoring
/// parameter snapshots. They are deterministic and backend-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectPreset {
    Ripple,
    /// Stronger displacement, slower falloff.
    RippleDeep,
    /// Tight high-frequency rings near the center.
    RippleRings,
    Wavey,
    /// Lower scale, broad slow waves.
    WaveyBroad,
    ZonePlate,
}

impl EffectPreset {
    pub const ALL: [EffectPreset; 6] = [
        EffectPreset::Ripple,
        EffectPreset::RippleDeep,
        EffectPreset::RippleRings,
        EffectPreset::Wavey,
        EffectPreset::WaveyBroad,
        EffectPreset::ZonePlate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectPreset::Ripple => "ripple",
            EffectPreset::RippleDeep => "ripple_deep",
            EffectPreset::RippleRings => "ripple_rings",
            EffectPreset::Wavey => "wavey",
            EffectPreset::WaveyBroad => "wavey_broad",
            EffectPreset::ZonePlate => "zone_plate",
        }
    }

    pub fn params(self) -> EffectParams {
        match self {
            EffectPreset::Ripple => EffectParams::Ripple(RippleParams::default()),
            EffectPreset::RippleDeep => EffectParams::Ripple(RippleParams {
                amplitude: 400.0,
                spread: 4.0,
                ..RippleParams::default()
            }),
            EffectPreset::RippleRings => EffectParams::Ripple(RippleParams {
                size: 0.25,
                frequency: 400.0,
                amplitude: 40.0,
                ..RippleParams::default()
            }),
            EffectPreset::Wavey => EffectParams::Wavey(WaveyParams::default()),
            EffectPreset::WaveyBroad => EffectParams::Wavey(WaveyParams { scale: 20.0 }),
            EffectPreset::ZonePlate => EffectParams::ZonePlate(ZonePlateParams::default()),
        }
    }
}

/// Convert user-facing strings to a known preset name.
///
/// Accepts common aliases: `ripple`, `Ripple`, `ripple-deep`, etc.
pub fn preset_from_str(s: &str) -> Option<EffectPreset> {
    match s {
        "ripple" | "Ripple" => Some(EffectPreset::Ripple),
        "ripple_deep" | "ripple-deep" | "RippleDeep" => Some(EffectPreset::RippleDeep),
        "ripple_rings" | "ripple-rings" | "RippleRings" => Some(EffectPreset::RippleRings),
        "wavey" | "Wavey" => Some(EffectPreset::Wavey),
        "wavey_broad" | "wavey-broad" | "WaveyBroad" => Some(EffectPreset::WaveyBroad),
        "zone_plate" | "zone-plate" | "ZonePlate" => Some(EffectPreset::ZonePlate),
        _ => None,
    }
}

// -------------------------------------------------------------------------------------------------
// Bank helpers (portable host data)
// -------------------------------------------------------------------------------------------------

/// A named entry that selects a preset.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetDef {
    pub name: String,
    pub preset: EffectPreset,
}

/// A named bank (collection of presets).
#[derive(Debug, Clone, PartialEq)]
pub struct BankDef {
    pub name: String,
    pub presets: Vec<PresetDef>,
}

/// A collection of banks.
#[derive(Debug, Clone, PartialEq)]
pub struct BankSet {
    pub banks: Vec<BankDef>,
}

impl BankSet {
    /// Built-in banks (safe fallback when no JSON is provided).
    pub fn builtin_effect_banks() -> Self {
        let distortion = BankDef {
            name: "Distortion".to_string(),
            presets: vec![
                PresetDef {
                    name: "ripple".to_string(),
                    preset: EffectPreset::Ripple,
                },
                PresetDef {
                    name: "ripple_deep".to_string(),
                    preset: EffectPreset::RippleDeep,
                },
                PresetDef {
                    name: "ripple_rings".to_string(),
                    preset: EffectPreset::RippleRings,
                },
                PresetDef {
                    name: "wavey".to_string(),
                    preset: EffectPreset::Wavey,
                },
                PresetDef {
                    name: "wavey_broad".to_string(),
                    preset: EffectPreset::WaveyBroad,
                },
            ],
        };

        let test_patterns = BankDef {
            name: "Test Patterns".to_string(),
            presets: vec![PresetDef {
                name: "zone_plate".to_string(),
                preset: EffectPreset::ZonePlate,
            }],
        };

        BankSet {
            banks: vec![distortion, test_patterns],
        }
    }

    #[cfg(feature = "serde")]
    pub fn from_json_path(path: impl AsRef<std::path::Path>) -> Result<Self, String> {
        use std::fs;

        #[derive(serde::Deserialize)]
        struct JsonPreset {
            name: String,
            preset: String,
        }
        #[derive(serde::Deserialize)]
        struct JsonBank {
            name: String,
            presets: Vec<JsonPreset>,
        }
        #[derive(serde::Deserialize)]
        struct JsonRoot {
            banks: Vec<JsonBank>,
        }

        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| format!("read {}: {e}", path.display()))?;
        let root: JsonRoot =
            serde_json::from_slice(&bytes).map_err(|e| format!("parse json: {e}"))?;

        if root.banks.is_empty() {
            return Err("json has no banks".to_string());
        }

        let mut banks = Vec::new();
        for b in root.banks {
            if b.presets.is_empty() {
                continue;
            }
            let mut presets = Vec::new();
            for p in b.presets {
                let Some(known) = preset_from_str(&p.preset) else {
                    return Err(format!("unknown preset '{}' in entry '{}'", p.preset, p.name));
                };
                presets.push(PresetDef {
                    name: p.name,
                    preset: known,
                });
            }
            banks.push(BankDef {
                name: b.name,
                presets,
            });
        }

        if banks.is_empty() {
            return Err("json banks had no valid presets".to_string());
        }

        Ok(BankSet { banks })
    }
}
