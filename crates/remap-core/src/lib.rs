#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

pub mod config;
pub mod error;

// ---- Stable re-exports ----
pub use error::EngineError;

pub use config::{
    load_render_config_from, load_typed_json, RenderConfig, MAX_QUALITY, MIN_QUALITY,
};
