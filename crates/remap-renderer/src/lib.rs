//! remap software runtime.
//
// This crate intentionally contains **only** the sample-map execution runtime:
// - source image storage and edge-resolved fetching
// - stage device-resource ownership
// - the renderer frontend (build / update / rebuild / dispose) and accumulator
//
// It does NOT contain windowing, file IO, host property/UI binding, or color
// management; those are host responsibilities.
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

pub mod device;
pub mod frontend;
pub mod image;

pub use remap_core::EngineError;

pub use device::{SoftwareDevice, StageDevice, StageId};
pub use frontend::{
    inspect_token_changes, CancelToken, FrontendState, RenderToken, SampleMapRenderer, TokenAction,
};
pub use image::ImageBuffer;
