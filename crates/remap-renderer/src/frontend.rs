//! Renderer frontend: build / update / rebuild / dispose.
//!
//! The frontend owns the multisample topology and one device stage per
//! sample. The host drives it through lifecycle calls on its render thread;
//! nothing here blocks, suspends, or spawns. A parameter edit is applied
//! either as a constant update on the existing stages (the common, fast
//! path) or as a full teardown-and-rebuild when a structural parameter
//! changed (the rare, expensive path). The decision between the two is a
//! pure function over parameter snapshots, [`inspect_token_changes`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::{Vec2, Vec4};

use remap_core::EngineError;
use remap_effects::rgss::rgss_offsets;
use remap_effects::{EdgeMode, EffectParams, ShaderInstance};
use remap_graph::{build_sample_map_fanout, FanoutTopology, NodeId, Plan};

use crate::device::{StageDevice, StageId};
use crate::image::ImageBuffer;

// -------------------------------------------------------------------------------------------------
// Host-facing value types
// -------------------------------------------------------------------------------------------------

/// Cooperative cancellation signal owned by the host.
///
/// Clones share one flag. The frontend checks it before an expensive rebuild
/// and at row granularity while rendering, and aborts by returning
/// [`EngineError::Cancelled`] without leaving partial state behind.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// An immutable, pre-validated snapshot of everything a render depends on.
///
/// The host rebuilds the token on every configuration edit; the frontend
/// never sees a partially-edited one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderToken {
    pub params: EffectParams,
    /// Antialiasing quality; sample count is quality². Structural.
    pub quality: u32,
    /// Output (and source) width in pixels.
    pub width: u32,
    /// Output (and source) height in pixels.
    pub height: u32,
}

/// How a new token must be applied relative to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAction {
    NoChange,
    /// Push new constants into the existing stages; topology untouched.
    UpdateOnly,
    /// Tear down and reconstruct the topology.
    Rebuild,
}

/// The rebuild-vs-update decision, as a pure comparison of snapshots.
///
/// Structural parameters are the quality (fan-out width) and the effect kind
/// (what the stages evaluate). Everything else, including the image size, is
/// a shader constant and only needs an update.
pub fn inspect_token_changes(old: &RenderToken, new: &RenderToken) -> TokenAction {
    if old == new {
        TokenAction::NoChange
    } else if old.quality != new.quality || old.params.kind() != new.params.kind() {
        TokenAction::Rebuild
    } else {
        TokenAction::UpdateOnly
    }
}

/// Last lifecycle transition the frontend performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontendState {
    Uninitialized,
    GraphBuilt,
    ParametersUpdated,
    GraphRebuilt,
    Disposed,
}

// -------------------------------------------------------------------------------------------------
// Frontend
// -------------------------------------------------------------------------------------------------

/// One per-sample shader stage: a device resource, its graph node, the
/// sub-pixel offset it renders at, and its baked shader constants.
#[derive(Debug)]
struct SampleStage {
    id: StageId,
    node: NodeId,
    offset: Vec2,
    shader: ShaderInstance,
}

/// The sample-map renderer frontend.
#[derive(Debug)]
pub struct SampleMapRenderer {
    state: FrontendState,
    token: Option<RenderToken>,
    topology: Option<FanoutTopology>,
    plan: Option<Plan>,
    stages: Vec<SampleStage>,
    inv_sample_count: f32,
    edge_mode: EdgeMode,
    passthrough: bool,
}

impl Default for SampleMapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleMapRenderer {
    pub fn new() -> Self {
        Self {
            state: FrontendState::Uninitialized,
            token: None,
            topology: None,
            plan: None,
            stages: Vec::new(),
            inv_sample_count: 1.0,
            edge_mode: EdgeMode::Clamp,
            passthrough: false,
        }
    }

    pub fn state(&self) -> FrontendState {
        self.state
    }

    pub fn token(&self) -> Option<&RenderToken> {
        self.token.as_ref()
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    pub fn topology(&self) -> Option<&FanoutTopology> {
        self.topology.as_ref()
    }

    pub fn sample_count(&self) -> usize {
        self.stages.len()
    }

    /// Device ids of the live stages, in sample order. Stable across
    /// constant updates; fully replaced by a rebuild.
    pub fn stage_ids(&self) -> Vec<StageId> {
        self.stages.iter().map(|s| s.id).collect()
    }

    /// Graph node backing each stage, in sample order.
    pub fn stage_nodes(&self) -> Vec<NodeId> {
        self.stages.iter().map(|s| s.node).collect()
    }

    /// Constructs (or reconstructs) the topology for `token`.
    ///
    /// Any previously built topology is torn down first; on failure or
    /// cancellation no stages remain allocated.
    pub fn build_output(
        &mut self,
        device: &mut dyn StageDevice,
        token: RenderToken,
        cancel: &CancelToken,
    ) -> Result<(), EngineError> {
        if self.state == FrontendState::Disposed {
            return Err(EngineError::other("build_output: renderer is disposed"));
        }
        // Check the host signal before any expensive reconstruction. Aborting
        // here leaves any previously built topology untouched.
        if cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        assert!(token.quality >= 1, "token quality must be >= 1 (validated at the config boundary)");
        assert!(
            token.width > 0 && token.height > 0,
            "token size must be non-zero (validated at the config boundary)"
        );

        let rebuilt = self.state != FrontendState::Uninitialized;

        // Tear down the old topology before building the new one so a failed
        // rebuild cannot leak stages from the previous graph.
        self.teardown(device);

        let topology = build_sample_map_fanout(token.quality)?;
        let plan = topology.graph.compile()?;

        let offsets = rgss_offsets(token.quality);
        let mut stages: Vec<SampleStage> = Vec::with_capacity(offsets.len());
        for (i, offset) in offsets.into_iter().enumerate() {
            match device.create_stage() {
                Ok(id) => stages.push(SampleStage {
                    id,
                    node: topology.sample_maps[i],
                    offset,
                    shader: token.params.instantiate(token.width, token.height),
                }),
                Err(e) => {
                    for s in stages.drain(..) {
                        device.release_stage(s.id);
                    }
                    self.state = FrontendState::Uninitialized;
                    return Err(e);
                }
            }
        }

        self.inv_sample_count = 1.0 / stages.len() as f32;
        self.edge_mode = token.params.edge_mode();
        self.passthrough = token.params.is_identity();
        self.stages = stages;
        self.topology = Some(topology);
        self.plan = Some(plan);
        self.token = Some(token);
        self.state = if rebuilt {
            FrontendState::GraphRebuilt
        } else {
            FrontendState::GraphBuilt
        };
        Ok(())
    }

    /// Pushes new constants into the existing stages.
    ///
    /// Only legal for non-structural changes; a structural change must go
    /// through [`Self::build_output`]. Applying an identical token is a
    /// no-op, which keeps repeated updates bit-identical.
    pub fn update_output(&mut self, token: RenderToken) -> Result<TokenAction, EngineError> {
        let Some(current) = self.token else {
            return Err(EngineError::other("update_output: no graph built"));
        };
        match inspect_token_changes(&current, &token) {
            TokenAction::NoChange => Ok(TokenAction::NoChange),
            TokenAction::Rebuild => Err(EngineError::other(
                "update_output: structural parameter changed, rebuild required",
            )),
            TokenAction::UpdateOnly => {
                for stage in &mut self.stages {
                    stage.shader = token.params.instantiate(token.width, token.height);
                }
                self.edge_mode = token.params.edge_mode();
                self.passthrough = token.params.is_identity();
                self.token = Some(token);
                self.state = FrontendState::ParametersUpdated;
                Ok(TokenAction::UpdateOnly)
            }
        }
    }

    /// Applies a token through the cheapest sufficient path: constant update
    /// when possible, rebuild when structural parameters changed. The first
    /// token is reported as [`TokenAction::Rebuild`].
    pub fn apply_token(
        &mut self,
        device: &mut dyn StageDevice,
        token: RenderToken,
        cancel: &CancelToken,
    ) -> Result<TokenAction, EngineError> {
        let action = match self.token {
            None => TokenAction::Rebuild,
            Some(current) => inspect_token_changes(&current, &token),
        };
        match action {
            TokenAction::NoChange => Ok(TokenAction::NoChange),
            TokenAction::UpdateOnly => self.update_output(token),
            TokenAction::Rebuild => {
                self.build_output(device, token, cancel)?;
                Ok(TokenAction::Rebuild)
            }
        }
    }

    /// Renders the current effect over `source`.
    ///
    /// Pure with respect to the frontend: repeated calls with the same
    /// source produce bit-identical output.
    pub fn render(
        &self,
        source: &ImageBuffer,
        cancel: &CancelToken,
    ) -> Result<ImageBuffer, EngineError> {
        let Some(token) = self.token else {
            return Err(EngineError::other("render: no graph built"));
        };
        if source.width() != token.width || source.height() != token.height {
            return Err(EngineError::other(format!(
                "render: source is {}x{}, token expects {}x{}",
                source.width(),
                source.height(),
                token.width,
                token.height
            )));
        }

        // Degenerate parameters (zero displacement, or constants that would
        // divide by zero) pass the source through unmodified.
        if self.passthrough {
            return Ok(source.clone());
        }

        let mut out = ImageBuffer::new(token.width, token.height);
        for y in 0..token.height {
            // Row granularity is coarse enough; the host only needs an
            // eventual abort, not a per-pixel one.
            if cancel.is_cancelled() {
                return Err(EngineError::Cancelled);
            }
            for x in 0..token.width {
                let scene = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let mut acc = Vec4::ZERO;
                for stage in &self.stages {
                    let pos = scene + stage.offset;
                    acc += match &stage.shader {
                        ShaderInstance::Distortion(map) => {
                            let s = map.evaluate(pos);
                            source.fetch(s.pos, self.edge_mode) * s.weight
                        }
                        ShaderInstance::Generative(shader) => shader.evaluate(pos),
                    };
                }
                out.set_pixel(x, y, acc * self.inv_sample_count);
            }
        }
        Ok(out)
    }

    /// Releases every device resource and returns to `Uninitialized`.
    ///
    /// Called by the host when the device is lost; safe to call repeatedly
    /// and before the first build.
    pub fn invalidate_device_resources(&mut self, device: &mut dyn StageDevice) {
        self.teardown(device);
        if self.state != FrontendState::Disposed {
            self.state = FrontendState::Uninitialized;
        }
    }

    /// Terminal teardown. Idempotent; further builds are rejected.
    pub fn dispose(&mut self, device: &mut dyn StageDevice) {
        self.teardown(device);
        self.state = FrontendState::Disposed;
    }

    fn teardown(&mut self, device: &mut dyn StageDevice) {
        for s in self.stages.drain(..) {
            device.release_stage(s.id);
        }
        self.topology = None;
        self.plan = None;
        self.token = None;
        self.passthrough = false;
    }
}
