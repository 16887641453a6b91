//! Stage device-resource ownership.
//!
//! The renderer frontend owns one device resource per sample stage. Devices
//! allocate fallibly and release idempotently, so the frontend can guarantee
//! teardown on every exit path, including mid-build failures.

use std::collections::HashSet;
use std::fmt;

use remap_core::EngineError;

/// Identifier of a live stage resource, unique within one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StageId(pub u64);

/// Allocates and releases per-stage backing resources.
///
/// The device is supplied by the host on each lifecycle call; the frontend
/// never retains it. Ids are never reused within a device, which is what
/// makes "did the topology rebuild?" observable to hosts and tests.
pub trait StageDevice: fmt::Debug {
    /// Allocate backing resources for one sample stage.
    fn create_stage(&mut self) -> Result<StageId, EngineError>;

    /// Release a stage. Releasing an unknown or already-released id is a
    /// no-op; the frontend relies on this for idempotent dispose.
    fn release_stage(&mut self, id: StageId);

    /// Number of currently live stages.
    fn live_stages(&self) -> usize;
}

/// In-process device: stage "resources" are bookkeeping slots.
///
/// Mirrors the allocation/teardown discipline of a GPU device so frontends
/// and tests can verify resource balance without one.
#[derive(Debug, Default)]
pub struct SoftwareDevice {
    next: u64,
    live: HashSet<u64>,
}

impl SoftwareDevice {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StageDevice for SoftwareDevice {
    fn create_stage(&mut self) -> Result<StageId, EngineError> {
        let id = self.next;
        self.next += 1;
        self.live.insert(id);
        Ok(StageId(id))
    }

    fn release_stage(&mut self, id: StageId) {
        self.live.remove(&id.0);
    }

    fn live_stages(&self) -> usize {
        self.live.len()
    }
}
