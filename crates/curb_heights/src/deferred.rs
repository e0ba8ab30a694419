//! Deferred downstream recomputation.
//!
//! Lane geometry and pillar placement depend on host routines that must
//! not run in the middle of a scan/apply/revert pass. The controller only
//! enqueues work here; the plugin drains the queue in `PostUpdate`.

use bevy::prelude::*;

use crate::network::{AssetCategory, NetworkAssetId};
use crate::pillars::PillarOffsets;

#[derive(Debug, Clone, PartialEq)]
pub enum DeferredWork {
    /// Rebuild lane geometry for these assets.
    RefreshLanes {
        category: AssetCategory,
        assets: Vec<NetworkAssetId>,
    },
    /// Write these pillar offsets to the host and re-place pillars.
    PushPillars {
        updates: Vec<(NetworkAssetId, PillarOffsets)>,
    },
}

/// Enqueue-only sink for [`DeferredWork`].
pub trait RecomputeSink {
    fn enqueue(&mut self, work: DeferredWork);
}

impl RecomputeSink for Vec<DeferredWork> {
    fn enqueue(&mut self, work: DeferredWork) {
        self.push(work);
    }
}

/// Queue drained once per frame by the plugin.
#[derive(Resource, Debug, Default)]
pub struct DeferredRecompute {
    queue: Vec<DeferredWork>,
}

impl DeferredRecompute {
    pub fn pending(&self) -> &[DeferredWork] {
        &self.queue
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn drain(&mut self) -> Vec<DeferredWork> {
        std::mem::take(&mut self.queue)
    }
}

impl RecomputeSink for DeferredRecompute {
    fn enqueue(&mut self, work: DeferredWork) {
        self.queue.push(work);
    }
}
