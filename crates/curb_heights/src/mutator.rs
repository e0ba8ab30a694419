//! Mesh mutation: rewrite the Y component of a mesh's positions band by band.
//!
//! Buffers are write-only-by-replacement: a new position vector is built
//! and inserted as a whole, never edited in place. A mesh handle is mutated
//! at most once per cycle; [`ProcessedMeshes`] is the guard.

use std::collections::HashSet;

use bevy::asset::AssetId;
use bevy::prelude::*;
use bevy::render::mesh::VertexAttributeValues;
use bevy::render::render_asset::RenderAssetUsages;

use crate::classifier::{BandBounds, BandCounts, BandEligibility};
use crate::constants::COMMIT_QUORUM;
use crate::pillars::pivot_scale;

// =============================================================================
// Parameters
// =============================================================================

/// Everything needed to transform one buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationParams {
    /// Bands used for matching. `bridge_threshold` is the pivot of the
    /// bridge transform.
    pub bands: BandBounds,
    /// Road bed depth the asset was authored with.
    pub original_curb: f32,
    /// Road bed depth to move to.
    pub new_curb: f32,
    pub bridge_enabled: bool,
    pub bridge_scale: f32,
}

impl MutationParams {
    pub fn curb_ratio(&self) -> f32 {
        self.new_curb / self.original_curb
    }

    pub fn sub_surface_shift(&self) -> f32 {
        self.original_curb - self.new_curb
    }

    /// Proportional rescale used for curb-band vertices, lane offsets,
    /// surface levels and parking props.
    pub fn scale_height(&self, y: f32) -> f32 {
        y * self.curb_ratio()
    }

    /// Rescale `y` if it lies in the curb band, otherwise return it unchanged.
    pub fn scale_if_primary(&self, y: f32) -> f32 {
        if self.bands.in_primary(y) {
            self.scale_height(y)
        } else {
            y
        }
    }

    pub fn with_new_curb(mut self, new_curb: f32) -> Self {
        self.new_curb = new_curb;
        self
    }
}

// =============================================================================
// Cycle guard
// =============================================================================

/// Mesh handles already written during the current apply/revert/scan cycle.
#[derive(Debug, Default)]
pub struct ProcessedMeshes {
    ids: HashSet<AssetId<Mesh>>,
}

impl ProcessedMeshes {
    pub fn begin_cycle(&mut self) {
        self.ids.clear();
    }

    pub fn end_cycle(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: AssetId<Mesh>) -> bool {
        self.ids.contains(&id)
    }

    pub fn mark(&mut self, id: AssetId<Mesh>) {
        self.ids.insert(id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// =============================================================================
// Reading positions
// =============================================================================

/// CPU-side positions of a mesh, if the host kept them.
///
/// Meshes uploaded with render-world-only usage, or without a `Float32x3`
/// position attribute, are unreadable.
pub fn mesh_positions(mesh: &Mesh) -> Option<&[[f32; 3]]> {
    if !mesh.asset_usage.contains(RenderAssetUsages::MAIN_WORLD) {
        return None;
    }
    match mesh.attribute(Mesh::ATTRIBUTE_POSITION)? {
        VertexAttributeValues::Float32x3(v) => Some(v.as_slice()),
        _ => None,
    }
}

pub fn is_readable(meshes: &Assets<Mesh>, id: AssetId<Mesh>) -> bool {
    meshes.get(id).and_then(mesh_positions).is_some()
}

// =============================================================================
// Transform
// =============================================================================

/// Transform a copy of `source`, returning the new buffer and the number of
/// vertices moved per band. Only eligible bands are touched.
pub fn transform_vertices(
    source: &[[f32; 3]],
    params: &MutationParams,
    eligibility: BandEligibility,
) -> (Vec<[f32; 3]>, BandCounts) {
    let bands = &params.bands;
    let ratio = params.curb_ratio();
    let shift = params.sub_surface_shift();
    let bridge = params.bridge_enabled && eligibility.bridge;

    let mut counts = BandCounts::default();
    let mut out = source.to_vec();

    for v in &mut out {
        let y = v[1];
        if bands.in_primary(y) {
            if eligibility.primary {
                v[1] = y * ratio;
                counts.primary += 1;
            }
        } else if bands.in_sub_surface(y) {
            if eligibility.sub_surface {
                v[1] = y - shift;
                counts.sub_surface += 1;
            }
        } else if bridge && bands.in_bridge(y) {
            v[1] = pivot_scale(y, bands.bridge_threshold, params.bridge_scale);
            counts.bridge += 1;
        }
    }

    (out, counts)
}

/// What happened to a mesh handed to [`adjust_mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// New buffer published, mesh marked processed.
    Committed(BandCounts),
    /// Too few vertices moved; buffer untouched and mesh left unmarked.
    BelowQuorum(BandCounts),
    /// Already written this cycle.
    AlreadyProcessed,
    /// No CPU-side positions to transform.
    Unreadable,
}

impl MutationOutcome {
    pub fn committed(&self) -> bool {
        matches!(self, MutationOutcome::Committed(_))
    }
}

/// Transform the mesh's current positions and publish them if the commit
/// quorum is met in at least one eligible band.
pub fn adjust_mesh(
    meshes: &mut Assets<Mesh>,
    id: AssetId<Mesh>,
    params: &MutationParams,
    eligibility: BandEligibility,
    processed: &mut ProcessedMeshes,
) -> MutationOutcome {
    if processed.contains(id) {
        return MutationOutcome::AlreadyProcessed;
    }

    let (next, counts) = {
        let Some(source) = meshes.get(id).and_then(mesh_positions) else {
            return MutationOutcome::Unreadable;
        };
        transform_vertices(source, params, eligibility)
    };

    if !eligibility.meets_quorum(&counts, COMMIT_QUORUM) {
        return MutationOutcome::BelowQuorum(counts);
    }

    let Some(mesh) = meshes.get_mut(id) else {
        return MutationOutcome::Unreadable;
    };
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, next);
    processed.mark(id);
    MutationOutcome::Committed(counts)
}

/// Write a recorded original buffer back, unless the mesh was already
/// written this cycle. `mark` claims the mesh for the rest of the cycle
/// (used by revert; apply leaves it unmarked so it can re-adjust).
pub fn restore_mesh(
    meshes: &mut Assets<Mesh>,
    id: AssetId<Mesh>,
    original: &[[f32; 3]],
    processed: &mut ProcessedMeshes,
    mark: bool,
) -> bool {
    if processed.contains(id) {
        return false;
    }
    let Some(mesh) = meshes.get_mut(id) else {
        return false;
    };
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, original.to_vec());
    if mark {
        processed.mark(id);
    }
    true
}
