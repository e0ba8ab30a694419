//! Load-time scan: classify, record originals, then adjust with the
//! current settings.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use bevy::asset::AssetId;
use bevy::prelude::*;

use crate::classifier::{classify, BandBounds};
use crate::constants::CLASSIFY_QUORUM;
use crate::error::HeightError;
use crate::mutator::{
    adjust_mesh, mesh_positions, restore_mesh, MutationParams, ProcessedMeshes,
};
use crate::network::{MeshRef, NetworkAsset, NetworkAssetId, NetworkPiece, PieceKind};
use crate::overrides::AssetParams;
use crate::records::{AssetRecord, ComponentRecord, RecordStore, RecordedMesh};
use crate::replacement::{ensure_readable, ReplacementCache, ReplacementMeshSource};

use super::apply::enqueue_followups;
use super::plan::CyclePlan;
use super::types::{AssetOutcome, CheckedMesh, CycleKind, CycleReport, HeightContext};

/// Per-pass scan state layered over the controller's session-wide
/// classification cache.
pub(crate) struct ScanState<'s> {
    checked: &'s mut HashMap<AssetId<Mesh>, CheckedMesh>,
    /// Meshes some record of this pass already owns.
    claimed: HashSet<AssetId<Mesh>>,
    replacements: ReplacementCache,
}

impl<'s> ScanState<'s> {
    pub(crate) fn new(checked: &'s mut HashMap<AssetId<Mesh>, CheckedMesh>) -> Self {
        Self {
            checked,
            claimed: HashSet::new(),
            replacements: ReplacementCache::default(),
        }
    }

    /// Classify `id` the first time it is seen. Later calls return the
    /// first result, whatever bands they ask for.
    pub(crate) fn check(
        &mut self,
        meshes: &Assets<Mesh>,
        id: AssetId<Mesh>,
        bands: &BandBounds,
        bridge_capable: bool,
    ) -> Option<&CheckedMesh> {
        if !self.checked.contains_key(&id) {
            let positions = meshes.get(id).and_then(mesh_positions)?;
            let classification = classify(positions, CLASSIFY_QUORUM, bands, bridge_capable);
            debug!(
                "Classified mesh {:?}: {:?} (full depth: {})",
                id, classification.counts, classification.full_depth
            );
            self.checked.insert(
                id,
                CheckedMesh {
                    original: Arc::from(positions),
                    classification,
                },
            );
        }
        self.checked.get(&id)
    }

    /// Claim `id` for the caller. Returns `false` if it was already claimed
    /// during this pass.
    pub(crate) fn claim(&mut self, id: AssetId<Mesh>) -> bool {
        self.claimed.insert(id)
    }

    pub(crate) fn make_readable(
        &mut self,
        meshes: &mut Assets<Mesh>,
        mesh_ref: &mut MeshRef,
        source: Option<&(dyn ReplacementMeshSource + Send + Sync)>,
    ) -> Result<(), HeightError> {
        ensure_readable(meshes, mesh_ref, source, &mut self.replacements).map(|_| ())
    }
}

struct ScanEnv<'e, 's> {
    meshes: &'e mut Assets<Mesh>,
    source: Option<&'e (dyn ReplacementMeshSource + Send + Sync)>,
    state: &'e mut ScanState<'s>,
    processed: &'e mut ProcessedMeshes,
    plan: &'e CyclePlan,
    store: &'e mut RecordStore,
    report: &'e mut CycleReport,
}

impl ScanEnv<'_, '_> {
    fn record_mesh(
        &mut self,
        mesh_ref: &mut MeshRef,
        bands: &BandBounds,
        bridge_capable: bool,
    ) -> Result<Option<RecordedMesh>, HeightError> {
        self.state.make_readable(self.meshes, mesh_ref, self.source)?;
        let id = mesh_ref.id();
        self.state.claim(id);

        let Some(checked) = self.state.check(self.meshes, id, bands, bridge_capable) else {
            return Err(HeightError::UnreadableMesh {
                name: mesh_ref.name.clone(),
            });
        };
        if !checked.classification.is_eligible() {
            return Ok(None);
        }
        Ok(Some(RecordedMesh {
            id,
            original: checked.original.clone(),
            eligibility: checked.classification.eligibility,
        }))
    }

    /// Record a piece's main and LOD meshes. A mesh that stays unreadable
    /// fails the whole piece.
    fn record_piece(
        &mut self,
        owner: NetworkAssetId,
        piece: &mut NetworkPiece,
        bands: &BandBounds,
        bridge_capable: bool,
    ) -> Result<Option<ComponentRecord>, HeightError> {
        let main = match piece.main_mesh.as_mut() {
            Some(mesh_ref) => self.record_mesh(mesh_ref, bands, bridge_capable)?,
            None => None,
        };
        let lod = match piece.lod_mesh.as_mut() {
            Some(mesh_ref) => self.record_mesh(mesh_ref, bands, bridge_capable)?,
            None => None,
        };
        let component = ComponentRecord { owner, main, lod };
        Ok((!component.is_empty()).then_some(component))
    }

    /// Same as an apply: start from the recorded originals, since another
    /// category may already have moved a shared mesh.
    fn adjust_component(&mut self, component: &ComponentRecord, params: &MutationParams) {
        for mesh in component.meshes() {
            restore_mesh(self.meshes, mesh.id, &mesh.original, self.processed, false);
        }
        if let Some(main) = &component.main {
            let outcome =
                adjust_mesh(self.meshes, main.id, params, main.eligibility, self.processed);
            self.report.count(outcome);
        }
        if self.plan.include_lods() {
            if let Some(lod) = &component.lod {
                let outcome =
                    adjust_mesh(self.meshes, lod.id, params, lod.eligibility, self.processed);
                self.report.count(outcome);
            }
        }
    }

    fn scan_asset(
        &mut self,
        asset: &mut NetworkAsset,
        params: AssetParams,
    ) -> Result<AssetOutcome, HeightError> {
        if asset.segments.is_empty() && asset.nodes.is_empty() {
            return Err(HeightError::malformed(&asset.name, "no segments or nodes"));
        }

        let bands = params.bands();
        let bridge_capable = asset.kind.is_bridge_capable() && params.bridge_allowed();
        let mesh_params = self.plan.mesh_params(&params);
        let mut record =
            AssetRecord::new(asset.id, asset.name.clone(), params, asset.surface_level);

        for kind in [PieceKind::Segment, PieceKind::Node] {
            for (index, piece) in asset.pieces_mut(kind).iter_mut().enumerate() {
                if !record.params.is_override() && !piece.shader.matches(self.plan.category) {
                    continue;
                }
                match self.record_piece(record.asset, piece, &bands, bridge_capable) {
                    Ok(Some(component)) => {
                        self.adjust_component(&component, &mesh_params);
                        record.components_mut(kind).insert(index, component);
                    }
                    Ok(None) => {}
                    Err(err) => {
                        warn!("{}: skipping {:?} {}: {}", record.name, kind, index, err);
                        self.report.pieces_skipped += 1;
                    }
                }
            }
        }

        if !record.has_components() {
            return Ok(AssetOutcome::Untouched);
        }

        let level = self.plan.level_params(&record.params);
        for (index, lane) in asset.lanes.iter_mut().enumerate() {
            let original = lane.vertical_offset;
            if level.bands.in_primary(original) {
                record.lanes.insert(index, original);
                lane.vertical_offset = level.scale_height(original);
            }
        }
        asset.surface_level = level.scale_if_primary(record.surface_level);

        if record.params.bridge_allowed() && record.any_bridge_eligible() {
            if let Some(pillars) = asset.pillars {
                record.pillars = Some(pillars);
                record.pillars_eligible = true;
            }
        }

        self.store.insert(record);
        Ok(AssetOutcome::Altered)
    }
}

/// Scan every loaded asset of a network category into `store`.
pub(crate) fn scan_network(
    store: &mut RecordStore,
    processed: &mut ProcessedMeshes,
    state: &mut ScanState<'_>,
    plan: &CyclePlan,
    ctx: &mut HeightContext<'_>,
) -> CycleReport {
    let mut report = CycleReport::new(CycleKind::Scan, plan.category);
    let registry = ctx.registry;
    let mut env = ScanEnv {
        meshes: &mut *ctx.meshes,
        source: ctx.replacements,
        state: &mut *state,
        processed: &mut *processed,
        plan,
        store: &mut *store,
        report: &mut report,
    };

    for asset in ctx
        .catalog
        .iter_mut()
        .filter(|a| a.kind.category() == plan.category)
    {
        let params = registry.resolve(&asset.name);
        match env.scan_asset(asset, params) {
            Ok(AssetOutcome::Altered) => env.report.assets_altered += 1,
            Ok(AssetOutcome::Untouched) => {}
            Err(err) => {
                warn!("Curb heights: skipping asset: {}", err);
                env.report.assets_skipped += 1;
            }
        }
    }

    let pillars = store
        .iter()
        .filter(|r| r.pillars_eligible)
        .filter_map(|r| Some((r.asset, plan.pillar_offsets(r.pillars?)?)))
        .collect();
    enqueue_followups(plan.category, store, pillars, ctx.sink);
    report
}
