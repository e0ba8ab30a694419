//! Apply and revert for network records. Neither pass classifies: both
//! work purely from what the scan recorded.

use bevy::prelude::*;

use crate::deferred::{DeferredWork, RecomputeSink};
use crate::mutator::{adjust_mesh, restore_mesh, ProcessedMeshes};
use crate::network::{AssetCategory, NetworkAssetId};
use crate::pillars::PillarOffsets;
use crate::records::RecordStore;

use super::plan::CyclePlan;
use super::types::{CycleKind, CycleReport, HeightContext};

/// One lane refresh per pass, plus one pillar push when there is anything
/// to push.
pub(crate) fn enqueue_followups<S: RecomputeSink + ?Sized>(
    category: AssetCategory,
    store: &RecordStore,
    pillars: Vec<(NetworkAssetId, PillarOffsets)>,
    sink: &mut S,
) {
    if !store.is_empty() {
        sink.enqueue(DeferredWork::RefreshLanes {
            category,
            assets: store.ids(),
        });
    }
    if !pillars.is_empty() {
        sink.enqueue(DeferredWork::PushPillars { updates: pillars });
    }
}

/// Restore every recorded buffer, then re-derive it with the plan's
/// parameters. Restores are unmarked so the same cycle can re-adjust.
pub(crate) fn apply_network(
    store: &RecordStore,
    processed: &mut ProcessedMeshes,
    plan: &CyclePlan,
    ctx: &mut HeightContext<'_>,
) -> CycleReport {
    let mut report = CycleReport::new(CycleKind::Apply, plan.category);
    let mut pillars = Vec::new();

    for record in store.iter() {
        let Some(asset) = ctx.catalog.get_mut(record.asset) else {
            warn!("Curb heights: recorded asset '{}' is no longer loaded", record.name);
            report.assets_skipped += 1;
            continue;
        };

        let mesh_params = plan.mesh_params(&record.params);
        for component in record.components() {
            for mesh in component.meshes() {
                restore_mesh(ctx.meshes, mesh.id, &mesh.original, processed, false);
            }
            if let Some(main) = &component.main {
                report.count(adjust_mesh(
                    ctx.meshes,
                    main.id,
                    &mesh_params,
                    main.eligibility,
                    processed,
                ));
            }
            if plan.include_lods() {
                if let Some(lod) = &component.lod {
                    report.count(adjust_mesh(
                        ctx.meshes,
                        lod.id,
                        &mesh_params,
                        lod.eligibility,
                        processed,
                    ));
                }
            }
        }

        let level = plan.level_params(&record.params);
        asset.surface_level = level.scale_if_primary(record.surface_level);
        for (&index, &original) in &record.lanes {
            if let Some(lane) = asset.lanes.get_mut(index) {
                lane.vertical_offset = level.scale_height(original);
            }
        }

        if record.pillars_eligible {
            if let Some(offsets) = record.pillars.and_then(|p| plan.pillar_offsets(p)) {
                pillars.push((record.asset, offsets));
            }
        }
        report.assets_altered += 1;
    }

    enqueue_followups(plan.category, store, pillars, ctx.sink);
    report
}

/// Write every recorded original back. Records are kept.
///
/// Pillar originals are written to the asset immediately as well as pushed
/// through the sink, so a rescan in the same frame records the originals
/// rather than the pending adjusted offsets.
pub(crate) fn revert_network(
    category: AssetCategory,
    store: &RecordStore,
    processed: &mut ProcessedMeshes,
    ctx: &mut HeightContext<'_>,
) -> CycleReport {
    let mut report = CycleReport::new(CycleKind::Revert, category);
    let mut pillars = Vec::new();

    for record in store.iter() {
        for mesh in record.components().flat_map(|c| c.meshes()) {
            if restore_mesh(ctx.meshes, mesh.id, &mesh.original, processed, true) {
                report.meshes_written += 1;
            }
        }

        let Some(asset) = ctx.catalog.get_mut(record.asset) else {
            warn!("Curb heights: recorded asset '{}' is no longer loaded", record.name);
            report.assets_skipped += 1;
            continue;
        };
        asset.surface_level = record.surface_level;
        for (&index, &original) in &record.lanes {
            if let Some(lane) = asset.lanes.get_mut(index) {
                lane.vertical_offset = original;
            }
        }
        if record.pillars_eligible {
            if let Some(originals) = record.pillars {
                asset.pillars = Some(originals);
                pillars.push((record.asset, originals));
            }
        }
        report.assets_altered += 1;
    }

    enqueue_followups(category, store, pillars, ctx.sink);
    report
}
