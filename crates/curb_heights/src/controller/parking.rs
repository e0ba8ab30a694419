//! Parking lots: one mesh and a set of props per enumerated structure.
//!
//! Only the curb band is used. A mesh already claimed by another record
//! in the same scan is not recorded again, so it is restored exactly once.

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::classifier::{BandBounds, BandEligibility};
use crate::mutator::{adjust_mesh, restore_mesh, ProcessedMeshes};
use crate::network::AssetCategory;
use crate::records::{ParkingRecord, ParkingRecords};

use super::plan::CyclePlan;
use super::scan::ScanState;
use super::types::{CycleKind, CycleReport, HeightContext};

pub(crate) fn scan_parking(
    store: &mut ParkingRecords,
    processed: &mut ProcessedMeshes,
    state: &mut ScanState<'_>,
    plan: &CyclePlan,
    ctx: &mut HeightContext<'_>,
) -> CycleReport {
    let mut report = CycleReport::new(CycleKind::Scan, AssetCategory::Parking);
    let params = plan.parking_params();
    let bands = BandBounds::default();

    for structure in ctx.parking.iter_mut() {
        if !ctx.registry.is_parking(&structure.name) {
            continue;
        }

        let mut record = ParkingRecord {
            structure: structure.id,
            mesh: None,
            original: None,
            eligibility: BandEligibility::default(),
            props: BTreeMap::new(),
        };

        if let Some(mesh_ref) = structure.mesh.as_mut() {
            match state.make_readable(ctx.meshes, mesh_ref, ctx.replacements) {
                Ok(()) => {
                    let id = mesh_ref.id();
                    let first_claim = state.claim(id);
                    if let Some(checked) = state.check(ctx.meshes, id, &bands, false) {
                        if checked.classification.eligibility.primary {
                            record.mesh = Some(id);
                            record.eligibility = BandEligibility {
                                primary: true,
                                ..Default::default()
                            };
                            if first_claim {
                                record.original = Some(checked.original.clone());
                            }
                        }
                    }
                }
                Err(err) => {
                    warn!("{}: skipping parking mesh: {}", structure.name, err);
                    report.pieces_skipped += 1;
                }
            }
        }

        if let (Some(id), Some(_)) = (record.mesh, &record.original) {
            report.count(adjust_mesh(
                ctx.meshes,
                id,
                &params,
                record.eligibility,
                processed,
            ));
        }

        for (index, prop) in structure.props.iter_mut().enumerate() {
            let original = prop.position.y;
            if params.bands.in_primary(original) {
                record.props.insert(index, original);
                prop.position.y = params.scale_height(original);
            }
        }

        if record.mesh.is_some() || !record.props.is_empty() {
            store.insert(record);
            report.assets_altered += 1;
        }
    }

    report
}

pub(crate) fn apply_parking(
    store: &ParkingRecords,
    processed: &mut ProcessedMeshes,
    plan: &CyclePlan,
    ctx: &mut HeightContext<'_>,
) -> CycleReport {
    let mut report = CycleReport::new(CycleKind::Apply, AssetCategory::Parking);
    let params = plan.parking_params();

    for record in store.iter() {
        if let (Some(id), Some(original)) = (record.mesh, &record.original) {
            restore_mesh(ctx.meshes, id, original, processed, false);
            report.count(adjust_mesh(
                ctx.meshes,
                id,
                &params,
                record.eligibility,
                processed,
            ));
        }

        let Some(structure) = ctx.parking.get_mut(record.structure) else {
            report.assets_skipped += 1;
            continue;
        };
        for (&index, &original) in &record.props {
            if let Some(prop) = structure.props.get_mut(index) {
                prop.position.y = params.scale_height(original);
            }
        }
        report.assets_altered += 1;
    }

    report
}

pub(crate) fn revert_parking(
    store: &ParkingRecords,
    processed: &mut ProcessedMeshes,
    ctx: &mut HeightContext<'_>,
) -> CycleReport {
    let mut report = CycleReport::new(CycleKind::Revert, AssetCategory::Parking);

    for record in store.iter() {
        if let (Some(id), Some(original)) = (record.mesh, &record.original) {
            if restore_mesh(ctx.meshes, id, original, processed, true) {
                report.meshes_written += 1;
            }
        }

        let Some(structure) = ctx.parking.get_mut(record.structure) else {
            report.assets_skipped += 1;
            continue;
        };
        for (&index, &original) in &record.props {
            if let Some(prop) = structure.props.get_mut(index) {
                prop.position.y = original;
            }
        }
        report.assets_altered += 1;
    }

    report
}
