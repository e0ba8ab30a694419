use std::collections::HashMap;
use std::fmt;

use bevy::asset::AssetId;
use bevy::prelude::*;

use crate::classifier::Classification;
use crate::deferred::RecomputeSink;
use crate::mutator::{MutationOutcome, ProcessedMeshes};
use crate::network::{AssetCategory, NetworkCatalog, ParkingCatalog};
use crate::overrides::OverrideRegistry;
use crate::records::{OriginalPositions, ParkingRecords, RecordStore};
use crate::replacement::ReplacementMeshSource;

/// Everything a scan/apply/revert pass reads or writes outside the
/// controller itself.
pub struct HeightContext<'a> {
    pub meshes: &'a mut Assets<Mesh>,
    pub catalog: &'a mut NetworkCatalog,
    pub parking: &'a mut ParkingCatalog,
    pub registry: &'a OverrideRegistry,
    pub replacements: Option<&'a (dyn ReplacementMeshSource + Send + Sync)>,
    pub sink: &'a mut dyn RecomputeSink,
}

/// Result of scanning one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOutcome {
    /// At least one piece was recorded; the asset keeps a record.
    Altered,
    /// Nothing eligible; no record kept.
    Untouched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleKind {
    Scan,
    Apply,
    Revert,
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CycleKind::Scan => "scan",
            CycleKind::Apply => "apply",
            CycleKind::Revert => "revert",
        })
    }
}

/// Summary of one pass over one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub kind: CycleKind,
    pub category: AssetCategory,
    pub assets_altered: usize,
    pub assets_skipped: usize,
    pub pieces_skipped: usize,
    pub meshes_written: usize,
}

impl CycleReport {
    pub fn new(kind: CycleKind, category: AssetCategory) -> Self {
        Self {
            kind,
            category,
            assets_altered: 0,
            assets_skipped: 0,
            pieces_skipped: 0,
            meshes_written: 0,
        }
    }

    pub(crate) fn count(&mut self, outcome: MutationOutcome) {
        if outcome.committed() {
            self.meshes_written += 1;
        }
    }

    pub fn log(&self) {
        info!(
            "Curb heights {} {:?}: {} assets, {} meshes written, {} assets and {} pieces skipped",
            self.kind,
            self.category,
            self.assets_altered,
            self.meshes_written,
            self.assets_skipped,
            self.pieces_skipped
        );
    }
}

/// First classification of a mesh and the buffer it was made on.
#[derive(Debug, Clone)]
pub(crate) struct CheckedMesh {
    pub original: OriginalPositions,
    pub classification: Classification,
}

/// Session state: the records of every category plus the cycle guard.
#[derive(Resource, Default)]
pub struct HeightController {
    pub(crate) roads: RecordStore,
    pub(crate) paths: RecordStore,
    pub(crate) parking: ParkingRecords,
    pub(crate) processed: ProcessedMeshes,
    /// Every mesh ever classified, keyed by handle. Cleared only by a full
    /// rescan, after everything has been reverted.
    pub(crate) checked: HashMap<AssetId<Mesh>, CheckedMesh>,
    pub(crate) scanned: bool,
}

impl HeightController {
    /// Records of a network category. `None` for parking, which has its
    /// own record type.
    pub fn records(&self, category: AssetCategory) -> Option<&RecordStore> {
        match category {
            AssetCategory::Roads => Some(&self.roads),
            AssetCategory::Paths => Some(&self.paths),
            AssetCategory::Parking => None,
        }
    }

    pub fn parking_records(&self) -> &ParkingRecords {
        &self.parking
    }

    /// True once any scan has run this session.
    pub fn is_scanned(&self) -> bool {
        self.scanned
    }
}
