//! Records of what a scan changed, kept for the whole session.
//!
//! Original vertex buffers are captured once, before the first mutation,
//! and shared (`Arc`) between every piece that references the same mesh.
//! They are never overwritten; apply and revert only ever read them.

use std::collections::BTreeMap;
use std::sync::Arc;

use bevy::asset::AssetId;
use bevy::prelude::*;

use crate::classifier::BandEligibility;
use crate::network::{NetworkAssetId, ParkingId, PieceKind};
use crate::overrides::AssetParams;
use crate::pillars::PillarOffsets;

/// Immutable pre-mutation positions of one mesh.
pub type OriginalPositions = Arc<[[f32; 3]]>;

/// One mesh of a recorded piece.
#[derive(Debug, Clone)]
pub struct RecordedMesh {
    pub id: AssetId<Mesh>,
    pub original: OriginalPositions,
    /// Frozen at scan time; never recomputed.
    pub eligibility: BandEligibility,
}

/// Main and LOD meshes of one segment or node.
#[derive(Debug, Clone)]
pub struct ComponentRecord {
    pub owner: NetworkAssetId,
    pub main: Option<RecordedMesh>,
    pub lod: Option<RecordedMesh>,
}

impl ComponentRecord {
    pub fn eligibility(&self) -> BandEligibility {
        self.meshes()
            .map(|m| m.eligibility)
            .fold(BandEligibility::default(), BandEligibility::union)
    }

    pub fn eligible_for_bridge(&self) -> bool {
        self.eligibility().bridge
    }

    pub fn meshes(&self) -> impl Iterator<Item = &RecordedMesh> {
        self.main.iter().chain(self.lod.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_none() && self.lod.is_none()
    }
}

/// Everything needed to restore or re-derive one network asset.
#[derive(Debug, Clone)]
pub struct AssetRecord {
    pub asset: NetworkAssetId,
    pub name: String,
    pub params: AssetParams,
    pub surface_level: f32,
    pub segments: BTreeMap<usize, ComponentRecord>,
    pub nodes: BTreeMap<usize, ComponentRecord>,
    /// Original vertical offsets of the lanes that were rescaled.
    pub lanes: BTreeMap<usize, f32>,
    pub pillars: Option<PillarOffsets>,
    pub pillars_eligible: bool,
}

impl AssetRecord {
    pub fn new(
        asset: NetworkAssetId,
        name: impl Into<String>,
        params: AssetParams,
        surface_level: f32,
    ) -> Self {
        Self {
            asset,
            name: name.into(),
            params,
            surface_level,
            segments: BTreeMap::new(),
            nodes: BTreeMap::new(),
            lanes: BTreeMap::new(),
            pillars: None,
            pillars_eligible: false,
        }
    }

    pub fn components_mut(&mut self, kind: PieceKind) -> &mut BTreeMap<usize, ComponentRecord> {
        match kind {
            PieceKind::Segment => &mut self.segments,
            PieceKind::Node => &mut self.nodes,
        }
    }

    pub fn components(&self) -> impl Iterator<Item = &ComponentRecord> {
        self.segments.values().chain(self.nodes.values())
    }

    pub fn has_components(&self) -> bool {
        !self.segments.is_empty() || !self.nodes.is_empty()
    }

    pub fn any_bridge_eligible(&self) -> bool {
        self.components().any(ComponentRecord::eligible_for_bridge)
    }
}

/// Records of one network category, keyed by asset.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: BTreeMap<NetworkAssetId, AssetRecord>,
}

impl RecordStore {
    pub fn insert(&mut self, record: AssetRecord) {
        self.records.insert(record.asset, record);
    }

    pub fn get(&self, asset: NetworkAssetId) -> Option<&AssetRecord> {
        self.records.get(&asset)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetRecord> {
        self.records.values()
    }

    pub fn ids(&self) -> Vec<NetworkAssetId> {
        self.records.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

// ---------------------------------------------------------------------------
// Parking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ParkingRecord {
    pub structure: ParkingId,
    pub mesh: Option<AssetId<Mesh>>,
    /// `None` when the mesh was already claimed by another record during
    /// the scan; that record restores it.
    pub original: Option<OriginalPositions>,
    pub eligibility: BandEligibility,
    /// Original Y of each rescaled prop.
    pub props: BTreeMap<usize, f32>,
}

#[derive(Debug, Default)]
pub struct ParkingRecords {
    records: BTreeMap<ParkingId, ParkingRecord>,
}

impl ParkingRecords {
    pub fn insert(&mut self, record: ParkingRecord) {
        self.records.insert(record.structure, record);
    }

    pub fn get(&self, id: ParkingId) -> Option<&ParkingRecord> {
        self.records.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParkingRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
