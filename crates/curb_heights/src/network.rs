//! Host-side view of loaded network and parking prefabs.
//!
//! The host fills these catalogs when prefabs finish loading. Meshes are
//! referenced by handle, so several pieces (and several assets) can point
//! at the same physical mesh.

use bevy::asset::AssetId;
use bevy::prelude::*;

use crate::constants::override_key;
use crate::pillars::PillarOffsets;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkAssetId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParkingId(pub u32);

/// Which family of assets a scan/apply/revert pass handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    /// Roads, road bridges, tunnels and dams.
    Roads,
    /// Pedestrian paths and path bridges.
    Paths,
    /// Enumerated parking-lot buildings.
    Parking,
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 3] = [
        AssetCategory::Roads,
        AssetCategory::Paths,
        AssetCategory::Parking,
    ];
}

/// Behaviour tag of a network prefab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkKind {
    Road,
    Bridge,
    Tunnel,
    Dam,
    Path,
    PathBridge,
}

impl NetworkKind {
    /// Assets whose decks hang over pillars and may use the bridge band.
    pub fn is_bridge_capable(self) -> bool {
        matches!(self, NetworkKind::Bridge | NetworkKind::Dam | NetworkKind::PathBridge)
    }

    pub fn category(self) -> AssetCategory {
        match self {
            NetworkKind::Path | NetworkKind::PathBridge => AssetCategory::Paths,
            _ => AssetCategory::Roads,
        }
    }
}

/// Coarse material class of a segment/node mesh, used to reject irrelevant
/// meshes before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceShader {
    Road,
    Pedestrian,
    Other,
}

impl SurfaceShader {
    /// Shader that marks a relevant mesh for the given category.
    pub fn matches(self, category: AssetCategory) -> bool {
        match category {
            AssetCategory::Roads => self == SurfaceShader::Road,
            AssetCategory::Paths => self == SurfaceShader::Pedestrian,
            AssetCategory::Parking => true,
        }
    }
}

/// A named mesh handle. The name keys replacement-mesh lookup.
#[derive(Debug, Clone)]
pub struct MeshRef {
    pub name: String,
    pub handle: Handle<Mesh>,
}

impl MeshRef {
    pub fn new(name: impl Into<String>, handle: Handle<Mesh>) -> Self {
        Self {
            name: name.into(),
            handle,
        }
    }

    pub fn id(&self) -> AssetId<Mesh> {
        self.handle.id()
    }
}

/// Segment or node of a network asset.
#[derive(Debug, Clone)]
pub struct NetworkPiece {
    pub main_mesh: Option<MeshRef>,
    pub lod_mesh: Option<MeshRef>,
    pub shader: SurfaceShader,
}

/// Which list of an asset a piece lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Segment,
    Node,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lane {
    pub vertical_offset: f32,
}

/// One loaded road/path/bridge/tunnel/dam prefab.
#[derive(Debug, Clone)]
pub struct NetworkAsset {
    pub id: NetworkAssetId,
    pub name: String,
    pub kind: NetworkKind,
    pub surface_level: f32,
    pub segments: Vec<NetworkPiece>,
    pub nodes: Vec<NetworkPiece>,
    pub lanes: Vec<Lane>,
    /// Structural pillar offsets (bridge-capable assets only). Adjusted
    /// offsets arrive through the deferred recompute pass. Revert writes the
    /// originals back directly.
    pub pillars: Option<PillarOffsets>,
}

impl NetworkAsset {
    pub fn override_key(&self) -> &str {
        override_key(&self.name)
    }

    pub fn pieces_mut(&mut self, kind: PieceKind) -> &mut [NetworkPiece] {
        match kind {
            PieceKind::Segment => &mut self.segments,
            PieceKind::Node => &mut self.nodes,
        }
    }
}

/// Blueprint for [`NetworkCatalog::add`].
#[derive(Debug, Clone)]
pub struct NewNetworkAsset {
    pub name: String,
    pub kind: NetworkKind,
    pub surface_level: f32,
    pub segments: Vec<NetworkPiece>,
    pub nodes: Vec<NetworkPiece>,
    pub lanes: Vec<Lane>,
    pub pillars: Option<PillarOffsets>,
}

/// Loaded network assets. Ids are dense positions assigned in insertion
/// order from zero, so lookups index directly.
#[derive(Resource, Default, Debug)]
pub struct NetworkCatalog {
    assets: Vec<NetworkAsset>,
}

impl NetworkCatalog {
    pub fn add(&mut self, asset: NewNetworkAsset) -> NetworkAssetId {
        let id = NetworkAssetId(self.assets.len() as u32);
        self.assets.push(NetworkAsset {
            id,
            name: asset.name,
            kind: asset.kind,
            surface_level: asset.surface_level,
            segments: asset.segments,
            nodes: asset.nodes,
            lanes: asset.lanes,
            pillars: asset.pillars,
        });
        id
    }

    pub fn get(&self, id: NetworkAssetId) -> Option<&NetworkAsset> {
        self.assets.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NetworkAssetId) -> Option<&mut NetworkAsset> {
        self.assets.get_mut(id.0 as usize)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut NetworkAsset> {
        self.assets.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Parking
// ---------------------------------------------------------------------------

/// A decorative or structural prop placed on a parking lot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParkingProp {
    pub position: Vec3,
}

#[derive(Debug, Clone)]
pub struct ParkingStructure {
    pub id: ParkingId,
    pub name: String,
    pub mesh: Option<MeshRef>,
    pub props: Vec<ParkingProp>,
}

/// Loaded parking structures. Ids are dense positions, as in
/// [`NetworkCatalog`].
#[derive(Resource, Default, Debug)]
pub struct ParkingCatalog {
    structures: Vec<ParkingStructure>,
}

impl ParkingCatalog {
    pub fn add(
        &mut self,
        name: impl Into<String>,
        mesh: Option<MeshRef>,
        props: Vec<ParkingProp>,
    ) -> ParkingId {
        let id = ParkingId(self.structures.len() as u32);
        self.structures.push(ParkingStructure {
            id,
            name: name.into(),
            mesh,
            props,
        });
        id
    }

    pub fn get(&self, id: ParkingId) -> Option<&ParkingStructure> {
        self.structures.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ParkingId) -> Option<&mut ParkingStructure> {
        self.structures.get_mut(id.0 as usize)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ParkingStructure> {
        self.structures.iter_mut()
    }
}
