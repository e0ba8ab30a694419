//! `HeightFixture`: the controller and its collaborators without an App.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::controller::{CycleReport, HeightContext, HeightController};
use crate::deferred::DeferredWork;
use crate::error::HeightError;
use crate::network::{
    Lane, MeshRef, NetworkAssetId, NetworkCatalog, NetworkKind, NetworkPiece, NewNetworkAsset,
    ParkingCatalog, SurfaceShader,
};
use crate::overrides::OverrideRegistry;
use crate::pillars::PillarOffsets;
use crate::replacement::ReplacementMeshSource;
use crate::settings::HeightSettings;

use super::meshes::{mesh_from_positions, render_only_mesh};

/// Replacement source backed by a map of mesh name to positions.
#[derive(Default)]
pub struct StaticReplacements {
    pub meshes: HashMap<String, Vec<[f32; 3]>>,
}

impl ReplacementMeshSource for StaticReplacements {
    fn load(&self, name: &str) -> Result<Mesh, HeightError> {
        self.meshes
            .get(name)
            .map(|positions| mesh_from_positions(positions.clone()))
            .ok_or_else(|| HeightError::UnreadableMesh {
                name: name.to_string(),
            })
    }
}

pub struct HeightFixture {
    pub controller: HeightController,
    pub settings: HeightSettings,
    pub meshes: Assets<Mesh>,
    pub catalog: NetworkCatalog,
    pub parking: ParkingCatalog,
    pub registry: OverrideRegistry,
    pub replacements: Option<Box<dyn ReplacementMeshSource + Send + Sync>>,
    pub deferred: Vec<DeferredWork>,
}

impl Default for HeightFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl HeightFixture {
    pub fn new() -> Self {
        Self {
            controller: HeightController::default(),
            settings: HeightSettings::default(),
            meshes: Assets::default(),
            catalog: NetworkCatalog::default(),
            parking: ParkingCatalog::default(),
            registry: OverrideRegistry::default(),
            replacements: None,
            deferred: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    pub fn add_mesh(&mut self, name: &str, positions: Vec<[f32; 3]>) -> MeshRef {
        MeshRef::new(name, self.meshes.add(mesh_from_positions(positions)))
    }

    pub fn add_render_only_mesh(&mut self, name: &str, positions: Vec<[f32; 3]>) -> MeshRef {
        MeshRef::new(name, self.meshes.add(render_only_mesh(positions)))
    }

    /// Add an asset with one segment per mesh. See [`blueprint`].
    pub fn add_asset(
        &mut self,
        name: &str,
        kind: NetworkKind,
        meshes: Vec<MeshRef>,
    ) -> NetworkAssetId {
        let segments = segments_for(kind, meshes);
        self.catalog.add(blueprint(name, kind, segments, Vec::new(), None))
    }

    pub fn add_asset_with(
        &mut self,
        name: &str,
        kind: NetworkKind,
        segments: Vec<NetworkPiece>,
        nodes: Vec<NetworkPiece>,
        pillars: Option<PillarOffsets>,
    ) -> NetworkAssetId {
        self.catalog.add(blueprint(name, kind, segments, nodes, pillars))
    }

    pub fn with_replacements(&mut self, replacements: StaticReplacements) {
        self.replacements = Some(Box::new(replacements));
    }

    // -----------------------------------------------------------------------
    // Passes
    // -----------------------------------------------------------------------

    /// Split into the controller, the settings and a context over the rest.
    pub fn split(&mut self) -> (&mut HeightController, &HeightSettings, HeightContext<'_>) {
        let ctx = HeightContext {
            meshes: &mut self.meshes,
            catalog: &mut self.catalog,
            parking: &mut self.parking,
            registry: &self.registry,
            replacements: self.replacements.as_deref(),
            sink: &mut self.deferred,
        };
        (&mut self.controller, &self.settings, ctx)
    }

    pub fn scan_all(&mut self) -> Vec<CycleReport> {
        let (controller, settings, mut ctx) = self.split();
        controller.scan_all(settings, &mut ctx)
    }

    pub fn apply_all(&mut self) -> Vec<CycleReport> {
        let (controller, settings, mut ctx) = self.split();
        controller.apply_all(settings, &mut ctx)
    }

    pub fn revert_all(&mut self) -> Vec<CycleReport> {
        let (controller, _, mut ctx) = self.split();
        controller.revert_all(&mut ctx)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn heights(&self, mesh: &MeshRef) -> Vec<f32> {
        super::meshes::heights_of(&self.meshes, mesh.id())
    }

    pub fn lane_offsets(&self, asset: NetworkAssetId) -> Vec<f32> {
        self.catalog
            .get(asset)
            .map(|a| a.lanes.iter().map(|l| l.vertical_offset).collect())
            .unwrap_or_default()
    }

    pub fn surface_level(&self, asset: NetworkAssetId) -> Option<f32> {
        self.catalog.get(asset).map(|a| a.surface_level)
    }

    pub fn pillars(&self, asset: NetworkAssetId) -> Option<PillarOffsets> {
        self.catalog.get(asset)?.pillars
    }

    /// Current main mesh of a segment (it may have been swapped for a
    /// replacement).
    pub fn segment_mesh(&self, asset: NetworkAssetId, index: usize) -> Option<MeshRef> {
        self.catalog
            .get(asset)?
            .segments
            .get(index)?
            .main_mesh
            .clone()
    }

    pub fn take_deferred(&mut self) -> Vec<DeferredWork> {
        std::mem::take(&mut self.deferred)
    }

    /// Drain the queue the way the plugin's deferred system does: pillar
    /// pushes are written to the catalog, lane refreshes are dropped.
    pub fn run_deferred(&mut self) {
        for work in std::mem::take(&mut self.deferred) {
            if let DeferredWork::PushPillars { updates } = work {
                for (id, offsets) in updates {
                    if let Some(asset) = self.catalog.get_mut(id) {
                        asset.pillars = Some(offsets);
                    }
                }
            }
        }
    }
}

/// A segment or node with the given meshes.
pub fn segment(
    main: Option<MeshRef>,
    lod: Option<MeshRef>,
    shader: SurfaceShader,
) -> NetworkPiece {
    NetworkPiece {
        main_mesh: main,
        lod_mesh: lod,
        shader,
    }
}

/// One segment per mesh, shaded for the kind's category.
pub fn segments_for(kind: NetworkKind, meshes: Vec<MeshRef>) -> Vec<NetworkPiece> {
    let shader = match kind {
        NetworkKind::Path | NetworkKind::PathBridge => SurfaceShader::Pedestrian,
        _ => SurfaceShader::Road,
    };
    meshes
        .into_iter()
        .map(|mesh| segment(Some(mesh), None, shader))
        .collect()
}

/// Asset at the stock surface level with two lanes: one at the stock curb
/// depth and one at ground level.
pub fn blueprint(
    name: &str,
    kind: NetworkKind,
    segments: Vec<NetworkPiece>,
    nodes: Vec<NetworkPiece>,
    pillars: Option<PillarOffsets>,
) -> NewNetworkAsset {
    NewNetworkAsset {
        name: name.to_string(),
        kind,
        surface_level: -0.3,
        segments,
        nodes,
        lanes: vec![
            Lane {
                vertical_offset: -0.3,
            },
            Lane {
                vertical_offset: 0.0,
            },
        ],
        pillars,
    }
}
