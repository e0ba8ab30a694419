//! # Test harness for height adjustment
//!
//! Two levels:
//!
//! - [`HeightFixture`]: the controller plus plain-value collaborators, for
//!   driving scan/apply/revert directly.
//! - [`TestNetwork`]: a headless Bevy `App` with [`CurbHeightsPlugin`], for
//!   driving the same passes through events and settings changes.

mod fixture;
mod meshes;

use bevy::app::App;
use bevy::prelude::*;

use crate::network::{MeshRef, NetworkAssetId, NetworkCatalog, NetworkKind};
use crate::overrides::OverrideRegistry;
use crate::pillars::PillarOffsets;
use crate::plugin::{
    CurbHeightsPlugin, LaneGeometryChanged, NetworkAssetsLoaded, PillarOffsetsChanged,
    RevertHeights,
};
use crate::settings::HeightSettings;
use crate::HeightController;

pub use fixture::{blueprint, segment, segments_for, HeightFixture, StaticReplacements};
pub use meshes::{
    bridge_profile, flat_strip, full_depth_profile, heights_of, mesh_from_positions,
    positions_of, render_only_mesh, road_profile,
};

/// Headless App running [`CurbHeightsPlugin`].
pub struct TestNetwork {
    app: App,
}

impl Default for TestNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl TestNetwork {
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        // No render plugins: the mesh arena is inserted by hand.
        app.insert_resource(Assets::<Mesh>::default());
        app.add_plugins(CurbHeightsPlugin);
        app.update();
        Self { app }
    }

    pub fn with_settings(mut self, settings: HeightSettings) -> Self {
        self.app.insert_resource(settings);
        self
    }

    pub fn with_registry(mut self, registry: OverrideRegistry) -> Self {
        self.app.insert_resource(registry);
        self
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    pub fn add_mesh(&mut self, name: &str, positions: Vec<[f32; 3]>) -> MeshRef {
        let handle = self
            .app
            .world_mut()
            .resource_mut::<Assets<Mesh>>()
            .add(mesh_from_positions(positions));
        MeshRef::new(name, handle)
    }

    /// Add an asset with one road- or path-shaded segment per mesh.
    pub fn add_asset(
        &mut self,
        name: &str,
        kind: NetworkKind,
        meshes: Vec<MeshRef>,
        pillars: Option<PillarOffsets>,
    ) -> NetworkAssetId {
        let segments = segments_for(kind, meshes);
        self.app
            .world_mut()
            .resource_mut::<NetworkCatalog>()
            .add(blueprint(name, kind, segments, Vec::new(), pillars))
    }

    // -----------------------------------------------------------------------
    // Driving the plugin
    // -----------------------------------------------------------------------

    pub fn tick(&mut self) {
        self.app.update();
    }

    /// Announce that assets are loaded and run one frame.
    pub fn load(&mut self) {
        self.app.world_mut().send_event(NetworkAssetsLoaded);
        self.tick();
    }

    pub fn revert(&mut self) {
        self.app.world_mut().send_event(RevertHeights);
        self.tick();
    }

    /// Edit the settings resource and run one frame.
    pub fn update_settings(&mut self, edit: impl FnOnce(&mut HeightSettings)) {
        edit(&mut self.app.world_mut().resource_mut::<HeightSettings>());
        self.tick();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn controller(&self) -> &HeightController {
        self.app.world().resource::<HeightController>()
    }

    pub fn heights(&self, mesh: &MeshRef) -> Vec<f32> {
        heights_of(self.app.world().resource::<Assets<Mesh>>(), mesh.id())
    }

    pub fn lane_offsets(&self, asset: NetworkAssetId) -> Vec<f32> {
        self.app
            .world()
            .resource::<NetworkCatalog>()
            .get(asset)
            .map(|a| a.lanes.iter().map(|l| l.vertical_offset).collect())
            .unwrap_or_default()
    }

    pub fn pillars(&self, asset: NetworkAssetId) -> Option<PillarOffsets> {
        self.app
            .world()
            .resource::<NetworkCatalog>()
            .get(asset)?
            .pillars
    }

    /// Lane refresh notifications not yet taken.
    pub fn take_lane_events(&mut self) -> Vec<LaneGeometryChanged> {
        self.app
            .world_mut()
            .resource_mut::<Events<LaneGeometryChanged>>()
            .drain()
            .collect()
    }

    /// Pillar notifications not yet taken.
    pub fn take_pillar_events(&mut self) -> Vec<PillarOffsetsChanged> {
        self.app
            .world_mut()
            .resource_mut::<Events<PillarOffsetsChanged>>()
            .drain()
            .collect()
    }
}
