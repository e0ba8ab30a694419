//! Bevy wiring for the height lifecycle.
//!
//! - [`NetworkAssetsLoaded`] runs a full scan (the load hook).
//! - Any change to [`HeightSettings`] after the first scan runs an apply.
//! - [`RevertHeights`] restores every recorded asset.
//! - Deferred lane and pillar work is drained in `PostUpdate`.
//!
//! The host must provide `Assets<Mesh>` (normally through its render
//! plugins) and fill [`NetworkCatalog`] / [`ParkingCatalog`] before sending
//! [`NetworkAssetsLoaded`].

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::controller::{HeightContext, HeightController};
use crate::deferred::{DeferredRecompute, DeferredWork};
use crate::network::{AssetCategory, NetworkAssetId, NetworkCatalog, ParkingCatalog};
use crate::overrides::OverrideRegistry;
use crate::pillars::PillarOffsets;
use crate::replacement::ReplacementMeshes;
use crate::settings::HeightSettings;

/// Sent by the host once all network prefabs are loaded.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct NetworkAssetsLoaded;

/// Request to restore every asset to its original heights.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RevertHeights;

/// Lane offsets of an asset changed; the host rebuilds its lane geometry.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneGeometryChanged {
    pub category: AssetCategory,
    pub asset: NetworkAssetId,
}

/// New pillar offsets were written to an asset; the host re-places its
/// pillars.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PillarOffsetsChanged {
    pub asset: NetworkAssetId,
    pub offsets: PillarOffsets,
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurbHeightsSet;

pub struct CurbHeightsPlugin;

impl Plugin for CurbHeightsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HeightSettings>()
            .init_resource::<OverrideRegistry>()
            .init_resource::<NetworkCatalog>()
            .init_resource::<ParkingCatalog>()
            .init_resource::<ReplacementMeshes>()
            .init_resource::<DeferredRecompute>()
            .init_resource::<HeightController>()
            .add_event::<NetworkAssetsLoaded>()
            .add_event::<RevertHeights>()
            .add_event::<LaneGeometryChanged>()
            .add_event::<PillarOffsetsChanged>()
            .add_systems(
                Update,
                (scan_on_load, apply_on_settings_change, revert_on_request)
                    .chain()
                    .in_set(CurbHeightsSet),
            )
            .add_systems(PostUpdate, run_deferred_recompute);
    }
}

/// Every resource a lifecycle pass touches.
#[derive(SystemParam)]
pub(crate) struct HeightWorld<'w> {
    controller: ResMut<'w, HeightController>,
    settings: Res<'w, HeightSettings>,
    meshes: ResMut<'w, Assets<Mesh>>,
    catalog: ResMut<'w, NetworkCatalog>,
    parking: ResMut<'w, ParkingCatalog>,
    registry: Res<'w, OverrideRegistry>,
    replacements: Res<'w, ReplacementMeshes>,
    deferred: ResMut<'w, DeferredRecompute>,
}

impl HeightWorld<'_> {
    fn run<R>(
        &mut self,
        pass: impl FnOnce(&mut HeightController, &HeightSettings, &mut HeightContext<'_>) -> R,
    ) -> R {
        let mut ctx = HeightContext {
            meshes: &mut *self.meshes,
            catalog: &mut *self.catalog,
            parking: &mut *self.parking,
            registry: &*self.registry,
            replacements: self.replacements.0.as_deref(),
            sink: &mut *self.deferred,
        };
        pass(&mut *self.controller, &*self.settings, &mut ctx)
    }
}

fn scan_on_load(mut loaded: EventReader<NetworkAssetsLoaded>, mut world: HeightWorld) {
    if loaded.read().last().is_none() {
        return;
    }
    info!("Curb heights: network assets loaded, scanning");
    world.run(|controller, settings, ctx| controller.scan_all(settings, ctx));
}

fn apply_on_settings_change(mut world: HeightWorld) {
    if !world.settings.is_changed() || world.settings.is_added() {
        return;
    }
    if !world.controller.is_scanned() {
        return;
    }
    world.run(|controller, settings, ctx| controller.apply_all(settings, ctx));
}

fn revert_on_request(mut requests: EventReader<RevertHeights>, mut world: HeightWorld) {
    if requests.read().last().is_none() {
        return;
    }
    world.run(|controller, _, ctx| controller.revert_all(ctx));
}

/// Drain the deferred queue: write pillar offsets back to the catalog and
/// notify the host.
fn run_deferred_recompute(
    mut deferred: ResMut<DeferredRecompute>,
    mut catalog: ResMut<NetworkCatalog>,
    mut lanes: EventWriter<LaneGeometryChanged>,
    mut pillars: EventWriter<PillarOffsetsChanged>,
) {
    if deferred.is_empty() {
        return;
    }

    for work in deferred.drain() {
        match work {
            DeferredWork::RefreshLanes { category, assets } => {
                for asset in assets {
                    lanes.send(LaneGeometryChanged { category, asset });
                }
            }
            DeferredWork::PushPillars { updates } => {
                for (id, offsets) in updates {
                    let Some(asset) = catalog.get_mut(id) else {
                        warn!("Curb heights: pillar update for unknown asset {:?}", id);
                        continue;
                    };
                    asset.pillars = Some(offsets);
                    pillars.send(PillarOffsetsChanged { asset: id, offsets });
                }
            }
        }
    }
}
