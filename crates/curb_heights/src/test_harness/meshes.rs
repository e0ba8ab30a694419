//! Mesh builders and readers for tests and benches.

use bevy::asset::AssetId;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use crate::mutator::mesh_positions;

/// CPU-readable triangle list with the given positions. Indices are a
/// plain fan so the mesh is well formed; only positions matter here.
pub fn mesh_from_positions(positions: Vec<[f32; 3]>) -> Mesh {
    let count = positions.len() as u32;
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    let indices = (2..count).flat_map(|i| [0, i - 1, i]).collect();
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Same as [`mesh_from_positions`] but uploaded render-only, so its
/// positions cannot be read back.
pub fn render_only_mesh(positions: Vec<[f32; 3]>) -> Mesh {
    let mut mesh = mesh_from_positions(positions);
    mesh.asset_usage = RenderAssetUsages::RENDER_WORLD;
    mesh
}

/// Current positions of a mesh. Panics if the mesh is missing or
/// unreadable.
pub fn positions_of(meshes: &Assets<Mesh>, id: AssetId<Mesh>) -> Vec<[f32; 3]> {
    meshes
        .get(id)
        .and_then(mesh_positions)
        .map(<[[f32; 3]]>::to_vec)
        .unwrap_or_else(|| panic!("mesh {id:?} is missing or unreadable"))
}

/// Y components only, for compact assertions.
pub fn heights_of(meshes: &Assets<Mesh>, id: AssetId<Mesh>) -> Vec<f32> {
    positions_of(meshes, id).iter().map(|p| p[1]).collect()
}

/// `count` vertices at height `y`, spread along X.
pub fn flat_strip(y: f32, count: usize) -> Vec<[f32; 3]> {
    (0..count).map(|i| [i as f32, y, 0.0]).collect()
}

/// Stock road cross-section: ground level, curb band and sub-surface bed,
/// six vertices each.
pub fn road_profile() -> Vec<[f32; 3]> {
    let mut v = flat_strip(0.0, 6);
    v.extend(flat_strip(-0.30, 6));
    v.extend(flat_strip(-0.40, 6));
    v
}

/// Road profile plus a bridge deck underside at -1.0.
pub fn bridge_profile() -> Vec<[f32; 3]> {
    let mut v = road_profile();
    v.extend(flat_strip(-1.0, 6));
    v
}

/// Bridge profile that also reaches below the absolute cutoff (a dam wall
/// or full-height pier).
pub fn full_depth_profile() -> Vec<[f32; 3]> {
    let mut v = bridge_profile();
    v.extend(flat_strip(-8.0, 2));
    v
}
