//! Replacement meshes for meshes the host cannot read back.
//!
//! Some prefab meshes are uploaded render-only, so their positions are gone
//! by the time a scan runs. For those a dump written offline is loaded
//! instead and swapped in behind the piece's handle.

use std::collections::HashMap;
use std::path::PathBuf;

use bevy::asset::AssetId;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use mesh_dump::MeshDump;

use crate::error::HeightError;
use crate::mutator::is_readable;
use crate::network::MeshRef;

/// Source of replacement meshes, keyed by mesh name.
pub trait ReplacementMeshSource {
    fn load(&self, name: &str) -> Result<Mesh, HeightError>;
}

/// Reads `<root>/<mesh name>.bin` dumps.
#[derive(Debug, Clone)]
pub struct MeshDumpDirectory {
    root: PathBuf,
}

impl MeshDumpDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.bin"))
    }
}

impl ReplacementMeshSource for MeshDumpDirectory {
    fn load(&self, name: &str) -> Result<Mesh, HeightError> {
        let dump =
            mesh_dump::read_file(&self.path_for(name)).map_err(|source| HeightError::Replacement {
                name: name.to_string(),
                source,
            })?;
        Ok(mesh_from_dump(dump))
    }
}

/// Optional replacement source used by the plugin's scan system.
#[derive(Resource, Default)]
pub struct ReplacementMeshes(pub Option<Box<dyn ReplacementMeshSource + Send + Sync>>);

/// Build a CPU-readable mesh from a decoded dump. Empty attributes are
/// left out.
pub fn mesh_from_dump(dump: MeshDump) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, dump.vertices);
    if !dump.normals.is_empty() {
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, dump.normals);
    }
    if !dump.uvs.is_empty() {
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, dump.uvs);
    }
    if !dump.colors.is_empty() {
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, dump.colors);
    }
    mesh.insert_indices(Indices::U32(dump.triangles));
    mesh
}

/// Replacements made during one scan, so a shared unreadable mesh is only
/// loaded once and every piece ends up on the same new handle.
#[derive(Default)]
pub struct ReplacementCache {
    swapped: HashMap<AssetId<Mesh>, Handle<Mesh>>,
}

impl ReplacementCache {
    pub fn len(&self) -> usize {
        self.swapped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swapped.is_empty()
    }
}

/// Make sure `mesh_ref` points at a readable mesh, swapping in a
/// replacement if needed. Returns `true` when the handle was replaced.
pub fn ensure_readable(
    meshes: &mut Assets<Mesh>,
    mesh_ref: &mut MeshRef,
    source: Option<&(dyn ReplacementMeshSource + Send + Sync)>,
    cache: &mut ReplacementCache,
) -> Result<bool, HeightError> {
    if is_readable(meshes, mesh_ref.id()) {
        return Ok(false);
    }

    if let Some(handle) = cache.swapped.get(&mesh_ref.id()) {
        mesh_ref.handle = handle.clone();
        return Ok(true);
    }

    let Some(source) = source else {
        return Err(HeightError::UnreadableMesh {
            name: mesh_ref.name.clone(),
        });
    };

    let replacement = source.load(&mesh_ref.name)?;
    let handle = meshes.add(replacement);
    debug!(
        "Replaced unreadable mesh '{}' with its dump ({:?})",
        mesh_ref.name,
        handle.id()
    );
    cache.swapped.insert(mesh_ref.id(), handle.clone());
    mesh_ref.handle = handle;
    Ok(true)
}
