// ---------------------------------------------------------------------------
// HeightError: recoverable failures while scanning and adjusting assets
// ---------------------------------------------------------------------------

use std::fmt;

use mesh_dump::MeshDumpError;

/// Errors raised while processing a single asset or mesh.
///
/// None of these abort a scan/apply/revert pass: the affected piece or
/// asset is logged and skipped.
#[derive(Debug)]
pub enum HeightError {
    /// The host dropped the mesh's CPU data and no replacement is available.
    UnreadableMesh { name: String },
    /// A replacement dump exists but could not be loaded.
    Replacement { name: String, source: MeshDumpError },
    /// The asset is missing sub-objects the pass depends on.
    MalformedAsset { asset: String, reason: String },
}

impl HeightError {
    pub fn malformed(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        HeightError::MalformedAsset {
            asset: asset.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for HeightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeightError::UnreadableMesh { name } => {
                write!(f, "Mesh '{name}' is unreadable and has no replacement")
            }
            HeightError::Replacement { name, source } => {
                write!(f, "Replacement for mesh '{name}' failed to load: {source}")
            }
            HeightError::MalformedAsset { asset, reason } => {
                write!(f, "Malformed asset '{asset}': {reason}")
            }
        }
    }
}

impl std::error::Error for HeightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HeightError::Replacement { source, .. } => Some(source),
            _ => None,
        }
    }
}
