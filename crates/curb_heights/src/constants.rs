//! Default height bands and quorums.
//!
//! Heights are signed Y offsets from the sidewalk level: the road bed of a
//! stock asset sits at [`ORIGINAL_CURB`], so deeper means more negative.

// =============================================================================
// Band boundaries
// =============================================================================

/// Upper (shallow) bound of the curb band. Vertices must be strictly below it.
pub const PRIMARY_UPPER: f32 = -0.21;

/// Lower (deep) bound of the curb band. Vertices must be strictly above it.
pub const PRIMARY_LOWER: f32 = -0.32;

/// Deep bound of the sub-surface band (track beds, gutters below the curb).
pub const SUB_SURFACE_LOWER: f32 = -0.55;

/// Bridge band pivot used for classification. Mutation uses the user's
/// threshold from `HeightSettings` instead.
pub const BRIDGE_THRESHOLD: f32 = -0.5;

/// Absolute cutoff. Any vertex below this marks a full-depth mesh.
pub const BRIDGE_CUTOFF: f32 = -5.0;

/// Road bed depth of stock assets.
pub const ORIGINAL_CURB: f32 = -0.30;

// =============================================================================
// Quorums
// =============================================================================

/// Minimum vertices in a band for a mesh to be eligible for that band.
pub const CLASSIFY_QUORUM: usize = 4;

/// Minimum vertices altered in one eligible band before a new buffer is
/// published. Four guarantees at least one full quad moves together.
pub const COMMIT_QUORUM: usize = 4;

// =============================================================================
// Identifiers
// =============================================================================

/// Separator between an asset's stable identifier and the rest of its name
/// (`"1234567.Avenue With Trees_Data"` has key `"1234567"`).
pub const NAME_SEPARATOR: char = '.';

/// Stable override key of an asset name: everything before the first
/// [`NAME_SEPARATOR`], or the whole name when there is none.
pub fn override_key(name: &str) -> &str {
    name.split(NAME_SEPARATOR).next().unwrap_or(name)
}
