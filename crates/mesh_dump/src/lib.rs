//! Flat binary mesh dumps.
//!
//! A dump is a fixed 20-byte header of five little-endian `i32` counts
//! followed by the payloads in the same order:
//!
//! ```text
//!   [0..4]   vertex float count   (3 per vertex)
//!   [4..8]   triangle index count (3 per triangle)
//!   [8..12]  uv float count       (2 per uv)
//!   [12..16] normal float count   (3 per normal)
//!   [16..20] color float count    (4 per color)
//!   vertices f32 | triangles i32 | uvs f32 | normals f32 | colors f32
//! ```
//!
//! Dumps are produced offline from meshes the host cannot read back at
//! runtime and are only ever consumed as a whole.

mod error;
mod format;

pub use error::{CountField, MeshDumpError};
pub use format::{decode, encode, read_file, write_file, MeshDump, HEADER_SIZE};
