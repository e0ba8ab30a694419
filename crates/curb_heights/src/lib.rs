//! Runtime curb, bridge and lane height adjustment for shared network
//! meshes.
//!
//! A load-time scan classifies every road, path and parking mesh by height
//! band, records the original buffers, and rewrites them for the current
//! [`HeightSettings`]. Later setting changes re-derive from the records;
//! a revert restores them exactly.

pub mod classifier;
pub mod constants;
pub mod controller;
pub mod deferred;
pub mod error;
pub mod mutator;
pub mod network;
pub mod overrides;
pub mod pillars;
pub mod plugin;
pub mod records;
pub mod replacement;
pub mod settings;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;


pub use controller::{CycleReport, HeightContext, HeightController};
pub use error::HeightError;
pub use network::AssetCategory;
pub use plugin::{
    CurbHeightsPlugin, CurbHeightsSet, LaneGeometryChanged, NetworkAssetsLoaded,
    PillarOffsetsChanged, RevertHeights,
};
pub use settings::HeightSettings;
