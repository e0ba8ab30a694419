//! Scan / apply / revert lifecycle over every loaded network and parking
//! asset.
//!
//! The scan is the only pass that classifies. It records each eligible
//! mesh's original buffer and the asset's scalar heights, then adjusts
//! with the current settings. Apply restores from those records and
//! re-derives; revert restores only. Every pass runs as one cycle of the
//! processed-mesh guard, so a mesh shared by many pieces is written once.

mod apply;
mod lifecycle;
mod parking;
mod plan;
mod scan;
#[cfg(test)]
mod tests;
mod types;

pub use plan::CyclePlan;
pub use types::{AssetOutcome, CycleKind, CycleReport, HeightContext, HeightController};
