//! Bridge pillar offsets.
//!
//! Decks are compressed toward a pivot (the bridge threshold) by the mesh
//! mutator. Pillars hanging below a deck must move by exactly the same rule,
//! so both go through [`pivot_scale`].

use serde::{Deserialize, Serialize};

/// The two structural offsets the host uses to place bridge supports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PillarOffsets {
    pub offset: f32,
    pub middle_offset: f32,
}

/// Linear compression around `threshold`: `(y - threshold) * scale + threshold`.
pub fn pivot_scale(y: f32, threshold: f32, scale: f32) -> f32 {
    (y - threshold) * scale + threshold
}

/// Adjust one pillar offset. Offsets at or above the pivot are left alone.
pub fn adjust_pillar(original: f32, threshold: f32, scale: f32) -> f32 {
    if original < threshold {
        pivot_scale(original, threshold, scale)
    } else {
        original
    }
}

/// Adjust both offsets of a bridge asset from their recorded originals.
pub fn adjusted_offsets(originals: PillarOffsets, threshold: f32, scale: f32) -> PillarOffsets {
    PillarOffsets {
        offset: adjust_pillar(originals.offset, threshold, scale),
        middle_offset: adjust_pillar(originals.middle_offset, threshold, scale),
    }
}
