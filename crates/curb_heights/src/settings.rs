//! User-facing height settings.
//!
//! Values are positive magnitudes as shown to the player ("curb height
//! 0.15 m"); the engine converts them to negative Y offsets. The host owns
//! persistence; this module only provides defaults and clamping.

use std::ops::RangeInclusive;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

pub const CURB_HEIGHT_RANGE: RangeInclusive<f32> = 0.07..=0.29;
pub const BRIDGE_THRESHOLD_RANGE: RangeInclusive<f32> = 0.55..=2.0;
pub const BRIDGE_SCALE_RANGE: RangeInclusive<f32> = 0.1..=1.0;
pub const PATH_CURB_HEIGHT_RANGE: RangeInclusive<f32> = 0.07..=0.29;
pub const PATH_BASE_HEIGHT_RANGE: RangeInclusive<f32> = 0.07..=0.30;

fn clamp_to(value: f32, range: &RangeInclusive<f32>, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        fallback
    }
}

// ---------------------------------------------------------------------------
// Resource
// ---------------------------------------------------------------------------

/// Current height configuration. Changing this resource triggers an apply.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightSettings {
    /// Curb height of roads, in metres above the road bed.
    pub curb_height: f32,
    /// Depth below which bridge decks are compressed.
    pub bridge_threshold: f32,
    /// Compression factor applied below the bridge threshold.
    pub bridge_scale: f32,
    /// Curb height of pedestrian path meshes.
    pub path_curb_height: f32,
    /// Depth of the path walking surface (surface level and lanes).
    pub path_base_height: f32,
    /// Also adjust LOD meshes.
    pub include_lods: bool,
    /// Adjust bridge decks and pillars.
    pub bridges_enabled: bool,
    /// Push recomputed pillar offsets to the host on apply.
    pub auto_update_pillars: bool,
}

impl Default for HeightSettings {
    fn default() -> Self {
        Self {
            curb_height: 0.15,
            bridge_threshold: 0.55,
            bridge_scale: 0.5,
            path_curb_height: 0.15,
            path_base_height: 0.30,
            include_lods: true,
            bridges_enabled: true,
            auto_update_pillars: true,
        }
    }
}

impl HeightSettings {
    /// Copy with every value clamped to its documented bounds. Non-finite
    /// values fall back to the default.
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        Self {
            curb_height: clamp_to(self.curb_height, &CURB_HEIGHT_RANGE, d.curb_height),
            bridge_threshold: clamp_to(
                self.bridge_threshold,
                &BRIDGE_THRESHOLD_RANGE,
                d.bridge_threshold,
            ),
            bridge_scale: clamp_to(self.bridge_scale, &BRIDGE_SCALE_RANGE, d.bridge_scale),
            path_curb_height: clamp_to(
                self.path_curb_height,
                &PATH_CURB_HEIGHT_RANGE,
                d.path_curb_height,
            ),
            path_base_height: clamp_to(
                self.path_base_height,
                &PATH_BASE_HEIGHT_RANGE,
                d.path_base_height,
            ),
            ..self.clone()
        }
    }

    /// Road bed Y offset for roads.
    pub fn road_curb_y(&self) -> f32 {
        -self.curb_height
    }

    /// Bridge pivot as a Y offset.
    pub fn bridge_threshold_y(&self) -> f32 {
        -self.bridge_threshold
    }

    pub fn path_curb_y(&self) -> f32 {
        -self.path_curb_height
    }

    pub fn path_base_y(&self) -> f32 {
        -self.path_base_height
    }
}
