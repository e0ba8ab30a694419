//! Geometry classification: which height bands does a mesh occupy?
//!
//! Network meshes carry no labels, so band membership is the only cheap
//! signal for deciding whether a mesh has a curb, a sub-surface bed or a
//! bridge deck that can be adjusted. Classification runs once per mesh at
//! scan time, always on the original geometry.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BRIDGE_CUTOFF, BRIDGE_THRESHOLD, PRIMARY_LOWER, PRIMARY_UPPER, SUB_SURFACE_LOWER,
};

// =============================================================================
// Band boundaries
// =============================================================================

/// Vertical band boundaries, all signed Y offsets (deeper = more negative).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandBounds {
    pub primary_upper: f32,
    pub primary_lower: f32,
    pub sub_surface_lower: f32,
    pub bridge_threshold: f32,
    pub bridge_cutoff: f32,
}

impl Default for BandBounds {
    fn default() -> Self {
        Self {
            primary_upper: PRIMARY_UPPER,
            primary_lower: PRIMARY_LOWER,
            sub_surface_lower: SUB_SURFACE_LOWER,
            bridge_threshold: BRIDGE_THRESHOLD,
            bridge_cutoff: BRIDGE_CUTOFF,
        }
    }
}

impl BandBounds {
    /// Curb band: strictly below ground and strictly between the lower and
    /// upper bounds. An override whose upper bound sits above zero still
    /// never matches ground-level or raised vertices.
    pub fn in_primary(&self, y: f32) -> bool {
        y < 0.0 && y < self.primary_upper && y > self.primary_lower
    }

    /// Sub-surface band: from the curb band's lower bound down to `sub_surface_lower`.
    pub fn in_sub_surface(&self, y: f32) -> bool {
        y <= self.primary_lower && y > self.sub_surface_lower
    }

    /// Bridge band: strictly between the threshold and the absolute cutoff.
    pub fn in_bridge(&self, y: f32) -> bool {
        y < self.bridge_threshold && y > self.bridge_cutoff
    }

    pub fn is_full_depth(&self, y: f32) -> bool {
        y < self.bridge_cutoff
    }

    /// Finite bounds, ordered from shallow to deep.
    pub fn is_valid(&self) -> bool {
        [
            self.primary_upper,
            self.primary_lower,
            self.sub_surface_lower,
            self.bridge_threshold,
            self.bridge_cutoff,
        ]
        .iter()
        .all(|v| v.is_finite())
            && self.primary_lower < self.primary_upper
            && self.sub_surface_lower <= self.primary_lower
            && self.bridge_cutoff <= self.bridge_threshold
    }

    /// Same bands with a different bridge pivot.
    pub fn with_bridge_threshold(mut self, threshold: f32) -> Self {
        self.bridge_threshold = threshold;
        self
    }

    /// Collapse the bridge band so only the curb and sub-surface bands can match.
    pub fn without_bridge(mut self) -> Self {
        self.bridge_threshold = self.bridge_cutoff;
        self
    }
}

// =============================================================================
// Counts and eligibility
// =============================================================================

/// Number of vertices per band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BandCounts {
    pub primary: usize,
    pub sub_surface: usize,
    pub bridge: usize,
}

impl BandCounts {
    pub fn total(&self) -> usize {
        self.primary + self.sub_surface + self.bridge
    }
}

/// Which bands of a mesh may be adjusted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BandEligibility {
    pub primary: bool,
    pub sub_surface: bool,
    pub bridge: bool,
}

impl BandEligibility {
    pub fn any(&self) -> bool {
        self.primary || self.sub_surface || self.bridge
    }

    /// Union of two eligibility sets.
    pub fn union(self, other: BandEligibility) -> BandEligibility {
        BandEligibility {
            primary: self.primary || other.primary,
            sub_surface: self.sub_surface || other.sub_surface,
            bridge: self.bridge || other.bridge,
        }
    }

    /// True when at least one eligible band reaches `quorum` in `counts`.
    pub fn meets_quorum(&self, counts: &BandCounts, quorum: usize) -> bool {
        (self.primary && counts.primary >= quorum)
            || (self.sub_surface && counts.sub_surface >= quorum)
            || (self.bridge && counts.bridge >= quorum)
    }
}

/// Result of classifying one vertex buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub counts: BandCounts,
    /// Some vertex lies below the absolute cutoff (full-height structure).
    pub full_depth: bool,
    pub eligibility: BandEligibility,
}

impl Classification {
    pub fn is_eligible(&self) -> bool {
        self.eligibility.any()
    }
}

/// Count band membership over `vertices` and decide per-band eligibility.
///
/// Counts are independent per band; a vertex in an overlap of two bands is
/// counted in both. The bridge band is only eligible for bridge-capable
/// assets whose mesh is not full-depth.
pub fn classify(
    vertices: &[[f32; 3]],
    quorum: usize,
    bands: &BandBounds,
    bridge_capable: bool,
) -> Classification {
    let mut counts = BandCounts::default();
    let mut full_depth = false;

    for v in vertices {
        let y = v[1];
        if bands.in_primary(y) {
            counts.primary += 1;
        }
        if bands.in_sub_surface(y) {
            counts.sub_surface += 1;
        }
        if bands.in_bridge(y) {
            counts.bridge += 1;
        }
        if bands.is_full_depth(y) {
            full_depth = true;
        }
    }

    let eligibility = BandEligibility {
        primary: counts.primary >= quorum,
        sub_surface: counts.sub_surface >= quorum,
        bridge: counts.bridge >= quorum && !full_depth && bridge_capable,
    };

    Classification {
        counts,
        full_depth,
        eligibility,
    }
}
