use serde::{Deserialize, Serialize};

use crate::classifier::BandBounds;
use crate::constants::ORIGINAL_CURB;
use crate::settings::CURB_HEIGHT_RANGE;

/// Bespoke parameters for a single asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomOverride {
    #[serde(default)]
    pub bands: BandBounds,
    /// Road bed depth this asset was authored with.
    #[serde(default = "default_original_curb")]
    pub original_curb: f32,
    /// Fixed road bed height (positive magnitude). When absent the asset
    /// follows the user's curb height.
    #[serde(default)]
    pub fixed_target: Option<f32>,
}

/// Parameters shared by every member of a cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortParams {
    #[serde(default)]
    pub bands: BandBounds,
    #[serde(default = "default_original_curb")]
    pub original_curb: f32,
    /// Fixed road bed height for the cohort (positive magnitude).
    pub target_height: f32,
}

/// Assigns every asset whose name contains `contains` to `cohort`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamePattern {
    pub contains: String,
    pub cohort: String,
}

fn default_original_curb() -> f32 {
    ORIGINAL_CURB
}

/// The mutator divides by the authored depth, so it must be a finite
/// negative offset.
fn valid_original_curb(original_curb: f32) -> bool {
    original_curb.is_finite() && original_curb < 0.0
}

fn clamp_target(height: f32) -> Option<f32> {
    height
        .is_finite()
        .then(|| height.clamp(*CURB_HEIGHT_RANGE.start(), *CURB_HEIGHT_RANGE.end()))
}

impl CustomOverride {
    /// Copy with the fixed target clamped to the curb height range, or
    /// `None` when the bands or authored depth cannot be used.
    pub fn sanitized(&self) -> Option<Self> {
        if !self.bands.is_valid() || !valid_original_curb(self.original_curb) {
            return None;
        }
        let fixed_target = match self.fixed_target {
            Some(height) => Some(clamp_target(height)?),
            None => None,
        };
        Some(Self {
            bands: self.bands,
            original_curb: self.original_curb,
            fixed_target,
        })
    }
}

impl CohortParams {
    /// Copy with the target clamped to the curb height range, or `None`
    /// when the bands, authored depth or target cannot be used.
    pub fn sanitized(&self) -> Option<Self> {
        if !self.bands.is_valid() || !valid_original_curb(self.original_curb) {
            return None;
        }
        Some(Self {
            bands: self.bands,
            original_curb: self.original_curb,
            target_height: clamp_target(self.target_height)?,
        })
    }
}

/// Parameters resolved once per asset at scan time.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetParams {
    Default,
    Custom { key: String, spec: CustomOverride },
    Cohort { cohort: String, spec: CohortParams },
    BridgeExcluded { key: String },
}

impl AssetParams {
    /// True for any registry match; overridden assets bypass the shader
    /// filter and the default bands.
    pub fn is_override(&self) -> bool {
        !matches!(self, AssetParams::Default)
    }

    /// Bands used for classification.
    pub fn bands(&self) -> BandBounds {
        match self {
            AssetParams::Default => BandBounds::default(),
            AssetParams::Custom { spec, .. } => spec.bands,
            AssetParams::Cohort { spec, .. } => spec.bands,
            AssetParams::BridgeExcluded { .. } => BandBounds::default().without_bridge(),
        }
    }

    pub fn original_curb(&self) -> f32 {
        match self {
            AssetParams::Custom { spec, .. } => spec.original_curb,
            AssetParams::Cohort { spec, .. } => spec.original_curb,
            AssetParams::Default | AssetParams::BridgeExcluded { .. } => ORIGINAL_CURB,
        }
    }

    pub fn bridge_allowed(&self) -> bool {
        !matches!(self, AssetParams::BridgeExcluded { .. })
    }

    /// Road bed Y offset to move to, given the user's target.
    pub fn target_curb(&self, user_target: f32) -> f32 {
        match self {
            AssetParams::Custom { spec, .. } => spec.fixed_target.map_or(user_target, |h| -h),
            AssetParams::Cohort { spec, .. } => -spec.target_height,
            AssetParams::Default | AssetParams::BridgeExcluded { .. } => user_target,
        }
    }
}
