use crate::classifier::BandBounds;
use crate::constants::ORIGINAL_CURB;
use crate::mutator::MutationParams;
use crate::network::AssetCategory;
use crate::overrides::AssetParams;
use crate::pillars::{adjusted_offsets, PillarOffsets};
use crate::settings::HeightSettings;

/// Settings for one pass over one category, already sanitized.
#[derive(Debug, Clone)]
pub struct CyclePlan {
    pub category: AssetCategory,
    pub settings: HeightSettings,
}

impl CyclePlan {
    pub fn new(category: AssetCategory, settings: &HeightSettings) -> Self {
        Self {
            category,
            settings: settings.sanitized(),
        }
    }

    fn user_curb(&self) -> f32 {
        match self.category {
            AssetCategory::Paths => self.settings.path_curb_y(),
            _ => self.settings.road_curb_y(),
        }
    }

    fn user_level(&self) -> f32 {
        match self.category {
            AssetCategory::Paths => self.settings.path_base_y(),
            _ => self.settings.road_curb_y(),
        }
    }

    pub fn include_lods(&self) -> bool {
        self.settings.include_lods
    }

    /// Parameters for the asset's mesh buffers. The bridge pivot is always
    /// the user's threshold.
    pub fn mesh_params(&self, params: &AssetParams) -> MutationParams {
        let bridge_allowed = params.bridge_allowed();
        let mut bands = params.bands();
        if bridge_allowed {
            bands = bands.with_bridge_threshold(self.settings.bridge_threshold_y());
        }
        MutationParams {
            bands,
            original_curb: params.original_curb(),
            new_curb: params.target_curb(self.user_curb()),
            bridge_enabled: self.settings.bridges_enabled && bridge_allowed,
            bridge_scale: self.settings.bridge_scale,
        }
    }

    /// Parameters for scalar heights: surface level and lane offsets.
    pub fn level_params(&self, params: &AssetParams) -> MutationParams {
        self.mesh_params(params)
            .with_new_curb(params.target_curb(self.user_level()))
    }

    /// Parking lots use the stock bands and never the bridge band.
    pub fn parking_params(&self) -> MutationParams {
        MutationParams {
            bands: BandBounds::default().without_bridge(),
            original_curb: ORIGINAL_CURB,
            new_curb: self.settings.road_curb_y(),
            bridge_enabled: false,
            bridge_scale: self.settings.bridge_scale,
        }
    }

    /// Offsets to push for a pillar-eligible asset, or `None` when pillar
    /// auto-update is off.
    pub fn pillar_offsets(&self, originals: PillarOffsets) -> Option<PillarOffsets> {
        if !self.settings.auto_update_pillars {
            return None;
        }
        if !self.settings.bridges_enabled {
            return Some(originals);
        }
        Some(adjusted_offsets(
            originals,
            self.settings.bridge_threshold_y(),
            self.settings.bridge_scale,
        ))
    }
}
