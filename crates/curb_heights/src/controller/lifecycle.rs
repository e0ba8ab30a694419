use std::collections::HashMap;

use crate::network::AssetCategory;
use crate::settings::HeightSettings;

use super::apply::{apply_network, revert_network};
use super::parking::{apply_parking, revert_parking, scan_parking};
use super::plan::CyclePlan;
use super::scan::{scan_network, ScanState};
use super::types::{CycleReport, HeightContext, HeightController};

impl HeightController {
    // -----------------------------------------------------------------------
    // Scan
    // -----------------------------------------------------------------------

    /// Scan one category. A category that already has records is reverted
    /// and forgotten first.
    pub fn scan(
        &mut self,
        category: AssetCategory,
        settings: &HeightSettings,
        ctx: &mut HeightContext<'_>,
    ) -> CycleReport {
        if self.has_records(category) {
            self.revert(category, ctx);
            self.clear_records(category);
        }

        let mut checked = std::mem::take(&mut self.checked);
        self.processed.begin_cycle();
        let report = {
            let mut state = ScanState::new(&mut checked);
            self.scan_category(category, settings, &mut state, ctx)
        };
        self.processed.end_cycle();
        self.checked = checked;
        self.scanned = true;
        report.log();
        report
    }

    /// Full rescan of every category in one cycle. Anything recorded by a
    /// previous scan is reverted first and the classification cache is
    /// dropped.
    pub fn scan_all(
        &mut self,
        settings: &HeightSettings,
        ctx: &mut HeightContext<'_>,
    ) -> Vec<CycleReport> {
        if self.scanned {
            self.revert_all(ctx);
            for category in AssetCategory::ALL {
                self.clear_records(category);
            }
        }
        let mut checked = HashMap::new();

        self.processed.begin_cycle();
        let reports: Vec<CycleReport> = {
            let mut state = ScanState::new(&mut checked);
            AssetCategory::ALL
                .into_iter()
                .map(|category| {
                    let report = self.scan_category(category, settings, &mut state, ctx);
                    report.log();
                    report
                })
                .collect()
        };
        self.processed.end_cycle();
        self.checked = checked;
        self.scanned = true;
        reports
    }

    fn scan_category(
        &mut self,
        category: AssetCategory,
        settings: &HeightSettings,
        state: &mut ScanState<'_>,
        ctx: &mut HeightContext<'_>,
    ) -> CycleReport {
        let plan = CyclePlan::new(category, settings);
        match category {
            AssetCategory::Roads => {
                scan_network(&mut self.roads, &mut self.processed, state, &plan, ctx)
            }
            AssetCategory::Paths => {
                scan_network(&mut self.paths, &mut self.processed, state, &plan, ctx)
            }
            AssetCategory::Parking => {
                scan_parking(&mut self.parking, &mut self.processed, state, &plan, ctx)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Apply / revert
    // -----------------------------------------------------------------------

    pub fn apply(
        &mut self,
        category: AssetCategory,
        settings: &HeightSettings,
        ctx: &mut HeightContext<'_>,
    ) -> CycleReport {
        self.processed.begin_cycle();
        let report = self.apply_category(category, settings, ctx);
        self.processed.end_cycle();
        report.log();
        report
    }

    /// Apply every category in one cycle, so a mesh shared across
    /// categories is written once.
    pub fn apply_all(
        &mut self,
        settings: &HeightSettings,
        ctx: &mut HeightContext<'_>,
    ) -> Vec<CycleReport> {
        self.processed.begin_cycle();
        let reports: Vec<CycleReport> = AssetCategory::ALL
            .into_iter()
            .map(|category| {
                let report = self.apply_category(category, settings, ctx);
                report.log();
                report
            })
            .collect();
        self.processed.end_cycle();
        reports
    }

    fn apply_category(
        &mut self,
        category: AssetCategory,
        settings: &HeightSettings,
        ctx: &mut HeightContext<'_>,
    ) -> CycleReport {
        let plan = CyclePlan::new(category, settings);
        match category {
            AssetCategory::Roads => apply_network(&self.roads, &mut self.processed, &plan, ctx),
            AssetCategory::Paths => apply_network(&self.paths, &mut self.processed, &plan, ctx),
            AssetCategory::Parking => {
                apply_parking(&self.parking, &mut self.processed, &plan, ctx)
            }
        }
    }

    pub fn revert(&mut self, category: AssetCategory, ctx: &mut HeightContext<'_>) -> CycleReport {
        self.processed.begin_cycle();
        let report = self.revert_category(category, ctx);
        self.processed.end_cycle();
        report.log();
        report
    }

    pub fn revert_all(&mut self, ctx: &mut HeightContext<'_>) -> Vec<CycleReport> {
        self.processed.begin_cycle();
        let reports: Vec<CycleReport> = AssetCategory::ALL
            .into_iter()
            .map(|category| {
                let report = self.revert_category(category, ctx);
                report.log();
                report
            })
            .collect();
        self.processed.end_cycle();
        reports
    }

    fn revert_category(
        &mut self,
        category: AssetCategory,
        ctx: &mut HeightContext<'_>,
    ) -> CycleReport {
        match category {
            AssetCategory::Roads => revert_network(category, &self.roads, &mut self.processed, ctx),
            AssetCategory::Paths => revert_network(category, &self.paths, &mut self.processed, ctx),
            AssetCategory::Parking => revert_parking(&self.parking, &mut self.processed, ctx),
        }
    }

    // -----------------------------------------------------------------------
    // Records
    // -----------------------------------------------------------------------

    fn has_records(&self, category: AssetCategory) -> bool {
        match category {
            AssetCategory::Roads => !self.roads.is_empty(),
            AssetCategory::Paths => !self.paths.is_empty(),
            AssetCategory::Parking => !self.parking.is_empty(),
        }
    }

    fn clear_records(&mut self, category: AssetCategory) {
        match category {
            AssetCategory::Roads => self.roads.clear(),
            AssetCategory::Paths => self.paths.clear(),
            AssetCategory::Parking => self.parking.clear(),
        }
    }
}
