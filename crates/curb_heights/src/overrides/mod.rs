//! Per-asset overrides for prefabs that do not follow the stock geometry.
//!
//! Three kinds of entry exist: fully custom bands for a single asset, a
//! shared fixed target for a named cohort, and bridge exclusions. The
//! registry also carries the enumerated parking-lot identifiers.

mod registry;
mod types;

pub use registry::OverrideRegistry;
pub use types::{AssetParams, CohortParams, CustomOverride, NamePattern};
