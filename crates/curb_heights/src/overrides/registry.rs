use std::collections::{HashMap, HashSet};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::override_key;

use super::types::{AssetParams, CohortParams, CustomOverride, NamePattern};

/// Identifier-keyed override tables.
///
/// Keys are the stable prefix of an asset name (see
/// [`override_key`](crate::constants::override_key)). Custom and cohort
/// entries only enter through [`OverrideRegistry::from_json`],
/// [`OverrideRegistry::merge`] or the insert methods, all of which drop
/// unusable entries.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideRegistry {
    custom: HashMap<String, CustomOverride>,
    cohorts: HashMap<String, CohortParams>,
    /// Asset key -> cohort name.
    pub cohort_members: HashMap<String, String>,
    /// Checked in order after exact cohort membership.
    pub cohort_patterns: Vec<NamePattern>,
    pub bridge_exclusions: HashSet<String>,
    pub parking_ids: HashSet<String>,
}

impl OverrideRegistry {
    /// Parse a registry from its JSON form. Missing tables default to empty.
    /// Custom and cohort entries that fail validation are dropped with a
    /// warning.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut registry: Self = serde_json::from_str(json)?;
        registry.sanitize();
        Ok(registry)
    }

    /// Merge another registry into this one; entries in `other` win.
    pub fn merge(&mut self, mut other: OverrideRegistry) {
        other.sanitize();
        self.custom.extend(other.custom);
        self.cohorts.extend(other.cohorts);
        self.cohort_members.extend(other.cohort_members);
        self.cohort_patterns.extend(other.cohort_patterns);
        self.bridge_exclusions.extend(other.bridge_exclusions);
        self.parking_ids.extend(other.parking_ids);
    }

    /// Insert a custom entry. Returns false (and keeps nothing) when the
    /// entry fails validation.
    pub fn insert_custom(&mut self, key: impl Into<String>, spec: CustomOverride) -> bool {
        let key = key.into();
        match spec.sanitized() {
            Some(spec) => {
                self.custom.insert(key, spec);
                true
            }
            None => {
                warn!("Override registry: rejected custom entry '{}': {:?}", key, spec);
                false
            }
        }
    }

    /// Insert a cohort. Returns false (and keeps nothing) when the
    /// parameters fail validation.
    pub fn insert_cohort(&mut self, name: impl Into<String>, params: CohortParams) -> bool {
        let name = name.into();
        match params.sanitized() {
            Some(params) => {
                self.cohorts.insert(name, params);
                true
            }
            None => {
                warn!("Override registry: rejected cohort '{}': {:?}", name, params);
                false
            }
        }
    }

    fn sanitize(&mut self) {
        let custom = std::mem::take(&mut self.custom);
        for (key, spec) in custom {
            self.insert_custom(key, spec);
        }
        let cohorts = std::mem::take(&mut self.cohorts);
        for (name, params) in cohorts {
            self.insert_cohort(name, params);
        }
    }

    pub fn add_cohort_member(&mut self, key: impl Into<String>, cohort: impl Into<String>) {
        self.cohort_members.insert(key.into(), cohort.into());
    }

    pub fn add_cohort_pattern(&mut self, contains: impl Into<String>, cohort: impl Into<String>) {
        self.cohort_patterns.push(NamePattern {
            contains: contains.into(),
            cohort: cohort.into(),
        });
    }

    pub fn exclude_bridge(&mut self, key: impl Into<String>) {
        self.bridge_exclusions.insert(key.into());
    }

    pub fn add_parking_id(&mut self, key: impl Into<String>) {
        self.parking_ids.insert(key.into());
    }

    pub fn is_parking(&self, name: &str) -> bool {
        self.parking_ids.contains(override_key(name))
    }

    fn cohort(&self, cohort: &str) -> Option<AssetParams> {
        match self.cohorts.get(cohort) {
            Some(spec) => Some(AssetParams::Cohort {
                cohort: cohort.to_string(),
                spec: spec.clone(),
            }),
            None => {
                warn!("Override registry: unknown cohort '{}', ignoring", cohort);
                None
            }
        }
    }

    /// Resolve the parameters for an asset name.
    ///
    /// One ordered lookup: custom entry, cohort membership, cohort name
    /// pattern, bridge exclusion, then defaults.
    pub fn resolve(&self, name: &str) -> AssetParams {
        let key = override_key(name);

        if let Some(spec) = self.custom.get(key) {
            return AssetParams::Custom {
                key: key.to_string(),
                spec: spec.clone(),
            };
        }

        if let Some(params) = self
            .cohort_members
            .get(key)
            .and_then(|cohort| self.cohort(cohort))
        {
            return params;
        }

        if let Some(params) = self
            .cohort_patterns
            .iter()
            .find(|p| name.contains(p.contains.as_str()))
            .and_then(|p| self.cohort(&p.cohort))
        {
            return params;
        }

        if self.bridge_exclusions.contains(key) {
            return AssetParams::BridgeExcluded {
                key: key.to_string(),
            };
        }

        AssetParams::Default
    }
}
