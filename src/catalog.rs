//! Feature catalog and dotted-name handling
//!
//! The catalog is an ordered collection of features with lookup by dotted
//! hierarchical name. Reads go through an explicit trace accumulator so
//! callers can record which features they touched.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ExpandError;
use crate::types::Feature;

/// Split a dotted feature name into (parent, leaf) on the final separator.
///
/// `locomotion.crawling_bends.head.amplitude` becomes
/// (`locomotion.crawling_bends.head`, `amplitude`). A name with no
/// separator, or with an empty side, is malformed.
pub fn feature_name_info(name: &str) -> Result<(&str, &str), ExpandError> {
    match name.rsplit_once('.') {
        Some((parent, leaf)) if !parent.is_empty() && !leaf.is_empty() => Ok((parent, leaf)),
        _ => Err(ExpandError::MalformedName(name.to_string())),
    }
}

/// The parent portion of a dotted feature name.
pub fn parent_feature_name(name: &str) -> Result<&str, ExpandError> {
    feature_name_info(name).map(|(parent, _)| parent)
}

/// Ordered collection of features with lookup by dotted name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Feature>", into = "Vec<Feature>")]
pub struct FeatureCatalog {
    features: Vec<Feature>,
    index: HashMap<String, usize>,
}

impl FeatureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a feature. A later feature with the same name shadows an
    /// earlier one for lookup; both remain in iteration order.
    pub fn push(&mut self, feature: Feature) {
        self.index.insert(feature.name.clone(), self.features.len());
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Look up a feature by dotted name.
    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.index.get(name).map(|i| &self.features[*i])
    }

    /// Look up a feature, recording the access in the caller-owned trace.
    ///
    /// The name is appended whether or not the lookup succeeds; the trace is
    /// a best-effort lineage trail, not a scheduling mechanism, and is never
    /// deduplicated.
    pub fn get_traced<'a>(&'a self, name: &str, trace: &mut Vec<String>) -> Option<&'a Feature> {
        trace.push(name.to_string());
        self.get(name)
    }
}

impl From<Vec<Feature>> for FeatureCatalog {
    fn from(features: Vec<Feature>) -> Self {
        let mut catalog = FeatureCatalog::new();
        for feature in features {
            catalog.push(feature);
        }
        catalog
    }
}

impl From<FeatureCatalog> for Vec<Feature> {
    fn from(catalog: FeatureCatalog) -> Self {
        catalog.features
    }
}
