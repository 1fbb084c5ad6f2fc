//! Core types for the feature-expansion engine
//!
//! This module defines the values that flow through expansion: feature specs,
//! feature values, event read masks, and the `Feature` object itself with its
//! lazy sign/partiality read accessor.

use serde::{Deserialize, Serialize};

use crate::events::EventList;
use crate::signing::apply_signing;

/// Expansion behavior of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    /// Passed through unchanged
    Simple,
    /// Per-frame series, expanded across motion and value partitions
    Movement,
    /// Attribute of an event list, with boundary and sign metadata
    Event,
    /// Output of a previous movement expansion; never re-expanded
    ExpandedMovement,
}

impl FeatureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Simple => "simple",
            FeatureType::Movement => "movement",
            FeatureType::Event => "event",
            FeatureType::ExpandedMovement => "expanded_movement",
        }
    }
}

/// Derivation descriptor attached to every feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// Dotted hierarchical name, e.g. `locomotion.crawling_bends.head.amplitude`
    pub name: String,
    /// Which expansion path applies
    pub feature_type: FeatureType,
    /// Whether values carry directional meaning; only effective on
    /// non-simple types
    #[serde(default)]
    pub is_signed: bool,
    /// Whether the value is a per-frame time series
    #[serde(default)]
    pub is_time_series: bool,
    /// Name of the event-list attribute supplying per-entry sign bits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_field: Option<String>,
}

impl FeatureSpec {
    /// Create a spec with the given name and type; signedness flags default
    /// to false.
    pub fn new(name: impl Into<String>, feature_type: FeatureType) -> Self {
        Self {
            name: name.into(),
            feature_type,
            is_signed: false,
            is_time_series: false,
            signing_field: None,
        }
    }
}

/// A computed quantity: scalar, 1-D array, an event list, or absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureValue {
    Scalar(f64),
    /// Per-frame or per-event array
    Series(Vec<f64>),
    /// Detected event intervals, the parent of event-typed features
    Events(EventList),
    /// Defined null state, e.g. every attribute of a null event list
    Absent,
}

impl FeatureValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FeatureValue::Absent)
    }

    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            FeatureValue::Series(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_events(&self) -> Option<&EventList> {
        match self {
            FeatureValue::Events(events) => Some(events),
            _ => None,
        }
    }
}

/// Read-time masks attached to event-derived features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMasks {
    /// True = entry is fully observed and safe for aggregate statistics
    pub keep_mask: Vec<bool>,
    /// True = negate the entry when a signed read is requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_mask: Option<Vec<bool>>,
}

/// A named derived quantity with provenance metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub value: FeatureValue,
    pub spec: FeatureSpec,
    /// Names of features read while computing this one, in access order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    /// Present only on event-derived features
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masks: Option<EventMasks>,
}

impl Feature {
    /// Create a feature named after its spec, with an empty dependency trail.
    pub fn new(spec: FeatureSpec, value: FeatureValue) -> Self {
        Self {
            name: spec.name.clone(),
            value,
            spec,
            dependencies: Vec::new(),
            masks: None,
        }
    }

    /// Explicit copy constructor. The spec is deep-copied: mutating the
    /// copy's spec is never observable on the original. The value array is
    /// copied wholesale, which is sufficient because expansion replaces
    /// values rather than mutating them in place.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Read the final numbers, reconciling sign and partiality.
    ///
    /// Composes, on a working copy of the stored magnitudes:
    /// 1. negation of entries flagged in the signing mask, when `signed`;
    /// 2. restriction to the keep mask, when `partials` is false
    ///    (caller-perspective naming: `partials = false` means boundary-
    ///    partial entries are not included).
    ///
    /// Returns `None` when the value is absent. The stored value is never
    /// mutated by this call.
    pub fn get_value(&self, partials: bool, signed: bool) -> Option<Vec<f64>> {
        let mut values = match &self.value {
            FeatureValue::Absent => return None,
            FeatureValue::Scalar(v) => vec![*v],
            FeatureValue::Series(values) => values.clone(),
            FeatureValue::Events(_) => return None,
        };

        if let Some(masks) = &self.masks {
            if let Some(signing_mask) = &masks.signing_mask {
                values = apply_signing(&values, signing_mask, signed);
            }
            if !partials {
                values = values
                    .iter()
                    .zip(&masks.keep_mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(v, _)| *v)
                    .collect();
            }
        }

        Some(values)
    }
}
