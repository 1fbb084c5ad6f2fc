//! Event lists and attribute extraction
//!
//! An `EventList` is an ordered set of detected behavior intervals over a
//! video, together with per-interval and inter-interval derived quantities.
//! This module names the attributes a catalog entry can request and checks
//! their dimensions against the interval count before any boundary logic
//! runs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ExpandError;

/// How an event attribute aligns to the interval list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// One value per interval
    PerEvent,
    /// One value per gap between consecutive intervals
    InterEvent,
    /// One value for the whole recording
    Summary,
}

/// Attributes extractable from an event list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAttribute {
    EventDurations,
    DistanceDuringEvents,
    TimeBetweenEvents,
    DistanceBetweenEvents,
    Frequency,
    TimeRatio,
    DataRatio,
}

impl EventAttribute {
    /// Parse the leaf of a dotted feature name into an attribute.
    pub fn parse(leaf: &str) -> Option<Self> {
        match leaf {
            "event_durations" => Some(EventAttribute::EventDurations),
            "distance_during_events" => Some(EventAttribute::DistanceDuringEvents),
            "time_between_events" => Some(EventAttribute::TimeBetweenEvents),
            "distance_between_events" => Some(EventAttribute::DistanceBetweenEvents),
            "frequency" => Some(EventAttribute::Frequency),
            "time_ratio" => Some(EventAttribute::TimeRatio),
            "data_ratio" => Some(EventAttribute::DataRatio),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventAttribute::EventDurations => "event_durations",
            EventAttribute::DistanceDuringEvents => "distance_during_events",
            EventAttribute::TimeBetweenEvents => "time_between_events",
            EventAttribute::DistanceBetweenEvents => "distance_between_events",
            EventAttribute::Frequency => "frequency",
            EventAttribute::TimeRatio => "time_ratio",
            EventAttribute::DataRatio => "data_ratio",
        }
    }

    pub fn kind(&self) -> AttributeKind {
        match self {
            EventAttribute::EventDurations | EventAttribute::DistanceDuringEvents => {
                AttributeKind::PerEvent
            }
            EventAttribute::TimeBetweenEvents | EventAttribute::DistanceBetweenEvents => {
                AttributeKind::InterEvent
            }
            EventAttribute::Frequency | EventAttribute::TimeRatio | EventAttribute::DataRatio => {
                AttributeKind::Summary
            }
        }
    }
}

/// Detected behavior intervals over a video, frame-ordered and
/// non-overlapping, frames inclusive and 0-indexed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventList {
    pub start_frames: Vec<usize>,
    pub end_frames: Vec<usize>,
    pub num_video_frames: usize,
    /// Duration of each interval (one value per interval)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_durations: Option<Vec<f64>>,
    /// Distance traveled during each interval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_during_events: Option<Vec<f64>>,
    /// Time spanned by each gap between consecutive intervals
    /// (interval count - 1 values)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_between_events: Option<Vec<f64>>,
    /// Distance traveled during each gap between consecutive intervals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_between_events: Option<Vec<f64>>,
    /// Intervals per unit time over the whole recording
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    /// Fraction of recording time spent inside intervals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_ratio: Option<f64>,
    /// Fraction of the tracked quantity accumulated inside intervals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_ratio: Option<f64>,
    /// Per-interval sign bits keyed by signing-field name (true = negate)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub sign_masks: HashMap<String, Vec<bool>>,
}

impl EventList {
    /// A list with zero detected intervals; every attribute access on it
    /// yields absent.
    pub fn is_null(&self) -> bool {
        self.start_frames.is_empty()
    }

    pub fn num_events(&self) -> usize {
        self.start_frames.len()
    }

    /// Per-interval sign bits for the named signing field.
    pub fn sign_mask(&self, field: &str) -> Option<&[bool]> {
        self.sign_masks.get(field).map(|mask| mask.as_slice())
    }

    fn raw_attribute(&self, attribute: EventAttribute) -> Option<Vec<f64>> {
        match attribute {
            EventAttribute::EventDurations => self.event_durations.clone(),
            EventAttribute::DistanceDuringEvents => self.distance_during_events.clone(),
            EventAttribute::TimeBetweenEvents => self.time_between_events.clone(),
            EventAttribute::DistanceBetweenEvents => self.distance_between_events.clone(),
            EventAttribute::Frequency => self.frequency.map(|v| vec![v]),
            EventAttribute::TimeRatio => self.time_ratio.map(|v| vec![v]),
            EventAttribute::DataRatio => self.data_ratio.map(|v| vec![v]),
        }
    }

    fn expected_len(&self, kind: AttributeKind) -> usize {
        match kind {
            AttributeKind::PerEvent => self.num_events(),
            AttributeKind::InterEvent => self.num_events().saturating_sub(1),
            AttributeKind::Summary => 1,
        }
    }

    /// Extract the raw values for an attribute, checking dimensions against
    /// the interval count. Scalars come back as single-element arrays.
    ///
    /// Callers handle the null case before extraction; null-list absence is
    /// a defined state, not a dimension failure.
    pub fn extract(&self, attribute: EventAttribute) -> Result<Vec<f64>, ExpandError> {
        let expected = self.expected_len(attribute.kind());

        let values = match self.raw_attribute(attribute) {
            Some(values) => values,
            // A single-interval list legitimately has no inter-event data
            None if expected == 0 => Vec::new(),
            None => {
                return Err(ExpandError::malformed(
                    attribute.as_str(),
                    "attribute not present on event list",
                ))
            }
        };

        if values.len() != expected {
            return Err(ExpandError::DimensionMismatch {
                name: attribute.as_str().to_string(),
                expected,
                actual: values.len(),
            });
        }

        Ok(values)
    }
}
