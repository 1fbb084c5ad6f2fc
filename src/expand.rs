//! Catalog expansion orchestration
//!
//! One pass over the base catalog:
//! - movement features are crossed over motion and value partitions,
//!   yielding 4 derivatives (16 when signed);
//! - event features are resolved against their parent event list and emitted
//!   with boundary and sign metadata attached;
//! - everything else passes through by value copy, so re-expanding an
//!   already-expanded catalog is a no-op for its derivatives.
//!
//! Per-feature failures never abort the pass; they are collected in the
//! expansion report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::boundary::keep_mask;
use crate::catalog::{feature_name_info, FeatureCatalog};
use crate::error::ExpandError;
use crate::events::{AttributeKind, EventAttribute};
use crate::partitions::{motion_masks, value_masks, DataPartition, MotionState};
use crate::signing::signing_mask_for;
use crate::types::{EventMasks, Feature, FeatureType, FeatureValue};

/// Catalog name of the shared per-frame motion-mode series
pub const MOTION_MODE_FEATURE: &str = "locomotion.motion_mode";

/// A base feature whose expansion failed, with the reason it was skipped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFeature {
    pub name: String,
    pub reason: String,
}

/// Provenance record for one expansion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpansionReport {
    pub run_id: Uuid,
    pub computed_at: DateTime<Utc>,
    pub producer: String,
    pub engine_version: String,
    pub input_features: usize,
    pub output_features: usize,
    pub skipped: Vec<SkippedFeature>,
}

/// Result of expanding a catalog
#[derive(Debug, Clone)]
pub struct Expansion {
    pub catalog: FeatureCatalog,
    pub report: ExpansionReport,
}

/// Expand a base feature catalog into the full derived feature set.
///
/// Total over well-formed input: a malformed base feature is skipped and
/// reported, never raised, so one bad entry cannot prevent expansion of the
/// rest of the catalog.
pub fn expand(catalog: &FeatureCatalog) -> Expansion {
    let mut out = FeatureCatalog::new();
    let mut skipped = Vec::new();

    for feature in catalog.iter() {
        let result = match feature.spec.feature_type {
            FeatureType::Movement => expand_movement(catalog, feature),
            FeatureType::Event => expand_event(catalog, feature).map(|f| vec![f]),
            // Simple and already-expanded features pass through by value copy
            _ => Ok(vec![feature.copy()]),
        };

        match result {
            Ok(features) => {
                for new_feature in features {
                    out.push(new_feature);
                }
            }
            Err(err) => skipped.push(SkippedFeature {
                name: feature.name.clone(),
                reason: err.to_string(),
            }),
        }
    }

    let report = ExpansionReport {
        run_id: Uuid::new_v4(),
        computed_at: Utc::now(),
        producer: crate::PRODUCER_NAME.to_string(),
        engine_version: crate::ENGINE_VERSION.to_string(),
        input_features: catalog.len(),
        output_features: out.len(),
        skipped,
    };

    Expansion {
        catalog: out,
        report,
    }
}

/// Expand one movement feature across the motion x value partition product.
///
/// Emission order is motion states outer (all, forward, paused, backward),
/// data partitions inner; the order is part of the observable contract.
fn expand_movement(
    catalog: &FeatureCatalog,
    feature: &Feature,
) -> Result<Vec<Feature>, ExpandError> {
    let series = feature
        .value
        .as_series()
        .ok_or_else(|| ExpandError::malformed(&feature.name, "movement feature has no series"))?;

    let mut dependencies = feature.dependencies.clone();
    let motion_feature = catalog
        .get_traced(MOTION_MODE_FEATURE, &mut dependencies)
        .ok_or_else(|| ExpandError::MissingFeature(MOTION_MODE_FEATURE.to_string()))?;
    let modes = motion_feature.value.as_series().ok_or_else(|| {
        ExpandError::malformed(MOTION_MODE_FEATURE, "motion mode is not a series")
    })?;

    if modes.len() != series.len() {
        return Err(ExpandError::DimensionMismatch {
            name: feature.name.clone(),
            expected: modes.len(),
            actual: series.len(),
        });
    }

    let m_masks = motion_masks(modes);
    let d_masks = value_masks(series, feature.spec.is_signed);

    // The absolute variant discards sign before masking; its mask stays the
    // plain validity mask
    let abs_series: Vec<f64> = series.iter().map(|v| v.abs()).collect();

    let mut new_features = Vec::new();
    for motion_state in MotionState::ORDER {
        for data_partition in DataPartition::expansion_order(feature.spec.is_signed) {
            let Some(d_mask) = d_masks.get(*data_partition) else {
                continue;
            };
            let m_mask = m_masks.get(motion_state);

            let source = if *data_partition == DataPartition::Absolute {
                &abs_series
            } else {
                series
            };
            let value: Vec<f64> = source
                .iter()
                .zip(d_mask.iter().zip(m_mask))
                .filter(|(_, (d, m))| **d && **m)
                .map(|(v, _)| *v)
                .collect();

            let mut spec = feature.spec.clone();
            spec.feature_type = FeatureType::ExpandedMovement;
            spec.is_time_series = false;
            // A subset already filtered to one sign is no longer signed
            spec.is_signed = feature.spec.is_signed && *data_partition == DataPartition::All;
            spec.name = format!(
                "{}.{}_data_with_{}_movement",
                feature.spec.name,
                data_partition.as_str(),
                motion_state.as_str()
            );

            new_features.push(Feature {
                name: spec.name.clone(),
                value: FeatureValue::Series(value),
                spec,
                dependencies: dependencies.clone(),
                masks: None,
            });
        }
    }

    Ok(new_features)
}

/// Resolve one event feature against its parent event list, attaching
/// boundary and sign metadata.
fn expand_event(catalog: &FeatureCatalog, feature: &Feature) -> Result<Feature, ExpandError> {
    let (parent_name, leaf) = feature_name_info(&feature.name)?;
    let attribute = EventAttribute::parse(leaf)
        .ok_or_else(|| ExpandError::malformed(&feature.name, "unknown event attribute"))?;

    let mut dependencies = feature.dependencies.clone();
    let parent = catalog
        .get_traced(parent_name, &mut dependencies)
        .ok_or_else(|| ExpandError::MissingFeature(parent_name.to_string()))?;
    let events = parent
        .value
        .as_events()
        .ok_or_else(|| ExpandError::malformed(&feature.name, "parent is not an event list"))?;

    // A null event list is a defined absent state, not an error
    if events.is_null() {
        return Ok(Feature {
            name: feature.name.clone(),
            value: FeatureValue::Absent,
            spec: feature.spec.clone(),
            dependencies,
            masks: None,
        });
    }

    let values = events.extract(attribute)?;
    let keep = keep_mask(attribute.kind(), values.len(), events);

    let signing_mask = if feature.spec.is_signed {
        if attribute.kind() == AttributeKind::Summary {
            return Err(ExpandError::malformed(
                &feature.name,
                "whole-recording attribute cannot be signed",
            ));
        }
        let field = feature.spec.signing_field.as_deref().ok_or_else(|| {
            ExpandError::malformed(&feature.name, "signed spec without signing_field")
        })?;
        let per_event = events.sign_mask(field).ok_or_else(|| {
            ExpandError::malformed(
                &feature.name,
                format!("signing field '{field}' not present on event list"),
            )
        })?;
        if per_event.len() != events.num_events() {
            return Err(ExpandError::DimensionMismatch {
                name: field.to_string(),
                expected: events.num_events(),
                actual: per_event.len(),
            });
        }
        Some(signing_mask_for(attribute.kind(), per_event))
    } else {
        None
    };

    Ok(Feature {
        name: feature.name.clone(),
        value: FeatureValue::Series(values),
        spec: feature.spec.clone(),
        dependencies,
        masks: Some(EventMasks {
            keep_mask: keep,
            signing_mask,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventList;
    use crate::types::FeatureSpec;
    use pretty_assertions::assert_eq;

    fn motion_mode_feature() -> Feature {
        Feature::new(
            FeatureSpec::new(MOTION_MODE_FEATURE, FeatureType::Simple),
            FeatureValue::Series(vec![1.0, 1.0, 0.0, -1.0, -1.0, f64::NAN]),
        )
    }

    fn movement_feature(name: &str, signed: bool) -> Feature {
        let mut spec = FeatureSpec::new(name, FeatureType::Movement);
        spec.is_signed = signed;
        spec.is_time_series = true;
        Feature::new(
            spec,
            FeatureValue::Series(vec![2.0, -3.0, 0.0, 4.0, f64::NAN, 5.0]),
        )
    }

    fn boundary_events() -> EventList {
        EventList {
            start_frames: vec![0, 10, 20],
            end_frames: vec![5, 12, 24],
            num_video_frames: 25,
            event_durations: Some(vec![6.0, 3.0, 5.0]),
            time_between_events: Some(vec![4.0, 7.0]),
            ..Default::default()
        }
    }

    fn event_catalog(events: EventList) -> FeatureCatalog {
        let parent = Feature::new(
            FeatureSpec::new("posture.coils", FeatureType::Simple),
            FeatureValue::Events(events),
        );
        let durations = Feature::new(
            FeatureSpec::new("posture.coils.event_durations", FeatureType::Event),
            FeatureValue::Absent,
        );
        vec![parent, durations].into()
    }

    #[test]
    fn signed_movement_expands_to_sixteen() {
        let catalog: FeatureCatalog = vec![
            motion_mode_feature(),
            movement_feature("locomotion.velocity.midbody.speed", true),
        ]
        .into();

        let expansion = expand(&catalog);
        assert!(expansion.report.skipped.is_empty());
        // 1 pass-through motion mode + 16 derivatives
        assert_eq!(expansion.catalog.len(), 17);

        let derived: Vec<&Feature> = expansion
            .catalog
            .iter()
            .filter(|f| f.spec.feature_type == FeatureType::ExpandedMovement)
            .collect();
        assert_eq!(derived.len(), 16);

        // Motion partitions outer, data partitions inner
        let names: Vec<&str> = derived.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names[0],
            "locomotion.velocity.midbody.speed.all_data_with_all_movement"
        );
        assert_eq!(
            names[3],
            "locomotion.velocity.midbody.speed.negative_data_with_all_movement"
        );
        assert_eq!(
            names[4],
            "locomotion.velocity.midbody.speed.all_data_with_forward_movement"
        );
        assert_eq!(
            names[15],
            "locomotion.velocity.midbody.speed.negative_data_with_backward_movement"
        );
    }

    #[test]
    fn unsigned_movement_expands_to_four() {
        let catalog: FeatureCatalog = vec![
            motion_mode_feature(),
            movement_feature("posture.amplitude.max", false),
        ]
        .into();

        let expansion = expand(&catalog);
        let derived: Vec<&Feature> = expansion
            .catalog
            .iter()
            .filter(|f| f.spec.feature_type == FeatureType::ExpandedMovement)
            .collect();
        assert_eq!(derived.len(), 4);
        assert!(derived.iter().all(|f| f.name.contains("all_data_with_")));
    }

    #[test]
    fn expanded_values_respect_partition_masks() {
        let catalog: FeatureCatalog = vec![
            motion_mode_feature(),
            movement_feature("locomotion.velocity.midbody.speed", true),
        ]
        .into();
        let expansion = expand(&catalog);

        let get = |name: &str| {
            expansion
                .catalog
                .get(&format!("locomotion.velocity.midbody.speed.{name}"))
                .unwrap()
                .value
                .as_series()
                .unwrap()
                .to_vec()
        };

        // Base series [2, -3, 0, 4, NaN, 5] over modes [1, 1, 0, -1, -1, NaN]:
        // NaN value excluded everywhere; NaN mode only counts under "all"
        assert_eq!(get("all_data_with_all_movement"), vec![2.0, -3.0, 0.0, 4.0, 5.0]);
        assert_eq!(get("absolute_data_with_all_movement"), vec![2.0, 3.0, 0.0, 4.0, 5.0]);
        assert_eq!(get("positive_data_with_all_movement"), vec![2.0, 0.0, 4.0, 5.0]);
        assert_eq!(get("negative_data_with_all_movement"), vec![-3.0, 0.0]);
        assert_eq!(get("all_data_with_forward_movement"), vec![2.0, -3.0]);
        assert_eq!(get("all_data_with_paused_movement"), vec![0.0]);
        assert_eq!(get("all_data_with_backward_movement"), vec![4.0]);
        assert_eq!(get("negative_data_with_forward_movement"), vec![-3.0]);
    }

    #[test]
    fn expanded_specs_are_relabelled() {
        let catalog: FeatureCatalog = vec![
            motion_mode_feature(),
            movement_feature("locomotion.velocity.midbody.speed", true),
        ]
        .into();
        let expansion = expand(&catalog);

        let all = expansion
            .catalog
            .get("locomotion.velocity.midbody.speed.all_data_with_forward_movement")
            .unwrap();
        assert_eq!(all.spec.feature_type, FeatureType::ExpandedMovement);
        assert!(!all.spec.is_time_series);
        // Only the unfiltered data partition stays signed
        assert!(all.spec.is_signed);

        let positive = expansion
            .catalog
            .get("locomotion.velocity.midbody.speed.positive_data_with_forward_movement")
            .unwrap();
        assert!(!positive.spec.is_signed);

        // Derivatives record the motion-mode dependency
        assert_eq!(all.dependencies, vec![MOTION_MODE_FEATURE]);
    }

    #[test]
    fn expansion_is_idempotent_for_expanded_features() {
        let catalog: FeatureCatalog = vec![
            motion_mode_feature(),
            movement_feature("posture.amplitude.max", false),
        ]
        .into();

        let first = expand(&catalog);
        let second = expand(&first.catalog);

        assert_eq!(second.catalog.len(), first.catalog.len());
        let first_names: Vec<&str> = first.catalog.iter().map(|f| f.name.as_str()).collect();
        let second_names: Vec<&str> = second.catalog.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(first_names, second_names);
    }

    #[test]
    fn event_feature_gets_boundary_masks() {
        let expansion = expand(&event_catalog(boundary_events()));
        assert!(expansion.report.skipped.is_empty());

        let durations = expansion
            .catalog
            .get("posture.coils.event_durations")
            .unwrap();
        assert_eq!(
            durations.value.as_series(),
            Some(&[6.0, 3.0, 5.0][..])
        );
        let masks = durations.masks.as_ref().unwrap();
        assert_eq!(masks.keep_mask, vec![false, true, false]);
        assert!(masks.signing_mask.is_none());
        assert_eq!(durations.dependencies, vec!["posture.coils"]);

        // Excluding partials leaves only the interior interval
        assert_eq!(durations.get_value(false, false), Some(vec![3.0]));
    }

    #[test]
    fn signed_event_feature_gets_signing_mask() {
        let mut events = boundary_events();
        events
            .sign_masks
            .insert("is_backward".to_string(), vec![true, false, true]);

        let parent = Feature::new(
            FeatureSpec::new("posture.coils", FeatureType::Simple),
            FeatureValue::Events(events),
        );
        let mut spec = FeatureSpec::new("posture.coils.time_between_events", FeatureType::Event);
        spec.is_signed = true;
        spec.signing_field = Some("is_backward".to_string());
        let gaps = Feature::new(spec, FeatureValue::Absent);

        let catalog: FeatureCatalog = vec![parent, gaps].into();
        let expansion = expand(&catalog);
        assert!(expansion.report.skipped.is_empty());

        let gaps = expansion
            .catalog
            .get("posture.coils.time_between_events")
            .unwrap();
        let masks = gaps.masks.as_ref().unwrap();
        // Inter-event mask drops the final per-interval entry
        assert_eq!(masks.signing_mask, Some(vec![true, false]));
        assert_eq!(masks.keep_mask, vec![true, true]);
        assert_eq!(gaps.get_value(false, true), Some(vec![-4.0, 7.0]));
    }

    #[test]
    fn null_event_list_propagates_absent() {
        let null_events = EventList {
            num_video_frames: 25,
            ..Default::default()
        };
        let expansion = expand(&event_catalog(null_events));
        assert!(expansion.report.skipped.is_empty());

        let durations = expansion
            .catalog
            .get("posture.coils.event_durations")
            .unwrap();
        assert!(durations.value.is_absent());
        assert!(durations.masks.is_none());
        assert_eq!(durations.get_value(true, true), None);
    }

    #[test]
    fn missing_motion_mode_skips_only_movement_features() {
        let catalog: FeatureCatalog = vec![
            movement_feature("posture.amplitude.max", false),
            Feature::new(
                FeatureSpec::new("morphology.length", FeatureType::Simple),
                FeatureValue::Scalar(1.2),
            ),
        ]
        .into();

        let expansion = expand(&catalog);
        assert_eq!(expansion.report.skipped.len(), 1);
        assert_eq!(expansion.report.skipped[0].name, "posture.amplitude.max");
        // The simple feature still passes through
        assert_eq!(expansion.catalog.len(), 1);
        assert!(expansion.catalog.get("morphology.length").is_some());
    }

    #[test]
    fn signed_spec_without_signing_field_is_skipped() {
        let parent = Feature::new(
            FeatureSpec::new("posture.coils", FeatureType::Simple),
            FeatureValue::Events(boundary_events()),
        );
        let mut spec = FeatureSpec::new("posture.coils.event_durations", FeatureType::Event);
        spec.is_signed = true;
        let durations = Feature::new(spec, FeatureValue::Absent);

        let expansion = expand(&vec![parent, durations].into());
        assert_eq!(expansion.report.skipped.len(), 1);
        assert!(expansion.report.skipped[0]
            .reason
            .contains("signing_field"));
    }

    #[test]
    fn event_dimension_mismatch_is_detected_before_masks() {
        let mut events = boundary_events();
        events.event_durations = Some(vec![6.0]);
        let expansion = expand(&event_catalog(events));

        assert_eq!(expansion.report.skipped.len(), 1);
        assert!(expansion.report.skipped[0]
            .reason
            .contains("dimension mismatch"));
    }

    #[test]
    fn movement_series_length_must_match_motion_mode() {
        let mut feature = movement_feature("posture.amplitude.max", false);
        feature.value = FeatureValue::Series(vec![1.0, 2.0]);
        let catalog: FeatureCatalog = vec![motion_mode_feature(), feature].into();

        let expansion = expand(&catalog);
        assert_eq!(expansion.report.skipped.len(), 1);
        assert!(expansion.report.skipped[0]
            .reason
            .contains("dimension mismatch"));
    }

    #[test]
    fn event_name_without_separator_is_skipped() {
        let feature = Feature::new(
            FeatureSpec::new("frequency", FeatureType::Event),
            FeatureValue::Absent,
        );
        let expansion = expand(&vec![feature].into());

        assert_eq!(expansion.report.skipped.len(), 1);
        assert!(expansion.report.skipped[0]
            .reason
            .contains("no parent separator"));
    }

    #[test]
    fn report_counts_input_and_output() {
        let catalog: FeatureCatalog = vec![
            motion_mode_feature(),
            movement_feature("locomotion.velocity.midbody.speed", true),
        ]
        .into();
        let expansion = expand(&catalog);

        assert_eq!(expansion.report.input_features, 2);
        assert_eq!(expansion.report.output_features, 17);
        assert_eq!(expansion.report.engine_version, crate::ENGINE_VERSION);

        // The report serializes for caller-visible tooling
        let json = serde_json::to_string(&expansion.report).unwrap();
        assert!(json.contains("run_id"));
    }
}
