//! Lazy sign correction for directional event attributes
//!
//! Signed event attributes store raw magnitudes plus a boolean signing mask;
//! direction is composed at read time. Storing pre-signed values would be
//! lossy and non-reusable.

use crate::events::AttributeKind;

/// Apply per-entry sign to a working copy of `values`.
///
/// Entries flagged true in `signing_mask` are negated when `signed` is
/// requested. The input is never mutated. The mask must be at least as long
/// as the value array; extra mask entries are ignored.
pub fn apply_signing(values: &[f64], signing_mask: &[bool], signed: bool) -> Vec<f64> {
    if !signed {
        return values.to_vec();
    }

    values
        .iter()
        .zip(signing_mask)
        .map(|(v, negate)| if *negate { -v } else { *v })
        .collect()
}

/// Derive the signing mask for an attribute from the per-interval mask.
///
/// Per-event attributes use it as-is. Inter-event attributes drop the last
/// entry: a gap inherits the sign of the interval immediately preceding it.
/// Whole-recording scalars are never signed.
pub fn signing_mask_for(kind: AttributeKind, per_event_mask: &[bool]) -> Vec<bool> {
    match kind {
        AttributeKind::PerEvent => per_event_mask.to_vec(),
        AttributeKind::InterEvent => {
            per_event_mask[..per_event_mask.len().saturating_sub(1)].to_vec()
        }
        AttributeKind::Summary => Vec::new(),
    }
}
