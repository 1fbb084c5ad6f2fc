//! Boundary partiality masks for event attributes
//!
//! An interval touching the first or last video frame may extend beyond the
//! observed window, so its duration and distance are not trustworthy. The
//! keep mask marks which entries of an attribute array are fully observed;
//! the caller decides whether to apply it.

use crate::events::{AttributeKind, EventList};

/// Compute the keep mask for an attribute array of `len` entries.
///
/// Per-event attributes: the first entry is partial when the first interval
/// starts at frame 0, and the last when the final interval ends at the last
/// video frame.
///
/// Inter-event attributes use the inverted conditions: the leading gap is
/// only fully observed when the first interval truly starts at frame 0
/// (no unobserved gap time before it), and symmetrically for the trailing
/// gap.
///
/// Whole-recording attributes have no partiality concept and keep their
/// single entry. An empty value array yields an empty mask.
pub fn keep_mask(kind: AttributeKind, len: usize, events: &EventList) -> Vec<bool> {
    let mut keep = vec![true; len];
    if len == 0 {
        return keep;
    }

    let last_frame = events.num_video_frames.saturating_sub(1);
    let first_start = events.start_frames[0];
    let final_end = *events.end_frames.last().unwrap_or(&0);
    let last = len - 1;

    match kind {
        AttributeKind::PerEvent => {
            keep[0] = first_start != 0;
            keep[last] = final_end != last_frame;
        }
        AttributeKind::InterEvent => {
            keep[0] = first_start == 0;
            keep[last] = final_end == last_frame;
        }
        AttributeKind::Summary => {}
    }

    keep
}
