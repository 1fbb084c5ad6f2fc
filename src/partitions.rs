//! Motion and value partition masks
//!
//! Movement features are expanded across two independent partitions:
//! - how the organism is moving at each frame (all / forward / paused /
//!   backward), read from the shared motion-mode series;
//! - the sign of the measured value (all / absolute / positive / negative),
//!   meaningful only for signed features.
//!
//! Both partitions produce boolean selection masks over the frame axis.

use serde::{Deserialize, Serialize};

/// Motion state of the organism at a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionState {
    All,
    Forward,
    Paused,
    Backward,
}

impl MotionState {
    /// Emission order for expansion; part of the observable contract.
    pub const ORDER: [MotionState; 4] = [
        MotionState::All,
        MotionState::Forward,
        MotionState::Paused,
        MotionState::Backward,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MotionState::All => "all",
            MotionState::Forward => "forward",
            MotionState::Paused => "paused",
            MotionState::Backward => "backward",
        }
    }
}

/// Sign-based slice of a value series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataPartition {
    All,
    Absolute,
    Positive,
    Negative,
}

impl DataPartition {
    const ORDER: [DataPartition; 4] = [
        DataPartition::All,
        DataPartition::Absolute,
        DataPartition::Positive,
        DataPartition::Negative,
    ];

    /// Partitions emitted for a feature: all four when signed, only `all`
    /// otherwise.
    pub fn expansion_order(signed: bool) -> &'static [DataPartition] {
        if signed {
            &Self::ORDER
        } else {
            &Self::ORDER[..1]
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataPartition::All => "all",
            DataPartition::Absolute => "absolute",
            DataPartition::Positive => "positive",
            DataPartition::Negative => "negative",
        }
    }
}

/// Frame masks for each motion state
#[derive(Debug, Clone, PartialEq)]
pub struct MotionMasks {
    pub all: Vec<bool>,
    pub forward: Vec<bool>,
    pub paused: Vec<bool>,
    pub backward: Vec<bool>,
}

impl MotionMasks {
    pub fn get(&self, state: MotionState) -> &[bool] {
        match state {
            MotionState::All => &self.all,
            MotionState::Forward => &self.forward,
            MotionState::Paused => &self.paused,
            MotionState::Backward => &self.backward,
        }
    }
}

/// Classify each frame by motion mode (1 forward, -1 backward, 0 paused).
///
/// Frames holding any other value, including NaN, fall into none of the
/// three state masks but still count under `all`.
pub fn motion_masks(modes: &[f64]) -> MotionMasks {
    MotionMasks {
        all: vec![true; modes.len()],
        forward: modes.iter().map(|m| *m == 1.0).collect(),
        paused: modes.iter().map(|m| *m == 0.0).collect(),
        backward: modes.iter().map(|m| *m == -1.0).collect(),
    }
}

/// Validity and sign masks for a value series
#[derive(Debug, Clone, PartialEq)]
pub struct ValueMasks {
    /// Entries that are real, finite numbers
    pub all: Vec<bool>,
    pub absolute: Option<Vec<bool>>,
    pub positive: Option<Vec<bool>>,
    pub negative: Option<Vec<bool>>,
}

impl ValueMasks {
    pub fn get(&self, partition: DataPartition) -> Option<&[bool]> {
        match partition {
            DataPartition::All => Some(&self.all),
            DataPartition::Absolute => self.absolute.as_deref(),
            DataPartition::Positive => self.positive.as_deref(),
            DataPartition::Negative => self.negative.as_deref(),
        }
    }
}

/// Partition a value series by sign.
///
/// NaN and infinite entries are excluded from every mask, including `all`.
/// Exact zero satisfies both `positive` and `negative` (closed-interval
/// convention). `absolute` reuses the validity mask: taking magnitudes
/// discards sign rather than filtering by it. A series with no valid
/// entries yields all-false masks, which downstream turns into empty
/// derived features rather than an error.
pub fn value_masks(series: &[f64], signed: bool) -> ValueMasks {
    let valid: Vec<bool> = series.iter().map(|v| v.is_finite()).collect();

    if !signed {
        return ValueMasks {
            all: valid,
            absolute: None,
            positive: None,
            negative: None,
        };
    }

    let positive = series
        .iter()
        .zip(&valid)
        .map(|(v, ok)| *ok && *v >= 0.0)
        .collect();
    let negative = series
        .iter()
        .zip(&valid)
        .map(|(v, ok)| *ok && *v <= 0.0)
        .collect();

    ValueMasks {
        absolute: Some(valid.clone()),
        positive: Some(positive),
        negative: Some(negative),
        all: valid,
    }
}
