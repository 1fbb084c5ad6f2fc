//! Motility Features - feature-derivation engine for posture and motion
//! time series
//!
//! The engine turns a base catalog of per-frame measurements and detected
//! behavior events into the full derived feature set through a deterministic
//! pass: motion/value partitioning -> event attribute extraction ->
//! boundary masking -> lazy sign correction.
//!
//! ## Modules
//!
//! - **partitions**: motion-state and value-sign selection masks
//! - **events**: event-interval lists and attribute extraction
//! - **boundary**: keep masks for boundary-partial event entries
//! - **signing**: read-time sign correction over stored magnitudes
//! - **expand**: catalog orchestration with per-feature failure isolation

pub mod boundary;
pub mod catalog;
pub mod error;
pub mod events;
pub mod expand;
pub mod partitions;
pub mod signing;
pub mod types;

pub use catalog::{feature_name_info, parent_feature_name, FeatureCatalog};
pub use error::ExpandError;
pub use events::{AttributeKind, EventAttribute, EventList};
pub use expand::{expand, Expansion, ExpansionReport, SkippedFeature, MOTION_MODE_FEATURE};
pub use partitions::{DataPartition, MotionState};
pub use types::{EventMasks, Feature, FeatureSpec, FeatureType, FeatureValue};

/// Engine version embedded in expansion reports
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for expansion reports
pub const PRODUCER_NAME: &str = "motility-features";
