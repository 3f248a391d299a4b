//! Core document model for metrogen.
//!
//! Defines the measurement records the generator samples and the report tree
//! it assembles from them. Every type here is plain data: serializable,
//! schema-describable and free of randomness.

pub mod error;
pub mod measurement;
pub mod report;
pub mod run;
pub mod size;

pub use error::{Error, Result};
pub use measurement::{FeatureData, FeatureType, Location, Measurement, Vector3};
pub use report::{
    Assembly, CurrentSample, DimensionMeasurement, DimensionResult, FeatureResult,
    FlatFeatureMeasurement, LatestRun, Report, ReportPair, SampleStatus,
};
pub use run::{RunContext, RunStatus, StatusEvent, WarningEntry};
pub use size::byte_size;

/// Version tag embedded in every latest-run record.
pub const DOCUMENT_VERSION: &str = "0.1";
