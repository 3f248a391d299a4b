use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::measurement::{FeatureData, FeatureType, Vector3};
use crate::run::{RunStatus, StatusEvent, WarningEntry};

/// Overall verdict of a current-sample rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SampleStatus {
    Succeeded,
    Failed,
}

/// Rollup of every measurement in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSample {
    pub run_id: String,
    pub routine_id: String,
    pub part_name: String,
    pub status: SampleStatus,
    /// Number of measurements rolled up.
    pub dimensions: usize,
    pub in_tolerance: usize,
    pub out_of_tolerance: usize,
    pub timestamp: DateTime<Utc>,
    /// JSON text of the [`LatestRun`] record.
    pub latest_run: String,
}

/// Completion record of the run, embedded as text in [`CurrentSample`].
///
/// Duration and schedule fields are fixed placeholders; they are not derived
/// from the event timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LatestRun {
    pub version: String,
    pub run_id: String,
    pub routine_id: String,
    pub software_version_id: String,
    pub software_build_id: String,
    pub part_name: String,
    pub machine_name: String,
    pub device_id: String,
    pub parent_object_id: String,
    pub event: RunStatus,
    pub event_start: DateTime<Utc>,
    pub event_end: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub measurement_count: usize,
    pub last_object_id: Option<String>,
    pub last_feature_id: Option<String>,
    pub last_property_object_id: Option<String>,
    /// Status timeline of the run, in timestamp order.
    pub events: Vec<StatusEvent>,
    pub warnings: Vec<WarningEntry>,
    pub duration: String,
    pub scheduled_duration: String,
    pub schedule: String,
}

/// Measurement sub-record of a [`DimensionResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DimensionMeasurement {
    pub session_id: String,
    pub routine_id: String,
    pub part_name: String,
    pub machine_name: String,
    pub device_id: String,
    pub operator: String,
    pub object_id: String,
    pub captured_at: DateTime<Utc>,
    pub name: String,
    pub nominal: f64,
    pub measured: f64,
    pub tolerance: f64,
    pub deviation: f64,
    pub unit: String,
    pub status: String,
}

/// Tolerance evaluation of one measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DimensionResult {
    pub feature_id: String,
    pub feature_name: String,
    pub location_name: String,
    pub nominal: f64,
    pub measured: f64,
    pub tolerance: f64,
    pub deviation: f64,
    pub o_tol: f64,
    /// `|deviation| > tolerance` against the raw, signed tolerance.
    pub out_of_tolerance: bool,
    pub deviation_percent: f64,
    pub measurement: DimensionMeasurement,
}

/// Fixed-width geometry record: every variant's fields, non-applicable ones
/// left at zero/false.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlatFeatureMeasurement {
    pub is_point: bool,
    pub is_line: bool,
    pub is_circle: bool,
    pub nominal_point: Vector3,
    pub measured_point: Vector3,
    pub nominal_start: Vector3,
    pub nominal_end: Vector3,
    pub nominal_normal: Vector3,
    pub measured_start: Vector3,
    pub measured_end: Vector3,
    pub measured_normal: Vector3,
    pub nominal_center: Vector3,
    pub nominal_diameter: f64,
    pub nominal_angle: Vector3,
    pub measured_center: Vector3,
    pub measured_diameter: f64,
    pub measured_angle: Vector3,
}

impl From<&FeatureData> for FlatFeatureMeasurement {
    fn from(data: &FeatureData) -> Self {
        match *data {
            FeatureData::Point { nominal, measured } => Self {
                is_point: true,
                nominal_point: nominal,
                measured_point: measured,
                ..Self::default()
            },
            FeatureData::Line {
                nominal_start,
                nominal_end,
                nominal_normal,
                measured_start,
                measured_end,
                measured_normal,
            } => Self {
                is_line: true,
                nominal_start,
                nominal_end,
                nominal_normal,
                measured_start,
                measured_end,
                measured_normal,
                ..Self::default()
            },
            FeatureData::Circle {
                nominal_center,
                nominal_diameter,
                nominal_angle,
                measured_center,
                measured_diameter,
                measured_angle,
            } => Self {
                is_circle: true,
                nominal_center,
                nominal_diameter,
                nominal_angle,
                measured_center,
                measured_diameter,
                measured_angle,
                ..Self::default()
            },
        }
    }
}

/// Geometry payload of one measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureResult {
    pub feature_id: String,
    pub feature_name: String,
    pub feature_type: FeatureType,
    pub run_id: String,
    pub routine_id: String,
    pub object_id: String,
    pub order_index: usize,
    pub captured_at: DateTime<Utc>,
    /// JSON text of a [`FlatFeatureMeasurement`].
    pub measurement: String,
}

/// One part's metrology document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub current_sample: CurrentSample,
    pub dimension_results: Vec<DimensionResult>,
    pub feature_results: Vec<FeatureResult>,
}

/// Two reports differing by one appended measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportPair {
    pub one: Report,
    pub two: Report,
}

/// Reports of a multi-part product keyed by registration-style identifiers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assembly {
    pub part_reports: BTreeMap<String, Report>,
}

impl Assembly {
    pub fn len(&self) -> usize {
        self.part_reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.part_reports.is_empty()
    }
}
