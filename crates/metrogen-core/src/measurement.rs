use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Nominal/measured/tolerance tuple for one measured location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub name: String,
    pub nominal: f64,
    pub measured: f64,
    /// Signed tolerance as sampled; only its magnitude enters `o_tol`.
    pub tolerance: f64,
    /// `measured - nominal`.
    pub deviation: f64,
    /// Out-of-tolerance margin, never negative.
    pub o_tol: f64,
}

impl Location {
    /// Builds a location, deriving deviation and the out-of-tolerance margin.
    pub fn new(name: impl Into<String>, nominal: f64, measured: f64, tolerance: f64) -> Self {
        let deviation = measured - nominal;
        Self {
            name: name.into(),
            nominal,
            measured,
            tolerance,
            deviation,
            o_tol: out_of_tolerance_margin(deviation, tolerance),
        }
    }

    /// `true` when the margin is positive.
    pub fn is_out_of_tolerance(&self) -> bool {
        self.o_tol > 0.0
    }

    /// Raw comparison against the signed tolerance, used by dimension results.
    ///
    /// Differs from [`Location::is_out_of_tolerance`] whenever the tolerance is
    /// negative; both are reported.
    pub fn exceeds_tolerance(&self) -> bool {
        self.deviation.abs() > self.tolerance
    }

    /// Deviation as a percentage of the tolerance magnitude, zero when the
    /// tolerance is zero.
    pub fn deviation_percent(&self) -> f64 {
        if self.tolerance == 0.0 {
            0.0
        } else {
            self.deviation.abs() / self.tolerance.abs() * 100.0
        }
    }
}

/// `max(0, |deviation| - |tolerance|)`.
pub fn out_of_tolerance_margin(deviation: f64, tolerance: f64) -> f64 {
    (deviation.abs() - tolerance.abs()).max(0.0)
}

/// Cartesian coordinate or direction vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Geometry kinds a measurement can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum FeatureType {
    Point,
    Line,
    Circle,
}

impl FeatureType {
    pub const ALL: [FeatureType; 3] = [FeatureType::Point, FeatureType::Line, FeatureType::Circle];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Point => "Point",
            FeatureType::Line => "Line",
            FeatureType::Circle => "Circle",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Point" => Ok(FeatureType::Point),
            "Line" => Ok(FeatureType::Line),
            "Circle" => Ok(FeatureType::Circle),
            other => Err(Error::UnsupportedFeatureType(other.to_string())),
        }
    }
}

/// Geometry payload of a measurement, tagged by its feature type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum FeatureData {
    #[serde(rename_all = "camelCase")]
    Point {
        nominal: Vector3,
        measured: Vector3,
    },
    #[serde(rename_all = "camelCase")]
    Line {
        nominal_start: Vector3,
        nominal_end: Vector3,
        nominal_normal: Vector3,
        measured_start: Vector3,
        measured_end: Vector3,
        measured_normal: Vector3,
    },
    #[serde(rename_all = "camelCase")]
    Circle {
        nominal_center: Vector3,
        nominal_diameter: f64,
        nominal_angle: Vector3,
        measured_center: Vector3,
        measured_diameter: f64,
        measured_angle: Vector3,
    },
}

impl FeatureData {
    pub fn feature_type(&self) -> FeatureType {
        match self {
            FeatureData::Point { .. } => FeatureType::Point,
            FeatureData::Line { .. } => FeatureType::Line,
            FeatureData::Circle { .. } => FeatureType::Circle,
        }
    }
}

/// One measured feature of a part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// Session identifier of the owning run.
    pub session_id: String,
    pub operator: String,
    pub location: Location,
    pub feature_id: String,
    pub feature_name: String,
    pub feature_type: FeatureType,
    pub order_index: usize,
    pub object_id: String,
    pub device_id: String,
    pub property_object_id: String,
    pub captured_at: DateTime<Utc>,
    pub indexed_at: DateTime<Utc>,
    pub enqueued_at: DateTime<Utc>,
    pub data: FeatureData,
}
