use metrogen_core::{FeatureData, FeatureType, Vector3};

use crate::errors::GenerationError;
use crate::provider::FieldProvider;

const POSITION_LIMIT: f64 = 1_000.0;
const POSITION_WINDOW: f64 = 1.0;
const DIRECTION_LIMIT: f64 = 1.0;
const DIRECTION_WINDOW: f64 = 0.1;
const DIAMETER_MIN: f64 = 1.0;
const DIAMETER_MAX: f64 = 200.0;
const DIAMETER_WINDOW: f64 = 1.0;
const PRECISION: u32 = 4;

/// Samples the geometry payload for `feature_type`.
///
/// Nominal fields are drawn first, then each measured field near its nominal:
/// within one unit for positions and diameters, within 0.1 for direction
/// components.
pub fn sample_feature_data(
    provider: &mut dyn FieldProvider,
    feature_type: FeatureType,
) -> FeatureData {
    match feature_type {
        FeatureType::Point => {
            let nominal = position(provider);
            let measured = near(provider, nominal, POSITION_WINDOW);
            FeatureData::Point { nominal, measured }
        }
        FeatureType::Line => {
            let nominal_start = position(provider);
            let nominal_end = position(provider);
            let nominal_normal = direction(provider);
            let measured_start = near(provider, nominal_start, POSITION_WINDOW);
            let measured_end = near(provider, nominal_end, POSITION_WINDOW);
            let measured_normal = near(provider, nominal_normal, DIRECTION_WINDOW);
            FeatureData::Line {
                nominal_start,
                nominal_end,
                nominal_normal,
                measured_start,
                measured_end,
                measured_normal,
            }
        }
        FeatureType::Circle => {
            let nominal_center = position(provider);
            let nominal_diameter = provider.next_float(DIAMETER_MIN, DIAMETER_MAX, PRECISION);
            let nominal_angle = direction(provider);
            let measured_center = near(provider, nominal_center, POSITION_WINDOW);
            let measured_diameter = provider.next_float(
                nominal_diameter - DIAMETER_WINDOW,
                nominal_diameter + DIAMETER_WINDOW,
                PRECISION,
            );
            let measured_angle = near(provider, nominal_angle, DIRECTION_WINDOW);
            FeatureData::Circle {
                nominal_center,
                nominal_diameter,
                nominal_angle,
                measured_center,
                measured_diameter,
                measured_angle,
            }
        }
    }
}

/// Parses `name` and samples its payload; unknown names fail before any
/// field is drawn.
pub fn sample_feature_data_by_name(
    provider: &mut dyn FieldProvider,
    name: &str,
) -> Result<FeatureData, GenerationError> {
    let feature_type = name.parse::<FeatureType>()?;
    Ok(sample_feature_data(provider, feature_type))
}

fn position(provider: &mut dyn FieldProvider) -> Vector3 {
    Vector3::new(
        provider.next_float(-POSITION_LIMIT, POSITION_LIMIT, PRECISION),
        provider.next_float(-POSITION_LIMIT, POSITION_LIMIT, PRECISION),
        provider.next_float(-POSITION_LIMIT, POSITION_LIMIT, PRECISION),
    )
}

fn direction(provider: &mut dyn FieldProvider) -> Vector3 {
    Vector3::new(
        provider.next_float(-DIRECTION_LIMIT, DIRECTION_LIMIT, PRECISION),
        provider.next_float(-DIRECTION_LIMIT, DIRECTION_LIMIT, PRECISION),
        provider.next_float(-DIRECTION_LIMIT, DIRECTION_LIMIT, PRECISION),
    )
}

fn near(provider: &mut dyn FieldProvider, nominal: Vector3, window: f64) -> Vector3 {
    Vector3::new(
        provider.next_float(nominal.x - window, nominal.x + window, PRECISION),
        provider.next_float(nominal.y - window, nominal.y + window, PRECISION),
        provider.next_float(nominal.z - window, nominal.z + window, PRECISION),
    )
}
