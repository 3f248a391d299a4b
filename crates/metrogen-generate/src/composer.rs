use chrono::{DateTime, Utc};
use metrogen_core::{FeatureType, Measurement, RunContext};

use crate::provider::{FieldProvider, next_enum};
use crate::run_context::offset_millis;
use crate::samplers::{sample_feature_data, sample_location};

const CAPTURE_STEP_MS: i64 = 1_000;
const INDEX_DELAY_MIN_MS: i64 = 50;
const INDEX_DELAY_STEP_MS: i64 = 500;

/// Builds one measurement of `run`.
///
/// Timestamp windows are offset from `now` by `index`: measurement `i` is
/// captured somewhere in `[now + i s, now + (i + 1) s]`, then enqueued and
/// indexed after its capture. Successive windows only shift later, so capture
/// order across measurements is likely but not guaranteed.
pub fn compose_measurement(
    provider: &mut dyn FieldProvider,
    run: &RunContext,
    index: usize,
    feature_type: FeatureType,
    now: DateTime<Utc>,
) -> Measurement {
    let step = i64::try_from(index).unwrap_or(i64::MAX);
    let capture_from = offset_millis(now, step.saturating_mul(CAPTURE_STEP_MS));
    let capture_to = offset_millis(capture_from, CAPTURE_STEP_MS);
    let captured_at = provider.next_date(capture_from, capture_to);
    let indexed_at = provider.next_date(
        offset_millis(captured_at, INDEX_DELAY_MIN_MS),
        offset_millis(
            captured_at,
            step.saturating_add(1).saturating_mul(INDEX_DELAY_STEP_MS),
        ),
    );
    let enqueued_at = provider.next_date(captured_at, indexed_at);

    let operator = provider.next_full_name();
    let location = sample_location(provider);
    let feature_id = provider.next_identifier();
    let object_id = provider.next_identifier();
    let device_id = provider.next_identifier();
    let property_object_id = provider.next_identifier();
    let data = sample_feature_data(provider, feature_type);

    Measurement {
        session_id: run.session_id.clone(),
        operator,
        location,
        feature_id,
        feature_name: format!("{}{}", feature_type.as_str(), index + 1),
        feature_type,
        order_index: index,
        object_id,
        device_id,
        property_object_id,
        captured_at,
        indexed_at,
        enqueued_at,
        data,
    }
}

/// Composes `count` measurements with uniformly drawn feature types.
pub fn compose_batch(
    provider: &mut dyn FieldProvider,
    run: &RunContext,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<Measurement> {
    let mut measurements = Vec::with_capacity(count);
    for index in 0..count {
        let feature_type = next_enum(provider, &FeatureType::ALL).unwrap_or(FeatureType::Point);
        measurements.push(compose_measurement(provider, run, index, feature_type, now));
    }
    measurements
}
