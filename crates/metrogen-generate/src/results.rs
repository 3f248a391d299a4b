//! Pure projections from a run and its measurements to report sections.

use metrogen_core::{
    CurrentSample, DOCUMENT_VERSION, DimensionMeasurement, DimensionResult, FeatureResult,
    FlatFeatureMeasurement, LatestRun, Measurement, RunContext, RunStatus, SampleStatus,
    WarningEntry,
};

use crate::errors::GenerationError;

pub const WARNING_THRESHOLD_PERCENT: u8 = 60;
pub const CRITICAL_THRESHOLD_PERCENT: u8 = 90;

const MEASUREMENT_UNIT: &str = "mm";
const MEASUREMENT_STATUS: &str = "Measured";
// Placeholders; not derived from the event timeline.
const RUN_DURATION: &str = "PT5M";
const RUN_SCHEDULED_DURATION: &str = "PT10M";
const RUN_SCHEDULE: &str = "Unscheduled";

/// One warning per measurement whose location margin is positive.
pub fn warnings(measurements: &[Measurement]) -> Vec<WarningEntry> {
    measurements
        .iter()
        .filter(|measurement| measurement.location.is_out_of_tolerance())
        .map(|measurement| WarningEntry {
            feature_id: measurement.feature_id.clone(),
            warning_threshold: WARNING_THRESHOLD_PERCENT,
            critical_threshold: CRITICAL_THRESHOLD_PERCENT,
            deviation: measurement.location.deviation,
        })
        .collect()
}

/// Rolls `measurements` up into the report's current sample.
pub fn current_sample(
    run: &RunContext,
    measurements: &[Measurement],
) -> Result<CurrentSample, GenerationError> {
    let out_of_tolerance = measurements
        .iter()
        .filter(|measurement| measurement.location.is_out_of_tolerance())
        .count();
    let status = if out_of_tolerance > 0 {
        SampleStatus::Failed
    } else {
        SampleStatus::Succeeded
    };
    let latest_run = serde_json::to_string(&latest_run(run, measurements))?;

    Ok(CurrentSample {
        run_id: run.session_id.clone(),
        routine_id: run.routine_id.clone(),
        part_name: run.part_name.clone(),
        status,
        dimensions: measurements.len(),
        in_tolerance: measurements.len() - out_of_tolerance,
        out_of_tolerance,
        timestamp: run.timestamp,
        latest_run,
    })
}

/// Completion record of the run, echoing the last measurement's identifiers
/// along with the run's timeline and warning list.
pub fn latest_run(run: &RunContext, measurements: &[Measurement]) -> LatestRun {
    let last = measurements.last();
    LatestRun {
        version: DOCUMENT_VERSION.to_string(),
        run_id: run.session_id.clone(),
        routine_id: run.routine_id.clone(),
        software_version_id: run.software_version_id.clone(),
        software_build_id: run.software_build_id.clone(),
        part_name: run.part_name.clone(),
        machine_name: run.machine_name.clone(),
        device_id: run.device_id.clone(),
        parent_object_id: run.parent_object_id.clone(),
        event: RunStatus::PartProgramEnded,
        event_start: run.event_start,
        event_end: run.event_end,
        completed_at: run.event_end,
        measurement_count: measurements.len(),
        last_object_id: last.map(|measurement| measurement.object_id.clone()),
        last_feature_id: last.map(|measurement| measurement.feature_id.clone()),
        last_property_object_id: last.map(|measurement| measurement.property_object_id.clone()),
        events: run.events.clone(),
        warnings: run.warnings.clone(),
        duration: RUN_DURATION.to_string(),
        scheduled_duration: RUN_SCHEDULED_DURATION.to_string(),
        schedule: RUN_SCHEDULE.to_string(),
    }
}

/// Tolerance evaluation of one measurement.
pub fn dimension_result(run: &RunContext, measurement: &Measurement) -> DimensionResult {
    let location = &measurement.location;
    DimensionResult {
        feature_id: measurement.feature_id.clone(),
        feature_name: measurement.feature_name.clone(),
        location_name: location.name.clone(),
        nominal: location.nominal,
        measured: location.measured,
        tolerance: location.tolerance,
        deviation: location.deviation,
        o_tol: location.o_tol,
        out_of_tolerance: location.exceeds_tolerance(),
        deviation_percent: location.deviation_percent(),
        measurement: DimensionMeasurement {
            session_id: run.session_id.clone(),
            routine_id: run.routine_id.clone(),
            part_name: run.part_name.clone(),
            machine_name: run.machine_name.clone(),
            device_id: measurement.device_id.clone(),
            operator: measurement.operator.clone(),
            object_id: measurement.object_id.clone(),
            captured_at: measurement.captured_at,
            name: location.name.clone(),
            nominal: location.nominal,
            measured: location.measured,
            tolerance: location.tolerance,
            deviation: location.deviation,
            unit: MEASUREMENT_UNIT.to_string(),
            status: MEASUREMENT_STATUS.to_string(),
        },
    }
}

/// Geometry payload of one measurement, flattened and embedded as JSON text.
pub fn feature_result(
    run: &RunContext,
    measurement: &Measurement,
) -> Result<FeatureResult, GenerationError> {
    let flat = FlatFeatureMeasurement::from(&measurement.data);
    Ok(FeatureResult {
        feature_id: measurement.feature_id.clone(),
        feature_name: measurement.feature_name.clone(),
        feature_type: measurement.feature_type,
        run_id: run.session_id.clone(),
        routine_id: run.routine_id.clone(),
        object_id: measurement.object_id.clone(),
        order_index: measurement.order_index,
        captured_at: measurement.captured_at,
        measurement: serde_json::to_string(&flat)?,
    })
}
