use chrono::{DateTime, Utc};
use metrogen_core::{FeatureType, Report, ReportPair};
use tracing::info;

use crate::composer::{compose_batch, compose_measurement};
use crate::errors::GenerationError;
use crate::provider::FieldProvider;
use crate::results::{current_sample, dimension_result, feature_result, warnings};
use crate::run_context::build_run_context;

/// Assembles a single-part report: the first report of a freshly generated
/// pair.
pub fn assemble_single(
    provider: &mut dyn FieldProvider,
    report_size: usize,
    now: DateTime<Utc>,
) -> Result<Report, GenerationError> {
    assemble_pair(provider, report_size, now).map(|pair| pair.one)
}

/// Assembles two reports that share a run and every derived result list.
///
/// `two` differs only in its current sample, which also rolls up one extra
/// Circle measurement appended after the `report_size` regular ones.
pub fn assemble_pair(
    provider: &mut dyn FieldProvider,
    report_size: usize,
    now: DateTime<Utc>,
) -> Result<ReportPair, GenerationError> {
    let mut run = build_run_context(provider, report_size, now);
    let measurements = compose_batch(provider, &run, report_size, now);
    run.warnings = warnings(&measurements);

    let dimension_results: Vec<_> = measurements
        .iter()
        .map(|measurement| dimension_result(&run, measurement))
        .collect();
    let feature_results = measurements
        .iter()
        .map(|measurement| feature_result(&run, measurement))
        .collect::<Result<Vec<_>, _>>()?;

    let sample_one = current_sample(&run, &measurements)?;

    let mut extended = measurements;
    let appended = compose_measurement(provider, &run, extended.len(), FeatureType::Circle, now);
    extended.push(appended);
    let sample_two = current_sample(&run, &extended)?;

    info!(
        session_id = %run.session_id,
        report_size,
        warnings = run.warnings.len(),
        status = ?sample_one.status,
        "report pair assembled"
    );

    Ok(ReportPair {
        one: Report {
            current_sample: sample_one,
            dimension_results: dimension_results.clone(),
            feature_results: feature_results.clone(),
        },
        two: Report {
            current_sample: sample_two,
            dimension_results,
            feature_results,
        },
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use metrogen_core::{LatestRun, SampleStatus};

    use super::*;
    use crate::provider::SeededFieldProvider;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0)
            .single()
            .expect("valid anchor")
    }

    #[test]
    fn pair_differs_only_by_the_appended_rollup() {
        let mut provider = SeededFieldProvider::new(77);
        let pair = assemble_pair(&mut provider, 6, anchor()).expect("pair");

        assert_eq!(pair.one.current_sample.dimensions, 6);
        assert_eq!(pair.two.current_sample.dimensions, 7);
        assert_eq!(pair.one.dimension_results, pair.two.dimension_results);
        assert_eq!(pair.one.feature_results, pair.two.feature_results);
        assert_ne!(pair.one.current_sample, pair.two.current_sample);
        assert_eq!(pair.one.current_sample.run_id, pair.two.current_sample.run_id);

        let latest_two: LatestRun =
            serde_json::from_str(&pair.two.current_sample.latest_run).expect("latest run");
        assert_eq!(latest_two.measurement_count, 7);
        let ids: Vec<_> = pair
            .one
            .feature_results
            .iter()
            .map(|result| result.object_id.clone())
            .collect();
        assert!(!ids.contains(&latest_two.last_object_id.expect("last object")));
    }

    #[test]
    fn empty_pair_still_appends_one_measurement() {
        let mut provider = SeededFieldProvider::new(78);
        let pair = assemble_pair(&mut provider, 0, anchor()).expect("pair");

        assert_eq!(pair.one.current_sample.dimensions, 0);
        assert_eq!(pair.one.current_sample.status, SampleStatus::Succeeded);
        assert!(pair.one.dimension_results.is_empty());
        assert!(pair.one.feature_results.is_empty());
        assert_eq!(pair.two.current_sample.dimensions, 1);
        assert!(pair.two.dimension_results.is_empty());
    }

    #[test]
    fn single_report_is_the_first_half_of_a_pair() {
        let mut a = SeededFieldProvider::new(79);
        let mut b = SeededFieldProvider::new(79);
        let single = assemble_single(&mut a, 4, anchor()).expect("single");
        let pair = assemble_pair(&mut b, 4, anchor()).expect("pair");
        assert_eq!(single, pair.one);
    }
}
