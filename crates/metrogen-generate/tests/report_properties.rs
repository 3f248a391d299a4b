use chrono::{DateTime, TimeZone, Utc};
use metrogen_core::{FeatureType, FlatFeatureMeasurement, LatestRun, SampleStatus};
use metrogen_generate::{
    GenerateOptions, MultipartReportConfig, PartReportConfig, ReportGenerator,
    SeededFieldProvider, multipart_report, part_report, part_reports,
};
use serde_json::Value;

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0)
        .single()
        .expect("valid anchor")
}

fn seeded(seed: u64) -> ReportGenerator {
    ReportGenerator::new(GenerateOptions {
        seed: Some(seed),
        anchor: Some(anchor()),
    })
}

#[test]
fn part_report_dimensions_match_requested_size() {
    for size in 0..=12 {
        let report = seeded(size as u64)
            .part_report(&PartReportConfig::new(size))
            .expect("part report");
        assert_eq!(report.current_sample.dimensions, size);
        assert_eq!(report.dimension_results.len(), size);
        assert_eq!(report.feature_results.len(), size);
        assert_eq!(
            report.current_sample.in_tolerance + report.current_sample.out_of_tolerance,
            size
        );
    }
}

#[test]
fn empty_part_report_succeeds() {
    let report = part_report(&PartReportConfig::new(0)).expect("part report");
    assert_eq!(report.current_sample.dimensions, 0);
    assert!(report.dimension_results.is_empty());
    assert!(report.feature_results.is_empty());
    assert_eq!(report.current_sample.status, SampleStatus::Succeeded);
}

#[test]
fn pair_shares_results_and_adds_one_dimension() {
    for size in [0, 1, 5, 20] {
        let pair = seeded(100 + size as u64)
            .part_reports(&PartReportConfig::new(size))
            .expect("pair");
        assert_eq!(
            pair.two.current_sample.dimensions,
            pair.one.current_sample.dimensions + 1
        );
        assert_eq!(pair.one.dimension_results, pair.two.dimension_results);
        assert_eq!(pair.one.feature_results, pair.two.feature_results);
        assert_ne!(pair.one, pair.two);
        assert_ne!(
            pair.one.current_sample.latest_run,
            pair.two.current_sample.latest_run
        );
    }

    let pair = part_reports(&PartReportConfig::new(3)).expect("entropy pair");
    assert_eq!(pair.two.current_sample.dimensions, 4);
}

#[test]
fn status_fails_exactly_when_a_margin_is_positive() {
    for seed in 0..20 {
        let report = seeded(seed)
            .part_report(&PartReportConfig::new(8))
            .expect("part report");
        let positive_margins = report
            .dimension_results
            .iter()
            .filter(|result| result.o_tol > 0.0)
            .count();
        assert_eq!(report.current_sample.out_of_tolerance, positive_margins);
        let expected = if positive_margins > 0 {
            SampleStatus::Failed
        } else {
            SampleStatus::Succeeded
        };
        assert_eq!(report.current_sample.status, expected);

        for result in &report.dimension_results {
            assert!(result.o_tol >= 0.0);
            assert_eq!(
                result.o_tol,
                (result.deviation.abs() - result.tolerance.abs()).max(0.0)
            );
            assert_eq!(
                result.out_of_tolerance,
                result.deviation.abs() > result.tolerance
            );
        }
    }
}

#[test]
fn latest_run_lists_timeline_and_one_warning_per_positive_margin() {
    for size in [0, 1, 7, 20] {
        for seed in 0..5 {
            let report = seeded(1_000 + seed)
                .part_report(&PartReportConfig::new(size))
                .expect("part report");
            let latest: LatestRun =
                serde_json::from_str(&report.current_sample.latest_run).expect("latest run");

            let positive_margins: Vec<_> = report
                .dimension_results
                .iter()
                .filter(|result| result.o_tol > 0.0)
                .map(|result| result.feature_id.as_str())
                .collect();
            let warned: Vec<_> = latest
                .warnings
                .iter()
                .map(|warning| warning.feature_id.as_str())
                .collect();
            assert_eq!(warned, positive_margins);
            for warning in &latest.warnings {
                assert_eq!(warning.warning_threshold, 60);
                assert_eq!(warning.critical_threshold, 90);
            }

            assert_eq!(latest.events.len(), size);
            for event in &latest.events {
                assert!(event.timestamp >= latest.event_start);
                assert!(event.timestamp <= latest.event_end);
            }
            assert!(
                latest
                    .events
                    .windows(2)
                    .all(|pair| pair[0].timestamp <= pair[1].timestamp)
            );
        }
    }
}

#[test]
fn emitted_document_contains_timeline_labels() {
    let report = seeded(20)
        .part_report(&PartReportConfig::new(20))
        .expect("part report");
    let latest: Value =
        serde_json::from_str(&report.current_sample.latest_run).expect("latest run json");
    let events = latest["events"].as_array().expect("events array");
    assert_eq!(events.len(), 20);
    assert!(events.iter().all(|event| event["status"].is_string()));
    assert!(latest["warnings"].is_array());
}

#[test]
fn caller_supplied_provider_matches_seeded_options() {
    let config = PartReportConfig::new(6);
    let from_options = seeded(55).part_report(&config).expect("seeded report");
    let mut generator =
        ReportGenerator::with_provider(Box::new(SeededFieldProvider::new(55)), anchor());
    assert_eq!(generator.anchor(), anchor());
    let from_provider = generator.part_report(&config).expect("provided report");
    assert_eq!(from_options, from_provider);
}

#[test]
fn feature_payloads_carry_every_geometry_field() {
    let report = seeded(9)
        .part_report(&PartReportConfig::new(30))
        .expect("part report");
    for result in &report.feature_results {
        let payload: Value = serde_json::from_str(&result.measurement).expect("payload json");
        let object = payload.as_object().expect("payload object");
        assert_eq!(object.len(), 17);

        let flat: FlatFeatureMeasurement =
            serde_json::from_str(&result.measurement).expect("flat payload");
        let flags = [flat.is_point, flat.is_line, flat.is_circle];
        assert_eq!(flags.iter().filter(|flag| **flag).count(), 1);
        match result.feature_type {
            FeatureType::Point => assert!(flat.is_point && flat.nominal_diameter == 0.0),
            FeatureType::Line => assert!(flat.is_line && flat.measured_diameter == 0.0),
            FeatureType::Circle => assert!(flat.is_circle && flat.nominal_diameter > 0.0),
        }
    }
}

#[test]
fn seeded_generation_is_reproducible() {
    let config = PartReportConfig::new(10);
    let a = serde_json::to_string(&seeded(42).part_reports(&config).expect("pair a"))
        .expect("serialize a");
    let b = serde_json::to_string(&seeded(42).part_reports(&config).expect("pair b"))
        .expect("serialize b");
    let c = serde_json::to_string(&seeded(43).part_reports(&config).expect("pair c"))
        .expect("serialize c");
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn latest_run_placeholders_are_constant() {
    let mut generator = seeded(12);
    let first = generator
        .part_report(&PartReportConfig::new(2))
        .expect("first");
    let second = generator
        .part_report(&PartReportConfig::new(40))
        .expect("second");
    let first: LatestRun = serde_json::from_str(&first.current_sample.latest_run).expect("first");
    let second: LatestRun =
        serde_json::from_str(&second.current_sample.latest_run).expect("second");
    assert_eq!(first.duration, second.duration);
    assert_eq!(first.schedule, second.schedule);
    assert_ne!(first.run_id, second.run_id);
}

#[test]
fn assembly_has_requested_parts_within_size_range() {
    let config = MultipartReportConfig::new(8, 3, 6);
    let assembly = seeded(64).multipart_report(&config).expect("assembly");
    assert_eq!(assembly.len(), 8);
    for (key, report) in &assembly.part_reports {
        assert_eq!(key.len(), 8);
        assert!((3..=6).contains(&report.current_sample.dimensions));
    }
}

#[test]
fn single_part_assembly_with_fixed_size() {
    let config = MultipartReportConfig::new(1, 5, 5);
    let assembly = multipart_report(&config).expect("assembly");
    assert_eq!(assembly.len(), 1);
    let report = assembly.part_reports.values().next().expect("one part");
    assert_eq!(report.dimension_results.len(), 5);
}

#[test]
fn assembly_serializes_under_part_reports() {
    let config = MultipartReportConfig::new(2, 0, 1);
    let assembly = seeded(3).multipart_report(&config).expect("assembly");
    let value = serde_json::to_value(&assembly).expect("serialize");
    assert!(value["partReports"].is_object());
}
