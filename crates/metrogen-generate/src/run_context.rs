use chrono::{DateTime, TimeDelta, Utc};
use metrogen_core::{RunContext, RunStatus, StatusEvent};
use tracing::debug;

use crate::provider::{FieldProvider, next_enum};

const EVENT_LEAD_MIN_SECS: i64 = 60;
const EVENT_LEAD_MAX_SECS: i64 = 3_600;
const SECONDS_PER_MEASUREMENT: i64 = 30;
const MACHINE_COUNT: i64 = 24;

/// Builds the run metadata shared by every measurement of a report.
///
/// The event window opens up to an hour before `now` and closes after it by
/// a span proportional to `report_size`. One status event per measurement is
/// placed inside the window; events are kept in timestamp order.
pub fn build_run_context(
    provider: &mut dyn FieldProvider,
    report_size: usize,
    now: DateTime<Utc>,
) -> RunContext {
    let lead = provider.next_int(EVENT_LEAD_MIN_SECS, EVENT_LEAD_MAX_SECS);
    let event_start = offset_seconds(now, -lead);
    let span = i64::try_from(report_size)
        .unwrap_or(i64::MAX)
        .saturating_add(1)
        .saturating_mul(SECONDS_PER_MEASUREMENT);
    let event_end = offset_seconds(now, span);

    let session_id = provider.next_identifier();
    let routine_id = provider.next_identifier();
    let software_version_id = provider.next_identifier();
    let software_build_id = format!(
        "{}.{}.{}",
        provider.next_int(1, 9),
        provider.next_int(0, 20),
        provider.next_int(0, 999)
    );
    let part_name = format!(
        "{}-{:04}",
        capitalize(&provider.next_word()),
        provider.next_int(0, 9_999)
    );
    let machine_name = format!("CMM-{:02}", provider.next_int(1, MACHINE_COUNT));
    let device_id = provider.next_identifier();
    let parent_object_id = provider.next_identifier();
    let timestamp = provider.next_date(event_start, event_end);

    let mut events = Vec::with_capacity(report_size);
    for _ in 0..report_size {
        let timestamp = provider.next_date(event_start, event_end);
        let status = next_enum(provider, &RunStatus::ALL).unwrap_or(RunStatus::Running);
        events.push(StatusEvent { timestamp, status });
    }
    events.sort_by_key(|event| event.timestamp);

    debug!(
        session_id = %session_id,
        report_size,
        event_start = %event_start,
        event_end = %event_end,
        "run context built"
    );

    RunContext {
        session_id,
        routine_id,
        software_version_id,
        software_build_id,
        part_name,
        machine_name,
        device_id,
        parent_object_id,
        event_start,
        event_end,
        timestamp,
        events,
        warnings: Vec::new(),
    }
}

pub(crate) fn offset_seconds(base: DateTime<Utc>, seconds: i64) -> DateTime<Utc> {
    TimeDelta::try_seconds(seconds)
        .and_then(|delta| base.checked_add_signed(delta))
        .unwrap_or(if seconds < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

pub(crate) fn offset_millis(base: DateTime<Utc>, millis: i64) -> DateTime<Utc> {
    TimeDelta::try_milliseconds(millis)
        .and_then(|delta| base.checked_add_signed(delta))
        .unwrap_or(if millis < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
