use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Status labels a machine reports while a part program runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum RunStatus {
    PartProgramStarted,
    Running,
    Waiting,
    IdleWaiting,
    PartProgramEnded,
}

impl RunStatus {
    /// Every status, in timeline order.
    pub const ALL: [RunStatus; 5] = [
        RunStatus::PartProgramStarted,
        RunStatus::Running,
        RunStatus::Waiting,
        RunStatus::IdleWaiting,
        RunStatus::PartProgramEnded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::PartProgramStarted => "PartProgramStarted",
            RunStatus::Running => "Running",
            RunStatus::Waiting => "Waiting",
            RunStatus::IdleWaiting => "IdleWaiting",
            RunStatus::PartProgramEnded => "PartProgramEnded",
        }
    }
}

/// One entry of the run's status timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub timestamp: DateTime<Utc>,
    pub status: RunStatus,
}

/// Warning raised for a measurement whose location is out of tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WarningEntry {
    pub feature_id: String,
    /// Percentage of tolerance at which a feature is flagged.
    pub warning_threshold: u8,
    /// Percentage of tolerance at which a feature is critical.
    pub critical_threshold: u8,
    pub deviation: f64,
}

/// Run-level metadata shared by every measurement of one report.
///
/// Built once per report. The warning list starts empty and is attached after
/// the measurements are composed; nothing mutates the context afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunContext {
    pub session_id: String,
    pub routine_id: String,
    pub software_version_id: String,
    pub software_build_id: String,
    pub part_name: String,
    pub machine_name: String,
    pub device_id: String,
    pub parent_object_id: String,
    pub event_start: DateTime<Utc>,
    pub event_end: DateTime<Utc>,
    /// Representative instant inside `[event_start, event_end]`.
    pub timestamp: DateTime<Utc>,
    pub events: Vec<StatusEvent>,
    #[serde(default)]
    pub warnings: Vec<WarningEntry>,
}
