use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use metrogen_core::byte_size;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::settings::Settings;

use super::RegistryResult;

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub command: &'static str,
    pub seed: u64,
    pub anchor: DateTime<Utc>,
    pub settings: Settings,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig {
    pub run_id: String,
    pub started_at: String,
    pub command: String,
    pub seed: u64,
    pub anchor: String,
    pub settings: Settings,
    pub git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub logs_path: PathBuf,
    pub summary_path: PathBuf,
}

/// Size and content digest of one written document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub name: String,
    pub path: PathBuf,
    pub byte_size: usize,
    pub sha256: String,
}

/// `generation_report.json` contents.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub run_id: String,
    pub command: String,
    pub seed: u64,
    pub anchor: String,
    pub duration_ms: u64,
    pub documents: Vec<DocumentSummary>,
    /// Shared leading bytes of the two serialized pair reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_prefix_bytes: Option<usize>,
}

pub fn start_run(record: &RunRecord) -> RegistryResult<RunPaths> {
    let timestamp = record.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let root = record
        .settings
        .run_dir
        .join(format!("{timestamp}__run_{}", record.run_id));

    create_dir_all(&root)?;

    let config_path = root.join("config.json");
    let logs_path = root.join("logs.ndjson");
    let summary_path = root.join("generation_report.json");

    let config = RunConfig {
        run_id: record.run_id.clone(),
        started_at: record.started_at.to_rfc3339(),
        command: record.command.to_string(),
        seed: record.seed,
        anchor: record.anchor.to_rfc3339(),
        settings: record.settings.clone(),
        git: collect_git_info(),
    };

    write_json(&config_path, &config)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logs_path)?;

    Ok(RunPaths {
        root,
        logs_path,
        summary_path,
    })
}

/// Serializes `value` into `<run>/<name>` and, when given, to `extra_path`.
///
/// Returns the serialized text alongside its summary so callers can compare
/// documents byte for byte.
pub fn write_document<T: Serialize>(
    paths: &RunPaths,
    name: &str,
    value: &T,
    pretty: bool,
    extra_path: Option<&Path>,
) -> RegistryResult<(String, DocumentSummary)> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    let path = paths.root.join(name);
    std::fs::write(&path, text.as_bytes())?;

    if let Some(extra_path) = extra_path {
        if let Some(parent) = extra_path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        std::fs::write(extra_path, text.as_bytes())?;
    }

    let summary = DocumentSummary {
        name: name.to_string(),
        path,
        byte_size: byte_size(&text),
        sha256: hex::encode(Sha256::digest(text.as_bytes())),
    };
    Ok((text, summary))
}

pub fn write_generation_summary(
    paths: &RunPaths,
    summary: &GenerationSummary,
) -> RegistryResult<()> {
    write_json(&paths.summary_path, summary)
}

/// Length of the longest shared byte prefix of `a` and `b`.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.bytes()
        .zip(b.bytes())
        .take_while(|(left, right)| left == right)
        .count()
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}
