use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;

/// Options shared by every generation entry point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Seed for the field provider; drawn from entropy when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Instant treated as "now"; the wall clock when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<DateTime<Utc>>,
}

impl GenerateOptions {
    /// Fills the seed from entropy and the anchor from the wall clock, so the
    /// resolved options can be recorded and replayed.
    pub fn resolve(&self) -> GenerateOptions {
        GenerateOptions {
            seed: Some(self.seed.unwrap_or_else(rand::random)),
            anchor: Some(self.anchor.unwrap_or_else(Utc::now)),
        }
    }
}

/// Size of a single-part report or pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartReportConfig {
    #[serde(alias = "reportSize")]
    pub report_size: usize,
}

impl PartReportConfig {
    pub fn new(report_size: usize) -> Self {
        Self { report_size }
    }
}

/// Shape of a multi-part assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipartReportConfig {
    #[serde(alias = "assemblySize")]
    pub assembly_size: usize,
    #[serde(alias = "minReportSize")]
    pub min_report_size: usize,
    #[serde(alias = "maxReportSize")]
    pub max_report_size: usize,
}

impl MultipartReportConfig {
    pub fn new(assembly_size: usize, min_report_size: usize, max_report_size: usize) -> Self {
        Self {
            assembly_size,
            min_report_size,
            max_report_size,
        }
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.max_report_size < self.min_report_size {
            return Err(GenerationError::InvalidConfig(format!(
                "max_report_size ({}) must be >= min_report_size ({})",
                self.max_report_size, self.min_report_size
            )));
        }
        Ok(())
    }
}
