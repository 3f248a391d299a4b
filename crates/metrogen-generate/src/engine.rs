use chrono::{DateTime, Utc};
use metrogen_core::{Assembly, Report, ReportPair};
use tracing::info;

use crate::aggregate::assemble_many;
use crate::assembler::{assemble_pair, assemble_single};
use crate::errors::GenerationError;
use crate::model::{GenerateOptions, MultipartReportConfig, PartReportConfig};
use crate::provider::{FieldProvider, SeededFieldProvider};

/// Entry point for generating reports with a fixed provider and anchor.
///
/// Successive calls keep drawing from the same provider, so a seeded
/// generator yields a reproducible sequence of documents.
pub struct ReportGenerator {
    provider: Box<dyn FieldProvider>,
    anchor: DateTime<Utc>,
}

impl ReportGenerator {
    pub fn new(options: GenerateOptions) -> Self {
        let provider = match options.seed {
            Some(seed) => SeededFieldProvider::new(seed),
            None => SeededFieldProvider::from_entropy(),
        };
        let anchor = options.anchor.unwrap_or_else(Utc::now);
        info!(seed = provider.seed(), anchor = %anchor, "report generator seeded");
        Self {
            provider: Box::new(provider),
            anchor,
        }
    }

    /// Draws from a caller-supplied provider instead of a seeded one.
    pub fn with_provider(provider: Box<dyn FieldProvider>, anchor: DateTime<Utc>) -> Self {
        Self { provider, anchor }
    }

    pub fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }

    pub fn part_report(&mut self, config: &PartReportConfig) -> Result<Report, GenerationError> {
        assemble_single(self.provider.as_mut(), config.report_size, self.anchor)
    }

    pub fn part_reports(
        &mut self,
        config: &PartReportConfig,
    ) -> Result<ReportPair, GenerationError> {
        assemble_pair(self.provider.as_mut(), config.report_size, self.anchor)
    }

    pub fn multipart_report(
        &mut self,
        config: &MultipartReportConfig,
    ) -> Result<Assembly, GenerationError> {
        assemble_many(self.provider.as_mut(), config, self.anchor)
    }
}

/// Single-part report drawn from entropy, anchored at the current time.
pub fn part_report(config: &PartReportConfig) -> Result<Report, GenerationError> {
    ReportGenerator::new(GenerateOptions::default()).part_report(config)
}

/// Near-duplicate report pair drawn from entropy.
pub fn part_reports(config: &PartReportConfig) -> Result<ReportPair, GenerationError> {
    ReportGenerator::new(GenerateOptions::default()).part_reports(config)
}

/// Multi-part assembly drawn from entropy.
pub fn multipart_report(config: &MultipartReportConfig) -> Result<Assembly, GenerationError> {
    ReportGenerator::new(GenerateOptions::default()).multipart_report(config)
}
