use chrono::{DateTime, Utc};
use metrogen_core::Assembly;
use tracing::{debug, info};

use crate::assembler::assemble_single;
use crate::errors::GenerationError;
use crate::model::MultipartReportConfig;
use crate::provider::FieldProvider;

/// Generates `assembly_size` reports keyed by registration-style strings.
///
/// Each part's size is drawn independently from the inclusive size range.
/// Keys are drawn independently too; a repeated key replaces the earlier
/// part, so the assembly may hold fewer entries than requested.
pub fn assemble_many(
    provider: &mut dyn FieldProvider,
    config: &MultipartReportConfig,
    now: DateTime<Utc>,
) -> Result<Assembly, GenerationError> {
    config.validate()?;
    let min = i64::try_from(config.min_report_size)
        .map_err(|_| GenerationError::InvalidConfig("min_report_size too large".to_string()))?;
    let max = i64::try_from(config.max_report_size)
        .map_err(|_| GenerationError::InvalidConfig("max_report_size too large".to_string()))?;

    let mut assembly = Assembly::default();
    for part in 0..config.assembly_size {
        let report_size = usize::try_from(provider.next_int(min, max))
            .map_err(|_| GenerationError::InvalidConfig("negative report size".to_string()))?;
        let key = provider.next_registration();
        let report = assemble_single(provider, report_size, now)?;
        if assembly.part_reports.insert(key.clone(), report).is_some() {
            debug!(part, key = %key, "assembly key repeated; earlier part replaced");
        }
    }

    info!(
        requested = config.assembly_size,
        parts = assembly.len(),
        min_report_size = config.min_report_size,
        max_report_size = config.max_report_size,
        "assembly generated"
    );

    Ok(assembly)
}
