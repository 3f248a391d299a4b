//! Synthetic metrology report generation for metrogen.
//!
//! Samples measurement records through an injectable [`FieldProvider`] and
//! assembles them into single-part reports, near-duplicate report pairs and
//! keyed multi-part assemblies.

pub mod aggregate;
pub mod assembler;
pub mod composer;
pub mod engine;
pub mod errors;
pub mod model;
pub mod provider;
pub mod results;
pub mod run_context;
pub mod samplers;

pub use engine::{ReportGenerator, multipart_report, part_report, part_reports};
pub use errors::GenerationError;
pub use metrogen_core::byte_size;
pub use model::{GenerateOptions, MultipartReportConfig, PartReportConfig};
pub use provider::{FieldProvider, SeededFieldProvider};
