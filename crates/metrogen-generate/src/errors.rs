use thiserror::Error;

/// Errors emitted while generating reports.
///
/// Every variant is fatal: generation aborts without a partial document.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("unsupported feature type: {0}")]
    UnsupportedFeatureType(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<metrogen_core::Error> for GenerationError {
    fn from(value: metrogen_core::Error) -> Self {
        match value {
            metrogen_core::Error::UnsupportedFeatureType(name) => {
                GenerationError::UnsupportedFeatureType(name)
            }
        }
    }
}
