use thiserror::Error;

/// Core error type shared across metrogen crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A feature type name outside Point, Line and Circle.
    #[error("unsupported feature type: {0}")]
    UnsupportedFeatureType(String),
}

/// Convenience alias for results returned by metrogen crates.
pub type Result<T> = std::result::Result<T, Error>;
