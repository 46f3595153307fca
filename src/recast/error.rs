use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecastError {
    /// The source is neither array-like, a cursor, nor able to produce one,
    /// or a column was asked to read a scalar record.
    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    /// The extractor or record cannot perform the requested write.
    #[error("Missing capability: {0}")]
    MissingCapability(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A derived property could not be computed from an empty source.
    #[error("Underflow: {0}")]
    Underflow(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RecastError>;
