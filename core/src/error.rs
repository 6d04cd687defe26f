use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("Missing field '{field}'")]
    MissingField { field: String },

    #[error("Unknown resource type: {resource}")]
    UnknownResource { resource: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
