use thiserror::Error;

#[derive(Error, Debug)]
pub enum SalesAuditError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid revenue target {0}: must be a positive, finite number")]
    InvalidRevenueTarget(f64),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SalesAuditError>;
