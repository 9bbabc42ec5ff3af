use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot holds an invalid record '{id}': {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type RiskResult<T> = Result<T, RiskError>;
