use thiserror::Error;

#[derive(Debug, Error)]
pub enum BimFinanceError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for BimFinanceError {
    fn from(e: serde_json::Error) -> Self {
        BimFinanceError::SerializationError(e.to_string())
    }
}
