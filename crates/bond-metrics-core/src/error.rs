use thiserror::Error;

#[derive(Debug, Error)]
pub enum BondMetricsError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for BondMetricsError {
    fn from(e: serde_json::Error) -> Self {
        BondMetricsError::SerializationError(e.to_string())
    }
}
