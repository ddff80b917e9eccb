use thiserror::Error;

#[derive(Debug, Error)]
pub enum EduLoanError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Preferences error: {0}")]
    Preferences(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl EduLoanError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        EduLoanError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for EduLoanError {
    fn from(e: serde_json::Error) -> Self {
        EduLoanError::SerializationError(e.to_string())
    }
}
