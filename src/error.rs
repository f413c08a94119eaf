use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconciliationError {
    #[error("Retrieval failed for dataset {dataset}: {details}")]
    Retrieval { dataset: String, details: String },

    #[error("Invalid due date '{0}': expected YYYY-MM-DD")]
    InvalidDueDate(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReconciliationError>;
