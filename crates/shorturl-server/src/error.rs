use shorturl_core::StorageError;
use thiserror::Error;
use tonic::{Code, Status};

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

impl From<ServiceError> for Status {
    fn from(error: ServiceError) -> Self {
        let message = error.to_string();
        let code = match error {
            ServiceError::Storage(StorageError::Conflict(_)) => Code::AlreadyExists,
            ServiceError::Storage(StorageError::NotFound(_)) => Code::NotFound,
            ServiceError::Storage(StorageError::Unavailable(_)) => Code::Unavailable,
            ServiceError::Storage(StorageError::Corrupt(_)) => Code::DataLoss,
            ServiceError::Storage(StorageError::Query(_)) => Code::Internal,
            ServiceError::InvalidTimestamp(_) => Code::Internal,
        };
        Status::new(code, message)
    }
}
