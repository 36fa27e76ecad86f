use likes_core::ServiceError;
use thiserror::Error;

use crate::record::RecordId;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("record {0} not found")]
    NotFound(RecordId),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("unknown status: {0}")]
    UnknownStatus(String),
}

impl From<ContentError> for ServiceError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::NotFound(_) => ServiceError::NotFound(err.to_string()),
            ContentError::Storage(_) => ServiceError::Storage(err.to_string()),
            ContentError::Serialization(_) => ServiceError::Internal(err.to_string()),
            ContentError::UnknownStatus(_) => ServiceError::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_service_errors() {
        let err: ServiceError = ContentError::NotFound(7).into();
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "record 7 not found");

        let err: ServiceError = ContentError::UnknownStatus("pending".into()).into();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        assert_eq!(err.to_string(), "unknown status: pending");
    }
}
