//! Error types for Tideline

use serde::Serialize;
use thiserror::Error;

/// Library error types
#[derive(Error, Debug)]
pub enum TidelineError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("{path} not found in {origin}")]
    NotFound { path: String, origin: String },

    #[error("Patch does not apply: {0}")]
    Mismatch(String),

    #[error("Unexpected repository state: {0}")]
    Unexpected(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl TidelineError {
    /// Stable code reported to the UI layer
    pub fn code(&self) -> &'static str {
        match self {
            TidelineError::Git(_) => "GIT_ERROR",
            TidelineError::Io(_) => "IO_ERROR",
            TidelineError::Serialization(_) => "SERIALIZATION_ERROR",
            TidelineError::RepositoryNotFound(_) => "REPO_NOT_FOUND",
            TidelineError::ObjectNotFound(_) => "OBJECT_NOT_FOUND",
            TidelineError::NotFound { .. } => "NOT_FOUND",
            TidelineError::Mismatch(_) => "PATCH_MISMATCH",
            TidelineError::Unexpected(_) => "UNEXPECTED",
            TidelineError::OperationFailed(_) => "OPERATION_FAILED",
        }
    }

    /// Map a git2 lookup failure to `ObjectNotFound` when the engine says the
    /// object is missing or of the wrong type.
    pub(crate) fn from_lookup(error: git2::Error, id: impl Into<String>) -> Self {
        match error.code() {
            git2::ErrorCode::NotFound | git2::ErrorCode::Ambiguous | git2::ErrorCode::Invalid => {
                TidelineError::ObjectNotFound(id.into())
            }
            _ if error.class() == git2::ErrorClass::Object => {
                TidelineError::ObjectNotFound(id.into())
            }
            _ => TidelineError::Git(error),
        }
    }
}

/// Serializable error response for the UI boundary
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl From<&TidelineError> for ErrorResponse {
    fn from(error: &TidelineError) -> Self {
        let details = match error {
            TidelineError::Git(e) => Some(format!("{:?}/{:?}", e.class(), e.code())),
            TidelineError::NotFound { path, .. } => Some(path.clone()),
            _ => None,
        };

        ErrorResponse {
            code: error.code().to_string(),
            message: error.to_string(),
            details,
        }
    }
}

impl From<TidelineError> for ErrorResponse {
    fn from(error: TidelineError) -> Self {
        ErrorResponse::from(&error)
    }
}

impl serde::Serialize for TidelineError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ErrorResponse::from(self).serialize(serializer)
    }
}

/// Result type alias for Tideline operations
pub type Result<T> = std::result::Result<T, TidelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_serializes_with_code() {
        let error = TidelineError::Mismatch("hunk @@ -2 +2 @@".to_string());
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["code"], "PATCH_MISMATCH");
        assert_eq!(json["message"], "Patch does not apply: hunk @@ -2 +2 @@");
    }

    #[test]
    fn test_not_found_carries_path_in_details() {
        let error = TidelineError::NotFound {
            path: "src/main.rs".to_string(),
            origin: "index".to_string(),
        };
        let response = ErrorResponse::from(&error);
        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.details.as_deref(), Some("src/main.rs"));
        assert_eq!(response.message, "src/main.rs not found in index");
    }

    #[test]
    fn test_lookup_not_found_maps_to_object_not_found() {
        let git_error = git2::Error::new(
            git2::ErrorCode::NotFound,
            git2::ErrorClass::Odb,
            "object not found",
        );
        let error = TidelineError::from_lookup(git_error, "deadbeef");
        assert!(matches!(error, TidelineError::ObjectNotFound(id) if id == "deadbeef"));
    }

    #[test]
    fn test_lookup_other_failure_stays_git_error() {
        let git_error = git2::Error::new(
            git2::ErrorCode::Locked,
            git2::ErrorClass::Index,
            "index is locked",
        );
        let error = TidelineError::from_lookup(git_error, "deadbeef");
        assert!(matches!(error, TidelineError::Git(_)));
    }
}
