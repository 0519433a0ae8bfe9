// models/src/errors.rs

pub use thiserror::Error;

use crate::identifiers::PatientId;

/// Everything the worklist engine and its collaborators can fail with.
///
/// `DuplicateId`, `NotFound`, `InvalidTransition` and `InvalidInput` are
/// domain errors: the board turns them into a dismissible notice and carries
/// on. `CollaboratorFailure` covers the network service (transport errors,
/// non-success statuses, malformed bodies) and always leaves the store as it
/// was before the request.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorklistError {
    #[error("patient {0} is already on the board")]
    DuplicateId(PatientId),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("collaborator failure: {0}")]
    CollaboratorFailure(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl WorklistError {
    /// Domain errors degrade to a no-op plus a notice; they never reach the
    /// collaborator and never end the session.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            WorklistError::DuplicateId(_)
                | WorklistError::NotFound(_)
                | WorklistError::InvalidTransition(_)
                | WorklistError::InvalidInput(_)
        )
    }

    pub fn collaborator(message: impl Into<String>) -> Self {
        WorklistError::CollaboratorFailure(message.into())
    }
}

impl From<serde_json::Error> for WorklistError {
    fn from(err: serde_json::Error) -> Self {
        WorklistError::CollaboratorFailure(format!("malformed JSON payload: {}", err))
    }
}

/// A collaborator payload that could not be normalized into a `Patient`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field was absent.
    #[error("required field '{0}' is missing")]
    MissingField(&'static str),
    /// Patient identifiers must be non-empty.
    #[error("patient identifier is empty")]
    EmptyIdentifier,
    /// The identifier was neither a string nor an integer.
    #[error("patient identifier has unsupported type: {0}")]
    InvalidIdentifierType(String),
    /// Priority scores must be finite numbers.
    #[error("priority score {0} is not a finite number")]
    NonFiniteScore(f64),
    /// The value could not be parsed as a timestamp.
    #[error("invalid date format: {0}")]
    InvalidDateFormat(String),
}

/// A type alias for a `Result` that returns a `WorklistError` on failure.
pub type WorklistResult<T> = Result<T, WorklistError>;

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_are_classified() {
        let id = PatientId::new("7".to_string()).unwrap();
        assert!(WorklistError::DuplicateId(id).is_domain());
        assert!(WorklistError::NotFound("x".into()).is_domain());
        assert!(WorklistError::InvalidTransition("x".into()).is_domain());
        assert!(WorklistError::InvalidInput("x".into()).is_domain());
        assert!(!WorklistError::collaborator("timeout").is_domain());
        assert!(!WorklistError::from(ValidationError::EmptyIdentifier).is_domain());
    }

    #[test]
    fn json_errors_become_collaborator_failures() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let converted: WorklistError = err.into();
        assert!(matches!(converted, WorklistError::CollaboratorFailure(_)));
    }
}
