use signalscale_core::ValidationError;
use thiserror::Error;

/// The assembled result broke an output invariant. Never corrected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("result violates {} invariant(s): {}", .violations.len(), .violations.join("; "))]
pub struct InvariantError {
    pub violations: Vec<String>,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Invariant(#[from] InvariantError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_error_lists_violations() {
        let err = InvariantError {
            violations: vec!["a".to_owned(), "b".to_owned()],
        };
        assert_eq!(err.to_string(), "result violates 2 invariant(s): a; b");
    }

    #[test]
    fn validation_errors_convert() {
        let err: RunError = ValidationError::EmptyBrandName.into();
        assert!(matches!(err, RunError::Validation(_)));
    }
}
