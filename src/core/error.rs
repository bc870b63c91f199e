use thiserror::Error;

/// Errors produced by the matching engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Search cancelled before ranking completed")]
    Cancelled,
}

impl MatchError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        MatchError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Offending field for input errors
    pub fn field(&self) -> Option<&str> {
        match self {
            MatchError::InvalidInput { field, .. } => Some(field),
            MatchError::Cancelled => None,
        }
    }
}
