use thiserror::Error;

/// Errors raised by the matching engine
#[derive(Debug, Error, PartialEq)]
pub enum MatchError {
    #[error("Invalid input for {record}: {reason}")]
    InvalidInput { record: String, reason: String },

    #[error("Invalid matching configuration: {0}")]
    InvalidConfig(String),
}

impl MatchError {
    pub(crate) fn invalid_input(record: &str, reason: impl Into<String>) -> Self {
        MatchError::InvalidInput {
            record: record.to_string(),
            reason: reason.into(),
        }
    }
}
