use chrono::{DateTime, Utc};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecallError>;

#[derive(Debug, Error)]
pub enum RecallError {
    #[error("no initial interval configured for {outcome} outcome")]
    MissingInitialInterval { outcome: &'static str },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("attempt at {at_time} precedes last review at {last_review}")]
    OrderingViolation {
        last_review: DateTime<Utc>,
        at_time: DateTime<Utc>,
    },
    #[error("numeric degenerate update: {0}")]
    NumericDegenerate(String),
    #[error("invalid recall model: {0}")]
    InvalidModel(String),
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("store error: {0}")]
    Store(String),
}
