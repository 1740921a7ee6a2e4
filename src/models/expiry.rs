//! Expiry resolution result types

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Why a host's certificate expiry could not be resolved
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("connection timed out")]
    Timeout,

    #[error("no such host")]
    NoSuchHost,

    #[error("no route to host")]
    NoRoute,

    #[error("{0}")]
    Other(String),
}

impl ErrorKind {
    pub fn other(message: impl Into<String>) -> Self {
        ErrorKind::Other(message.into())
    }
}

/// Outcome of resolving one host: either the earliest certificate expiry or why it failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpiryResult {
    Expires(DateTime<Utc>),
    Failed(ErrorKind),
}

impl ExpiryResult {
    /// The resolved expiry timestamp, if resolution succeeded
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self {
            ExpiryResult::Expires(at) => Some(*at),
            ExpiryResult::Failed(_) => None,
        }
    }

    /// The failure, if resolution failed
    pub fn error(&self) -> Option<&ErrorKind> {
        match self {
            ExpiryResult::Expires(_) => None,
            ExpiryResult::Failed(kind) => Some(kind),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExpiryResult::Expires(_))
    }
}

impl From<Result<DateTime<Utc>, ErrorKind>> for ExpiryResult {
    fn from(result: Result<DateTime<Utc>, ErrorKind>) -> Self {
        match result {
            Ok(at) => ExpiryResult::Expires(at),
            Err(kind) => ExpiryResult::Failed(kind),
        }
    }
}

/// One formatted line of a summary, paired with the expiry it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryMessage {
    /// `None` when resolution failed; such lines sort after every dated line
    pub expires_at: Option<DateTime<Utc>>,
    pub text: String,
}
