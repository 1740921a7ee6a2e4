//! Custom error types for the expiry bot
//!
//! Failures of the bot's own plumbing (configuration, persistence, transport)
//! live here as `thiserror` enums. Certificate resolution failures are not
//! errors in this sense: they are carried as [`crate::models::ErrorKind`]
//! values inside an `ExpiryResult` and always end up as a user-facing reply.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the bot
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Host store error: {0}")]
    Store(#[from] StoreError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Resolver setup failed: {message}")]
    ResolverSetup { message: String },

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Persistence errors for the host registry
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed host data in {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to encode host data: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors raised by a message transport
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to receive message: {0}")]
    Receive(std::io::Error),

    #[error("Failed to deliver message to {user}: {source}")]
    Send { user: i64, source: std::io::Error },
}

/// Result type alias using BotError
pub type Result<T> = std::result::Result<T, BotError>;
