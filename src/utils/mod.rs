//! Utility modules for the expiry bot
//!
//! This module contains error types and progress indicators.

pub mod error;
pub mod progress;

pub use error::{BotError, ConfigError, Result, StoreError, TransportError};
pub use progress::create_spinner;
