//! Certificate expiry bot library
//!
//! Tracks TLS certificate expiry for hostnames on behalf of many users:
//! - Expiry resolution over a live, verified TLS handshake
//! - Classification of free-text commands
//! - Human-readable expiry sentences
//! - A per-user host registry with JSON persistence
//! - Concurrent per-user summaries ordered by expiry
//!
//! # Usage
//!
//! ```rust,ignore
//! use cert_expiry_bot::checks::{ExpiryChecker, ExpiryLookup};
//! use cert_expiry_bot::config::Settings;
//! use cert_expiry_bot::registry::HostRegistry;
//! use cert_expiry_bot::runner::Dispatcher;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let settings = Settings::default();
//!     let lookup: Arc<dyn ExpiryLookup> =
//!         Arc::new(ExpiryChecker::new(settings.resolver.clone()).unwrap());
//!     let dispatcher = Dispatcher::new(Arc::new(HostRegistry::new()), lookup, settings.messages);
//!     println!("{}", dispatcher.handle_text(1, "https://example.com/").await);
//! }
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod input;
pub mod models;
pub mod output;
pub mod registry;
pub mod runner;
pub mod transport;
pub mod utils;

// Re-export commonly used types
pub use cli::Cli;
pub use config::{Messages, Settings};
pub use input::classify;
pub use models::{Action, ErrorKind, ExpiryResult, UserId};
pub use runner::Dispatcher;
pub use utils::{BotError, Result};
