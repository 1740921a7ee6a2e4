//! Configuration module for the expiry bot
//!
//! Handles loading and managing configuration from TOML files.

pub mod messages;
pub mod settings;

pub use messages::Messages;
pub use settings::{ResolverSettings, Settings, StoreSettings};
