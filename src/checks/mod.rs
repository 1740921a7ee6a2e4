//! Check modules for the expiry bot
//!
//! This module contains the live TLS expiry resolver.

pub mod expiry;
pub mod target;

pub use expiry::{earliest_expiry, ExpiryChecker, ExpiryLookup};
pub use target::Target;
