//! Data models for the expiry bot
//!
//! This module contains the data structures passed between the classifier,
//! resolver, formatter and aggregator.

pub mod action;
pub mod expiry;

pub use action::Action;
pub use expiry::{ErrorKind, ExpiryResult, SummaryMessage};

/// Chat identifier of a user (signed, as messaging backends hand them out)
pub type UserId = i64;
