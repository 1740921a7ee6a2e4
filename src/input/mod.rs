//! Inbound text handling
//!
//! Turns raw message text into an [`Action`](crate::models::Action).

pub mod classifier;

pub use classifier::{classify, sanitize};
