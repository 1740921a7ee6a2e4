//! Output formatting module
//!
//! Provides:
//! - Expiry sentences sent back to users
//! - JSON export

pub mod json;
pub mod message;

pub use json::print_json;
pub use message::{days_remaining, format_result, format_result_at};
