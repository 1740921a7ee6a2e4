//! Message templates for user-facing text
//!
//! Fixed replies that operators may want to reword live here. Per-host expiry
//! sentences are built by [`crate::output::message`] and are not configurable.

use serde::Deserialize;

const DEFAULT_HELP: &str = "Give me website hostname and I'll tell you the expiry date of the certificates.

If I don't reply you within 5 seconds, that means I'm offline.";

const DEFAULT_NOTHING_TO_SHOW: &str = "Nothing to show.";

/// Replies that do not depend on a resolution result
#[derive(Debug, Clone, Deserialize)]
pub struct Messages {
    /// Reply to `/start`
    #[serde(default = "default_help")]
    pub help: String,
    /// Summary of an empty host list
    #[serde(default = "default_nothing_to_show")]
    pub nothing_to_show: String,
}

fn default_help() -> String {
    DEFAULT_HELP.to_string()
}

fn default_nothing_to_show() -> String {
    DEFAULT_NOTHING_TO_SHOW.to_string()
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            help: default_help(),
            nothing_to_show: default_nothing_to_show(),
        }
    }
}
