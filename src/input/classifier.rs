//! Command classification
//!
//! Every string maps to exactly one action. Anything that is not a known
//! command is treated as a hostname to check; garbage simply fails to resolve.

use crate::models::Action;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// `/d`, `/del`, `/delete`, `/r`, `/rem`, `/remove`, then any whitespace.
/// Longer spellings are tried first so `/delete x` never leaves `elete x`.
static DELETE_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(?:delete|del|d|remove|rem|r)\s*").expect("delete command pattern")
});

/// Classify a raw message into an action
pub fn classify(text: &str) -> Action {
    match text {
        "/start" => Action::Help,
        "/list" => Action::List,
        _ => match DELETE_COMMAND.find(text) {
            Some(command) => Action::Delete(sanitize(text[command.end()..].trim_end())),
            None => Action::Check(sanitize(text)),
        },
    }
}

/// Reduce URL-shaped input to its host (plus a non-default port); pass anything else through
pub fn sanitize(input: &str) -> String {
    if !input.starts_with("http") {
        return input.to_string();
    }

    match Url::parse(input) {
        Ok(url) => match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => input.to_string(),
        },
        Err(_) => input.to_string(),
    }
}
