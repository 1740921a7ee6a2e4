//! Classified user commands

/// What an inbound message asks the bot to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show the greeting/usage text
    Help,
    /// Summarize every tracked host
    List,
    /// Stop tracking a host
    Delete(String),
    /// Look up a host's expiry and start tracking it
    Check(String),
}
