//! Request orchestration engine
//!
//! Routes classified actions to the registry, the resolver and the formatter,
//! and fans a user's host list out into concurrent checks whose results are
//! merged into one ordered summary. Any frontend (stdio loop, batch summary,
//! chat backend) drives the bot through [`Dispatcher`].

use crate::checks::ExpiryLookup;
use crate::config::Messages;
use crate::input::classify;
use crate::models::{Action, ErrorKind, ExpiryResult, SummaryMessage, UserId};
use crate::output::message::format_result;
use crate::registry::{HostRegistry, RegistryStore};
use futures::future::join_all;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Check every host concurrently and merge the replies.
///
/// Lines with an expiry come first, earliest expiry first; lines whose check
/// failed follow in list order. Waits for every host; each host is bounded by
/// the resolver's own deadline.
pub async fn summarize_hosts(
    hosts: &[String],
    lookup: &Arc<dyn ExpiryLookup>,
    nothing_to_show: &str,
) -> String {
    if hosts.is_empty() {
        return nothing_to_show.to_string();
    }

    let handles: Vec<_> = hosts
        .iter()
        .cloned()
        .map(|host| {
            let lookup = Arc::clone(lookup);
            tokio::spawn(async move {
                let result = lookup.resolve(&host).await;
                SummaryMessage {
                    expires_at: result.expires_at(),
                    text: format_result(&host, &result),
                }
            })
        })
        .collect();

    // One slot per host, in list order, whatever order the tasks finish in
    let messages: Vec<SummaryMessage> = join_all(handles)
        .await
        .into_iter()
        .zip(hosts)
        .map(|(joined, host)| {
            joined.unwrap_or_else(|e| {
                tracing::error!("Check task for {} died: {}", host, e);
                let result = ExpiryResult::Failed(ErrorKind::other(e.to_string()));
                SummaryMessage {
                    expires_at: None,
                    text: format_result(host, &result),
                }
            })
        })
        .collect();

    order_messages(messages).join("\n")
}

/// Dated lines by ascending expiry (stable), then undated lines in their given order
pub fn order_messages(messages: Vec<SummaryMessage>) -> Vec<String> {
    let (mut dated, undated): (Vec<_>, Vec<_>) =
        messages.into_iter().partition(|m| m.expires_at.is_some());
    dated.sort_by_key(|m| m.expires_at);
    dated.into_iter().chain(undated).map(|m| m.text).collect()
}

/// Summarize one user's current list
pub async fn summarize(
    registry: &HostRegistry,
    user: UserId,
    lookup: &Arc<dyn ExpiryLookup>,
    messages: &Messages,
) -> String {
    let hosts = registry.list_for(user);
    summarize_hosts(&hosts, lookup, &messages.nothing_to_show).await
}

/// Summarize every user in the registry
pub async fn summarize_all(
    registry: &HostRegistry,
    lookup: &Arc<dyn ExpiryLookup>,
    messages: &Messages,
) -> BTreeMap<UserId, String> {
    let users = registry.users();
    let summaries = join_all(
        users
            .iter()
            .map(|user| summarize(registry, *user, lookup, messages)),
    )
    .await;
    users.into_iter().zip(summaries).collect()
}

/// One async lock per user, created on first use
#[derive(Default)]
struct UserLocks {
    locks: Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>,
}

impl UserLocks {
    async fn acquire(&self, user: UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(locks.entry(user).or_default())
        };
        lock.lock_owned().await
    }
}

/// Turns actions into replies, mutating and persisting the registry as needed
pub struct Dispatcher {
    registry: Arc<HostRegistry>,
    store: Option<Arc<RegistryStore>>,
    lookup: Arc<dyn ExpiryLookup>,
    messages: Messages,
    user_locks: UserLocks,
}

impl Dispatcher {
    /// Create a dispatcher over an in-memory registry
    pub fn new(
        registry: Arc<HostRegistry>,
        lookup: Arc<dyn ExpiryLookup>,
        messages: Messages,
    ) -> Self {
        Self {
            registry,
            store: None,
            lookup,
            messages,
            user_locks: UserLocks::default(),
        }
    }

    /// Persist the registry to `store` after every change
    pub fn with_store(mut self, store: Arc<RegistryStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn registry(&self) -> &HostRegistry {
        &self.registry
    }

    /// Classify raw message text and dispatch it
    pub async fn handle_text(&self, user: UserId, text: &str) -> String {
        tracing::info!("[{}] {}", user, text);
        self.dispatch(user, classify(text)).await
    }

    /// Carry out an action for a user and return the reply text
    pub async fn dispatch(&self, user: UserId, action: Action) -> String {
        match action {
            Action::Help => self.messages.help.clone(),
            Action::List => self.summarize(user).await,
            Action::Delete(host) => {
                let _guard = self.user_locks.acquire(user).await;
                if self.registry.remove(user, &host) > 0 {
                    self.persist().await;
                }
                self.summarize_unlocked(user).await
            }
            Action::Check(host) => {
                // The network round trip never holds the user's lock
                let result = self.lookup.resolve(&host).await;
                let reply = format_result(&host, &result);
                if result.is_success() {
                    let _guard = self.user_locks.acquire(user).await;
                    if self.registry.add(user, &host) {
                        self.persist().await;
                    }
                }
                reply
            }
        }
    }

    /// Summarize one user's current list, serialized with that user's mutations
    pub async fn summarize(&self, user: UserId) -> String {
        let _guard = self.user_locks.acquire(user).await;
        self.summarize_unlocked(user).await
    }

    /// Summarize every tracked user, each under its own lock
    pub async fn summarize_all(&self) -> BTreeMap<UserId, String> {
        let users = self.registry.users();
        let summaries = join_all(users.iter().map(|user| self.summarize(*user))).await;
        users.into_iter().zip(summaries).collect()
    }

    async fn summarize_unlocked(&self, user: UserId) -> String {
        summarize(&self.registry, user, &self.lookup, &self.messages).await
    }

    async fn persist(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.registry).await {
                tracing::error!("Failed to persist hosts: {}", e);
            }
        }
    }
}
