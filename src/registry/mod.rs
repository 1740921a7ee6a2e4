//! Per-user host registry
//!
//! The registry is the only writable record of which hosts each user tracks.
//! Every user's list sits behind its own lock, so operations on different
//! users never contend and a snapshot of one user's list is always whole.

pub mod store;

pub use store::{HostRecord, RegistryStore};

use crate::models::UserId;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

type HostList = Arc<Mutex<Vec<String>>>;

/// In-memory mapping from user to an ordered, duplicate-free host list
#[derive(Debug, Default)]
pub struct HostRegistry {
    users: RwLock<BTreeMap<UserId, HostList>>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from persisted state, exactly as recorded
    pub fn from_record(record: HostRecord) -> Self {
        let users = record
            .hosts
            .into_iter()
            .map(|(user, hosts)| (user, Arc::new(Mutex::new(hosts))))
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    /// Append `host` unless the user already tracks it. Returns whether it was added.
    pub fn add(&self, user: UserId, host: &str) -> bool {
        let list = self.entry(user);
        let mut hosts = list.lock().unwrap_or_else(|e| e.into_inner());
        if hosts.iter().any(|h| h == host) {
            return false;
        }
        hosts.push(host.to_string());
        true
    }

    /// Drop every occurrence of `host` from the user's list. Returns how many were removed.
    pub fn remove(&self, user: UserId, host: &str) -> usize {
        let Some(list) = self.existing(user) else {
            return 0;
        };
        let mut hosts = list.lock().unwrap_or_else(|e| e.into_inner());
        let before = hosts.len();
        hosts.retain(|h| h != host);
        before - hosts.len()
    }

    /// Snapshot of the user's hosts in insertion order; empty for unknown users
    pub fn list_for(&self, user: UserId) -> Vec<String> {
        self.existing(user)
            .map(|list| list.lock().unwrap_or_else(|e| e.into_inner()).clone())
            .unwrap_or_default()
    }

    /// Every user with an entry, in ascending id order
    pub fn users(&self) -> Vec<UserId> {
        self.users
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .copied()
            .collect()
    }

    /// Snapshot of the whole registry in its persisted shape
    pub fn to_record(&self) -> HostRecord {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());
        let hosts = users
            .iter()
            .map(|(user, list)| {
                let hosts = list.lock().unwrap_or_else(|e| e.into_inner()).clone();
                (*user, hosts)
            })
            .collect();
        HostRecord { hosts }
    }

    fn existing(&self, user: UserId) -> Option<HostList> {
        self.users
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&user)
            .cloned()
    }

    fn entry(&self, user: UserId) -> HostList {
        if let Some(list) = self.existing(user) {
            return list;
        }
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        Arc::clone(users.entry(user).or_default())
    }
}
