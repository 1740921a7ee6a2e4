//! JSON persistence for the host registry
//!
//! The on-disk record is `{"hosts": {"<user id>": ["host", ...]}}`.

use super::HostRegistry;
use crate::models::UserId;
use crate::utils::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Persisted shape of the registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    #[serde(default)]
    pub hosts: BTreeMap<UserId, Vec<String>>,
}

/// File-backed store for [`HostRecord`]s
pub struct RegistryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record; a missing file is an empty registry
    pub fn load(&self) -> Result<HostRecord, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No host data at {}, starting empty", self.path.display());
                return Ok(HostRecord::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Load the record straight into a registry
    pub fn load_registry(&self) -> Result<HostRegistry, StoreError> {
        self.load().map(HostRegistry::from_record)
    }

    /// Write the registry's current state.
    ///
    /// The snapshot is taken under the write lock, so concurrent saves land in
    /// the order their snapshots were taken and the newest state always wins.
    pub async fn save(&self, registry: &HostRegistry) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let record = registry.to_record();
        let json = serde_json::to_string_pretty(&record)?;

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|source| StoreError::Write {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(
            "Saved {} users to {}",
            record.hosts.len(),
            self.path.display()
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}
