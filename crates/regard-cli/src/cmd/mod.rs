//! `rgd` command handlers.

pub mod analyze;
pub mod confirm;
pub mod list;
pub mod post;
pub mod show;

use anyhow::{Context, Result};
use regard_core::config::ProjectConfig;
use regard_core::lock::StoreLock;
use regard_core::store::Store;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long a command waits for another `rgd` process to release the store.
const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Exclusive handle for store read-modify-write.
///
/// The lock lives next to the store file and is held for the lifetime of the
/// handle; commands load, mutate, save, then drop.
pub struct StoreHandle {
    pub store: Store,
    path: PathBuf,
    _lock: StoreLock,
}

impl StoreHandle {
    pub fn open(config: &ProjectConfig, project_root: &Path) -> Result<Self> {
        let path = config.store_path(project_root);
        let lock_path = path.with_extension("lock");
        let lock = StoreLock::acquire(&lock_path, LOCK_TIMEOUT)
            .with_context(|| format!("Could not lock store {}", path.display()))?;
        let store = Store::load(&path)?;
        Ok(Self {
            store,
            path,
            _lock: lock,
        })
    }

    pub fn save(&self) -> Result<()> {
        self.store.save(&self.path)?;
        Ok(())
    }
}

/// Read-only store load; list/show don't need the writer lock.
pub fn load_store(config: &ProjectConfig, project_root: &Path) -> Result<Store> {
    Ok(Store::load(&config.store_path(project_root))?)
}
