//! Durable storage for the configuration document

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::config::Configuration;
use crate::error::{LaunchpadError, Result};

/// File name of the persisted document inside the data directory
const CONFIG_FILE: &str = "config.json";

/// Owns the persisted configuration document.
///
/// All mutation goes through [`ConfigStore::replace`]; every other
/// component works on read-only copies handed out by [`ConfigStore::get`].
pub struct ConfigStore {
    config_path: PathBuf,
    write_lock: Mutex<()>,
}

impl ConfigStore {
    /// Open the store, creating the data directory and seeding the document
    /// on first run.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir).map_err(|e| {
            LaunchpadError::Storage(format!("Creating data directory {:?}: {}", data_dir, e))
        })?;
        set_permissions_sync(data_dir, 0o755)?;

        let config_path = data_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            let seed = serde_json::to_string_pretty(&Configuration::seed())?;
            std::fs::write(&config_path, seed).map_err(|e| {
                LaunchpadError::Storage(format!("Seeding {:?}: {}", config_path, e))
            })?;
            set_permissions_sync(&config_path, 0o644)?;
            tracing::info!("Seeded default configuration at {:?}", config_path);
        }

        Ok(Self {
            config_path,
            write_lock: Mutex::new(()),
        })
    }

    /// Read the current document.
    ///
    /// A corrupt document degrades to an empty application list so the
    /// settings view stays reachable; an unreadable one is a storage error.
    pub async fn get(&self) -> Result<Configuration> {
        let content = tokio::fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| {
                LaunchpadError::Storage(format!("Reading {:?}: {}", self.config_path, e))
            })?;

        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(
                    "Corrupt configuration document {:?}: {}",
                    self.config_path,
                    e
                );
                Ok(Configuration::default())
            }
        }
    }

    /// Validate and persist a whole replacement document.
    ///
    /// The write goes through a temporary file and a rename, so a concurrent
    /// read observes either the old or the new document, never a mix. The
    /// document is read back and compared before the call reports success.
    pub async fn replace(&self, candidate: &Configuration) -> Result<()> {
        let errors = candidate.validate();
        if !errors.is_empty() {
            return Err(LaunchpadError::Validation(errors));
        }

        let _guard = self.write_lock.lock().await;

        let serialized = serde_json::to_string_pretty(candidate)?;
        let tmp_path = self.config_path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &serialized)
            .await
            .map_err(|e| LaunchpadError::Storage(format!("Writing {:?}: {}", tmp_path, e)))?;
        set_permissions(&tmp_path, 0o644).await?;
        tokio::fs::rename(&tmp_path, &self.config_path)
            .await
            .map_err(|e| {
                LaunchpadError::Storage(format!("Replacing {:?}: {}", self.config_path, e))
            })?;

        let written = self.get().await?;
        if written != *candidate {
            return Err(LaunchpadError::Storage(
                "Configuration verification failed".to_string(),
            ));
        }

        tracing::debug!("Persisted configuration ({} apps)", candidate.apps.len());
        Ok(())
    }

    /// Path of the persisted document
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

#[cfg(unix)]
fn set_permissions_sync(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .map_err(|e| LaunchpadError::Storage(format!("Setting permissions on {:?}: {}", path, e)))
}

#[cfg(not(unix))]
fn set_permissions_sync(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

#[cfg(unix)]
async fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .await
        .map_err(|e| LaunchpadError::Storage(format!("Setting permissions on {:?}: {}", path, e)))
}

#[cfg(not(unix))]
async fn set_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
