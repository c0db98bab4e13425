//! Client-side settings and session.
//!
//! Reads/writes `~/.hms/config.toml`.

use std::path::{Path, PathBuf};

use hms_core::{Principal, ServiceConfig, ServiceError};
use inventory::Catalog;
use serde::{Deserialize, Serialize};

/// Client configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Directory for the database (default: ~/.hms).
    #[serde(rename = "data-dir", default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Explicit database file, overriding `data-dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<PathBuf>,

    /// Set by `hms login`, cleared by `hms logout`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Principal>,

    /// Replaces the built-in department/item taxonomy when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Catalog>,
}

impl ClientConfig {
    /// Default config file path: ~/.hms/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Save config to disk.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Storage settings. A `data_dir` from the command line replaces both
    /// `data-dir` and `db` from the file.
    pub fn service_config(&self, data_dir: Option<PathBuf>) -> ServiceConfig {
        match data_dir {
            Some(dir) => ServiceConfig {
                data_dir: Some(dir),
                db_path: None,
            },
            None => ServiceConfig {
                data_dir: self.data_dir.clone().or_else(|| Some(dirs_path())),
                db_path: self.db.clone(),
            },
        }
    }

    /// The configured catalog, or the built-in one.
    pub fn catalog(&self) -> anyhow::Result<Catalog> {
        let catalog = self.catalog.clone().unwrap_or_default();
        catalog.check()?;
        Ok(catalog)
    }

    /// The logged-in principal.
    pub fn session(&self) -> Result<&Principal, ServiceError> {
        self.session.as_ref().ok_or_else(|| {
            ServiceError::Unauthorized(
                "not logged in; run `hms login --role <admin|incharge> --id <id> --name <name>`"
                    .into(),
            )
        })
    }
}

/// Return the hms config directory (~/.hms).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".hms")
}
