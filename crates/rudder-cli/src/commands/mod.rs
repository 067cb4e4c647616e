//! CLI commands

use rudder_repo::{RepoController, RepositoryConfig};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CliError, Result};

pub mod cache;
pub mod list;
pub mod repo;
pub mod search;
pub mod show;

/// Global options shared by every command
pub struct Settings {
    pub config: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub cache_lifetime: Option<Duration>,
}

impl Settings {
    /// Path of the configuration file in effect
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Ok(RepositoryConfig::default_path()?),
        }
    }

    /// Load the configuration and apply command-line overrides
    ///
    /// An explicitly requested file must exist; the default location may be
    /// absent, which yields an empty configuration.
    pub fn load_config(&self) -> Result<RepositoryConfig> {
        let mut config = match &self.config {
            Some(path) if !path.exists() => {
                return Err(CliError::Input {
                    message: format!("Config file not found: {}", path.display()),
                    help: Some("Pass an existing file with --config or RUDDER_CONFIG".to_string()),
                });
            }
            Some(path) => RepositoryConfig::load_from(path)?,
            None => RepositoryConfig::load()?,
        };

        if let Some(dir) = &self.cache_dir {
            config.cache.dir = Some(dir.clone());
        }
        if let Some(lifetime) = self.cache_lifetime {
            config.cache.lifetime = lifetime;
        }

        tracing::debug!(
            "Loaded {} repositories, cache lifetime {:?}",
            config.repositories.len(),
            config.cache.lifetime
        );

        Ok(config)
    }

    /// Build a controller from the effective configuration
    pub fn controller(&self) -> Result<RepoController> {
        Ok(RepoController::new(self.load_config()?)?)
    }
}
