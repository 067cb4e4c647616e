//! Resolver configuration
//!
//! Stored as YAML in `~/.config/rudder/config.yaml`:
//!
//! ```yaml
//! apiVersion: rudder.io/v1
//! repositories:
//!   - name: stable
//!     url: https://charts.example.com/stable
//! cache:
//!   dir: /var/cache/rudder
//!   lifetime: 10m
//!   fetchTimeout: 30s
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::{RepoError, Result};

/// Well-known file name of a repository index
pub const INDEX_FILE: &str = "index.yaml";

/// Top-level configuration: the known repositories and cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConfig {
    /// API version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Configured repositories, in lookup order
    #[serde(default)]
    pub repositories: Vec<Repository>,

    /// Disk cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

fn default_api_version() -> String {
    "rudder.io/v1".to_string()
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            repositories: Vec::new(),
            cache: CacheConfig::default(),
        }
    }
}

impl RepositoryConfig {
    /// Build a configuration from a repository list with default cache settings
    pub fn with_repositories(repositories: Vec<Repository>) -> Self {
        Self {
            repositories,
            ..Self::default()
        }
    }

    /// Load configuration from default location
    ///
    /// A missing file yields the default (empty) configuration.
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| RepoError::InvalidConfig {
            message: format!("{}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Get default configuration path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| RepoError::InvalidConfig {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("rudder").join("config.yaml"))
    }

    /// Check repository names, URLs and cache settings
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for repo in &self.repositories {
            if repo.name.trim().is_empty() {
                return Err(RepoError::InvalidConfig {
                    message: format!("Repository with URL {} has an empty name", repo.url),
                });
            }
            if !seen.insert(repo.name.as_str()) {
                return Err(RepoError::InvalidConfig {
                    message: format!("Duplicate repository name: {}", repo.name),
                });
            }
            repo.validate()?;
        }

        if self.cache.lifetime.is_zero() {
            return Err(RepoError::InvalidConfig {
                message: "cache.lifetime must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Get a repository by name
    pub fn get(&self, name: &str) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.name == name)
    }

    /// Cache directory, falling back to the platform cache location
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.cache.dir {
            Some(dir) => Ok(dir.clone()),
            None => CacheConfig::default_dir(),
        }
    }
}

/// A named remote chart repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Unique name for this repository
    pub name: String,

    /// Base URL of the repository
    pub url: String,
}

impl Repository {
    /// Create a new repository entry, validating the URL
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Result<Self> {
        let repo = Self {
            name: name.into(),
            url: url.into(),
        };
        repo.validate()?;
        Ok(repo)
    }

    fn validate(&self) -> Result<()> {
        let parsed = Url::parse(&self.url).map_err(|e| RepoError::InvalidRepositoryUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(RepoError::InvalidRepositoryUrl {
                url: self.url.clone(),
                reason: format!("unsupported scheme '{}', expected http or https", other),
            }),
        }
    }

    /// URL of the repository index
    pub fn index_url(&self) -> Result<String> {
        self.resolve_url(INDEX_FILE)
    }

    /// Resolve a chart download URL listed in the index
    ///
    /// Absolute URLs are returned unchanged. Relative ones follow standard
    /// reference resolution against the repository URL taken as a directory,
    /// so `/x.tgz` resolves against the host root.
    pub fn resolve_url(&self, url: &str) -> Result<String> {
        let invalid = |e: url::ParseError| RepoError::InvalidRepositoryUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        };

        let mut base = Url::parse(&self.url).map_err(invalid)?;
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }

        Ok(base.join(url).map_err(invalid)?.to_string())
    }
}

/// Disk cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    /// Cache directory (default: platform cache dir + `rudder`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// How long a cached file stays fresh
    #[serde(default = "default_lifetime", with = "humantime_serde")]
    pub lifetime: Duration,

    /// Upper bound for a single network fetch
    #[serde(default = "default_fetch_timeout", with = "humantime_serde")]
    pub fetch_timeout: Duration,
}

fn default_lifetime() -> Duration {
    Duration::from_secs(10 * 60)
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            lifetime: default_lifetime(),
            fetch_timeout: default_fetch_timeout(),
        }
    }
}

impl CacheConfig {
    /// Platform default cache directory
    pub fn default_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir().ok_or_else(|| RepoError::InvalidConfig {
            message: "Could not determine cache directory".to_string(),
        })?;
        Ok(cache_dir.join("rudder"))
    }
}
