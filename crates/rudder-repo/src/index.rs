//! Repository index types
//!
//! Helm-compatible `index.yaml` format. Entries keep the order in which the
//! remote document lists them: both the chart names and each chart's
//! versions (conventionally newest first, though nothing here enforces it).

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cache::CacheStore;
use crate::config::Repository;
use crate::error::{RepoError, Result};

/// Repository index (Helm-compatible)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartIndex {
    /// API version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// When this index was generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated: Option<DateTime<Utc>>,

    /// Chart versions indexed by chart name
    #[serde(default)]
    pub entries: IndexMap<String, Vec<ChartVersion>>,
}

fn default_api_version() -> String {
    "v1".to_string()
}

impl Default for ChartIndex {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            generated: None,
            entries: IndexMap::new(),
        }
    }
}

impl ChartIndex {
    /// Parse index from YAML string
    ///
    /// Charts listed without any version are dropped, so every name in the
    /// parsed index maps to at least one version.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut index: Self =
            serde_yaml::from_str(yaml).map_err(|e| RepoError::Serialization(e.to_string()))?;

        index.entries.retain(|name, versions| {
            if versions.is_empty() {
                tracing::warn!("Index lists chart {} without versions, ignoring it", name);
            }
            !versions.is_empty()
        });

        Ok(index)
    }

    /// Parse index from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let yaml = std::str::from_utf8(bytes)
            .map_err(|e| RepoError::Serialization(format!("Invalid UTF-8: {}", e)))?;
        Self::from_yaml(yaml)
    }

    /// Get all versions of a chart
    pub fn get(&self, name: &str) -> Option<&[ChartVersion]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// List all chart names
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(|s| s.as_str()).collect()
    }

    /// Number of charts in the index
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index lists no charts
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One chart version as listed in the index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartVersion {
    /// Chart name
    pub name: String,

    /// Chart version
    pub version: String,

    /// Keywords for search
    #[serde(default)]
    pub keywords: Vec<String>,

    /// URLs to download the chart archive, in preference order
    #[serde(default)]
    pub urls: Vec<String>,

    /// Application version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,

    /// Chart API version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Home URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,

    /// Icon URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Source URLs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,

    /// Maintainers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maintainers: Vec<rudder_core::Maintainer>,

    /// SHA256 digest of the archive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    /// Deprecated flag
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
}

impl ChartVersion {
    /// Get the primary download URL
    pub fn download_url(&self) -> Option<&str> {
        self.urls.first().map(|s| s.as_str())
    }
}

/// Fetch a repository's index through the cache and decode it
pub async fn resolve_index(cache: &CacheStore, repo: &Repository) -> Result<ChartIndex> {
    let url = repo.index_url()?;

    let data = cache
        .fetch(&url)
        .await
        .map_err(|e| RepoError::index_fetch(&repo.name, &url, e))?;

    ChartIndex::from_bytes(&data).map_err(|e| {
        let message = match e {
            RepoError::Serialization(message) => message,
            other => other.to_string(),
        };
        RepoError::IndexDecodeFailed {
            repo: repo.name.clone(),
            url: url.clone(),
            message,
        }
    })
}
