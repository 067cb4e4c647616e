//! Repository controller
//!
//! Composition root tying the cache, index resolution, filtering, version
//! selection and archive extraction together. The controller owns no state
//! besides its configuration and the cache; every call recomputes its result.

use rudder_core::{ChartArchive, CoreError};
use std::sync::Arc;

use crate::cache::CacheStore;
use crate::config::{Repository, RepositoryConfig};
use crate::detail::ChartDetail;
use crate::error::{RepoError, Result};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::filter::filter_charts;
use crate::index::{ChartIndex, resolve_index};
use crate::selector::select;

/// Serves chart listings and chart details for the configured repositories
pub struct RepoController {
    config: RepositoryConfig,
    cache: CacheStore,
}

impl RepoController {
    /// Create a controller fetching over HTTP with the configured timeout
    pub fn new(config: RepositoryConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.cache.fetch_timeout)?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Create a controller on top of a custom fetcher
    pub fn with_fetcher(config: RepositoryConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        config.validate()?;
        let cache = CacheStore::new(config.cache_dir()?, config.cache.lifetime, fetcher)?;
        Ok(Self { config, cache })
    }

    /// The configured repositories
    pub fn list_repos(&self) -> &[Repository] {
        &self.config.repositories
    }

    /// The underlying disk cache
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    fn find_repo(&self, name: &str) -> Result<&Repository> {
        self.config
            .get(name)
            .ok_or_else(|| RepoError::RepositoryNotFound {
                name: name.to_string(),
            })
    }

    /// Whether a fresh copy of the repository index is cached
    pub fn index_is_fresh(&self, repo_name: &str) -> Result<bool> {
        let repo = self.find_repo(repo_name)?;
        self.cache.is_fresh(&repo.index_url()?)
    }

    /// Drop the cached index of a repository so the next read fetches it
    ///
    /// Returns whether a cached copy existed.
    pub fn refresh_index(&self, repo_name: &str) -> Result<bool> {
        let repo = self.find_repo(repo_name)?;
        let url = repo.index_url()?;
        let removed = self.cache.invalidate(&url)?;
        tracing::debug!("Invalidated index of {} at {} (cached: {})", repo_name, url, removed);
        Ok(removed)
    }

    /// List the charts of a repository, optionally narrowed by name/keyword
    pub async fn list_charts(&self, repo_name: &str, filter: &str) -> Result<ChartIndex> {
        let repo = self.find_repo(repo_name)?;
        let index = resolve_index(&self.cache, repo).await?;
        Ok(filter_charts(&index, filter))
    }

    /// Resolve one chart version and return its decoded contents
    ///
    /// `version` is an exact version string or `latest`.
    pub async fn chart_details(
        &self,
        repo_name: &str,
        chart_name: &str,
        version: &str,
    ) -> Result<ChartDetail> {
        let repo = self.find_repo(repo_name)?;
        let charts = self.list_charts(repo_name, "").await?;

        let versions = charts
            .get(chart_name)
            .ok_or_else(|| RepoError::PackageNotFound {
                name: chart_name.to_string(),
                repo: repo_name.to_string(),
            })?;

        let selected = select(versions, version).ok_or_else(|| RepoError::VersionNotFound {
            name: chart_name.to_string(),
            version: version.to_string(),
            repo: repo_name.to_string(),
        })?;

        let listed_url = selected
            .download_url()
            .ok_or_else(|| RepoError::NoDownloadUrl {
                name: chart_name.to_string(),
                version: selected.version.clone(),
            })?;
        let chart_url = repo.resolve_url(listed_url)?;

        tracing::debug!(
            "Resolved {}/{}@{} to {} ({})",
            repo_name,
            chart_name,
            version,
            selected.version,
            chart_url
        );

        let data = self
            .cache
            .fetch(&chart_url)
            .await
            .map_err(|e| RepoError::archive_fetch(&chart_url, e))?;

        let archive = ChartArchive::from_bytes(&data).map_err(|e| RepoError::ArchiveDecodeFailed {
            url: chart_url.clone(),
            message: e.to_string(),
        })?;

        let metadata = archive
            .metadata(chart_name)
            .map_err(|e| RepoError::MetadataDecodeFailed {
                chart: chart_name.to_string(),
                message: describe(e),
            })?;

        let values_raw = archive
            .values_yaml(chart_name)
            .map_err(|e| RepoError::DefaultsDecodeFailed {
                chart: chart_name.to_string(),
                message: describe(e),
            })?
            .to_vec();
        let values = archive
            .values(chart_name)
            .map_err(|e| RepoError::DefaultsDecodeFailed {
                chart: chart_name.to_string(),
                message: describe(e),
            })?;

        Ok(ChartDetail {
            metadata,
            values_raw,
            values,
            templates: archive.templates(),
            chart_file: self.cache.path_for(&chart_url),
            chart_url,
        })
    }
}

fn describe(e: CoreError) -> String {
    match e {
        CoreError::Yaml(inner) => inner.to_string(),
        other => other.to_string(),
    }
}
