//! Error types for repository operations

use thiserror::Error;

/// Repository operation errors
#[derive(Debug, Error)]
pub enum RepoError {
    // ============ Configuration Errors ============
    #[error("Repository not found: {name}")]
    RepositoryNotFound { name: String },

    #[error("Invalid repository URL: {url} - {reason}")]
    InvalidRepositoryUrl { url: String, reason: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    // ============ Network Errors ============
    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Request timeout: {url}")]
    Timeout { url: String },

    #[error("Rate limited by server. Retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    #[error("Authentication required for {url}")]
    AuthRequired { url: String },

    #[error("Authentication failed: {message}")]
    AuthFailed { message: String },

    // ============ Index Errors ============
    #[error("Failed to fetch index for repository {repo} from {url}")]
    IndexFetchFailed {
        repo: String,
        url: String,
        #[source]
        source: Box<RepoError>,
    },

    #[error("Invalid index for repository {repo} at {url}: {message}")]
    IndexDecodeFailed {
        repo: String,
        url: String,
        message: String,
    },

    // ============ Chart Errors ============
    #[error("Chart not found: {name} in repository {repo}")]
    PackageNotFound { name: String, repo: String },

    #[error("Version not found: {name}@{version} in repository {repo}")]
    VersionNotFound {
        name: String,
        version: String,
        repo: String,
    },

    #[error("No download URL listed for {name}@{version}")]
    NoDownloadUrl { name: String, version: String },

    #[error("Failed to fetch chart archive from {url}")]
    ArchiveFetchFailed {
        url: String,
        #[source]
        source: Box<RepoError>,
    },

    #[error("Invalid chart archive from {url}: {message}")]
    ArchiveDecodeFailed { url: String, message: String },

    #[error("Invalid Chart.yaml in {chart}: {message}")]
    MetadataDecodeFailed { chart: String, message: String },

    #[error("Invalid values.yaml in {chart}: {message}")]
    DefaultsDecodeFailed { chart: String, message: String },

    // ============ Cache Errors ============
    #[error("Cache error at {path}: {message}")]
    CacheError { path: String, message: String },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, RepoError>;

impl RepoError {
    /// Wrap a cache/fetch failure while retrieving a repository index
    pub(crate) fn index_fetch(repo: &str, url: &str, source: RepoError) -> Self {
        RepoError::IndexFetchFailed {
            repo: repo.to_string(),
            url: url.to_string(),
            source: Box::new(source),
        }
    }

    /// Wrap a cache/fetch failure while retrieving a chart archive
    pub(crate) fn archive_fetch(url: &str, source: RepoError) -> Self {
        RepoError::ArchiveFetchFailed {
            url: url.to_string(),
            source: Box::new(source),
        }
    }
}

impl From<reqwest::Error> for RepoError {
    fn from(e: reqwest::Error) -> Self {
        let url = e.url().map(|u| u.to_string()).unwrap_or_default();
        if e.is_timeout() {
            RepoError::Timeout { url }
        } else if e.is_connect() {
            RepoError::NetworkError {
                message: format!("Connection failed: {}", e),
            }
        } else if let Some(status) = e.status() {
            RepoError::HttpError {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            RepoError::NetworkError {
                message: e.to_string(),
            }
        }
    }
}
