//! Rudder Repository Resolution
//!
//! This crate resolves charts published in Helm-style HTTP repositories:
//!
//! - **Disk cache**: every downloaded resource is stored under a hashed key
//!   and served from disk until it is older than the configured lifetime
//! - **Index resolution**: `index.yaml` is fetched through the cache and
//!   decoded with chart and version order preserved
//! - **Filtering**: narrow an index by chart name or keyword
//! - **Chart details**: pick a version, download its archive and decode
//!   `Chart.yaml`, `values.yaml` and the templates
//!
//! ## Example
//!
//! ```rust,no_run
//! use rudder_repo::{RepoController, Repository, RepositoryConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RepositoryConfig::with_repositories(vec![
//!     Repository::new("stable", "https://charts.example.com/stable")?,
//! ]);
//! let controller = RepoController::new(config)?;
//!
//! let charts = controller.list_charts("stable", "nginx").await?;
//! let detail = controller.chart_details("stable", "nginx", "latest").await?;
//! println!("{} charts, latest nginx is {}", charts.len(), detail.metadata.version);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod controller;
pub mod detail;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod index;
pub mod selector;

#[cfg(test)]
mod testing;

pub use cache::{CacheStats, CacheStore};
pub use config::{CacheConfig, INDEX_FILE, Repository, RepositoryConfig};
pub use controller::RepoController;
pub use detail::ChartDetail;
pub use error::{RepoError, Result};
pub use fetch::{Fetcher, HttpFetcher};
pub use filter::filter_charts;
pub use index::{ChartIndex, ChartVersion, resolve_index};
pub use selector::{LATEST, select};
