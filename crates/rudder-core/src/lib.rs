//! Rudder Core - chart types shared by the repository resolver
//!
//! This crate provides the chart-level building blocks:
//! - `ChartMetadata`: the decoded `Chart.yaml`
//! - `Values`: the decoded `values.yaml` tree
//! - `ChartArchive`: in-memory extraction of a packaged chart

pub mod archive;
pub mod chart;
pub mod error;
pub mod values;

pub use archive::{ChartArchive, extract, template_key, write_archive};
pub use chart::{ChartMetadata, Maintainer};
pub use error::{CoreError, Result};
pub use values::Values;
