//! Version selection
//!
//! A requested version is either an exact version string or the keyword
//! `latest`, which picks the first version the index lists. No SemVer
//! ordering is applied: index order is taken as published.

use crate::index::ChartVersion;

/// Version keyword selecting the first listed version
pub const LATEST: &str = "latest";

/// Pick the version record matching `requested`
///
/// `latest` always resolves to the first record, even when some record is
/// literally versioned `latest`. Returns `None` for an empty list or when no
/// record carries the exact version.
pub fn select<'a>(versions: &'a [ChartVersion], requested: &str) -> Option<&'a ChartVersion> {
    if requested == LATEST {
        return versions.first();
    }

    versions.iter().find(|v| v.version == requested)
}
