//! Chart archive extraction
//!
//! Chart packages are `.tgz` files whose entries live under a single
//! top-level directory named after the chart:
//!
//! ```text
//! mychart/Chart.yaml
//! mychart/values.yaml
//! mychart/templates/deployment.yaml
//! mychart/charts/<subchart>/...
//! ```
//!
//! Archives are read fully into memory; nothing is unpacked to disk.

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::{Component, Path};
use tar::{Archive, Builder, Header};

use crate::chart::ChartMetadata;
use crate::error::{CoreError, Result};
use crate::values::Values;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Name of the directory segment holding template files
pub const TEMPLATES_DIR: &str = "templates";

/// Decompress and unpack an archive into a map of path to file contents
///
/// Accepts gzip-compressed tarballs and plain tarballs. Directory entries
/// and links are skipped; only regular files are returned.
pub fn extract(data: &[u8]) -> Result<BTreeMap<String, Vec<u8>>> {
    if data.is_empty() {
        return Err(CoreError::Archive {
            message: "archive is empty".to_string(),
        });
    }

    if data.starts_with(&GZIP_MAGIC) {
        read_entries(Archive::new(GzDecoder::new(data)))
    } else {
        read_entries(Archive::new(data))
    }
}

fn read_entries<R: Read>(mut archive: Archive<R>) -> Result<BTreeMap<String, Vec<u8>>> {
    let mut files = BTreeMap::new();

    for entry in archive.entries().map_err(archive_error)? {
        let mut entry = entry.map_err(archive_error)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let path = normalize_path(&entry.path().map_err(archive_error)?);
        if path.is_empty() {
            continue;
        }

        let mut data = Vec::new();
        entry.read_to_end(&mut data).map_err(archive_error)?;
        files.insert(path, data);
    }

    Ok(files)
}

fn archive_error(e: std::io::Error) -> CoreError {
    CoreError::Archive {
        message: e.to_string(),
    }
}

/// Render an archive path as `/`-separated normal components
fn normalize_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Locate the template-relative key of an archive path
///
/// Returns the depth of the `templates` segment together with the path
/// after it, or `None` when the path holds no `templates` directory below
/// the archive root.
pub fn template_key(path: &str) -> Option<(usize, String)> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let idx = segments
        .iter()
        .enumerate()
        .skip(1)
        .find(|(i, s)| **s == TEMPLATES_DIR && *i + 1 < segments.len())
        .map(|(i, _)| i)?;

    Some((idx, segments[idx + 1..].join("/")))
}

/// An extracted chart archive
#[derive(Debug, Clone, Default)]
pub struct ChartArchive {
    files: BTreeMap<String, Vec<u8>>,
}

impl ChartArchive {
    /// Extract a chart archive from raw bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self {
            files: extract(data)?,
        })
    }

    /// Get a file by its full archive path
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    fn require(&self, path: String) -> Result<&[u8]> {
        self.get(&path).ok_or(CoreError::MissingFile { path })
    }

    /// Raw contents of `<chart>/Chart.yaml`
    pub fn chart_yaml(&self, chart: &str) -> Result<&[u8]> {
        self.require(format!("{}/Chart.yaml", chart))
    }

    /// Raw contents of `<chart>/values.yaml`
    pub fn values_yaml(&self, chart: &str) -> Result<&[u8]> {
        self.require(format!("{}/values.yaml", chart))
    }

    /// Decode `<chart>/Chart.yaml`
    pub fn metadata(&self, chart: &str) -> Result<ChartMetadata> {
        ChartMetadata::from_bytes(self.chart_yaml(chart)?)
    }

    /// Decode `<chart>/values.yaml`
    pub fn values(&self, chart: &str) -> Result<Values> {
        Values::from_bytes(self.values_yaml(chart)?)
    }

    /// Collect template files keyed by their path below `templates/`
    ///
    /// When a subchart ships a template with the same relative path as the
    /// parent chart, the shallower one (the parent's) is kept.
    pub fn templates(&self) -> BTreeMap<String, Vec<u8>> {
        let mut selected: BTreeMap<String, (usize, &Vec<u8>)> = BTreeMap::new();

        for (path, data) in &self.files {
            let Some((depth, key)) = template_key(path) else {
                continue;
            };

            match selected.get(&key) {
                Some((existing, _)) if *existing <= depth => {
                    tracing::warn!(
                        "Template {} shadowed by a shallower file, skipping {}",
                        key,
                        path
                    );
                }
                _ => {
                    selected.insert(key, (depth, data));
                }
            }
        }

        selected
            .into_iter()
            .map(|(key, (_, data))| (key, data.clone()))
            .collect()
    }
}

/// Build a gzip-compressed tarball from in-memory files
///
/// Entries get mode `0644` and an mtime of zero so identical input yields
/// identical archives.
pub fn write_archive(files: &[(&str, &[u8])]) -> Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = Builder::new(encoder);

    for (path, content) in files {
        add_bytes_to_archive(&mut builder, path, content)?;
    }

    let encoder = builder.into_inner()?;
    Ok(encoder.finish()?)
}

fn add_bytes_to_archive<W: Write>(
    builder: &mut Builder<W>,
    archive_path: &str,
    content: &[u8],
) -> Result<()> {
    let mut header = Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(0);
    header.set_cksum();

    builder.append_data(&mut header, archive_path, content)?;

    Ok(())
}
