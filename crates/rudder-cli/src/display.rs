//! Display formatting for CLI output

use console::style;
use rudder_repo::ChartIndex;
use serde::Serialize;

/// One line of a chart listing
#[derive(Debug, Serialize)]
pub struct ChartRow<'a> {
    pub repository: &'a str,
    pub name: &'a str,
    pub version: &'a str,
    pub versions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub deprecated: bool,
}

/// Summarize every chart of an index, using its first listed version
pub fn chart_rows<'a>(repository: &'a str, index: &'a ChartIndex) -> Vec<ChartRow<'a>> {
    index
        .entries
        .iter()
        .filter_map(|(name, versions)| {
            let first = versions.first()?;
            Some(ChartRow {
                repository,
                name,
                version: &first.version,
                versions: versions.len(),
                app_version: first.app_version.as_deref(),
                description: first.description.as_deref(),
                deprecated: first.deprecated,
            })
        })
        .collect()
}

/// Print chart rows as a table; `qualified` prefixes names with the repository
pub fn print_chart_table(rows: &[ChartRow<'_>], qualified: bool) {
    println!(
        "{:<35} {:<15} {:<10} DESCRIPTION",
        "NAME", "VERSION", "VERSIONS"
    );
    println!("{}", "-".repeat(90));

    for row in rows {
        let name = if qualified {
            format!("{}/{}", row.repository, row.name)
        } else {
            row.name.to_string()
        };
        let desc = row
            .description
            .unwrap_or("")
            .chars()
            .take(40)
            .collect::<String>();

        let line = format!("{:<35} {:<15} {:<10} {}", name, row.version, row.versions, desc);
        if row.deprecated {
            println!("{} {}", style(line).dim(), style("(deprecated)").yellow());
        } else {
            println!("{}", line);
        }
    }
}

/// Format a byte size as a human-readable string
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
