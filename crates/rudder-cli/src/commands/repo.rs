//! Repository commands

use console::style;
use serde::Serialize;

use super::Settings;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct RepoRow<'a> {
    name: &'a str,
    url: &'a str,
    index_cached: bool,
}

/// List configured repositories and whether their index is cached
pub fn list(settings: &Settings, json_output: bool) -> Result<()> {
    let controller = settings.controller()?;
    let repos = controller.list_repos();

    let mut rows = Vec::with_capacity(repos.len());
    for repo in repos {
        rows.push(RepoRow {
            name: &repo.name,
            url: &repo.url,
            index_cached: controller.index_is_fresh(&repo.name)?,
        });
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No repositories configured.");
        println!();
        println!(
            "Add one under 'repositories:' in {}",
            style(settings.config_path()?.display()).cyan()
        );
        return Ok(());
    }

    println!("{:<20} {:<8} URL", "NAME", "CACHED");
    println!("{}", "-".repeat(80));

    for row in &rows {
        let cached = if row.index_cached {
            style("yes").green()
        } else {
            style("no").dim()
        };
        println!("{:<20} {:<8} {}", row.name, cached, row.url);
    }

    Ok(())
}
