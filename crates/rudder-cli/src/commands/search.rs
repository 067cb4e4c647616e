//! Search command - filter every configured repository at once

use futures::future::join_all;

use super::Settings;
use crate::display::{ChartRow, chart_rows, print_chart_table};
use crate::error::Result;

/// Search for charts across repositories
///
/// Repositories are queried concurrently; the first failure aborts the search.
pub async fn run(settings: &Settings, term: &str, json_output: bool) -> Result<()> {
    let controller = settings.controller()?;
    let repos = controller.list_repos();

    if repos.is_empty() {
        println!("No repositories configured.");
        return Ok(());
    }

    let results = join_all(
        repos
            .iter()
            .map(|repo| controller.list_charts(&repo.name, term)),
    )
    .await;

    let mut indexes = Vec::with_capacity(repos.len());
    for (repo, result) in repos.iter().zip(results) {
        indexes.push((repo.name.as_str(), result?));
    }

    let rows: Vec<ChartRow<'_>> = indexes
        .iter()
        .flat_map(|(repo, index)| chart_rows(repo, index))
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No charts match '{}'.", term);
        return Ok(());
    }

    print_chart_table(&rows, true);
    Ok(())
}
