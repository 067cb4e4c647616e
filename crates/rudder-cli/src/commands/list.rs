//! List command - charts of one repository

use super::Settings;
use crate::display::{chart_rows, print_chart_table};
use crate::error::Result;

pub async fn run(settings: &Settings, repo: &str, filter: &str, json_output: bool) -> Result<()> {
    let controller = settings.controller()?;
    let index = controller.list_charts(repo, filter).await?;
    let rows = chart_rows(repo, &index);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        if filter.is_empty() {
            println!("Repository '{}' lists no charts.", repo);
        } else {
            println!("No charts in '{}' match '{}'.", repo, filter);
        }
        return Ok(());
    }

    print_chart_table(&rows, false);
    Ok(())
}
