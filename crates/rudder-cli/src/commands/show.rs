//! Show command - display one chart version from a repository

use console::style;
use rudder_repo::ChartDetail;
use serde_json::Value as JsonValue;

use super::Settings;
use crate::error::{CliError, Result};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    settings: &Settings,
    repo: &str,
    chart: &str,
    version: &str,
    show_values: bool,
    show_templates: bool,
    get: Option<&str>,
    json_output: bool,
) -> Result<()> {
    let controller = settings.controller()?;
    let detail = controller.chart_details(repo, chart, version).await?;

    if let Some(path) = get {
        return print_value(&detail, chart, path, json_output);
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    print_metadata(&detail);

    if show_values {
        println!();
        println!("{}:", style("Values").bold());
        print!("{}", String::from_utf8_lossy(&detail.values_raw));
    }

    println!();
    println!("{}:", style("Templates").bold());
    if detail.templates.is_empty() {
        println!("  (none)");
    }
    for name in detail.templates.keys() {
        println!("  - {}", name);
    }

    if show_templates {
        for (name, body) in &detail.templates {
            println!();
            println!("{}", style(format!("# Source: {}", name)).dim());
            print!("{}", String::from_utf8_lossy(body));
        }
    }

    Ok(())
}

fn print_metadata(detail: &ChartDetail) {
    let meta = &detail.metadata;

    println!("{}", style(&meta.name).cyan().bold());
    println!("{}", style("=".repeat(meta.name.len())).dim());
    println!();

    println!("{}: {}", style("Version").bold(), meta.version);

    if let Some(app_version) = &meta.app_version {
        println!("{}: {}", style("App Version").bold(), app_version);
    }

    if let Some(desc) = &meta.description {
        println!("{}: {}", style("Description").bold(), desc);
    }

    if let Some(home) = &meta.home {
        println!("{}: {}", style("Home").bold(), home);
    }

    if meta.deprecated {
        println!("{}", style("This chart is deprecated").yellow());
    }

    if !meta.keywords.is_empty() {
        println!("{}: {}", style("Keywords").bold(), meta.keywords.join(", "));
    }

    if !meta.maintainers.is_empty() {
        println!();
        println!("{}:", style("Maintainers").bold());
        for maintainer in &meta.maintainers {
            match &maintainer.email {
                Some(email) => println!("  - {} <{}>", maintainer.name, email),
                None => println!("  - {}", maintainer.name),
            }
        }
    }

    println!();
    println!("{}: {}", style("Source").bold(), detail.chart_url);
    println!("{}: {}", style("Cached").bold(), detail.chart_file.display());
}

/// Print one default value; strings are printed bare, everything else as YAML
fn print_value(detail: &ChartDetail, chart: &str, path: &str, json_output: bool) -> Result<()> {
    let value = detail.values.get(path).ok_or_else(|| {
        CliError::not_found_with_help(
            format!("No default value at '{}' in {}", path, chart),
            "Use --values to see every default",
        )
    })?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(value)?);
        return Ok(());
    }

    match value {
        JsonValue::String(s) => println!("{}", s),
        other => {
            let yaml = serde_yaml::to_string(other)
                .map_err(|e| CliError::internal(format!("Failed to render value: {}", e)))?;
            print!("{}", yaml);
        }
    }

    Ok(())
}
