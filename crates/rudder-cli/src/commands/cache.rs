//! Cache commands

use console::style;
use humantime_serde::re::humantime::format_duration;

use super::Settings;
use crate::display::format_size;
use crate::error::Result;

/// Show cache statistics
pub fn stats(settings: &Settings, json_output: bool) -> Result<()> {
    let controller = settings.controller()?;
    let cache = controller.cache();
    let stats = cache.stats()?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}: {}", style("Directory").bold(), cache.root().display());
    println!(
        "{}: {}",
        style("Lifetime").bold(),
        format_duration(cache.lifetime())
    );
    println!("{}: {}", style("Entries").bold(), stats.entry_count);
    println!("{}: {}", style("Stale").bold(), stats.stale_count);
    println!("{}: {}", style("Size").bold(), format_size(stats.total_bytes));

    Ok(())
}

/// Remove every cached file
pub fn clear(settings: &Settings) -> Result<()> {
    let controller = settings.controller()?;
    let removed = controller.cache().clear()?;

    println!(
        "Removed {} cached file(s) from {}",
        removed,
        controller.cache().root().display()
    );
    Ok(())
}

/// Drop the cached index of one repository
pub fn invalidate(settings: &Settings, repo: &str) -> Result<()> {
    let controller = settings.controller()?;

    if controller.refresh_index(repo)? {
        println!("Invalidated cached index of {}", style(repo).cyan());
    } else {
        println!("No cached index for {}", style(repo).cyan());
    }
    Ok(())
}

/// Print the cache directory
pub fn path(settings: &Settings) -> Result<()> {
    let controller = settings.controller()?;
    println!("{}", controller.cache().root().display());
    Ok(())
}
