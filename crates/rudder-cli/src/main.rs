//! Rudder CLI - browse Helm-style chart repositories

use clap::{Parser, Subcommand};
use rudder_repo::LATEST;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod display;
mod error;
mod exit_codes;

use commands::Settings;

#[derive(Parser)]
#[command(name = "rudder")]
#[command(author = "Rudder Contributors")]
#[command(version)]
#[command(about = "Browse Helm-style chart repositories", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Configuration file (default: <config dir>/rudder/config.yaml)
    #[arg(long, global = true, env = "RUDDER_CONFIG")]
    config: Option<PathBuf>,

    /// Override the cache directory
    #[arg(long, global = true, env = "RUDDER_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Override how long cached files stay fresh (e.g. 10m, 1h)
    #[arg(long, global = true, value_parser = parse_lifetime)]
    cache_lifetime: Option<Duration>,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect configured repositories
    Repo {
        #[command(subcommand)]
        command: RepoCommands,
    },

    /// List the charts of a repository
    List {
        /// Repository name
        repo: String,

        /// Only show charts whose name or keywords match exactly
        #[arg(short, long, default_value = "")]
        filter: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find charts by name or keyword across all repositories
    Search {
        /// Chart name or keyword
        term: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the details of one chart version
    #[command(disable_version_flag = true)]
    Show {
        /// Repository name
        repo: String,

        /// Chart name
        chart: String,

        /// Exact version, or "latest" for the first listed version
        #[arg(short, long, default_value = LATEST)]
        version: String,

        /// Print the default values.yaml
        #[arg(long)]
        values: bool,

        /// Print every template body
        #[arg(long)]
        templates: bool,

        /// Print a single default value by dotted path (e.g. image.tag)
        #[arg(long)]
        get: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the download cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
enum RepoCommands {
    /// List configured repositories
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Show entry count, size and staleness
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove every cached file
    Clear,

    /// Drop the cached index of a repository so the next read refetches it
    Invalidate {
        /// Repository name
        repo: String,
    },

    /// Print the cache directory
    Path,
}

fn parse_lifetime(value: &str) -> Result<Duration, String> {
    humantime_serde::re::humantime::parse_duration(value).map_err(|e| e.to_string())
}

/// Logs go to stderr; `--debug` wins over `RUDDER_LOG`, default is warn
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("rudder=debug,rudder_repo=debug,rudder_core=debug")
    } else {
        EnvFilter::try_from_env("RUDDER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let settings = Settings {
        config: cli.config,
        cache_dir: cli.cache_dir,
        cache_lifetime: cli.cache_lifetime,
    };

    let result = match cli.command {
        Commands::Repo {
            command: RepoCommands::List { json },
        } => commands::repo::list(&settings, json),

        Commands::List { repo, filter, json } => {
            commands::list::run(&settings, &repo, &filter, json).await
        }

        Commands::Search { term, json } => commands::search::run(&settings, &term, json).await,

        Commands::Show {
            repo,
            chart,
            version,
            values,
            templates,
            get,
            json,
        } => {
            commands::show::run(
                &settings,
                &repo,
                &chart,
                &version,
                values,
                templates,
                get.as_deref(),
                json,
            )
            .await
        }

        Commands::Cache { command } => match command {
            CacheCommands::Stats { json } => commands::cache::stats(&settings, json),
            CacheCommands::Clear => commands::cache::clear(&settings),
            CacheCommands::Invalidate { repo } => commands::cache::invalidate(&settings, &repo),
            CacheCommands::Path => commands::cache::path(&settings),
        },
    };

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code as u8)
        }
    }
}
