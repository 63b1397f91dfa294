//! `scout`: people-search CLI.
//!
//! Renders the BFF screens as tables (or JSON). Every command builds a
//! Flux instance, registers the screens it needs and emits requests the
//! same way a UI would.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use scout_core::ScoutConfig;

/// Scout CLI tool.
#[derive(Parser, Debug)]
#[command(name = "scout", about = "People search, protected fields and email tools")]
struct Cli {
    /// Path to config file (default: ~/.scout/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Output format.
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value_t = Output::Table)]
    output: Output,

    /// Override a config value, e.g. `--set search-url=http://localhost:8080`.
    #[arg(long = "set", global = true, value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Output {
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search people by attribute.
    Search {
        /// Filter as `field=value` (firstName, lastName, currentCity, ...). Repeatable.
        #[arg(long = "field", short = 'f', value_name = "FIELD=VALUE")]
        fields: Vec<String>,
        /// 1-based page to show.
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Rows per page.
        #[arg(long)]
        size: Option<u32>,
    },

    /// Reveal a protected field of one user.
    Reveal {
        user_id: String,
        /// email, phone or relationship.
        kind: String,
    },

    /// Pick a location and search people living there.
    Locate {
        /// Latitude of a map click.
        #[arg(allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Longitude of a map click.
        #[arg(allow_negative_numbers = true)]
        lon: Option<f64>,
        /// Pick a city marker by name instead.
        #[arg(long, conflicts_with_all = ["lat", "lon", "department"])]
        marker: Option<String>,
        /// Pick a department by code instead (needs map.departments_geojson).
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        department: Option<String>,
    },

    /// Guess and verify the email address of a person.
    #[command(name = "find-email")]
    FindEmail {
        first_name: String,
        last_name: String,
        domain: String,
    },

    /// Check which common addresses exist on a domain.
    Trace { domain: String },

    /// Interactive session: type-as-you-search with debounce.
    Shell,

    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(ScoutConfig::default_path);

    let mut config = ScoutConfig::load(&config_path)?;
    config.apply_env();
    let overrides: Vec<String> = cli.overrides.iter().map(|o| format!("--{o}")).collect();
    config.apply_args(&overrides)?;

    match cli.command {
        Commands::Search { fields, page, size } => {
            if let Some(size) = size {
                config.search.page_size = size;
            }
            commands::search::run(&config, &fields, page, cli.output).await?;
        }

        Commands::Reveal { user_id, kind } => {
            commands::reveal::run(&config, &user_id, &kind, cli.output).await?;
        }

        Commands::Locate { lat, lon, marker, department } => {
            let pick = match (lat, lon, marker, department) {
                (_, _, Some(name), _) => commands::locate::Pick::Marker(name),
                (_, _, _, Some(code)) => commands::locate::Pick::Department(code),
                (Some(lat), Some(lon), _, _) => commands::locate::Pick::Click(lat, lon),
                _ => anyhow::bail!("give <lat> <lon>, --marker NAME or --department CODE"),
            };
            commands::locate::run(&config, pick, cli.output).await?;
        }

        Commands::FindEmail { first_name, last_name, domain } => {
            commands::verifier::find_email(&config, &first_name, &last_name, &domain, cli.output).await?;
        }

        Commands::Trace { domain } => {
            commands::verifier::trace(&config, &domain, cli.output).await?;
        }

        Commands::Shell => {
            commands::shell::run(&config).await?;
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config, cli.output)?,
            ConfigAction::Init { force } => commands::config::init(&config_path, force)?,
        },

        Commands::Version => {
            println!("scout cli v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
