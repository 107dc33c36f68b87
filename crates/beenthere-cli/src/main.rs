//! beenthere: mark countries as visited or on the wishlist and export them
//! as a KML overlay for Google My Maps.
//!
//! Country boundaries come from a GeoJSON `FeatureCollection`; the marks
//! live in a small JSON snapshot next to it.
//!
//! # Usage
//!
//! ```text
//! beenthere mark FR visited
//! beenthere mark JP wishlist
//! beenthere stats
//! beenthere export --output MyCountries.kml
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod error;
mod store;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use beenthere_core::{
    MarkedCountry, PolygonSelectorKind, Status, compute_stats, display_name, find_country, search,
};
use beenthere_export::{ExportConfig, export_kml};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;
use crate::store::{load_countries, load_countries_or_empty, load_statuses, save_statuses};

/// Track visited and wishlist countries and export them as KML.
#[derive(Parser)]
#[command(name = "beenthere", version)]
struct Cli {
    /// GeoJSON `FeatureCollection` with country boundaries.
    #[arg(
        long,
        global = true,
        env = "BEENTHERE_COUNTRIES",
        default_value = "countries.geojson"
    )]
    countries: PathBuf,

    /// Status snapshot file (JSON object of code to "visited"/"wishlist").
    #[arg(
        long,
        global = true,
        env = "BEENTHERE_STATUSES",
        default_value = "statuses.json"
    )]
    statuses: PathBuf,

    /// Increase log verbosity (-v info, -vv debug).  `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mark a country as visited or wishlist, or clear its mark.
    Mark {
        /// Country code as it appears in the country file (case-insensitive).
        code: String,

        /// New status.
        #[arg(value_enum)]
        status: MarkStatus,
    },

    /// List marked countries in the order they were marked.
    List {
        /// Only show countries with this status.
        #[arg(long, value_enum)]
        status: Option<ListStatus>,
    },

    /// Show visited and wishlist counts.
    Stats {
        /// Output statistics as JSON instead of a human-readable report.
        #[arg(long)]
        json: bool,
    },

    /// Search countries by name or code.
    Search {
        /// Case-insensitive substring to look for.
        query: String,
    },

    /// Write the KML overlay.
    Export(ExportArgs),
}

#[derive(Args)]
struct ExportArgs {
    /// Output file.  Defaults to the configured file name; `-` writes to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Document name.
    #[arg(long, default_value = ExportConfig::DEFAULT_DOCUMENT_NAME)]
    name: String,

    /// Document description.
    #[arg(long, default_value = ExportConfig::DEFAULT_DOCUMENT_DESCRIPTION)]
    description: String,

    /// How a multi-polygon country is reduced to one polygon.
    #[arg(long, value_enum, default_value_t = Selector::VertexCount)]
    selector: Selector,

    /// Full export config as a JSON string.
    ///
    /// When provided, `--name`, `--description` and `--selector` are
    /// ignored.  The JSON must be a valid `ExportConfig` serialization;
    /// missing fields take their defaults.
    #[arg(long)]
    config_json: Option<String>,
}

/// Status argument for `mark`.
#[derive(Clone, Copy, ValueEnum)]
enum MarkStatus {
    /// Been there.
    Visited,
    /// Want to go.
    Wishlist,
    /// Remove the mark.
    None,
}

impl MarkStatus {
    const fn to_status(self) -> Option<Status> {
        match self {
            Self::Visited => Some(Status::Visited),
            Self::Wishlist => Some(Status::Wishlist),
            Self::None => None,
        }
    }
}

/// Status filter for `list`.
#[derive(Clone, Copy, ValueEnum)]
enum ListStatus {
    Visited,
    Wishlist,
}

impl From<ListStatus> for Status {
    fn from(value: ListStatus) -> Self {
        match value {
            ListStatus::Visited => Self::Visited,
            ListStatus::Wishlist => Self::Wishlist,
        }
    }
}

/// Polygon selector selection.
#[derive(Clone, Copy, ValueEnum)]
enum Selector {
    /// Polygon whose outer ring has the most vertices.
    VertexCount,
    /// Polygon whose outer ring encloses the largest area.
    Area,
}

/// Build an [`ExportConfig`] from the `export` arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual flags are ignored.
fn config_from_args(args: &ExportArgs) -> Result<ExportConfig, CliError> {
    if let Some(ref json) = args.config_json {
        return serde_json::from_str(json).map_err(CliError::Config);
    }

    Ok(ExportConfig {
        document_name: args.name.clone(),
        document_description: args.description.clone(),
        polygon_selector: match args.selector {
            Selector::VertexCount => PolygonSelectorKind::VertexCount,
            Selector::Area => PolygonSelectorKind::Area,
        },
        ..ExportConfig::default()
    })
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows `-v`.
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_mark(cli: &Cli, code: &str, status: MarkStatus) -> Result<(), CliError> {
    let countries = load_countries(&cli.countries)?;
    let code = code.trim().to_uppercase();
    let Some(country) = find_country(&countries, &code) else {
        return Err(CliError::UnknownCountry(code));
    };

    let mut statuses = load_statuses(&cli.statuses)?;
    let previous = statuses.apply(country.code.clone(), status.to_status());
    save_statuses(&cli.statuses, &statuses)?;

    let now = status.to_status().map_or("unmarked", Status::as_str);
    match previous {
        Some(previous) if status.to_status() != Some(previous) => {
            println!("{} ({}): {previous} -> {now}", country.name, country.code);
        }
        _ => println!("{} ({}): {now}", country.name, country.code),
    }
    Ok(())
}

fn run_list(cli: &Cli, filter: Option<ListStatus>) -> Result<(), CliError> {
    let countries = load_countries_or_empty(&cli.countries)?;
    let statuses = load_statuses(&cli.statuses)?;
    let filter = filter.map(Status::from);

    for (code, status) in statuses.iter() {
        if filter.is_some_and(|f| f != status) {
            continue;
        }
        println!(
            "{code}\t{status}\t{}",
            display_name(&countries, code.as_str())
        );
    }
    Ok(())
}

/// Machine-readable `stats --json` output.
#[derive(Serialize)]
struct StatsReport<'a> {
    visited_count: usize,
    wishlist_count: usize,
    total_countries: usize,
    visited_percent: f64,
    visited: &'a [MarkedCountry],
    wishlist: &'a [MarkedCountry],
}

fn run_stats(cli: &Cli, json: bool) -> Result<(), CliError> {
    let countries = load_countries_or_empty(&cli.countries)?;
    let statuses = load_statuses(&cli.statuses)?;
    let stats = compute_stats(&statuses, &countries);

    if json {
        let report = StatsReport {
            visited_count: stats.visited_count(),
            wishlist_count: stats.wishlist_count(),
            total_countries: stats.total_countries,
            visited_percent: stats.visited_percent(),
            visited: &stats.visited,
            wishlist: &stats.wishlist,
        };
        let text = serde_json::to_string_pretty(&report).map_err(CliError::Output)?;
        println!("{text}");
        return Ok(());
    }

    println!("Visited:    {}", stats.visited_count());
    println!("Wishlist:   {}", stats.wishlist_count());
    println!(
        "World:      {:.1}% ({} of {})",
        stats.visited_percent(),
        stats.visited_count(),
        stats.total_countries
    );
    for (heading, listing) in [("Visited", &stats.visited), ("Wishlist", &stats.wishlist)] {
        if listing.is_empty() {
            continue;
        }
        println!();
        println!("{heading} countries:");
        for country in listing {
            println!("  {} ({})", country.name, country.code);
        }
    }
    Ok(())
}

fn run_search(cli: &Cli, query: &str) -> Result<(), CliError> {
    let countries = load_countries(&cli.countries)?;
    let statuses = load_statuses(&cli.statuses)?;

    let matches = search(&countries, query);
    if matches.is_empty() {
        tracing::info!(query, "no matching countries");
    }
    for country in matches {
        let status = statuses.get(country.code.as_str()).map_or("-", Status::as_str);
        println!("{}\t{}\t{status}", country.code, country.name);
    }
    Ok(())
}

fn run_export(cli: &Cli, args: &ExportArgs) -> Result<(), CliError> {
    let config = config_from_args(args)?;
    let countries = load_countries(&cli.countries)?;
    let statuses = load_statuses(&cli.statuses)?;

    let document = export_kml(&statuses, &countries, &config);
    let summary = document.summary;
    tracing::info!(
        visited = summary.visited.emitted,
        wishlist = summary.wishlist.emitted,
        skipped = summary.visited.skipped + summary.wishlist.skipped,
        "exported placemarks"
    );
    let unmatched = summary.visited.unmatched + summary.wishlist.unmatched;
    if unmatched > 0 {
        tracing::warn!(unmatched, "marked countries missing from the country file");
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.filename));
    if output == Path::new("-") {
        print!("{}", document.text);
        return Ok(());
    }

    fs::write(&output, &document.text).map_err(|source| CliError::Write {
        path: output.clone(),
        source,
    })?;
    println!(
        "Wrote {} placemarks to {}",
        summary.placemarks(),
        output.display()
    );
    Ok(())
}

fn run(cli: &Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Mark { ref code, status } => run_mark(cli, code, status),
        Command::List { status } => run_list(cli, status),
        Command::Stats { json } => run_stats(cli, json),
        Command::Search { ref query } => run_search(cli, query),
        Command::Export(ref args) => run_export(cli, args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
