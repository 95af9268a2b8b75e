//! Dataset maintenance commands: coverage checks and location fills.
//!
//! # Usage
//!
//! ```bash
//! sightings-tools verify data/sightings.csv
//! sightings-tools geocoded data/sightings.csv
//! sightings-tools export-missing data/sightings.csv --output missing.csv
//! sightings-tools apply-fills data/sightings.csv --fills missing.csv --output filled.csv
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sightings_analytics::config::DashboardConfig;
use sightings_analytics::parsing::{parse_rows, require_records, RawTable};
use sightings_analytics::services::coverage::{location_fills, missing_keys_table};
use sightings_analytics::services::{
    apply_location_fills, coverage_report, geocode_presence, missing_location_keys,
};

/// Coverage and geocoding maintenance for the sightings dataset.
#[derive(Parser)]
#[command(name = "sightings-tools")]
#[command(version, about)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Path to dashboard.toml (column names, placeholder location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Totals by coordinate quality, top shapes and countries, rows lacking coordinates
    Verify {
        dataset: PathBuf,

        /// Number of top shapes and countries
        #[arg(long, default_value_t = 7)]
        top: usize,

        /// Number of sample rows lacking coordinates
        #[arg(long, default_value_t = 10)]
        samples: usize,
    },

    /// Presence of coordinate text and the most common keys lacking it
    Geocoded {
        dataset: PathBuf,

        #[arg(long, default_value_t = 30)]
        top: usize,
    },

    /// Write unique location keys lacking coordinates as a fill template
    ExportMissing {
        dataset: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Copy coordinates from a filled template into rows lacking them
    ApplyFills {
        dataset: PathBuf,

        /// Filled template (as written by export-missing)
        #[arg(short, long)]
        fills: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    match path {
        Some(path) => Ok(DashboardConfig::from_file(path)?),
        None => Ok(DashboardConfig::from_default_location().unwrap_or_default()),
    }
}

fn read_table(path: &Path) -> Result<RawTable> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let table = parse_rows(&text);
    if table.headers().is_empty() {
        bail!("{} has no header line", path.display());
    }
    Ok(table)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Verify {
            dataset,
            top,
            samples,
        } => {
            let table = read_table(&dataset)?;
            let records = require_records(&table, &config.columns, &config.analytics)
                .with_context(|| format!("{} contains no records", dataset.display()))?;
            let report = coverage_report(&records, top, samples);
            if cli.json {
                return print_json(&report);
            }

            let t = &report.totals;
            println!("Records:      {}", t.total);
            println!("Valid:        {}", t.valid);
            println!("Zero:         {}", t.zero);
            println!("Placeholder:  {}", t.placeholder);
            println!("Invalid:      {}", t.invalid);
            println!("\nTop shapes:");
            for entry in &report.top_shapes {
                println!("  {:<20} {}", entry.label, entry.value);
            }
            println!("\nTop countries:");
            for entry in &report.top_countries {
                println!("  {:<20} {}", entry.label, entry.value);
            }
            println!("\nRows lacking coordinates (sample):");
            for key in &report.missing_samples {
                println!("  {}", key);
            }
        }

        Commands::Geocoded { dataset, top } => {
            let table = read_table(&dataset)?;
            let presence = geocode_presence(&table, &config.columns, top);
            if cli.json {
                return print_json(&presence);
            }

            println!("Rows:           {}", presence.total);
            println!("Both present:   {}", presence.both);
            println!("Latitude only:  {}", presence.lat_only);
            println!("Longitude only: {}", presence.lon_only);
            println!("Neither:        {}", presence.none);
            println!("\nMost common locations lacking coordinates:");
            for entry in &presence.top_missing {
                println!("  {:>6}  {}", entry.count, entry.key);
            }
        }

        Commands::ExportMissing { dataset, output } => {
            let table = read_table(&dataset)?;
            let keys = missing_location_keys(&table, &config.columns);
            missing_keys_table(&keys).write_to(&output)?;
            println!("Wrote {} location keys to {}", keys.len(), output.display());
        }

        Commands::ApplyFills {
            dataset,
            fills,
            output,
        } => {
            let mut table = read_table(&dataset)?;
            let fills = location_fills(&read_table(&fills)?);
            let applied = apply_location_fills(&mut table, &fills, &config.columns);
            table.write_to(&output)?;
            println!(
                "Filled {} rows from {} locations; wrote {}",
                applied,
                fills.len(),
                output.display()
            );
        }
    }

    Ok(())
}
