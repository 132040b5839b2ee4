//! Zoning Lookup Command Line Interface
//!
//! # Usage
//!
//! ```bash
//! # Address → parcel, zoning and rules
//! zoning_cli address "1 Dr Carlton B Goodlett Pl, San Francisco"
//!
//! # Coordinate lookup
//! zoning_cli lookup --lat 37.7793 --lng -122.4193
//!
//! # Geocode only
//! zoning_cli geocode "Ferry Building"
//!
//! # Rules for a zone code
//! zoning_cli rules "RH-2 (Residential House, Two-Family)"
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parcel_zoning::rules::{RuleMatch, ZoningRule};
use parcel_zoning::{Coordinate, GeocodeAnswer, LookupConfig, ResolutionResult, ZoningLookup};

#[derive(Parser)]
#[command(name = "zoning_cli")]
#[command(version)]
#[command(about = "Look up parcel, zoning district and zoning rules for an address")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: json or pretty (default)
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// Log outbound requests to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Geocode an address, then look up what is there
    Address {
        /// Free-text address
        address: String,
    },

    /// Look up parcel, zoning and rules at a coordinate
    Lookup {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },

    /// Geocode an address only
    Geocode {
        /// Free-text address
        address: String,
    },

    /// Show the rules for a zone code
    Rules {
        /// Zone code, e.g. RH-2
        code: String,
    },

    /// List every zone code in the rules catalog
    Catalog,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "parcel_zoning=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    match run(cli.command, cli.format).await {
        Ok(found) => {
            if found {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Err(e) => {
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

/// Runs a command; `Ok(false)` means it ran but found nothing
async fn run(command: Commands, format: OutputFormat) -> Result<bool> {
    let config = LookupConfig::load().context("Failed to load configuration")?;
    let service = ZoningLookup::from_config(&config).context("Failed to initialize lookup")?;

    match command {
        Commands::Address { address } => {
            let Some(found) = service.lookup_address(&address).await? else {
                print_missing(format, &format!("Address not found: {}", address));
                return Ok(false);
            };
            match format {
                OutputFormat::Json => print_json(&found)?,
                OutputFormat::Pretty => {
                    print_geocode(&found.geocode);
                    println!();
                    print_result(&found.result);
                }
            }
        }
        Commands::Lookup { lat, lng } => {
            let result = service.lookup(Coordinate::new(lat, lng)).await?;
            match format {
                OutputFormat::Json => print_json(&result)?,
                OutputFormat::Pretty => print_result(&result),
            }
        }
        Commands::Geocode { address } => {
            let Some(answer) = service.geocode(&address).await else {
                print_missing(format, &format!("Address not found: {}", address));
                return Ok(false);
            };
            match format {
                OutputFormat::Json => print_json(&answer)?,
                OutputFormat::Pretty => print_geocode(&answer),
            }
        }
        Commands::Rules { code } => match service.match_rule(Some(code.as_str())) {
            RuleMatch::Matched(rule) => match format {
                OutputFormat::Json => print_json(rule)?,
                OutputFormat::Pretty => print_rule(rule),
            },
            missing => {
                print_missing(format, &missing.diagnostic().unwrap_or_default());
                return Ok(false);
            }
        },
        Commands::Catalog => {
            let catalog = service.catalog();
            match format {
                OutputFormat::Json => print_json(&catalog.rules().collect::<Vec<_>>())?,
                OutputFormat::Pretty => {
                    println!(
                        "{} ({} rules)",
                        catalog.version().unwrap_or("unversioned").bold(),
                        catalog.len()
                    );
                    for rule in catalog.rules() {
                        println!("  {:<10} {}", rule.zone_code.cyan(), rule.name);
                    }
                }
            }
        }
    }

    Ok(true)
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("JSON serialization failed")?
    );
    Ok(())
}

fn print_missing(format: OutputFormat, message: &str) {
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "message": message })),
        OutputFormat::Pretty => println!("{} {}", "--".yellow(), message),
    }
}

fn print_geocode(answer: &GeocodeAnswer) {
    println!("{}", answer.display_label.bold());
    println!("  {}", answer.coordinate.to_string().dimmed());
}

fn print_result(result: &ResolutionResult) {
    match result.parcel() {
        Some(p) => println!(
            "{:<12} {} (block {}, lot {})",
            "Parcel".bold(),
            p.parcel_id,
            p.block_number,
            p.lot_number
        ),
        None => println!("{:<12} {}", "Parcel".bold(), "not found".dimmed()),
    }

    match result.zoning() {
        Some(z) if z.zone_name.is_empty() => {
            println!("{:<12} {}", "Zoning".bold(), z.zone_code.cyan())
        }
        Some(z) => println!(
            "{:<12} {} ({})",
            "Zoning".bold(),
            z.zone_code.cyan(),
            z.zone_name
        ),
        None => println!("{:<12} {}", "Zoning".bold(), "not found".dimmed()),
    }

    match result.height_bulk() {
        Some(hb) => println!(
            "{:<12} height {}, bulk {}",
            "Height/Bulk".bold(),
            or_dash(&hb.height_limit_label),
            or_dash(&hb.bulk_district_label)
        ),
        None => println!("{:<12} {}", "Height/Bulk".bold(), "not found".dimmed()),
    }

    println!();
    match (result.zoning_rule(), result.zoning_rule_diagnostic()) {
        (Some(rule), _) => print_rule(rule),
        (None, Some(diagnostic)) => println!("{} {}", "--".yellow(), diagnostic),
        (None, None) => {}
    }
}

fn print_rule(rule: &ZoningRule) {
    println!("{} {}", rule.zone_code.cyan().bold(), rule.name.bold());
    if let Some(description) = &rule.description {
        println!("  {}", description);
    }
    print_uses("Permitted", rule.permitted_uses.as_deref());
    print_uses("Conditional", rule.conditional_uses.as_deref());
    print_uses("Prohibited", rule.prohibited_uses.as_deref());
    if let Some(note) = &rule.max_height_note {
        println!("  {} {}", "Height:".bold(), note);
    }
    if let Some(note) = &rule.bulk_note {
        println!("  {} {}", "Bulk:".bold(), note);
    }
}

fn print_uses(label: &str, uses: Option<&[String]>) {
    let Some(uses) = uses.filter(|u| !u.is_empty()) else {
        return;
    };
    println!("  {}", format!("{}:", label).bold());
    for u in uses {
        println!("    - {}", u);
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}
