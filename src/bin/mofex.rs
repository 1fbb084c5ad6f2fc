//! Mofex CLI - command-line interface for the feature-expansion engine
//!
//! Commands:
//! - expand: expand a base feature catalog JSON into the derived set
//! - inspect: summarize a catalog by feature type

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use motility_features::{expand, FeatureCatalog, FeatureType, ENGINE_VERSION};

/// Mofex - expand posture/motion feature catalogs
#[derive(Parser)]
#[command(name = "mofex")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Expand posture and motion feature catalogs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a base catalog into the full derived feature set
    Expand {
        /// Input catalog JSON (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Write the expansion report to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Force compact JSON even on a terminal
        #[arg(long)]
        compact: bool,
    },

    /// Summarize a catalog by feature type
    Inspect {
        /// Input catalog JSON (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Expand {
            input,
            output,
            report,
            compact,
        } => run_expand(&input, &output, report.as_deref(), compact),
        Commands::Inspect { input } => run_inspect(&input),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("mofex: {err}");
            ExitCode::FAILURE
        }
    }
}

fn read_input(path: &std::path::Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        fs::read_to_string(path)
    }
}

fn write_output(path: &std::path::Path, contents: &str) -> io::Result<()> {
    if path.as_os_str() == "-" {
        let mut stdout = io::stdout();
        stdout.write_all(contents.as_bytes())?;
        stdout.write_all(b"\n")
    } else {
        fs::write(path, contents)
    }
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String, serde_json::Error> {
    if !compact && atty::is(atty::Stream::Stdout) {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

fn run_expand(
    input: &std::path::Path,
    output: &std::path::Path,
    report_path: Option<&std::path::Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = read_input(input)?;
    let catalog: FeatureCatalog = serde_json::from_str(&raw)?;

    let expansion = expand(&catalog);

    for skipped in &expansion.report.skipped {
        eprintln!("skipped {}: {}", skipped.name, skipped.reason);
    }

    write_output(output, &to_json(&expansion.catalog, compact)?)?;

    if let Some(path) = report_path {
        fs::write(path, serde_json::to_string_pretty(&expansion.report)?)?;
    }

    Ok(())
}

fn run_inspect(input: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    let raw = read_input(input)?;
    let catalog: FeatureCatalog = serde_json::from_str(&raw)?;

    let mut counts = [0usize; 4];
    for feature in catalog.iter() {
        let slot = match feature.spec.feature_type {
            FeatureType::Simple => 0,
            FeatureType::Movement => 1,
            FeatureType::Event => 2,
            FeatureType::ExpandedMovement => 3,
        };
        counts[slot] += 1;
    }

    println!("features: {}", catalog.len());
    println!("  simple:            {}", counts[0]);
    println!("  movement:          {}", counts[1]);
    println!("  event:             {}", counts[2]);
    println!("  expanded_movement: {}", counts[3]);

    Ok(())
}
