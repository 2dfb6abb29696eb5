mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::building::SummaryArgs;
use commands::projection::ProjectArgs;
use commands::scenarios::{CompareArgs, ScenarioArgs, SensitivityArgs};

/// Development viability analysis for measured buildings
#[derive(Parser)]
#[command(
    name = "bfa",
    version,
    about = "Financial viability analysis for building developments",
    long_about = "A CLI for modelling the financial viability of a building \
                  development under rent, sale and mixed exploitation \
                  strategies with decimal precision. Supports cash-flow \
                  projection, ROI/NPV/IRR metrics, NPV sensitivity sweeps, \
                  batch scenario comparison and measured-category summaries."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a year-indexed cash-flow series for a rent/sale mix
    Project(ProjectArgs),
    /// Evaluate a single exploitation scenario
    Scenario(ScenarioArgs),
    /// Evaluate and compare a batch of scenarios
    Compare(CompareArgs),
    /// Sweep NPV across discount rates for a scenario
    Sensitivity(SensitivityArgs),
    /// Summarise a measured category table (CSV)
    Summary(SummaryArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::Scenario(args) => commands::scenarios::run_scenario(args),
        Commands::Compare(args) => commands::scenarios::run_compare(args),
        Commands::Sensitivity(args) => commands::scenarios::run_sensitivity(args),
        Commands::Summary(args) => commands::building::run_summary(args),
        Commands::Version => {
            println!("bfa {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
