mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::warn;
use std::process;

use commands::calculate::{CalculateArgs, ChartArgs};
use commands::export::ExportArgs;
use commands::theme::ThemeArgs;
use eduloan_core::preferences::{PreferenceStore, Theme};

/// Education loan calculator
#[derive(Parser)]
#[command(
    name = "eduloan",
    version,
    about = "Education loan calculator",
    long_about = "Works out the interest that builds up on yearly education fees while \
                  studying, the capitalised loan, the monthly EMI and total repayment. \
                  Results print as a summary table and chart breakdown, and can be \
                  saved as a one-page PDF."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate study interest, EMI and totals
    Calculate(CalculateArgs),
    /// Print the pie-chart breakdown (fees, study interest, EMI interest)
    Chart(ChartArgs),
    /// Save the loan summary as a one-page PDF
    Export(ExportArgs),
    /// Show or change the light/dark theme preference
    Theme(ThemeArgs),
    /// Edit the form line by line from stdin
    Session,
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

/// Stored theme; a broken preference file never stops a calculation.
fn current_theme() -> Theme {
    PreferenceStore::from_env()
        .and_then(|store| store.load_theme())
        .unwrap_or_else(|e| {
            warn!("falling back to light theme: {e}");
            Theme::default()
        })
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let theme = current_theme();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::calculate::run_calculate(args),
        Commands::Chart(args) => commands::calculate::run_chart(args),
        Commands::Export(args) => commands::export::run_export(args),
        Commands::Theme(args) => commands::theme::run_theme(args),
        Commands::Session => match commands::session::run_session(&cli.output, theme) {
            Ok(()) => process::exit(0),
            Err(e) => Err(e),
        },
        Commands::Version => {
            println!("eduloan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value, theme);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
