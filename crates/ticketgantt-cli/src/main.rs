//! ticketgantt CLI - Gantt chart data from ticket reports
//!
//! Lists the reports in a data file and assembles chart data for one of them.

mod data;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use ticketgantt_chart::{build_chart, list_charts};
use ticketgantt_core::{GanttConfig, ReportId};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use data::JsonDataSource;

#[derive(Parser)]
#[command(name = "ticketgantt")]
#[command(author, version, about = "Gantt chart data from ticket reports", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file with a [gantt-charts] table
    #[arg(short, long, global = true, env = "TICKETGANTT_CONFIG", value_name = "TOML")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the reports available as charts
    Reports {
        /// Data file with reports and tickets
        #[arg(short, long, value_name = "FILE")]
        data: PathBuf,
    },

    /// Assemble chart data for a report and print it as JSON
    Chart {
        /// Data file with reports and tickets
        #[arg(short, long, value_name = "FILE")]
        data: PathBuf,

        /// Report id
        #[arg(short, long)]
        report: ReportId,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// List the tickets of a report that cannot be placed on the chart
    Check {
        /// Data file with reports and tickets
        #[arg(short, long, value_name = "FILE")]
        data: PathBuf,

        /// Report id
        #[arg(short, long)]
        report: ReportId,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Reports { data } => {
            let source = JsonDataSource::load(&data)?;
            for report in list_charts(&source)? {
                println!("{}\t{}", report.id, report.title);
            }
        }
        Commands::Chart {
            data,
            report,
            compact,
        } => {
            let source = JsonDataSource::load(&data)?;
            let chart = build_chart(&source, &source, report, &config)
                .with_context(|| format!("failed to build chart for report {}", report))?;

            let json = if compact {
                serde_json::to_string(&chart)?
            } else {
                serde_json::to_string_pretty(&chart)?
            };
            println!("{}", json);
        }
        Commands::Check { data, report } => {
            let source = JsonDataSource::load(&data)?;
            let chart = build_chart(&source, &source, report, &config)
                .with_context(|| format!("failed to build chart for report {}", report))?;

            for broken in &chart.broken {
                println!("#{}: {}", broken.id, broken.error);
            }
            if chart.broken_count > 0 {
                eprintln!(
                    "{} of {} tickets cannot be charted",
                    chart.broken_count,
                    chart.broken_count + chart.tickets.len()
                );
                return Ok(ExitCode::FAILURE);
            }
            println!("{}: all {} tickets charted", chart.title, chart.tickets.len());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_config(path: Option<&Path>) -> Result<GanttConfig> {
    let Some(path) = path else {
        return Ok(GanttConfig::default());
    };

    debug!(path = %path.display(), "loading configuration");
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    GanttConfig::from_toml_str(&content).with_context(|| format!("invalid configuration in {}", path.display()))
}
