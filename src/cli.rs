//! Command-line interface for the harvester.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::batch;
use crate::config::Config;
use crate::error::Result;
use crate::export::write_csv;
use crate::http::create_client;
use crate::normalize::EventTypeFilter;

/// 25Live Harvester - Download reservation data from the 25Live API.
#[derive(Parser)]
#[command(name = "r25-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape reservations over a date horizon in fixed-size batches.
    Scrape {
        /// Total number of days to scrape ahead
        #[arg(long, default_value_t = 14)]
        days_ahead: u32,

        /// Number of days per batch window
        #[arg(long, default_value_t = 7)]
        step_size: u32,

        /// Event-type substrings to keep (default: BL, IN)
        #[arg(long = "event-type")]
        event_types: Vec<String>,

        /// Write the normalized records to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape {
            days_ahead,
            step_size,
            event_types,
            output,
        } => scrape_command(days_ahead, step_size, event_types, output.as_deref()),
    }
}

/// Execute the scrape command.
fn scrape_command(
    days_ahead: u32,
    step_size: u32,
    event_types: Vec<String>,
    output: Option<&std::path::Path>,
) -> Result<()> {
    // Fail fast on configuration before any network traffic
    let config = Config::from_env()?;
    let client = create_client()?;

    let filter = if event_types.is_empty() {
        EventTypeFilter::default()
    } else {
        EventTypeFilter::new(event_types)
    };

    println!(
        "{} the next {} days in {}-day batches",
        style("Scraping").bold(),
        style(days_ahead).cyan(),
        style(step_size).cyan()
    );
    println!();

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Fetching reservations...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = match batch::run(&client, &config, days_ahead, step_size, &filter) {
        Ok(report) => report,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.finish_and_clear();

    for window in &report.failed_windows {
        println!(
            "{} window {} failed and was skipped",
            style("Warning:").yellow().bold(),
            window
        );
    }

    println!(
        "{} {} reservations in {:.2} seconds",
        style("Found").green().bold(),
        report.total_records(),
        report.elapsed.as_secs_f64()
    );

    if let Some(path) = output {
        write_csv(&report.records, path)?;
        println!(
            "{} {}",
            style("Saved to:").green().bold(),
            path.display()
        );
    }

    Ok(())
}
