//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::session::Action;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Bakery Sales - weekly bread sales analytics
///
/// Load a week of bakery sales from CSV and explore totals, statistics and
/// most/least sold and profitable breads from an interactive menu.
///
/// Examples:
///   bakery-sales
///   bakery-sales --csv data/bread_sales_week.csv --save-plots
///   bakery-sales --run total-profit --run most-profitable
///   bakery-sales --export report.md
///   bakery-sales --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the sales CSV file
    ///
    /// Defaults to data/bread_sales_week.csv or the path in .bakery.toml.
    #[arg(long, value_name = "FILE", env = "BAKERY_CSV")]
    pub csv: Option<PathBuf>,

    /// Save charts as SVG files instead of drawing them in the terminal
    #[arg(long)]
    pub save_plots: bool,

    /// Directory for saved charts
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Currency symbol used for money values
    #[arg(long, value_name = "SYMBOL")]
    pub currency: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .bakery.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run these menu actions in order and exit (repeatable)
    #[arg(long = "run", value_name = "ACTION")]
    pub run: Vec<Action>,

    /// Row count for head/tail actions in --run mode
    #[arg(long, value_name = "N")]
    pub rows: Option<usize>,

    /// Write a full report to this file and exit
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Format for --export (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Reject the CSV if existing Total Sales/Total Cost/Profit columns disagree with their formulas
    #[arg(long)]
    pub strict_totals: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .bakery.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the exported report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.rows == Some(0) {
            return Err("Rows must be at least 1".to_string());
        }

        if self.export.is_some() && !self.run.is_empty() {
            return Err("Cannot use --export together with --run".to_string());
        }

        if let Some(ref currency) = self.currency {
            if currency.trim().is_empty() {
                return Err("Currency symbol must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the `[general] verbose` setting; `--quiet` wins over it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        }
    }
}

/// Build the log filter. Valid `directives` (usually `RUST_LOG`) replace the level.
pub fn log_filter(level: tracing::Level, directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(level.to_string().to_lowercase()))
}
