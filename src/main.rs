//! Bakery Sales - menu-driven analytics over a week of bakery sales.
//!
//! Loads a sales CSV, then either runs the interactive menu, executes the
//! actions given with `--run`, or writes a full report with `--export`.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Source, configuration or argument error

use anyhow::{Context, Result};
use bakery_sales::analysis::verify_totals;
use bakery_sales::cli::{self, Args, OutputFormat};
use bakery_sales::config::{Config, CONFIG_FILE};
use bakery_sales::models::SalesReport;
use bakery_sales::report::{self, ChartSize};
use bakery_sales::session::{ChartOptions, Session, SessionOptions, TerminalPrompter};
use bakery_sales::table::{self, Table};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read before logging starts so `[general] verbose` applies
    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(args.log_level(config.general.verbose));

    info!("Bakery Sales v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args, config) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Session failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .bakery.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to change the CSV path, currency, and chart output.");
    Ok(())
}

/// Initialize logging based on verbosity settings. `RUST_LOG` overrides the level.
fn init_logging(level: tracing::Level) {
    let directives = std::env::var("RUST_LOG").ok();
    let filter = cli::log_filter(level, directives.as_deref());

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the table and run the requested mode. Returns the exit code.
fn run(args: Args, config: Config) -> Result<i32> {
    let mut table = load_table(&config.general.csv, !args.quiet)?;

    if config.analysis.strict_totals {
        verify_totals(&table).context("Existing derived columns failed verification")?;
    }

    if let Some(ref export_path) = args.export {
        return export_report(&mut table, &config, export_path, args.format);
    }

    let options = SessionOptions {
        currency: config.general.currency.clone(),
        preview_rows: config.general.preview_rows,
        charts: ChartOptions {
            save: config.charts.save,
            output_dir: config.charts.output_dir.clone(),
            size: ChartSize {
                width: config.charts.width,
                height: config.charts.height,
            },
            bar_width: config.charts.bar_width,
        },
    };
    let mut session = Session::new(table, options, std::io::stdout());

    if !args.run.is_empty() {
        let rows = args.rows.unwrap_or(config.general.preview_rows);
        let commands: Vec<_> = args.run.iter().map(|a| a.into_command(rows)).collect();
        session.run_batch(&commands)?;
    } else {
        session.run_interactive(&mut TerminalPrompter)?;
    }

    Ok(0)
}

/// Load the sales CSV, showing a spinner while reading.
fn load_table(path: &Path, show_progress: bool) -> Result<Table> {
    let spinner = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Loading {}", path.display()));
        Some(pb)
    } else {
        None
    };

    let result = table::load_csv(path);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let table = result?;
    if !table.is_empty() {
        println!("📥 Loaded {} rows from {}", table.row_count(), path.display());
    } else {
        warn!("{} contains no rows", path.display());
    }
    Ok(table)
}

/// Handle --export: write the full report and exit.
fn export_report(
    table: &mut Table,
    config: &Config,
    path: &Path,
    format: OutputFormat,
) -> Result<i32> {
    let source = config.general.csv.display().to_string();
    let report = SalesReport::build(table, &source, &config.general.currency)?;

    let output = match format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    std::fs::write(path, &output)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    println!("✅ Report saved to: {}", path.display());
    Ok(0)
}

/// Load configuration from file or use defaults.
///
/// Runs before the subscriber is installed, so problems go straight to stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Failed to load {}: {:#}. Using defaults.", CONFIG_FILE, e);
            Ok(Config::default())
        }
    }
}
