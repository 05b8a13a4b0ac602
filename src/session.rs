//! Session controller.
//!
//! The menu is modelled as an [`Action`] (what the user picked) and a
//! [`Command`] (the action plus its parameters). A [`Session`] owns the
//! loaded table for its whole lifetime and dispatches commands to the
//! analytics core, reporting per-action failures without ending the session.

use crate::analysis::{describe, info};
use crate::models::{RankingKind, TotalKind};
use crate::report::chart::{self, ChartSize, ChartSpec};
use crate::report::text;
use crate::table::Table;
use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

/// One entry of the menu, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Action {
    Head,
    Tail,
    Describe,
    Info,
    TotalSales,
    TotalCost,
    TotalProfit,
    MostSold,
    MostProfitable,
    LeastSold,
    LeastProfitable,
    Exit,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::Head,
        Action::Tail,
        Action::Describe,
        Action::Info,
        Action::TotalSales,
        Action::TotalCost,
        Action::TotalProfit,
        Action::MostSold,
        Action::MostProfitable,
        Action::LeastSold,
        Action::LeastProfitable,
        Action::Exit,
    ];

    /// Menu label shown next to the choice number.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Head => "Preview first rows",
            Action::Tail => "Preview last rows",
            Action::Describe => "Statistical summary",
            Action::Info => "Column summary",
            Action::TotalSales => "Show TOTAL SALES (sum of all rows)",
            Action::TotalCost => "Show TOTAL COST (sum of all rows)",
            Action::TotalProfit => "Show TOTAL PROFIT (sum of all rows)",
            Action::MostSold => "MOST SOLD bread (bar graph by Quantity)",
            Action::MostProfitable => "MOST PROFITABLE bread (bar graph by Profit)",
            Action::LeastSold => "LEAST SOLD bread (bar graph by Quantity)",
            Action::LeastProfitable => "LEAST PROFITABLE bread (bar graph by Profit)",
            Action::Exit => "Exit",
        }
    }

    /// Whether the action asks for a row count.
    pub fn needs_rows(&self) -> bool {
        matches!(self, Action::Head | Action::Tail)
    }

    /// Attach parameters to the action.
    pub fn into_command(self, rows: usize) -> Command {
        match self {
            Action::Head => Command::Head(rows),
            Action::Tail => Command::Tail(rows),
            Action::Describe => Command::Describe,
            Action::Info => Command::Info,
            Action::TotalSales => Command::Total(TotalKind::Sales),
            Action::TotalCost => Command::Total(TotalKind::Cost),
            Action::TotalProfit => Command::Total(TotalKind::Profit),
            Action::MostSold => Command::Rank(RankingKind::MostSold),
            Action::MostProfitable => Command::Rank(RankingKind::MostProfitable),
            Action::LeastSold => Command::Rank(RankingKind::LeastSold),
            Action::LeastProfitable => Command::Rank(RankingKind::LeastProfitable),
            Action::Exit => Command::Exit,
        }
    }
}

/// A fully parameterised request to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Head(usize),
    Tail(usize),
    Describe,
    Info,
    Total(TotalKind),
    Rank(RankingKind),
    Exit,
}

/// Whether the session keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Map a menu entry (`"1"` to `"12"`) to its action.
pub fn parse_choice(raw: &str) -> Option<Action> {
    let index: usize = raw.trim().parse().ok()?;
    index.checked_sub(1).and_then(|i| Action::ALL.get(i)).copied()
}

/// Parse a row count, falling back to `default` for empty, malformed or
/// non-positive input.
pub fn parse_row_count(raw: &str, default: usize) -> usize {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => n as usize,
        _ => default,
    }
}

/// Chart output settings.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Write SVG files instead of drawing in the terminal.
    pub save: bool,
    pub output_dir: PathBuf,
    pub size: ChartSize,
    pub bar_width: usize,
}

/// Presentation settings for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub currency: String,
    pub preview_rows: usize,
    pub charts: ChartOptions,
}

/// Source of interactive answers.
pub trait Prompter {
    /// Read the raw menu choice.
    fn choice(&mut self) -> Result<String>;
    /// Read the raw row count for a preview.
    fn row_count(&mut self, default: usize) -> Result<String>;
}

/// Prompts on the terminal with dialoguer.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn choice(&mut self) -> Result<String> {
        Ok(Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Enter choice (1-{})", Action::ALL.len()))
            .allow_empty(true)
            .interact_text()?)
    }

    fn row_count(&mut self, default: usize) -> Result<String> {
        Ok(Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("How many rows? (default {})", default))
            .allow_empty(true)
            .interact_text()?)
    }
}

/// An analysis session over one table.
pub struct Session<W: Write> {
    table: Table,
    options: SessionOptions,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(table: Table, options: SessionOptions, out: W) -> Self {
        Self {
            table,
            options,
            out,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Consume the session, returning its output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run one command. Schema and rendering failures are returned as errors.
    pub fn execute(&mut self, command: Command) -> Result<Flow> {
        debug!("Executing {:?}", command);
        let currency = self.options.currency.clone();

        match command {
            Command::Head(n) => {
                let range = self.table.head(n);
                let shown = range.len();
                writeln!(self.out, "\n{}", text::banner(&format!("First {} rows", shown)))?;
                write!(self.out, "{}", text::render_preview(&self.table, range))?;
            }
            Command::Tail(n) => {
                let range = self.table.tail(n);
                let shown = range.len();
                writeln!(self.out, "\n{}", text::banner(&format!("Last {} rows", shown)))?;
                write!(self.out, "{}", text::render_preview(&self.table, range))?;
            }
            Command::Describe => {
                writeln!(self.out, "\n{}", text::banner("Statistical summary"))?;
                write!(self.out, "{}", text::render_describe(&describe(&self.table)))?;
            }
            Command::Info => {
                writeln!(self.out, "\n{}", text::banner("Column summary"))?;
                write!(self.out, "{}", text::render_info(&info(&self.table)))?;
            }
            Command::Total(kind) => {
                let value = kind.compute(&mut self.table)?;
                write!(self.out, "\n{}", text::render_total(kind, value, &currency))?;
            }
            Command::Rank(kind) => {
                let ranking = kind.compute(&mut self.table)?;
                write!(self.out, "\n{}", text::render_ranking(kind, &ranking, &currency))?;

                let spec = ChartSpec::for_ranking(kind, &currency);
                let charts = &self.options.charts;
                if charts.save {
                    let path = chart::save_svg(
                        &ranking,
                        &spec,
                        charts.size,
                        &charts.output_dir,
                        kind.file_stem(),
                    )?;
                    writeln!(self.out, "Saved chart to: {}", path.display())?;
                } else {
                    let metric = kind.metric();
                    let drawn = chart::render_terminal(&ranking, &spec, charts.bar_width, |v| {
                        metric.format_value(v)
                    });
                    write!(self.out, "\n{}", drawn)?;
                }
            }
            Command::Exit => {
                writeln!(self.out, "Goodbye!")?;
                return Ok(Flow::Exit);
            }
        }

        Ok(Flow::Continue)
    }

    /// Run one command, reporting a failure for this action only.
    pub fn dispatch(&mut self, command: Command) -> Result<Flow> {
        match self.execute(command) {
            Ok(flow) => Ok(flow),
            Err(e) => {
                warn!("{:?} failed: {:#}", command, e);
                writeln!(self.out, "\nError: {:#}", e)?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Run a fixed list of commands without prompting.
    pub fn run_batch(&mut self, commands: &[Command]) -> Result<()> {
        for command in commands {
            if self.dispatch(*command)? == Flow::Exit {
                break;
            }
        }
        Ok(())
    }

    /// Print the menu.
    pub fn print_menu(&mut self) -> Result<()> {
        writeln!(self.out, "\n{}", style("Choose what you want to view:").bold())?;
        for (i, action) in Action::ALL.iter().enumerate() {
            writeln!(self.out, "{:<2} - {}", i + 1, action.label())?;
        }
        Ok(())
    }

    /// Menu loop: prompt, dispatch, repeat until Exit.
    pub fn run_interactive(&mut self, prompter: &mut impl Prompter) -> Result<()> {
        loop {
            self.print_menu()?;
            self.out.flush()?;

            let raw = prompter.choice()?;
            let Some(action) = parse_choice(&raw) else {
                writeln!(self.out, "Invalid choice, please select 1–{}.", Action::ALL.len())?;
                continue;
            };

            let default = self.options.preview_rows;
            let rows = if action.needs_rows() {
                parse_row_count(&prompter.row_count(default)?, default)
            } else {
                default
            };

            if self.dispatch(action.into_command(rows))? == Flow::Exit {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnData, COST, PRICE, PRODUCT, PROFIT, QUANTITY};
    use std::collections::VecDeque;
    use tempfile::TempDir;

    struct Scripted(VecDeque<&'static str>);

    impl Prompter for Scripted {
        fn choice(&mut self) -> Result<String> {
            self.0
                .pop_front()
                .map(String::from)
                .ok_or_else(|| anyhow::anyhow!("input exhausted"))
        }

        fn row_count(&mut self, _default: usize) -> Result<String> {
            self.choice()
        }
    }

    fn bakery() -> Table {
        Table::from_columns(vec![
            Column::source(
                PRODUCT,
                ColumnData::Text(vec![
                    Some("Pandesal".to_string()),
                    Some("Ensaymada".to_string()),
                    Some("Pandesal".to_string()),
                ]),
            ),
            Column::source(PRICE, ColumnData::Integer(vec![Some(5), Some(15), Some(5)])),
            Column::source(COST, ColumnData::Integer(vec![Some(2), Some(6), Some(2)])),
            Column::source(QUANTITY, ColumnData::Integer(vec![Some(100), Some(40), Some(20)])),
        ])
    }

    fn options(save_dir: Option<PathBuf>) -> SessionOptions {
        SessionOptions {
            currency: "₱".to_string(),
            preview_rows: 5,
            charts: ChartOptions {
                save: save_dir.is_some(),
                output_dir: save_dir.unwrap_or_else(|| PathBuf::from("outputs")),
                size: ChartSize {
                    width: 800,
                    height: 500,
                },
                bar_width: 10,
            },
        }
    }

    fn output(session: Session<Vec<u8>>) -> String {
        String::from_utf8(session.into_output()).unwrap()
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1"), Some(Action::Head));
        assert_eq!(parse_choice(" 9 "), Some(Action::MostProfitable));
        assert_eq!(parse_choice("12"), Some(Action::Exit));
        assert_eq!(parse_choice("0"), None);
        assert_eq!(parse_choice("13"), None);
        assert_eq!(parse_choice("exit"), None);
    }

    #[test]
    fn test_parse_row_count_defaults() {
        assert_eq!(parse_row_count("", 5), 5);
        assert_eq!(parse_row_count("abc", 5), 5);
        assert_eq!(parse_row_count("-3", 5), 5);
        assert_eq!(parse_row_count("0", 5), 5);
        assert_eq!(parse_row_count(" 8 ", 5), 8);
    }

    #[test]
    fn test_total_profit() {
        let mut session = Session::new(bakery(), options(None), Vec::new());
        assert_eq!(
            session.execute(Command::Total(TotalKind::Profit)).unwrap(),
            Flow::Continue
        );
        assert!(session.table().has_column(PROFIT));
        assert!(output(session).contains("=== TOTAL PROFIT (₱) ===\n720.00"));
    }

    #[test]
    fn test_preview_banner_counts_rows_shown() {
        let mut session = Session::new(bakery(), options(None), Vec::new());
        session.execute(Command::Head(50)).unwrap();
        session.execute(Command::Tail(2)).unwrap();

        let out = output(session);
        assert!(out.contains("=== First 3 rows ==="));
        assert!(!out.contains("First 50 rows"));
        assert!(out.contains("=== Last 2 rows ==="));
    }

    #[test]
    fn test_schema_error_does_not_end_session() {
        let table = Table::from_columns(vec![Column::source(
            PRODUCT,
            ColumnData::Text(vec![Some("Pandesal".to_string())]),
        )]);
        let mut session = Session::new(table, options(None), Vec::new());

        let flow = session
            .dispatch(Command::Rank(RankingKind::MostSold))
            .unwrap();

        assert_eq!(flow, Flow::Continue);
        assert_eq!(session.table().column_count(), 1);
        assert!(output(session).contains("Error: column 'Quantity' is missing"));
    }

    #[test]
    fn test_ranking_saves_chart() {
        let dir = TempDir::new().unwrap();
        let charts = dir.path().join("charts");
        let mut session = Session::new(bakery(), options(Some(charts.clone())), Vec::new());

        session
            .execute(Command::Rank(RankingKind::LeastSold))
            .unwrap();

        let out = output(session);
        assert!(out.contains("=== LEAST SOLD BREAD (by Quantity) ==="));
        assert!(out.contains("Saved chart to:"));
        assert!(charts.join("least_sold_by_quantity.svg").exists());
    }

    #[test]
    fn test_ranking_draws_terminal_chart() {
        let mut session = Session::new(bakery(), options(None), Vec::new());
        session.execute(Command::Rank(RankingKind::MostSold)).unwrap();

        let out = output(session);
        assert!(out.contains("Most Sold Breads by Quantity"));
        assert!(out.contains("██████████ 120"));
    }

    #[test]
    fn test_batch_stops_at_exit() {
        let mut session = Session::new(bakery(), options(None), Vec::new());
        session
            .run_batch(&[
                Command::Total(TotalKind::Sales),
                Command::Exit,
                Command::Total(TotalKind::Cost),
            ])
            .unwrap();

        let out = output(session);
        assert!(out.contains("TOTAL SALES"));
        assert!(out.contains("Goodbye!"));
        assert!(!out.contains("TOTAL COST"));
    }

    #[test]
    fn test_interactive_loop() {
        let mut session = Session::new(bakery(), options(None), Vec::new());
        let mut prompter = Scripted(VecDeque::from(vec!["99", "1", "x", "2", "2", "12"]));

        session.run_interactive(&mut prompter).unwrap();

        let out = output(session);
        assert!(out.contains("Choose what you want to view:"));
        assert!(out.contains("Invalid choice, please select 1–12."));
        assert!(out.contains("=== First 3 rows ==="));
        assert!(out.contains("=== Last 2 rows ==="));
        assert!(out.trim_end().ends_with("Goodbye!"));
    }

    #[test]
    fn test_action_commands() {
        assert_eq!(Action::Head.into_command(3), Command::Head(3));
        assert_eq!(
            Action::LeastProfitable.into_command(5),
            Command::Rank(RankingKind::LeastProfitable)
        );
        assert!(Action::Tail.needs_rows());
        assert!(!Action::Info.needs_rows());
    }
}
