//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.bakery.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".bakery.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Chart settings.
    #[serde(default)]
    pub charts: ChartConfig,

    /// Analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Sales CSV to load.
    #[serde(default = "default_csv")]
    pub csv: PathBuf,

    /// Currency symbol for money values.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Rows shown by head/tail previews when none are entered.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            csv: default_csv(),
            currency: default_currency(),
            preview_rows: default_preview_rows(),
            verbose: false,
        }
    }
}

fn default_csv() -> PathBuf {
    PathBuf::from("data").join("bread_sales_week.csv")
}

fn default_currency() -> String {
    "₱".to_string()
}

fn default_preview_rows() -> usize {
    5
}

/// Chart rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Save charts as SVG files instead of drawing them in the terminal.
    #[serde(default)]
    pub save: bool,

    /// Directory saved charts are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// SVG width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// SVG height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Terminal width of the longest bar, in cells.
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            save: false,
            output_dir: default_output_dir(),
            width: default_width(),
            height: default_height(),
            bar_width: default_bar_width(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    500
}

fn default_bar_width() -> usize {
    40
}

/// Analysis settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Reject a source whose Total Sales / Total Cost / Profit columns
    /// disagree with their formulas.
    #[serde(default)]
    pub strict_totals: bool,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.bakery.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref csv) = args.csv {
            self.general.csv = csv.clone();
        }
        if let Some(ref currency) = args.currency {
            self.general.currency = currency.clone();
        }
        if let Some(ref output_dir) = args.output_dir {
            self.charts.output_dir = output_dir.clone();
        }

        // Flags always override
        if args.save_plots {
            self.charts.save = true;
        }
        if args.strict_totals {
            self.analysis.strict_totals = true;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.csv, Path::new("data/bread_sales_week.csv"));
        assert_eq!(config.general.currency, "₱");
        assert_eq!(config.general.preview_rows, 5);
        assert!(!config.charts.save);
        assert_eq!(config.charts.output_dir, Path::new("outputs"));
        assert!(!config.analysis.strict_totals);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
csv = "sales/october.csv"
currency = "PHP"
preview_rows = 10

[charts]
save = true
width = 1024

[analysis]
strict_totals = true
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.csv, Path::new("sales/october.csv"));
        assert_eq!(config.general.currency, "PHP");
        assert_eq!(config.general.preview_rows, 10);
        assert!(config.charts.save);
        assert_eq!(config.charts.width, 1024);
        assert_eq!(config.charts.height, 500);
        assert!(config.analysis.strict_totals);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[charts]"));
        assert!(toml_str.contains("[analysis]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.charts.bar_width, 40);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(dir.path().join(CONFIG_FILE), "[charts]\nsave = true\n").unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert!(config.charts.save);

        std::fs::write(dir.path().join(CONFIG_FILE), "[charts\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }
}
