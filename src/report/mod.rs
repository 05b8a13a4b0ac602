//! Report rendering: terminal text, bar charts, and exported reports.

pub mod chart;
pub mod generator;
pub mod text;

pub use chart::{render_svg, render_terminal, save_svg, ChartSize, ChartSpec};
pub use generator::{generate_json_report, generate_markdown_report};
