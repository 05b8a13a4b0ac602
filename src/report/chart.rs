//! Bar chart rendering for rankings.
//!
//! Charts are drawn either as unicode bars for the terminal or as a
//! standalone SVG file. Both read the ranking only.

use crate::analysis::Ranking;
use crate::models::RankingKind;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BAR_GLYPH: char = '█';
const NEGATIVE_GLYPH: char = '▒';

/// Titles and axis labels of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl ChartSpec {
    /// Titles for one of the fixed rankings.
    pub fn for_ranking(kind: RankingKind, currency: &str) -> Self {
        Self {
            title: kind.title().to_string(),
            x_label: kind.x_label().to_string(),
            y_label: kind.y_label(currency),
        }
    }
}

/// Pixel dimensions of an SVG chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

/// Draw the ranking as horizontal unicode bars, longest bar `bar_width` cells.
pub fn render_terminal(
    ranking: &Ranking,
    spec: &ChartSpec,
    bar_width: usize,
    format_value: impl Fn(f64) -> String,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", spec.title);
    let _ = writeln!(out, "{}", "─".repeat(spec.title.chars().count()));

    if ranking.is_empty() {
        let _ = writeln!(out, "(no data)");
        return out;
    }

    let max_abs = ranking
        .entries
        .iter()
        .map(|e| e.value.abs())
        .fold(0.0_f64, f64::max);
    let label_width = ranking
        .entries
        .iter()
        .map(|e| e.label().chars().count())
        .max()
        .unwrap_or(0)
        .max(spec.x_label.chars().count());

    let _ = writeln!(out, "{:<w$}  {}", spec.x_label, spec.y_label, w = label_width);
    for entry in &ranking.entries {
        let cells = if max_abs > 0.0 {
            ((entry.value.abs() / max_abs) * bar_width as f64).round() as usize
        } else {
            0
        };
        let glyph = if entry.value < 0.0 { NEGATIVE_GLYPH } else { BAR_GLYPH };
        let bar: String = std::iter::repeat(glyph).take(cells).collect();
        let _ = writeln!(
            out,
            "{:<w$}  {} {}",
            entry.label(),
            bar,
            format_value(entry.value),
            w = label_width
        );
    }

    out
}

/// Draw the ranking as a vertical bar chart in SVG.
pub fn render_svg(ranking: &Ranking, spec: &ChartSpec, size: ChartSize) -> String {
    let width = size.width.max(200) as f64;
    let height = size.height.max(200) as f64;

    let (left, right, top, bottom) = (80.0, 20.0, 50.0, 110.0);
    let plot_w = width - left - right;
    let plot_h = height - top - bottom;

    let max = ranking.entries.iter().map(|e| e.value).fold(0.0_f64, f64::max);
    let min = ranking.entries.iter().map(|e| e.value).fold(0.0_f64, f64::min);
    let span = if max - min > 0.0 { max - min } else { 1.0 };
    let y_of = |v: f64| top + (max - v) / span * plot_h;
    let baseline = y_of(0.0);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = width,
        h = height
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="28" font-size="18" text-anchor="middle">{}</text>"#,
        width / 2.0,
        escape(&spec.title)
    );

    let slot = if ranking.is_empty() {
        plot_w
    } else {
        plot_w / ranking.len() as f64
    };
    let bar_w = slot * 0.6;

    for (i, entry) in ranking.entries.iter().enumerate() {
        let x = left + slot * i as f64 + (slot - bar_w) / 2.0;
        let y = y_of(entry.value);
        let (bar_top, bar_h) = if entry.value >= 0.0 {
            (y, baseline - y)
        } else {
            (baseline, y - baseline)
        };
        let _ = writeln!(
            svg,
            r##"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="#1f77b4"><title>{}: {}</title></rect>"##,
            x,
            bar_top,
            bar_w,
            bar_h,
            escape(entry.label()),
            entry.value
        );

        let label_x = x + bar_w / 2.0;
        let label_y = top + plot_h + 14.0;
        let _ = writeln!(
            svg,
            r#"<text x="{lx:.1}" y="{ly:.1}" font-size="12" text-anchor="end" transform="rotate(-45 {lx:.1} {ly:.1})">{}</text>"#,
            escape(entry.label()),
            lx = label_x,
            ly = label_y
        );
    }

    // Axes
    let _ = writeln!(
        svg,
        r#"<line x1="{l}" y1="{t}" x2="{l}" y2="{b:.1}" stroke="black"/>"#,
        l = left,
        t = top,
        b = top + plot_h
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{l}" y1="{y:.1}" x2="{r:.1}" y2="{y:.1}" stroke="black"/>"#,
        l = left,
        r = left + plot_w,
        y = baseline
    );
    for value in [max, min] {
        if value != 0.0 {
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{}</text>"#,
                left - 6.0,
                y_of(value) + 4.0,
                value
            );
        }
    }
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">0</text>"#,
        left - 6.0,
        baseline + 4.0
    );

    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="13" text-anchor="middle">{}</text>"#,
        left + plot_w / 2.0,
        height - 10.0,
        escape(&spec.x_label)
    );
    let _ = writeln!(
        svg,
        r#"<text x="18" y="{y:.1}" font-size="13" text-anchor="middle" transform="rotate(-90 18 {y:.1})">{}</text>"#,
        escape(&spec.y_label),
        y = top + plot_h / 2.0
    );
    svg.push_str("</svg>\n");

    svg
}

/// Write the ranking's SVG chart to `dir/<file_stem>.svg`, creating `dir`.
pub fn save_svg(
    ranking: &Ranking,
    spec: &ChartSpec,
    size: ChartSize,
    dir: &Path,
    file_stem: &str,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(format!("{}.svg", file_stem));
    debug!("Rendering {} bars to {}", ranking.len(), path.display());

    std::fs::write(&path, render_svg(ranking, spec, size))
        .with_context(|| format!("Failed to write chart to {}", path.display()))?;

    info!("Saved chart to {}", path.display());
    Ok(path)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
