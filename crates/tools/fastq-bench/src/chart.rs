//! Grouped bar charts rendered as standalone SVG.
//!
//! One group per method, one bar per process, optional stddev error bars.

use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::json::ensure_extension;
use crate::model::Process;
use crate::table::Pivot;

const MARGIN_LEFT: f64 = 72.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 56.0;
const MARGIN_BOTTOM: f64 = 72.0;
const Y_TICKS: u32 = 5;
const PALETTE: [&str; 4] = ["#4e79a7", "#f28e2b", "#59a14f", "#e15759"];

/// Size and decoration of a rendered chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartStyle {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Title prefix; the metric label is appended.
    pub title: String,
    /// Draw ±stddev whiskers on each bar.
    pub error_bars: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 480,
            title: "FASTQ compression benchmark".into(),
            error_bars: true,
        }
    }
}

/// One bar: a mean and its spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Bar height.
    pub value: f64,
    /// Half-length of the error whisker.
    pub error: f64,
}

/// A cluster of bars sharing an x-axis label.
#[derive(Debug, Clone, PartialEq)]
pub struct BarGroup {
    /// Method name.
    pub label: String,
    /// One slot per series; `None` leaves a gap.
    pub bars: Vec<Option<Bar>>,
}

/// Chart data independent of rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    /// Chart title.
    pub title: String,
    /// Y-axis title.
    pub y_label: String,
    /// Legend entries, one per bar slot.
    pub series: Vec<Process>,
    /// Bar clusters in x order.
    pub groups: Vec<BarGroup>,
}

impl BarChart {
    /// Build a chart from a pivot: methods become groups, processes series.
    pub fn from_pivot(pivot: &Pivot, title: &str) -> Self {
        let groups = pivot
            .methods
            .iter()
            .zip(&pivot.cells)
            .map(|(method, cells)| BarGroup {
                label: method.clone(),
                bars: cells
                    .iter()
                    .map(|cell| {
                        cell.map(|stats| Bar {
                            value: stats.mean,
                            error: stats.stddev,
                        })
                    })
                    .collect(),
            })
            .collect();

        Self {
            title: format!("{title}: {}", pivot.metric.label()),
            y_label: format!("{} ({})", pivot.metric.label(), pivot.metric.unit()),
            series: pivot.processes.clone(),
            groups,
        }
    }

    /// Number of bars actually drawn.
    pub fn bar_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.bars.iter())
            .flatten()
            .count()
    }

    /// Render the chart as an SVG document.
    pub fn render_svg(&self, style: &ChartStyle) -> String {
        let width = f64::from(style.width.max(200));
        let height = f64::from(style.height.max(150));
        let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = height - MARGIN_TOP - MARGIN_BOTTOM;
        let baseline = MARGIN_TOP + plot_h;

        let extent = self
            .groups
            .iter()
            .flat_map(|g| g.bars.iter().flatten())
            .map(|bar| {
                if style.error_bars {
                    bar.value + bar.error
                } else {
                    bar.value
                }
            })
            .fold(0.0, f64::max);
        let y_max = nice_ceiling(extent);
        let scale = |v: f64| plot_h * (v / y_max).clamp(0.0, 1.0);

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif" font-size="12">"#
        );
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
        let _ = writeln!(
            svg,
            r#"<text class="title" x="{}" y="28" text-anchor="middle" font-size="16">{}</text>"#,
            width / 2.0,
            escape_xml(&self.title)
        );

        // Y axis, gridlines and tick labels.
        for i in 0..=Y_TICKS {
            let value = y_max * f64::from(i) / f64::from(Y_TICKS);
            let y = baseline - scale(value);
            let _ = writeln!(
                svg,
                r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#dddddd"/>"##,
                MARGIN_LEFT + plot_w
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
                MARGIN_LEFT - 6.0,
                y + 4.0,
                format_tick(value)
            );
        }
        let _ = writeln!(
            svg,
            r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{baseline:.1}" stroke="black"/>"#
        );
        let _ = writeln!(
            svg,
            r#"<line x1="{MARGIN_LEFT}" y1="{baseline:.1}" x2="{:.1}" y2="{baseline:.1}" stroke="black"/>"#,
            MARGIN_LEFT + plot_w
        );
        let _ = writeln!(
            svg,
            r#"<text x="16" y="{:.1}" text-anchor="middle" transform="rotate(-90 16 {:.1})">{}</text>"#,
            MARGIN_TOP + plot_h / 2.0,
            MARGIN_TOP + plot_h / 2.0,
            escape_xml(&self.y_label)
        );

        // Bars.
        if !self.groups.is_empty() && !self.series.is_empty() {
            let group_w = plot_w / self.groups.len() as f64;
            let bar_w = group_w * 0.8 / self.series.len() as f64;
            for (gi, group) in self.groups.iter().enumerate() {
                let group_x = MARGIN_LEFT + group_w * gi as f64 + group_w * 0.1;
                for (si, bar) in group.bars.iter().enumerate() {
                    let Some(bar) = bar else { continue };
                    let x = group_x + bar_w * si as f64;
                    let h = scale(bar.value);
                    let _ = writeln!(
                        svg,
                        r#"<rect class="bar" x="{x:.1}" y="{:.1}" width="{:.1}" height="{h:.1}" fill="{}"><title>{} {}: {:.3}</title></rect>"#,
                        baseline - h,
                        bar_w * 0.95,
                        PALETTE[si % PALETTE.len()],
                        escape_xml(&group.label),
                        self.series.get(si).map_or("", |p| p.as_str()),
                        bar.value
                    );
                    if style.error_bars && bar.error > 0.0 {
                        let cx = x + bar_w * 0.95 / 2.0;
                        let top = baseline - scale(bar.value + bar.error);
                        let bottom = baseline - scale((bar.value - bar.error).max(0.0));
                        let _ = writeln!(
                            svg,
                            r#"<path class="error" d="M{cx:.1} {top:.1}V{bottom:.1}M{:.1} {top:.1}H{:.1}M{:.1} {bottom:.1}H{:.1}" stroke="black" fill="none"/>"#,
                            cx - 4.0,
                            cx + 4.0,
                            cx - 4.0,
                            cx + 4.0
                        );
                    }
                }
                let _ = writeln!(
                    svg,
                    r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
                    MARGIN_LEFT + group_w * (gi as f64 + 0.5),
                    baseline + 18.0,
                    escape_xml(&group.label)
                );
            }
        }

        // Legend.
        for (si, process) in self.series.iter().enumerate() {
            let x = MARGIN_LEFT + 110.0 * si as f64;
            let y = height - 24.0;
            let _ = writeln!(
                svg,
                r#"<rect x="{x:.1}" y="{:.1}" width="12" height="12" fill="{}"/><text x="{:.1}" y="{y:.1}">{}</text>"#,
                y - 10.0,
                PALETTE[si % PALETTE.len()],
                x + 18.0,
                process.as_str()
            );
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Render and write the chart to a `.svg` file.
    pub fn write_svg(&self, style: &ChartStyle, path: &Path) -> Result<()> {
        ensure_extension(path, "svg")?;
        std::fs::write(path, self.render_svg(style))
            .with_context(|| format!("writing SVG to {}", path.display()))
    }
}

/// Round `value` up to 1, 2, 2.5 or 5 times a power of ten.
fn nice_ceiling(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(value.log10().floor());
    let normalized = value / magnitude;
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|&step| normalized <= step + 1e-9)
        .unwrap_or(10.0);
    step * magnitude
}

fn format_tick(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e9 {
        format!("{value:.0}")
    } else {
        let s = format!("{value:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::Stats;
    use crate::table::Metric;

    fn stats(mean: f64, stddev: f64) -> Option<Stats> {
        Some(Stats {
            count: 3,
            mean,
            stddev,
            min: mean,
            median: mean,
            max: mean,
        })
    }

    fn pivot() -> Pivot {
        Pivot {
            metric: Metric::Elapsed,
            methods: vec!["bzip2".into(), "gzip".into(), "x<z>".into()],
            processes: vec![Process::Compress, Process::Decompress],
            cells: vec![
                vec![stats(4.0, 0.5), stats(2.0, 0.1)],
                vec![stats(1.0, 0.2), stats(0.5, 0.0)],
                vec![stats(7.0, 1.0), None],
            ],
        }
    }

    #[test]
    fn chart_from_pivot_keeps_layout() {
        let chart = BarChart::from_pivot(&pivot(), "Bench");
        assert_eq!(chart.title, "Bench: Elapsed time");
        assert_eq!(chart.y_label, "Elapsed time (s)");
        assert_eq!(chart.groups.len(), 3);
        assert_eq!(chart.bar_count(), 5);
        assert_eq!(chart.groups[2].bars[1], None);
    }

    #[test]
    fn svg_has_one_rect_per_bar_and_escapes_labels() {
        let chart = BarChart::from_pivot(&pivot(), "A & B");
        let svg = chart.render_svg(&ChartStyle::default());
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(r#"class="bar""#).count(), 5);
        // The zero-stddev bar gets no whisker.
        assert_eq!(svg.matches(r#"class="error""#).count(), 4);
        assert!(svg.contains("A &amp; B: Elapsed time"));
        assert!(svg.contains("x&lt;z&gt;"));
        assert!(!svg.contains("x<z>"));
    }

    #[test]
    fn error_bars_can_be_disabled() {
        let style = ChartStyle {
            error_bars: false,
            ..ChartStyle::default()
        };
        let svg = BarChart::from_pivot(&pivot(), "t").render_svg(&style);
        assert_eq!(svg.matches(r#"class="error""#).count(), 0);
    }

    #[test]
    fn nice_ceiling_rounds_up() {
        assert!((nice_ceiling(8.0) - 10.0).abs() < 1e-9);
        assert!((nice_ceiling(1.7) - 2.0).abs() < 1e-9);
        assert!((nice_ceiling(0.22) - 0.25).abs() < 1e-9);
        assert!((nice_ceiling(430.0) - 500.0).abs() < 1e-9);
        assert!((nice_ceiling(0.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn write_svg_checks_extension() {
        let chart = BarChart::from_pivot(&pivot(), "t");
        let err = chart
            .write_svg(&ChartStyle::default(), Path::new("chart.png"))
            .unwrap_err();
        assert!(err.to_string().contains(".svg"));
    }
}
