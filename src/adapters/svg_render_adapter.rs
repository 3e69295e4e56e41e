//! SVG rendering adapter implementing RenderPort.
//!
//! Every axis maps onto the same plot box: the x-scale is shared, each axis
//! keeps its own y-limits. Only axes whose policy shows y tick labels get a
//! labelled scale on the left edge.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::domain::chart::{Axis, Figure, PlotKind};
use crate::domain::error::PlotError;
use crate::domain::legend::{Legend, LegendPlacement};
use crate::ports::render_port::RenderPort;

const PX_PER_INCH: f64 = 100.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 80.0;
const X_TICKS: usize = 8;
const Y_TICKS: usize = 5;
const LEGEND_ROW: f64 = 16.0;
const LEGEND_WIDTH: f64 = 140.0;
const BAR_FILL: f64 = 0.8;

/// Writes the figure as an SVG document when displayed.
pub struct SvgRenderAdapter {
    output_path: PathBuf,
}

impl SvgRenderAdapter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

impl RenderPort for SvgRenderAdapter {
    fn display(&mut self, figure: &Figure) -> Result<(), PlotError> {
        let svg = render_svg(figure);
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.output_path, svg)?;
        log::info!("chart written to {}", self.output_path.display());
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Plot area in pixels.
#[derive(Debug, Clone, Copy)]
struct PlotBox {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PlotBox {
    fn for_figure(width: f64, height: f64) -> Self {
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        }
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Shared time scale, `[0, 1]` across the x-range.
struct TimeScale {
    start: NaiveDateTime,
    span_secs: f64,
}

impl TimeScale {
    fn new(range: Option<(NaiveDateTime, NaiveDateTime)>) -> Option<Self> {
        let (start, end) = range?;
        let span = (end - start).num_seconds() as f64;
        Some(Self {
            start,
            span_secs: span,
        })
    }

    fn frac(&self, t: NaiveDateTime) -> f64 {
        if self.span_secs <= 0.0 {
            return 0.5;
        }
        (t - self.start).num_seconds() as f64 / self.span_secs
    }

    fn at(&self, frac: f64) -> NaiveDateTime {
        self.start + chrono::Duration::seconds((self.span_secs * frac).round() as i64)
    }
}

fn y_frac(axis: &Axis, v: f64) -> f64 {
    let (lo, hi) = axis.y_limits();
    if hi > lo { (v - lo) / (hi - lo) } else { 0.5 }
}

fn fmt_value(v: f64) -> String {
    if v.abs() >= 1000.0 {
        format!("{:.0}", v)
    } else if v.abs() >= 10.0 {
        format!("{:.1}", v)
    } else {
        format!("{:.2}", v)
    }
}

/// Render a complete standalone SVG document.
pub fn render_svg(figure: &Figure) -> String {
    let width = figure.width * PX_PER_INCH;
    let height = figure.height * PX_PER_INCH;
    let pb = PlotBox::for_figure(width, height);
    let scale = TimeScale::new(figure.x_range());

    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg" font-family="sans-serif">"##,
        w = width,
        h = height
    ));
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");

    let primary = figure.primary();
    push_x_axis(&mut svg, primary, &pb, scale.as_ref());
    for axis in figure.axes() {
        push_y_axis(&mut svg, axis, &pb);
    }
    svg.push_str(&format!(
        "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\" stroke=\"#333\" stroke-width=\"1\"/>\n",
        pb.left, pb.top, pb.width, pb.height
    ));

    if let Some(scale) = scale.as_ref() {
        for axis in figure.axes() {
            push_plots(&mut svg, axis, &pb, scale);
        }
    }

    push_labels(&mut svg, figure, &pb, width, height);

    if let Some(legend) = &figure.legend {
        push_legend(&mut svg, legend, figure, &pb);
    }

    if let Some(note) = &figure.footnote {
        svg.push_str(&format!(
            "  <text class=\"footnote\" x=\"{:.1}\" y=\"{:.1}\" font-size=\"{}\" fill=\"{}\">{}</text>\n",
            note.x_pos * width,
            height - note.y_pos * height,
            note.font_size,
            escape(&note.color),
            escape(note.text.as_deref().unwrap_or_default())
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn push_x_axis(svg: &mut String, primary: &Axis, pb: &PlotBox, scale: Option<&TimeScale>) {
    let Some(scale) = scale else {
        return;
    };
    for i in 0..X_TICKS {
        let frac = if X_TICKS > 1 {
            i as f64 / (X_TICKS - 1) as f64
        } else {
            0.5
        };
        let x = pb.left + frac * pb.width;
        if primary.policy.x_grid && primary.policy.x_grid_minor {
            svg.push_str(&format!(
                "  <line class=\"x-grid\" x1=\"{x:.1}\" y1=\"{:.1}\" x2=\"{x:.1}\" y2=\"{:.1}\" stroke=\"#e0e0e0\" stroke-width=\"1\"/>\n",
                pb.top,
                pb.bottom()
            ));
        }
        let label = scale.at(frac).format(&primary.date_format).to_string();
        svg.push_str(&format!(
            "  <text class=\"x-tick\" x=\"{x:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"10\" fill=\"#666\">",
            pb.bottom() + 14.0
        ));
        for (n, part) in label.split('\n').enumerate() {
            let dy = if n == 0 { 0.0 } else { 12.0 };
            svg.push_str(&format!(
                "<tspan x=\"{x:.1}\" dy=\"{dy}\">{}</tspan>",
                escape(part)
            ));
        }
        svg.push_str("</text>\n");
    }
}

fn push_y_axis(svg: &mut String, axis: &Axis, pb: &PlotBox) {
    let (lo, hi) = axis.y_limits();
    for i in 0..Y_TICKS {
        let frac = i as f64 / (Y_TICKS - 1) as f64;
        let y = pb.bottom() - frac * pb.height;
        if axis.policy.y_grid {
            svg.push_str(&format!(
                "  <line class=\"y-grid\" x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#e0e0e0\" stroke-width=\"1\"/>\n",
                pb.left,
                pb.right()
            ));
        }
        if axis.policy.show_y_tick_labels {
            svg.push_str(&format!(
                "  <text class=\"y-tick\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{}</text>\n",
                pb.left - 5.0,
                y + 3.0,
                fmt_value(lo + frac * (hi - lo))
            ));
        }
    }
}

fn push_plots(svg: &mut String, axis: &Axis, pb: &PlotBox, scale: &TimeScale) {
    for plot in axis.plots() {
        if plot.points.is_empty() {
            continue;
        }
        let to_xy = |t: NaiveDateTime, v: f64| -> (f64, f64) {
            (
                pb.left + scale.frac(t) * pb.width,
                pb.bottom() - y_frac(axis, v) * pb.height,
            )
        };
        match plot.kind {
            PlotKind::Line => {
                let mut path_data = String::new();
                for (i, &(t, v)) in plot.points.iter().enumerate() {
                    let (x, y) = to_xy(t, v);
                    if i == 0 {
                        path_data.push_str(&format!("M {:.1} {:.1}", x, y));
                    } else {
                        path_data.push_str(&format!(" L {:.1} {:.1}", x, y));
                    }
                }
                svg.push_str(&format!(
                    "  <path class=\"series\" data-axis=\"{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"/>\n",
                    axis.index,
                    path_data,
                    escape(&plot.color)
                ));
            }
            PlotKind::Bar => {
                let bar_w = pb.width / plot.points.len() as f64 * BAR_FILL;
                let (lo, hi) = axis.y_limits();
                let baseline = if lo > 0.0 {
                    lo
                } else if hi < 0.0 {
                    hi
                } else {
                    0.0
                };
                let (_, base) = to_xy(scale.start, baseline);
                for &(t, v) in &plot.points {
                    let (x, y) = to_xy(t, v);
                    let (top, h) = if y < base { (y, base - y) } else { (base, y - base) };
                    svg.push_str(&format!(
                        "  <rect class=\"series\" data-axis=\"{}\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>\n",
                        axis.index,
                        x - bar_w / 2.0,
                        top,
                        bar_w,
                        h,
                        escape(&plot.color)
                    ));
                }
            }
        }
    }
}

fn push_labels(svg: &mut String, figure: &Figure, pb: &PlotBox, width: f64, height: f64) {
    if !figure.title.is_empty() {
        svg.push_str(&format!(
            "  <text class=\"title\" x=\"{:.1}\" y=\"25\" text-anchor=\"middle\" font-size=\"14\" fill=\"#222\">{}</text>\n",
            width / 2.0,
            escape(&figure.title)
        ));
    }
    if !figure.xlabel.is_empty() {
        svg.push_str(&format!(
            "  <text class=\"xlabel\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"12\" fill=\"#444\">{}</text>\n",
            pb.left + pb.width / 2.0,
            height - 25.0,
            escape(&figure.xlabel)
        ));
    }
    if !figure.ylabel.is_empty() {
        let cy = pb.top + pb.height / 2.0;
        svg.push_str(&format!(
            "  <text class=\"ylabel\" x=\"15\" y=\"{cy:.1}\" text-anchor=\"middle\" font-size=\"12\" fill=\"#444\" transform=\"rotate(-90 15 {cy:.1})\">{}</text>\n",
            escape(&figure.ylabel)
        ));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Corner {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

/// Corner whose quarter of the plot box holds the fewest data points.
fn best_corner(figure: &Figure) -> Corner {
    let corners = [
        Corner::UpperRight,
        Corner::UpperLeft,
        Corner::LowerLeft,
        Corner::LowerRight,
    ];
    let Some(scale) = TimeScale::new(figure.x_range()) else {
        return Corner::UpperRight;
    };
    let mut counts = [0usize; 4];
    for axis in figure.axes() {
        for plot in axis.plots() {
            for &(t, v) in &plot.points {
                let right = scale.frac(t) >= 0.5;
                let upper = y_frac(axis, v) >= 0.5;
                let idx = match (upper, right) {
                    (true, true) => 0,
                    (true, false) => 1,
                    (false, false) => 2,
                    (false, true) => 3,
                };
                counts[idx] += 1;
            }
        }
    }
    // min_by_key keeps the first minimum, so ties prefer upper right
    corners
        .into_iter()
        .zip(counts)
        .min_by_key(|&(_, n)| n)
        .map(|(c, _)| c)
        .unwrap_or(Corner::UpperRight)
}

fn push_legend(svg: &mut String, legend: &Legend, figure: &Figure, pb: &PlotBox) {
    if legend.entries.is_empty() {
        return;
    }
    let corner = match legend.placement {
        LegendPlacement::Best => best_corner(figure),
    };
    let box_h = legend.entries.len() as f64 * LEGEND_ROW + 8.0;
    let x = match corner {
        Corner::UpperLeft | Corner::LowerLeft => pb.left + 10.0,
        Corner::UpperRight | Corner::LowerRight => pb.right() - LEGEND_WIDTH - 10.0,
    };
    let y = match corner {
        Corner::UpperLeft | Corner::UpperRight => pb.top + 10.0,
        Corner::LowerLeft | Corner::LowerRight => pb.bottom() - box_h - 10.0,
    };

    if legend.shadow {
        svg.push_str(&format!(
            "  <rect class=\"legend-shadow\" x=\"{:.1}\" y=\"{:.1}\" width=\"{LEGEND_WIDTH}\" height=\"{box_h:.1}\" fill=\"#999\" opacity=\"0.5\"/>\n",
            x + 3.0,
            y + 3.0
        ));
    }
    svg.push_str(&format!(
        "  <rect class=\"legend\" x=\"{x:.1}\" y=\"{y:.1}\" width=\"{LEGEND_WIDTH}\" height=\"{box_h:.1}\" fill=\"white\" stroke=\"#ccc\"/>\n"
    ));
    for (i, entry) in legend.entries.iter().enumerate() {
        let row_y = y + 4.0 + LEGEND_ROW * (i as f64 + 0.5);
        svg.push_str(&format!(
            "  <line x1=\"{:.1}\" y1=\"{row_y:.1}\" x2=\"{:.1}\" y2=\"{row_y:.1}\" stroke=\"{}\" stroke-width=\"2\"/>\n",
            x + 6.0,
            x + 26.0,
            escape(&entry.color)
        ));
        svg.push_str(&format!(
            "  <text class=\"legend-label\" x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" fill=\"#222\">{}</text>\n",
            x + 32.0,
            row_y + 3.5,
            escape(&entry.label)
        ));
    }
}
