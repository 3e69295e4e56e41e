//! Figure model and axis composition.
//!
//! A [`Figure`] always owns a primary axis. Each extra series gets a twin
//! axis that shares the primary's x-range but keeps its own y-limits. Twin
//! axes hide their grids and y tick labels so up to four scales can overlay
//! without clutter.

use chrono::NaiveDateTime;
use chrono::format::{Item, StrftimeItems};

use crate::domain::dataset::Dataset;
use crate::domain::error::PlotError;
use crate::domain::legend::Legend;
use crate::domain::options::{FootnoteSpec, PlotOptions};
use crate::domain::series::SeriesDescriptor;

/// Fraction of the data span added above and below the y data range.
pub const Y_MARGIN: f64 = 0.05;
/// Upper-limit multiplier applied to twin axes when `scale_y` is set.
pub const SECONDARY_Y_SCALE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisRole {
    Primary,
    Secondary,
}

/// Reference to one axis of a [`Figure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisHandle(usize);

impl AxisHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisPolicy {
    pub x_grid: bool,
    pub x_grid_minor: bool,
    pub y_grid: bool,
    pub show_y_tick_labels: bool,
    pub y_limit_scale: Option<f64>,
}

impl AxisPolicy {
    pub fn primary() -> Self {
        Self {
            x_grid: true,
            x_grid_minor: true,
            y_grid: true,
            show_y_tick_labels: true,
            y_limit_scale: None,
        }
    }

    pub fn secondary(scale_y: bool) -> Self {
        Self {
            x_grid: false,
            x_grid_minor: false,
            y_grid: false,
            show_y_tick_labels: false,
            y_limit_scale: scale_y.then_some(SECONDARY_Y_SCALE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Line,
    Bar,
}

impl PlotKind {
    pub fn from_line_style(style: &str) -> Self {
        if style == "-" {
            PlotKind::Line
        } else {
            PlotKind::Bar
        }
    }
}

/// One series drawn on an axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    pub label: String,
    pub color: String,
    pub kind: PlotKind,
    pub points: Vec<(NaiveDateTime, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub role: AxisRole,
    pub index: usize,
    pub policy: AxisPolicy,
    pub date_format: String,
    plots: Vec<Plot>,
    y_limits: (f64, f64),
}

impl Axis {
    fn new(role: AxisRole, index: usize, policy: AxisPolicy, date_format: &str) -> Self {
        Self {
            role,
            index,
            policy,
            date_format: date_format.to_string(),
            plots: Vec::new(),
            y_limits: (0.0, 1.0),
        }
    }

    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    pub fn point_count(&self) -> usize {
        self.plots.iter().map(|p| p.points.len()).sum()
    }

    pub fn y_limits(&self) -> (f64, f64) {
        self.y_limits
    }

    /// Limits derived from the plotted data alone, before any policy scaling.
    pub fn auto_y_limits(&self) -> (f64, f64) {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for plot in &self.plots {
            for &(_, v) in &plot.points {
                lo = lo.min(v);
                hi = hi.max(v);
            }
            if plot.kind == PlotKind::Bar && !plot.points.is_empty() {
                lo = lo.min(0.0);
                hi = hi.max(0.0);
            }
        }
        if lo > hi {
            return (0.0, 1.0);
        }
        let span = hi - lo;
        let margin = if span > 0.0 {
            span * Y_MARGIN
        } else if hi != 0.0 {
            hi.abs() * Y_MARGIN
        } else {
            Y_MARGIN
        };
        (lo - margin, hi + margin)
    }

    fn draw(&mut self, plot: Plot) {
        self.plots.push(plot);
        let (lo, hi) = self.auto_y_limits();
        self.y_limits = match self.policy.y_limit_scale {
            Some(factor) => (0.0, hi * factor),
            None => (lo, hi),
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Inches.
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    pub legend: Option<Legend>,
    pub footnote: Option<FootnoteSpec>,
    axes: Vec<Axis>,
    x_range: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl Figure {
    /// A figure with an empty primary axis.
    pub fn new(width: f64, height: f64, date_format: &str) -> Self {
        Self {
            width,
            height,
            title: String::new(),
            xlabel: String::new(),
            ylabel: String::new(),
            legend: None,
            footnote: None,
            axes: vec![Axis::new(
                AxisRole::Primary,
                0,
                AxisPolicy::primary(),
                date_format,
            )],
            x_range: None,
        }
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn axis(&self, handle: AxisHandle) -> Option<&Axis> {
        self.axes.get(handle.0)
    }

    pub fn primary_handle(&self) -> AxisHandle {
        AxisHandle(0)
    }

    pub fn primary(&self) -> &Axis {
        &self.axes[0]
    }

    /// Shared x-range of every axis.
    pub fn x_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.x_range
    }

    /// Add an axis sharing the primary's x-scale.
    pub fn twin_x(&mut self, scale_y: bool) -> AxisHandle {
        let index = self.axes.len();
        let date_format = self.axes[0].date_format.clone();
        self.axes.push(Axis::new(
            AxisRole::Secondary,
            index,
            AxisPolicy::secondary(scale_y),
            &date_format,
        ));
        AxisHandle(index)
    }

    fn axis_mut(&mut self, handle: AxisHandle) -> &mut Axis {
        &mut self.axes[handle.0]
    }
}

/// Reject strftime strings chrono cannot format.
pub fn validate_date_format(format: &str) -> Result<(), PlotError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(PlotError::ConfigInvalid {
            section: "plot".to_string(),
            key: "date_format".to_string(),
            reason: format!("unsupported date format {format:?}"),
        });
    }
    Ok(())
}

/// Draw each series on its own axis: index 0 on the primary, the rest on
/// twins. Returns one handle per series, in creation order.
pub fn compose_axes(
    data: &Dataset,
    series: &[SeriesDescriptor],
    options: &PlotOptions,
) -> Result<(Figure, Vec<AxisHandle>), PlotError> {
    validate_date_format(&options.date_format)?;

    let mut figure = Figure::new(options.width, options.height, &options.date_format);
    figure.x_range = data.date_range(&options.date_column)?;

    let kind = PlotKind::from_line_style(&options.line_style);
    let level = options.log_level();
    let mut handles = Vec::with_capacity(series.len());

    for (idx, node) in series.iter().enumerate() {
        let handle = if idx == 0 {
            figure.primary_handle()
        } else {
            figure.twin_x(options.scale_y)
        };

        log::log!(
            level,
            "plot {}/{} - {} in {} - axis={}",
            idx + 1,
            series.len(),
            node.column,
            node.color,
            handle.index()
        );

        let points = data.series_points(&options.date_column, &node.column)?;
        figure.axis_mut(handle).draw(Plot {
            label: node.column.clone(),
            color: node.color.clone(),
            kind,
            points,
        });
        handles.push(handle);
    }

    Ok((figure, handles))
}
