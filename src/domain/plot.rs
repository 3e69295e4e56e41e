//! Trading-history chart build.
//!
//! Pipeline: series selection, row filtering, axis composition, legend
//! dedupe, then labels and footnote. Every failure is recorded in the
//! returned [`ResultEnvelope`]; nothing escapes as a panic or bare error.

use crate::domain::chart::{AxisHandle, Figure, compose_axes};
use crate::domain::dataset::Dataset;
use crate::domain::envelope::ResultEnvelope;
use crate::domain::error::PlotError;
use crate::domain::filter::{FilterSpec, RowMask, apply_filters};
use crate::domain::legend::attach_legend;
use crate::domain::options::PlotOptions;
use crate::domain::series::select_series;
use crate::ports::render_port::RenderPort;

/// Build the chart and, when `options.show_plot` is set, hand it to
/// `renderer` exactly once.
///
/// `mask` is evaluated against the rows of `dataset` as passed in.
pub fn plot_trading_history(
    dataset: &Dataset,
    options: &PlotOptions,
    mask: Option<&RowMask>,
    renderer: &mut dyn RenderPort,
) -> ResultEnvelope {
    let mut envelope = ResultEnvelope::new();
    let level = options.log_level();
    log::log!(level, "plot_trading_history - start");

    let (figure, handles) = match build_figure(dataset, options, mask) {
        Ok(built) => built,
        Err(err) => {
            log::error!("plot_trading_history failed: {err}");
            envelope.fail(err);
            return envelope;
        }
    };

    if options.show_plot {
        if let Err(err) = renderer.display(&figure) {
            log::error!("plot_trading_history display failed: {err}");
            envelope.fail(err);
            return envelope;
        }
    }

    log::log!(
        level,
        "plot_trading_history - done axes={} points={}",
        handles.len(),
        figure.axes().iter().map(|a| a.point_count()).sum::<usize>()
    );
    envelope.succeed(figure, &handles);
    envelope
}

/// Everything up to, but not including, the display step.
pub fn build_figure(
    dataset: &Dataset,
    options: &PlotOptions,
    mask: Option<&RowMask>,
) -> Result<(Figure, Vec<AxisHandle>), PlotError> {
    let level = options.log_level();
    let selection = select_series(&options.date_column, &options.series);

    let spec = FilterSpec {
        start_date: options.start_date.as_deref(),
        mask,
        drop_incomplete_rows: options.drop_incomplete_rows,
    };
    let filtered = apply_filters(dataset, &options.date_column, &selection.columns, &spec)?;
    log::log!(
        level,
        "plot_trading_history start_date={:?} rows={} column_list={:?}",
        options.start_date,
        filtered.len(),
        selection.columns
    );
    if filtered.is_empty() {
        log::warn!("no rows left after filtering, chart will be empty");
    }

    let (mut figure, handles) = compose_axes(&filtered, &selection.series, options)?;
    attach_legend(&mut figure, &handles);

    figure.title = options.title.clone();
    figure.xlabel = options.xlabel.clone();
    figure.ylabel = options.ylabel.clone();
    figure.footnote = Some(options.footnote.resolved());

    Ok((figure, handles))
}
