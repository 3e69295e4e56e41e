//! Plot options: every knob of a chart build, with its default.

use chrono::Local;

use crate::domain::series::SeriesSlots;

/// Default date tick format: day of month over abbreviated month.
pub const DEFAULT_DATE_FORMAT: &str = "%d\n%b";
pub const FOOTNOTE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Footnote text and placement, handed to the renderer unchanged.
///
/// `x_pos`/`y_pos` are fractions of the figure size measured from the
/// bottom-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct FootnoteSpec {
    pub text: Option<String>,
    pub x_pos: f64,
    pub y_pos: f64,
    pub color: String,
    pub font_size: f64,
}

impl Default for FootnoteSpec {
    fn default() -> Self {
        Self {
            text: None,
            x_pos: 0.70,
            y_pos: 0.01,
            color: "#888888".to_string(),
            font_size: 8.0,
        }
    }
}

impl FootnoteSpec {
    /// Copy with the text filled in, stamping the current time when unset.
    pub fn resolved(&self) -> FootnoteSpec {
        let text = match self.text.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => format!("algotraders - {}", Local::now().format(FOOTNOTE_DATE_FORMAT)),
        };
        FootnoteSpec {
            text: Some(text),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    pub title: String,
    pub series: SeriesSlots,
    pub date_column: String,
    pub xlabel: String,
    pub ylabel: String,
    /// `"-"` draws lines; anything else draws bars.
    pub line_style: String,
    /// Figure size in inches.
    pub width: f64,
    pub height: f64,
    pub date_format: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub start_date: Option<String>,
    pub footnote: FootnoteSpec,
    /// Stretch secondary y-axes to three times their automatic upper limit.
    pub scale_y: bool,
    pub show_plot: bool,
    pub drop_incomplete_rows: bool,
    pub verbose: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            series: SeriesSlots::default(),
            date_column: "date".to_string(),
            xlabel: "Date".to_string(),
            ylabel: "Algo Values".to_string(),
            line_style: "-".to_string(),
            width: 8.0,
            height: 6.0,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            start_date: None,
            footnote: FootnoteSpec::default(),
            scale_y: false,
            show_plot: true,
            drop_incomplete_rows: false,
            verbose: false,
        }
    }
}

impl PlotOptions {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// Progress messages go out at `info` when verbose, otherwise `debug`.
    pub fn log_level(&self) -> log::Level {
        if self.verbose {
            log::Level::Info
        } else {
            log::Level::Debug
        }
    }
}
