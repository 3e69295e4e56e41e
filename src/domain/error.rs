//! Domain error types.

/// Top-level error type for tradeplot.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlotError {
    #[error("invalid start_date {value:?}: {reason} (expected YYYY-MM-DD HH:MM:SS)")]
    StartDateParse { value: String, reason: String },

    #[error("column not found: {column}")]
    ColumnNotFound { column: String },

    #[error("too many series: requested {requested}, at most {max} can be plotted")]
    TooManySeries { requested: usize, max: usize },

    #[error("data load error: {reason}")]
    DataLoad { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("render error: {reason}")]
    Render { reason: String },

    #[error("io error: {reason}")]
    Io { reason: String },
}

impl PlotError {
    /// True for the lookup class of failures (missing date or series column).
    pub fn is_lookup(&self) -> bool {
        matches!(self, PlotError::ColumnNotFound { .. })
    }
}

impl From<std::io::Error> for PlotError {
    fn from(err: std::io::Error) -> Self {
        PlotError::Io {
            reason: err.to_string(),
        }
    }
}

impl From<&PlotError> for std::process::ExitCode {
    fn from(err: &PlotError) -> Self {
        let code: u8 = match err {
            PlotError::Io { .. } | PlotError::Render { .. } => 1,
            PlotError::ConfigParse { .. }
            | PlotError::ConfigMissing { .. }
            | PlotError::ConfigInvalid { .. } => 2,
            PlotError::DataLoad { .. } => 3,
            PlotError::StartDateParse { .. } => 4,
            PlotError::ColumnNotFound { .. } | PlotError::TooManySeries { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
