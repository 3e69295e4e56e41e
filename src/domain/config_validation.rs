//! Configuration validation.
//!
//! Checks every plot config field before any data is loaded.

use crate::domain::chart::validate_date_format;
use crate::domain::error::PlotError;
use crate::domain::filter::parse_start_date;
use crate::domain::series::SeriesSlot;
use crate::ports::config_port::ConfigPort;

pub fn validate_plot_config(config: &dyn ConfigPort) -> Result<(), PlotError> {
    validate_dimensions(config)?;
    validate_date_format_key(config)?;
    validate_start_date(config)?;
    validate_colors(config)?;
    validate_filter(config)?;
    validate_footnote(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> PlotError {
    PlotError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Value of a set numeric key; unparsable text is an error.
fn number(config: &dyn ConfigPort, section: &str, key: &str) -> Result<Option<f64>, PlotError> {
    match config.get_non_empty(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|_| invalid(section, key, &format!("{key} must be a number, got {raw:?}"))),
    }
}

fn validate_dimensions(config: &dyn ConfigPort) -> Result<(), PlotError> {
    for (key, default) in [("width", 8.0), ("height", 6.0)] {
        let value = number(config, "plot", key)?.unwrap_or(default);
        if !(value > 0.0 && value.is_finite()) {
            return Err(invalid("plot", key, &format!("{key} must be positive")));
        }
    }
    Ok(())
}

fn validate_date_format_key(config: &dyn ConfigPort) -> Result<(), PlotError> {
    match config.get_non_empty("plot", "date_format") {
        Some(fmt) => validate_date_format(&unescape_newlines(&fmt)),
        None => Ok(()),
    }
}

fn validate_start_date(config: &dyn ConfigPort) -> Result<(), PlotError> {
    match config.get_non_empty("filter", "start_date") {
        Some(value) => parse_start_date(&value).map(|_| ()),
        None => Ok(()),
    }
}

fn validate_colors(config: &dyn ConfigPort) -> Result<(), PlotError> {
    for slot in SeriesSlot::ALL {
        let key = format!("{}_color", slot.name());
        if let Some(value) = config.get_non_empty("series", &key) {
            if normalize_color(&value).is_none() {
                return Err(invalid(
                    "series",
                    &key,
                    "color must be a 6 digit hex code such as E74C3C",
                ));
            }
        }
    }
    if let Some(value) = config.get_non_empty("footnote", "color") {
        if normalize_color(&value).is_none() {
            return Err(invalid(
                "footnote",
                "color",
                "color must be a 6 digit hex code such as 888888",
            ));
        }
    }
    Ok(())
}

fn validate_filter(config: &dyn ConfigPort) -> Result<(), PlotError> {
    let column = config.get_non_empty("filter", "column");
    let min = config.get_string("filter", "min");
    match (column, min) {
        (Some(_), None) => Err(PlotError::ConfigMissing {
            section: "filter".to_string(),
            key: "min".to_string(),
        }),
        (None, Some(_)) => Err(PlotError::ConfigMissing {
            section: "filter".to_string(),
            key: "column".to_string(),
        }),
        (Some(_), Some(min)) => match min.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(()),
            _ => Err(invalid("filter", "min", "min must be a number")),
        },
        (None, None) => Ok(()),
    }
}

fn validate_footnote(config: &dyn ConfigPort) -> Result<(), PlotError> {
    for key in ["xpos", "ypos"] {
        let value = number(config, "footnote", key)?.unwrap_or(0.5);
        if !(0.0..=1.0).contains(&value) {
            return Err(invalid("footnote", key, &format!("{key} must be between 0 and 1")));
        }
    }
    let font_size = number(config, "footnote", "fontsize")?.unwrap_or(8.0);
    if !(font_size > 0.0 && font_size.is_finite()) {
        return Err(invalid("footnote", "fontsize", "fontsize must be positive"));
    }
    Ok(())
}

/// `\n` written literally in a config value becomes a line break.
pub fn unescape_newlines(value: &str) -> String {
    value.replace("\\n", "\n")
}

/// Accepts `RRGGBB` or `#RRGGBB` and returns `#RRGGBB`.
pub fn normalize_color(value: &str) -> Option<String> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(format!("#{}", hex.to_ascii_uppercase()))
    } else {
        None
    }
}
