//! Core domain types and logic.

pub mod chart;
pub mod config_validation;
pub mod dataset;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod legend;
pub mod options;
pub mod plot;
pub mod series;
