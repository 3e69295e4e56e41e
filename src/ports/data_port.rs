//! Dataset source port trait.

use crate::domain::dataset::Dataset;
use crate::domain::error::PlotError;

pub trait DataPort {
    /// Load the full table, parsing `date_column` as timestamps.
    fn load_dataset(&self, date_column: &str) -> Result<Dataset, PlotError>;

    fn list_columns(&self) -> Result<Vec<String>, PlotError>;
}
