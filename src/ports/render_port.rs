//! Rendering port trait.

use crate::domain::chart::Figure;
use crate::domain::error::PlotError;

/// Port for putting a composed figure in front of the user.
///
/// `display` is called at most once per chart build, and only when the
/// caller asked for the figure to be shown.
pub trait RenderPort {
    fn display(&mut self, figure: &Figure) -> Result<(), PlotError>;
}

/// Renderer that accepts every figure and draws nothing.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl RenderPort for NullRenderer {
    fn display(&mut self, _figure: &Figure) -> Result<(), PlotError> {
        Ok(())
    }
}
