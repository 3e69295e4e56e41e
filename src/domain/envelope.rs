//! Status-tagged outcome of a chart build.

use std::fmt;

use crate::domain::chart::{AxisHandle, Figure};
use crate::domain::error::PlotError;
use crate::domain::series::MAX_SERIES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    NotRun,
    Success,
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::NotRun => "NOT_RUN",
            Status::Success => "SUCCESS",
            Status::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// Created as `NotRun`, then finalized exactly once to `Success` or `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEnvelope {
    pub status: Status,
    pub error: Option<PlotError>,
    pub axis_1: Option<AxisHandle>,
    pub axis_2: Option<AxisHandle>,
    pub axis_3: Option<AxisHandle>,
    pub axis_4: Option<AxisHandle>,
    pub figure: Option<Figure>,
}

impl Default for ResultEnvelope {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultEnvelope {
    pub fn new() -> Self {
        Self {
            status: Status::NotRun,
            error: None,
            axis_1: None,
            axis_2: None,
            axis_3: None,
            axis_4: None,
            figure: None,
        }
    }

    /// Record the composed figure; handles past the fourth are ignored.
    pub fn succeed(&mut self, figure: Figure, handles: &[AxisHandle]) {
        let mut slots = [None; MAX_SERIES];
        for (slot, handle) in slots.iter_mut().zip(handles) {
            *slot = Some(*handle);
        }
        let [a1, a2, a3, a4] = slots;
        self.axis_1 = a1;
        self.axis_2 = a2;
        self.axis_3 = a3;
        self.axis_4 = a4;
        self.figure = Some(figure);
        self.error = None;
        self.status = Status::Success;
    }

    /// Record a fatal error; any partial payload is dropped.
    pub fn fail(&mut self, err: PlotError) {
        *self = Self {
            status: Status::Failed,
            error: Some(err),
            ..Self::new()
        };
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn axes(&self) -> [Option<AxisHandle>; MAX_SERIES] {
        [self.axis_1, self.axis_2, self.axis_3, self.axis_4]
    }

    /// Number of populated axis handles.
    pub fn axis_count(&self) -> usize {
        self.axes().iter().flatten().count()
    }

    /// Convert into a `Result`, surfacing the recorded error.
    pub fn into_result(self) -> Result<Figure, PlotError> {
        match (self.status, self.figure, self.error) {
            (Status::Success, Some(figure), _) => Ok(figure),
            (_, _, Some(err)) => Err(err),
            (status, _, None) => Err(PlotError::Render {
                reason: format!("chart build did not complete (status {status})"),
            }),
        }
    }
}
