use super::ScheduleError;
use burn::prelude::*;

/// How the scheduler's iterations map onto the time index of the schedule.
#[derive(Config, Debug, PartialEq)]
pub enum Granularity {
    /// Every iteration is one time step.
    ///
    /// Example: (1→1, 2→2, 3→3, ...)
    Step,
    /// The time index advances once per epoch, on the epoch's first iteration.
    ///
    /// Example: steps_per_epoch = 3:
    /// (1→1, 2→1, 3→1), (4→2, 5→2, 6→2), (7→3, ...)
    Epoch { steps_per_epoch: usize },
}

impl Granularity {
    pub fn validate(&self) -> Result<(), ScheduleError> {
        match self {
            Granularity::Step => Ok(()),
            Granularity::Epoch { steps_per_epoch: 0 } => Err(ScheduleError::ZeroStepsPerEpoch),
            Granularity::Epoch { .. } => Ok(()),
        }
    }

    /// Time index for the 1-indexed `iteration`. Iteration 0 maps to time 0.
    pub fn time(&self, iteration: usize) -> usize {
        match self {
            Granularity::Step => iteration,
            Granularity::Epoch { .. } if iteration == 0 => 0,
            Granularity::Epoch { steps_per_epoch } => (iteration - 1) / steps_per_epoch + 1,
        }
    }

    /// Whether `iteration` is the first one to see its time index.
    pub fn advances_at(&self, iteration: usize) -> bool {
        match self {
            Granularity::Step => true,
            Granularity::Epoch { .. } if iteration == 0 => false,
            Granularity::Epoch { steps_per_epoch } => (iteration - 1) % steps_per_epoch == 0,
        }
    }
}
