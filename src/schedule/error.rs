use thiserror::Error;

/// Reasons a [`CosineDecayConfig`](super::CosineDecayConfig) can't be turned into a scheduler.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("cycle_length must be positive")]
    ZeroCycleLength,

    #[error("{name} must be finite, got {value}")]
    NonFiniteLr { name: &'static str, value: f64 },

    #[error("steps_per_epoch must be positive")]
    ZeroStepsPerEpoch,
}
