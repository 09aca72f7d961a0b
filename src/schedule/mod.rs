mod cosine_decay;
mod error;
mod granularity;
mod scheduler;

pub use cosine_decay::{DEFAULT_MIN_LR, DEFAULT_START, cosine_decay};
pub use error::ScheduleError;
pub use granularity::Granularity;
pub use scheduler::{CosineDecay, CosineDecayConfig};
