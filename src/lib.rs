pub mod schedule;

pub mod prelude {
    pub use crate::schedule::*;
}
