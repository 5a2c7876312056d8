mod model;
mod step;
mod views;
mod wire;

pub use model::{SelectionError, StepSequenceModel};
pub use step::{DurationSlot, Sequence, SequenceError, StepCount, StepCountError};
pub use wire::Encoding;
