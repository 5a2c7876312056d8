mod picker;

pub use picker::ColorPicker;

use crate::domain::ColorValue;
use std::fmt::Debug;
use thiserror::Error;
use tokio::sync::watch::Receiver;

/// The capability a color picker exposes to the sequence model: an ordered set of colors, one of
/// which is active, and a notifier that fires after every change.
///
/// Notifications carry no data. A subscriber reacts by pulling the state it needs back out of the
/// source, so it never acts on a stale payload.
pub trait ColorSource: Debug + Send {
    /// The colors in their native order; position is the color's index.
    fn colors(&self) -> Vec<ColorValue>;

    fn len(&self) -> usize;

    fn active(&self) -> ActiveColor;

    fn set_active_by_index(&mut self, index: usize) -> Result<(), ColorSourceError>;

    fn set_color(&mut self, index: usize, color: ColorValue) -> Result<(), ColorSourceError>;

    fn subscribe(&self) -> Receiver<ColorSourceEvent>;
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct ActiveColor {
    pub index: usize,
    pub color: ColorValue,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ColorSourceEvent {
    Mount,
    ColorChange,
    ColorSetActive,
}

impl ColorSourceEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ColorSourceEvent::Mount => "mount",
            ColorSourceEvent::ColorChange => "color:change",
            ColorSourceEvent::ColorSetActive => "color:setActive",
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ColorSourceError {
    #[error("a color source needs at least one color")]
    Empty,
    #[error("color index {index} is out of range, the source holds {len} color(s)")]
    IndexOutOfRange { index: usize, len: usize },
}
