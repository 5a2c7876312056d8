use crate::color_source::{ColorSource, ColorSourceEvent};
use std::fmt::{Display, Formatter};

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Swatch {
    pub index: usize,
    pub hex: String,
}

impl Display for Swatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.index, self.hex)
    }
}

/// Read projections of a color source: every color as a swatch, plus the active one.
#[derive(Default, Debug)]
pub struct SequenceViews {
    color_list: Vec<Swatch>,
    active: Option<Swatch>,
    last_event: Option<ColorSourceEvent>,
}

impl SequenceViews {
    /// Rebuilds both views from the source. Never patches the previous state, so applying it any
    /// number of times for the same source state gives the same result.
    pub fn recompute(&mut self, event: ColorSourceEvent, source: &dyn ColorSource) {
        self.color_list = source
            .colors()
            .iter()
            .enumerate()
            .map(|(index, color)| Swatch { index, hex: color.to_hex() })
            .collect();

        let active = source.active();
        self.active = Some(Swatch {
            index: active.index,
            hex: active.color.to_hex(),
        });
        self.last_event = Some(event);
    }

    pub fn color_list(&self) -> &[Swatch] {
        &self.color_list
    }

    pub fn active(&self) -> Option<&Swatch> {
        self.active.as_ref()
    }

    pub fn last_event(&self) -> Option<ColorSourceEvent> {
        self.last_event
    }
}
