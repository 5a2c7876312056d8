use crate::color_source::{ActiveColor, ColorPicker, ColorSource, ColorSourceError, ColorSourceEvent};
use crate::domain::{ColorValue, WHITE};
use crate::sequence::step::{DurationSlot, Sequence, SequenceError, StepCount};
use crate::sequence::views::SequenceViews;
use thiserror::Error;
use tokio::sync::watch::Receiver;
use tracing::{debug, instrument, trace};

/// The ordered duration slots of a session, aligned by position with the colors of a color source.
///
/// Colors are never copied into the model. Step `i` pairs slot `i` with whatever color the source
/// currently holds at index `i`, and the active color is always read straight from the source.
#[derive(Debug)]
pub struct StepSequenceModel {
    source: Box<dyn ColorSource>,
    slots: Vec<DurationSlot>,
    events: Receiver<ColorSourceEvent>,
    views: SequenceViews,
}

impl StepSequenceModel {
    /// Seeds a picker with `count` white colors and `count` empty duration slots.
    pub fn initialize(count: StepCount) -> Result<Self, ColorSourceError> {
        debug!("🔢 Initializing a sequence of {} step(s)", count.get());
        let picker = ColorPicker::new(vec![WHITE; count.get()])?;
        Ok(StepSequenceModel::new(Box::new(picker), vec![DurationSlot::empty(); count.get()]))
    }

    /// Wraps an existing source. A slot count that differs from the source's color count is only
    /// rejected when a sequence is built.
    pub fn new(source: Box<dyn ColorSource>, slots: Vec<DurationSlot>) -> Self {
        debug!("🔢 Tracking {} duration slot(s) against {} color(s)", slots.len(), source.len());
        let events = source.subscribe();
        let mut views = SequenceViews::default();
        views.recompute(ColorSourceEvent::Mount, source.as_ref());

        StepSequenceModel {
            source,
            slots,
            events,
            views,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn duration_slots(&self) -> &[DurationSlot] {
        &self.slots
    }

    pub fn set_duration(&mut self, index: usize, ticks: u32) -> Result<(), StepError> {
        self.slot_mut(index)?.set_ticks(ticks);
        Ok(())
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut DurationSlot, StepError> {
        let len = self.slots.len();
        self.slots.get_mut(index).ok_or(StepError::UnknownStep { index, len })
    }

    /// Makes the color at `index` the active one. Touches neither colors nor durations.
    #[instrument(skip(self))]
    pub fn select(&mut self, index: usize) -> Result<(), SelectionError> {
        self.source.set_active_by_index(index).map_err(|e| match e {
            ColorSourceError::IndexOutOfRange { index, len } => SelectionError::IndexOutOfRange { index, len },
            ColorSourceError::Empty => SelectionError::UninitializedSelection,
        })
    }

    pub fn active_color(&self) -> ActiveColor {
        self.source.active()
    }

    pub fn colors(&self) -> Vec<ColorValue> {
        self.source.colors()
    }

    /// The color source itself, for edits made by the picker.
    pub fn source_mut(&mut self) -> &mut dyn ColorSource {
        self.source.as_mut()
    }

    /// Handles a pending source notification, if any, by recomputing the views. Bursts of
    /// notifications collapse into one recompute against the latest source state.
    pub fn sync(&mut self) -> bool {
        if !self.events.has_changed().unwrap_or(false) {
            return false;
        }

        let event = *self.events.borrow_and_update();
        trace!(event = event.name(), "🔁 Recomputing views");
        self.views.recompute(event, self.source.as_ref());
        true
    }

    pub fn views(&mut self) -> &SequenceViews {
        self.sync();
        &self.views
    }

    /// Builds the sequence from the current durations and colors.
    pub fn sequence(&self) -> Result<Sequence, SequenceError> {
        Sequence::build(&self.slots, &self.source.colors())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum SelectionError {
    #[error("no sequence has been initialized yet")]
    UninitializedSelection,
    #[error("step {index} does not exist, the sequence has {len} step(s)")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Error, Debug, PartialEq)]
pub enum StepError {
    #[error("step {index} does not exist, the sequence has {len} step(s)")]
    UnknownStep { index: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::views::Swatch;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn model(count: i64) -> StepSequenceModel {
        StepSequenceModel::initialize(StepCount::new(count).unwrap()).unwrap()
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(16)]
    fn initialize_allocates_aligned_colors_and_slots(#[case] count: i64) {
        let model = model(count);

        assert_eq!(model.len(), count as usize);
        assert_eq!(model.colors(), vec![WHITE; count as usize]);
        assert!(model.duration_slots().iter().all(DurationSlot::is_empty));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    fn select_reports_the_color_at_the_index(#[case] index: usize) {
        let mut model = model(3);
        let colors = [ColorValue::new(255, 0, 0), ColorValue::new(0, 255, 0), ColorValue::new(0, 0, 255)];
        for (i, color) in colors.iter().enumerate() {
            model.source_mut().set_color(i, *color).unwrap();
        }

        model.select(index).unwrap();

        assert_eq!(model.active_color(), ActiveColor { index, color: colors[index] });
    }

    #[test]
    fn select_does_not_touch_colors_or_durations() {
        let mut model = model(2);
        model.set_duration(1, 7).unwrap();

        model.select(1).unwrap();

        assert_eq!(model.colors(), vec![WHITE, WHITE]);
        assert_eq!(model.duration_slots()[1].ticks(), 7);
    }

    #[test]
    fn select_out_of_range_keeps_the_active_color() {
        let mut model = model(3);
        model.select(2).unwrap();

        let result = model.select(3);

        assert_eq!(result, Err(SelectionError::IndexOutOfRange { index: 3, len: 3 }));
        assert_eq!(model.active_color().index, 2);
    }

    #[test]
    fn the_active_color_follows_edits_without_a_resync() {
        let mut model = model(2);
        model.select(1).unwrap();

        model.source_mut().set_color(1, ColorValue::new(1, 2, 3)).unwrap();

        assert_eq!(model.active_color().color, ColorValue::new(1, 2, 3));
    }

    #[test]
    fn views_are_rendered_on_mount() {
        let mut model = model(2);

        let views = model.views();

        assert_eq!(views.color_list().len(), 2);
        assert_eq!(views.active(), Some(&Swatch { index: 0, hex: "#ffffff".to_string() }));
        assert_eq!(views.last_event(), Some(ColorSourceEvent::Mount));
    }

    #[test]
    fn rapid_notifications_leave_the_views_at_the_final_state() {
        let mut model = model(3);

        for value in 0..5u8 {
            model.source_mut().set_color(value as usize % 3, ColorValue::new(value, value, value)).unwrap();
        }
        model.select(1).unwrap();

        assert!(model.sync());
        assert!(!model.sync());
        let views = model.views();
        assert_eq!(
            views.color_list().iter().map(|s| s.hex.as_str()).collect::<Vec<_>>(),
            vec!["#030303", "#040404", "#020202"]
        );
        assert_eq!(views.active(), Some(&Swatch { index: 1, hex: "#040404".to_string() }));
        assert_eq!(views.last_event(), Some(ColorSourceEvent::ColorSetActive));
    }

    #[test]
    fn a_color_change_after_selection_updates_the_active_view() {
        let mut model = model(2);
        model.select(0).unwrap();
        model.sync();

        model.source_mut().set_color(0, ColorValue::new(0, 0, 0)).unwrap();

        assert_eq!(model.views().active(), Some(&Swatch { index: 0, hex: "#000000".to_string() }));
    }

    #[test]
    fn set_duration_rejects_unknown_steps() {
        let mut model = model(2);

        assert_eq!(model.set_duration(2, 1), Err(StepError::UnknownStep { index: 2, len: 2 }));
        assert!(model.duration_slots().iter().all(DurationSlot::is_empty));
    }

    #[test]
    fn sequence_converts_ticks_and_keeps_order() {
        let mut model = model(3);
        let colors = [ColorValue::new(10, 0, 0), ColorValue::new(0, 20, 0), ColorValue::new(0, 0, 30)];
        for (i, color) in colors.iter().enumerate() {
            model.source_mut().set_color(i, *color).unwrap();
            model.set_duration(i, i as u32 + 1).unwrap();
        }

        let sequence = model.sequence().unwrap();

        assert_eq!(sequence.steps().iter().map(|s| s.time_ms()).collect::<Vec<_>>(), vec![500, 1000, 1500]);
        assert_eq!(sequence.steps().iter().map(|s| s.color()).collect::<Vec<_>>(), colors.to_vec());
    }

    #[test]
    fn sequence_refuses_a_source_with_fewer_colors_than_slots() {
        let picker = ColorPicker::new(vec![WHITE, WHITE]).unwrap();
        let model = StepSequenceModel::new(Box::new(picker), vec![DurationSlot::with_ticks(1); 3]);

        assert_eq!(model.sequence(), Err(SequenceError::SequenceLengthMismatch { durations: 3, colors: 2 }));
    }
}
