use crate::color_source::{ActiveColor, ColorSource, ColorSourceError, ColorSourceEvent};
use crate::domain::ColorValue;
use tokio::sync::watch;
use tokio::sync::watch::{Receiver, Sender};
use tracing::{debug, instrument};

/// In-memory color source. Holds the colors a picker widget edits and notifies subscribers through
/// a `watch` channel, so bursts of edits collapse into the latest notification.
#[derive(Debug)]
pub struct ColorPicker {
    colors: Vec<ColorValue>,
    active_index: usize,
    notifier_tx: Sender<ColorSourceEvent>,
}

impl ColorPicker {
    pub fn new(colors: Vec<ColorValue>) -> Result<Self, ColorSourceError> {
        if colors.is_empty() {
            return Err(ColorSourceError::Empty);
        }

        let (notifier_tx, _) = watch::channel(ColorSourceEvent::Mount);
        debug!("🎨 Mounted color picker with {} color(s)", colors.len());

        Ok(ColorPicker {
            colors,
            active_index: 0,
            notifier_tx,
        })
    }

    fn check_index(&self, index: usize) -> Result<(), ColorSourceError> {
        if index < self.colors.len() {
            Ok(())
        } else {
            Err(ColorSourceError::IndexOutOfRange { index, len: self.colors.len() })
        }
    }

    fn notify(&self, event: ColorSourceEvent) {
        // send_replace stores the event even when nobody is subscribed yet
        self.notifier_tx.send_replace(event);
    }
}

impl ColorSource for ColorPicker {
    fn colors(&self) -> Vec<ColorValue> {
        self.colors.clone()
    }

    fn len(&self) -> usize {
        self.colors.len()
    }

    fn active(&self) -> ActiveColor {
        ActiveColor {
            index: self.active_index,
            color: self.colors[self.active_index],
        }
    }

    #[instrument(skip(self))]
    fn set_active_by_index(&mut self, index: usize) -> Result<(), ColorSourceError> {
        self.check_index(index)?;

        self.active_index = index;
        self.notify(ColorSourceEvent::ColorSetActive);
        Ok(())
    }

    #[instrument(skip(self, color), fields(color = %color))]
    fn set_color(&mut self, index: usize, color: ColorValue) -> Result<(), ColorSourceError> {
        self.check_index(index)?;

        self.colors[index] = color;
        self.notify(ColorSourceEvent::ColorChange);
        Ok(())
    }

    fn subscribe(&self) -> Receiver<ColorSourceEvent> {
        self.notifier_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WHITE;
    use pretty_assertions::assert_eq;

    fn picker() -> ColorPicker {
        ColorPicker::new(vec![WHITE, ColorValue::new(255, 0, 0), ColorValue::new(0, 0, 255)]).unwrap()
    }

    #[test]
    fn rejects_an_empty_color_set() {
        assert_eq!(ColorPicker::new(vec![]).unwrap_err(), ColorSourceError::Empty);
    }

    #[test]
    fn the_first_color_is_active_after_mount() {
        assert_eq!(picker().active(), ActiveColor { index: 0, color: WHITE });
    }

    #[test]
    fn set_active_by_index_changes_the_active_color() {
        let mut picker = picker();

        picker.set_active_by_index(2).unwrap();

        assert_eq!(
            picker.active(),
            ActiveColor {
                index: 2,
                color: ColorValue::new(0, 0, 255)
            }
        );
    }

    #[test]
    fn set_active_by_index_out_of_range_keeps_the_active_color() {
        let mut picker = picker();
        picker.set_active_by_index(1).unwrap();

        let result = picker.set_active_by_index(3);

        assert_eq!(result, Err(ColorSourceError::IndexOutOfRange { index: 3, len: 3 }));
        assert_eq!(picker.active().index, 1);
    }

    #[test]
    fn set_color_replaces_only_the_given_color() {
        let mut picker = picker();

        picker.set_color(1, ColorValue::new(0, 255, 0)).unwrap();

        assert_eq!(picker.colors(), vec![WHITE, ColorValue::new(0, 255, 0), ColorValue::new(0, 0, 255)]);
    }

    #[test]
    fn set_color_out_of_range_leaves_the_colors_untouched() {
        let mut picker = picker();

        let result = picker.set_color(5, ColorValue::new(0, 0, 0));

        assert_eq!(result, Err(ColorSourceError::IndexOutOfRange { index: 5, len: 3 }));
        assert_eq!(picker.colors(), vec![WHITE, ColorValue::new(255, 0, 0), ColorValue::new(0, 0, 255)]);
    }

    #[test]
    fn subscribers_see_the_latest_event() {
        let mut picker = picker();
        let mut rx = picker.subscribe();
        assert!(!rx.has_changed().unwrap());

        picker.set_color(0, ColorValue::new(1, 2, 3)).unwrap();
        picker.set_active_by_index(1).unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), ColorSourceEvent::ColorSetActive);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn failed_updates_do_not_notify() {
        let mut picker = picker();
        let rx = picker.subscribe();

        let _ = picker.set_active_by_index(10);

        assert!(!rx.has_changed().unwrap());
    }
}
