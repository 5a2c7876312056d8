use crate::domain::ColorValue;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::str::FromStr;
use thiserror::Error;

/// Milliseconds per UI duration tick, fixed by the device protocol.
pub const TICK_MILLIS: u64 = 500;

/// Upper bound on the number of steps a session may hold.
pub const MAX_STEPS: usize = 1024;

/// Number of steps in a session, between 1 and [`MAX_STEPS`]. Fixed once the session is
/// initialized.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct StepCount(NonZeroUsize);

impl StepCount {
    pub fn new(count: i64) -> Result<Self, StepCountError> {
        usize::try_from(count)
            .ok()
            .filter(|count| *count <= MAX_STEPS)
            .and_then(NonZeroUsize::new)
            .map(StepCount)
            .ok_or_else(|| StepCountError::InvalidStepCount(count.to_string()))
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl FromStr for StepCount {
    type Err = StepCountError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let count = value
            .trim()
            .parse::<i64>()
            .map_err(|_| StepCountError::InvalidStepCount(value.to_string()))?;
        StepCount::new(count)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum StepCountError {
    #[error("invalid step count '{0}', expected an integer between 1 and {max}", max = MAX_STEPS)]
    InvalidStepCount(String),
}

/// One editable duration input. An empty slot counts as zero ticks; raw text input parses with
/// `FromStr`, where blank text means empty.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Deserialize)]
#[serde(try_from = "DurationInput")]
pub struct DurationSlot {
    ticks: Option<u32>,
}

impl DurationSlot {
    pub fn empty() -> Self {
        DurationSlot { ticks: None }
    }

    pub fn with_ticks(ticks: u32) -> Self {
        DurationSlot { ticks: Some(ticks) }
    }

    pub fn set_ticks(&mut self, ticks: u32) {
        self.ticks = Some(ticks);
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_none()
    }

    pub fn ticks(&self) -> u32 {
        self.ticks.unwrap_or_default()
    }

    pub fn to_millis(&self) -> u64 {
        self.ticks() as u64 * TICK_MILLIS
    }
}

impl FromStr for DurationSlot {
    type Err = DurationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(DurationSlot::empty());
        }

        trimmed
            .parse::<u32>()
            .map(DurationSlot::with_ticks)
            .map_err(|_| DurationError::InvalidDuration(input.to_string()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DurationInput {
    Ticks(u32),
    Text(String),
}

impl TryFrom<DurationInput> for DurationSlot {
    type Error = DurationError;

    fn try_from(value: DurationInput) -> Result<Self, Self::Error> {
        match value {
            DurationInput::Ticks(ticks) => Ok(DurationSlot::with_ticks(ticks)),
            DurationInput::Text(text) => text.parse(),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum DurationError {
    #[error("invalid duration '{0}', expected a non-negative number of ticks")]
    InvalidDuration(String),
}

#[derive(PartialEq, Clone, Debug, Serialize)]
pub struct Step {
    #[serde(rename = "time")]
    time_ms: u64,
    color: ColorValue,
}

impl Step {
    pub fn new(duration: DurationSlot, color: ColorValue) -> Self {
        Step {
            time_ms: duration.to_millis(),
            color,
        }
    }

    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    pub fn color(&self) -> ColorValue {
        self.color
    }
}

/// The ordered steps of one submission. Serializes as the `hsvtime` request body.
#[derive(PartialEq, Clone, Debug, Serialize)]
pub struct Sequence {
    #[serde(rename = "Steps")]
    steps: Vec<Step>,
}

impl Sequence {
    /// Zips durations and colors by position. Both lists must have the same length; nothing is
    /// truncated.
    pub fn build(durations: &[DurationSlot], colors: &[ColorValue]) -> Result<Self, SequenceError> {
        if durations.len() != colors.len() {
            return Err(SequenceError::SequenceLengthMismatch {
                durations: durations.len(),
                colors: colors.len(),
            });
        }

        let steps = durations.iter().zip(colors).map(|(duration, color)| Step::new(*duration, *color)).collect();
        Ok(Sequence { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum SequenceError {
    #[error("{durations} duration(s) but {colors} color(s), refusing to build a partial sequence")]
    SequenceLengthMismatch { durations: usize, colors: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WHITE;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::one("1", 1)]
    #[case::padded(" 12 ", 12)]
    #[case::largest("1024", MAX_STEPS)]
    fn parses_a_positive_step_count(#[case] input: &str, #[case] expected: usize) {
        assert_eq!(input.parse::<StepCount>().map(|c| c.get()), Ok(expected));
    }

    #[rstest]
    #[case::zero("0")]
    #[case::negative("-3")]
    #[case::empty("")]
    #[case::fraction("2.5")]
    #[case::text("three")]
    #[case::above_limit("1025")]
    #[case::huge("1000000000000")]
    fn rejects_an_invalid_step_count(#[case] input: &str) {
        assert_eq!(input.parse::<StepCount>(), Err(StepCountError::InvalidStepCount(input.to_string())));
    }

    #[rstest]
    #[case::empty("", 0, true)]
    #[case::blank("  ", 0, true)]
    #[case::zero("0", 0, false)]
    #[case::ticks("3", 3, false)]
    fn parses_duration_input(#[case] input: &str, #[case] ticks: u32, #[case] empty: bool) {
        let slot = input.parse::<DurationSlot>().unwrap();
        assert_eq!(slot.ticks(), ticks);
        assert_eq!(slot.is_empty(), empty);
    }

    #[rstest]
    #[case::negative("-1")]
    #[case::text("fast")]
    fn rejects_invalid_duration_input(#[case] input: &str) {
        assert_eq!(input.parse::<DurationSlot>(), Err(DurationError::InvalidDuration(input.to_string())));
    }

    #[test]
    fn set_ticks_fills_an_empty_slot() {
        let mut slot = DurationSlot::empty();

        slot.set_ticks(4);

        assert!(!slot.is_empty());
        assert_eq!(slot.to_millis(), 2000);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 500)]
    #[case(3, 1500)]
    #[case(u32::MAX, u32::MAX as u64 * 500)]
    fn converts_ticks_to_milliseconds(#[case] ticks: u32, #[case] millis: u64) {
        assert_eq!(DurationSlot::with_ticks(ticks).to_millis(), millis);
    }

    #[test]
    fn serializes_steps_in_order() -> Result<(), serde_json::Error> {
        let a = ColorValue::new(255, 0, 0);
        let b = ColorValue::new(0, 255, 0);
        let c = ColorValue::new(0, 0, 255);
        let durations = [DurationSlot::with_ticks(1), DurationSlot::with_ticks(2), DurationSlot::with_ticks(3)];

        let sequence = Sequence::build(&durations, &[a, b, c]).unwrap();

        assert_eq!(
            serde_json::to_value(&sequence)?,
            json!({
                "Steps": [
                    { "time": 500, "color": serde_json::to_value(a)? },
                    { "time": 1000, "color": serde_json::to_value(b)? },
                    { "time": 1500, "color": serde_json::to_value(c)? },
                ]
            })
        );
        Ok(())
    }

    #[test]
    fn empty_slots_serialize_as_zero_milliseconds() {
        let sequence = Sequence::build(&[DurationSlot::empty()], &[WHITE]).unwrap();
        assert_eq!(sequence.steps()[0].time_ms(), 0);
    }

    #[rstest]
    #[case::more_durations(3, 2)]
    #[case::more_colors(1, 2)]
    fn refuses_mismatched_lengths(#[case] durations: usize, #[case] colors: usize) {
        let result = Sequence::build(&vec![DurationSlot::with_ticks(1); durations], &vec![WHITE; colors]);

        assert_eq!(result, Err(SequenceError::SequenceLengthMismatch { durations, colors }));
    }

    #[test]
    fn deserializes_durations_from_numbers_and_text() -> Result<(), serde_json::Error> {
        let slots = serde_json::from_str::<Vec<DurationSlot>>(r#"[2, "3", ""]"#)?;
        assert_eq!(slots, vec![DurationSlot::with_ticks(2), DurationSlot::with_ticks(3), DurationSlot::empty()]);
        Ok(())
    }
}
